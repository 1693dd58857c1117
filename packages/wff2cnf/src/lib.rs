//! Parsing of propositional formulas and their rewriting toward conjunctive
//! normal form with a table of boolean-algebra identities.
//!
//! Text flows through [`token::Lexer`], [`postfix::to_postfix`] and
//! [`builder::build`] into an [`ast::Ast`], which a [`transform::Transformer`]
//! then rewrites in place until no rule applies.

pub mod ast;
pub mod builder;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod explanation;
pub mod grammar;
pub mod operators;
pub mod postfix;
pub mod rules;
pub mod symbols;
pub mod token;
pub mod transform;


pub use ast::{Ast, Node, Position};
pub use config::Config;
pub use error::WffError;
pub use grammar::Grammar;
pub use transform::{RewriteOutcome, Transformer};
