use derive_more::derive::Display;
use enum_as_inner::EnumAsInner;
use winnow::{ascii::multispace0, combinator::fail, token::take, PResult, Parser, Stateful};

use crate::{
    error::WffError,
    operators::{Operator, OperatorTable},
    symbols::SymbolTable,
};

#[derive(Debug, Clone, PartialEq, Eq, Display, EnumAsInner)]
pub enum Token {
    #[display("{_0}")]
    Variable(String),
    #[display("{_0}")]
    Constant(String),
    #[display("{_0}")]
    Operator(Operator),
    #[display("(")]
    OpenParen,
    #[display(")")]
    CloseParen,
}

impl Token {
    pub fn lexeme(&self) -> &str {
        match self {
            Token::Variable(lexeme) | Token::Constant(lexeme) => lexeme,
            Token::Operator(operator) => operator.lexeme(),
            Token::OpenParen => "(",
            Token::CloseParen => ")",
        }
    }

    /// Number of children a tree node holding this token must have.
    pub fn operand_count(&self) -> usize {
        match self {
            Token::Operator(operator) => operator.arity().operand_count(),
            _ => 0,
        }
    }

    pub fn is_unary_operator(&self) -> bool {
        self.as_operator().is_some_and(Operator::is_unary)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexMode {
    /// Every identifier must be declared in the symbol table.
    Formula,
    /// Undeclared alphanumeric identifiers are read as pattern variables.
    Pattern,
}

#[derive(Debug, Clone, Copy)]
pub struct Lexer<'a> {
    operators: &'a OperatorTable,
    symbols: &'a SymbolTable,
    mode: LexMode,
}

type Input<'t, 'a> = Stateful<&'t str, Lexer<'a>>;

impl<'a> Lexer<'a> {
    pub fn new(operators: &'a OperatorTable, symbols: &'a SymbolTable) -> Self {
        Self {
            operators,
            symbols,
            mode: LexMode::Formula,
        }
    }

    pub fn for_patterns(operators: &'a OperatorTable, symbols: &'a SymbolTable) -> Self {
        Self {
            mode: LexMode::Pattern,
            ..Self::new(operators, symbols)
        }
    }

    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>, WffError> {
        let mut input = Input {
            input: text,
            state: *self,
        };
        let mut tokens = Vec::new();

        loop {
            whitespace(&mut input).map_err(|_| WffError::UnrecognizedSymbol {
                symbol: input.input.to_owned(),
                offset: text.len() - input.input.len(),
            })?;

            if input.input.is_empty() {
                break;
            }

            let offset = text.len() - input.input.len();
            let lexeme = lexeme(&mut input).map_err(|_| WffError::UnrecognizedSymbol {
                symbol: input.input.to_owned(),
                offset,
            })?;

            let token = self
                .classify(lexeme)
                .ok_or_else(|| WffError::UnrecognizedSymbol {
                    symbol: lexeme.to_owned(),
                    offset,
                })?;

            log::trace!("lexed {token:?} at offset {offset}");

            tokens.push(token);
        }

        Ok(tokens)
    }

    fn classify(&self, lexeme: &str) -> Option<Token> {
        if let Some(operator) = self.operators.get(lexeme) {
            return Some(Token::Operator(operator));
        }

        match lexeme {
            "(" => Some(Token::OpenParen),
            ")" => Some(Token::CloseParen),
            _ if self.symbols.is_constant(lexeme) => Some(Token::Constant(lexeme.to_owned())),
            _ if self.symbols.is_variable(lexeme) => Some(Token::Variable(lexeme.to_owned())),
            _ if self.mode == LexMode::Pattern && is_pattern_variable(lexeme) => {
                Some(Token::Variable(lexeme.to_owned()))
            }
            _ => None,
        }
    }
}

fn is_pattern_variable(lexeme: &str) -> bool {
    let mut chars = lexeme.chars();

    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphanumeric() || c == '_')
}

fn whitespace(input: &mut Input<'_, '_>) -> PResult<()> {
    multispace0.void().parse_next(input)
}

/// Longest operator lexeme at the current position, or a single character.
/// `take` counts characters on `&str`, so lengths here are character counts.
fn lexeme<'t>(input: &mut Input<'t, '_>) -> PResult<&'t str> {
    let length = match input.state.operators.longest_match(input.input) {
        Some(length) => length,
        None if input.input.is_empty() => return fail(input),
        None => 1,
    };

    take(length).parse_next(input)
}
