use serde::{Deserialize, Serialize};

use crate::{
    ast::Ast,
    builder::build,
    error::WffError,
    operators::OperatorTable,
    postfix::to_postfix,
    symbols::SymbolTable,
    token::{Lexer, Token},
};

/// The vocabulary of one parse/rewrite session: which identifiers exist and
/// which operators join them. Fixed once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrammar")]
pub struct Grammar {
    symbols: SymbolTable,
    operators: OperatorTable,
}

#[derive(Deserialize)]
struct RawGrammar {
    symbols: SymbolTable,
    operators: OperatorTable,
}

impl TryFrom<RawGrammar> for Grammar {
    type Error = WffError;

    fn try_from(raw: RawGrammar) -> Result<Self, Self::Error> {
        Grammar::new(raw.symbols, raw.operators)
    }
}

impl Grammar {
    pub fn new(symbols: SymbolTable, operators: OperatorTable) -> Result<Self, WffError> {
        let shadowed = symbols
            .constants()
            .map(|(lexeme, _)| lexeme)
            .chain(symbols.variables())
            .find(|lexeme| operators.is_operator(lexeme));

        if let Some(lexeme) = shadowed {
            return Err(WffError::invalid_config(format!(
                "'{lexeme}' is declared both as a symbol and as an operator"
            )));
        }

        Ok(Self { symbols, operators })
    }

    /// Constants `1` (true) and `0` (false), single-letter variables and the
    /// operators of [`OperatorTable::standard`].
    pub fn standard() -> Self {
        Self {
            symbols: SymbolTable::standard(),
            operators: OperatorTable::standard(),
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn operators(&self) -> &OperatorTable {
        &self.operators
    }

    pub fn lexer(&self) -> Lexer<'_> {
        Lexer::new(&self.operators, &self.symbols)
    }

    pub fn pattern_lexer(&self) -> Lexer<'_> {
        Lexer::for_patterns(&self.operators, &self.symbols)
    }

    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>, WffError> {
        self.lexer().tokenize(text)
    }

    /// Lexes, converts to postfix and builds the tree for a formula.
    pub fn parse(&self, text: &str) -> Result<Ast, WffError> {
        let tokens = self.lexer().tokenize(text)?;
        build(&to_postfix(&tokens)?)
    }

    /// Like [`Grammar::parse`], but undeclared identifiers become pattern
    /// variables.
    pub fn parse_pattern(&self, text: &str) -> Result<Ast, WffError> {
        let tokens = self.pattern_lexer().tokenize(text)?;
        build(&to_postfix(&tokens)?)
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::standard()
    }
}
