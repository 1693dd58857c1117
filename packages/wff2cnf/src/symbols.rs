use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::WffError;

/// Identifiers a formula may mention: named constants with a fixed truth
/// value, and free variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSymbolTable")]
pub struct SymbolTable {
    constants: IndexMap<String, bool>,
    variables: IndexSet<String>,
}

#[derive(Deserialize)]
struct RawSymbolTable {
    #[serde(default)]
    constants: IndexMap<String, bool>,
    #[serde(default)]
    variables: IndexSet<String>,
}

impl TryFrom<RawSymbolTable> for SymbolTable {
    type Error = WffError;

    fn try_from(raw: RawSymbolTable) -> Result<Self, Self::Error> {
        SymbolTable::new(raw.constants, raw.variables)
    }
}

impl SymbolTable {
    pub fn new<C, V>(
        constants: impl IntoIterator<Item = (C, bool)>,
        variables: impl IntoIterator<Item = V>,
    ) -> Result<Self, WffError>
    where
        C: Into<String>,
        V: Into<String>,
    {
        let mut table = SymbolTable::default();

        for (lexeme, value) in constants {
            let lexeme = lexeme.into();
            check_symbol_lexeme(&lexeme)?;

            if table.constants.insert(lexeme.clone(), value).is_some() {
                return Err(WffError::invalid_config(format!(
                    "constant '{lexeme}' is declared twice"
                )));
            }
        }

        for lexeme in variables {
            let lexeme = lexeme.into();
            check_symbol_lexeme(&lexeme)?;

            if table.constants.contains_key(&lexeme) {
                return Err(WffError::invalid_config(format!(
                    "'{lexeme}' is declared both as a constant and as a variable"
                )));
            }

            if !table.variables.insert(lexeme.clone()) {
                return Err(WffError::invalid_config(format!(
                    "variable '{lexeme}' is declared twice"
                )));
            }
        }

        Ok(table)
    }

    pub fn standard() -> Self {
        SymbolTable {
            constants: IndexMap::from([("1".to_owned(), true), ("0".to_owned(), false)]),
            variables: [
                "a", "b", "c", "d", "p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
        }
    }

    pub fn is_constant(&self, lexeme: &str) -> bool {
        self.constants.contains_key(lexeme)
    }

    pub fn is_variable(&self, lexeme: &str) -> bool {
        self.variables.contains(lexeme)
    }

    pub fn constant_value(&self, lexeme: &str) -> Option<bool> {
        self.constants.get(lexeme).copied()
    }

    pub fn constants(&self) -> impl Iterator<Item = (&str, bool)> {
        self.constants
            .iter()
            .map(|(lexeme, value)| (lexeme.as_str(), *value))
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(String::as_str)
    }
}

fn check_symbol_lexeme(lexeme: &str) -> Result<(), WffError> {
    let mut chars = lexeme.chars();

    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_whitespace() && c != '(' && c != ')' => Ok(()),
        _ => Err(WffError::invalid_config(format!(
            "symbol '{lexeme}' must be a single non-whitespace, non-parenthesis character"
        ))),
    }
}
