use std::fmt::Display;

use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;

use crate::{
    ast::{Ast, Node},
    error::WffError,
    operators::Connective,
    symbols::SymbolTable,
    token::Token,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TruthValue(pub bool);

impl Display for TruthValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", if self.0 { "T" } else { "F" })
    }
}

/// Truth values assigned to variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interpretation(pub IndexMap<String, TruthValue>);

impl Interpretation {
    /// Every assignment over `variables`, from all-false to all-true. Fails
    /// when the assignments cannot be counted in a `u64`.
    pub fn generate_all<V: Into<String>>(
        variables: impl IntoIterator<Item = V>,
    ) -> Result<impl Iterator<Item = Interpretation>, WffError> {
        let variables = variables
            .into_iter()
            .map(Into::into)
            .collect::<IndexSet<String>>();
        let n = variables.len();
        let count = u32::try_from(n)
            .ok()
            .and_then(|shift| 1u64.checked_shl(shift))
            .ok_or(WffError::TooManyVariables { count: n })?;

        Ok((0..count).map(move |i| {
            Interpretation(
                variables
                    .iter()
                    .enumerate()
                    .map(|(bit, variable)| {
                        (variable.clone(), TruthValue(i >> (n - 1 - bit) & 1 == 1))
                    })
                    .collect(),
            )
        }))
    }

    pub fn get(&self, variable: &str) -> Option<TruthValue> {
        self.0.get(variable).copied()
    }
}

impl Display for Interpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let variable_list = self
            .0
            .iter()
            .sorted_by_key(|(variable, _)| variable.as_str())
            .map(|(variable, value)| {
                let prefix = if value.0 { "" } else { "!" };
                format!("{prefix}{variable}")
            })
            .join(", ");

        write!(f, "{{{variable_list}}}")
    }
}

pub trait Evaluate {
    /// Constants take the value the symbol table declares for them,
    /// variables the value `interpretation` assigns.
    fn evaluate(
        &self,
        symbols: &SymbolTable,
        interpretation: &Interpretation,
    ) -> Result<TruthValue, WffError>;
}

impl Evaluate for Node {
    fn evaluate(
        &self,
        symbols: &SymbolTable,
        interpretation: &Interpretation,
    ) -> Result<TruthValue, WffError> {
        let unassigned = || WffError::Unassigned {
            symbol: self.lexeme().to_owned(),
        };

        match self.token() {
            Token::Variable(name) => interpretation.get(name).ok_or_else(unassigned),
            Token::Constant(name) => symbols
                .constant_value(name)
                .map(TruthValue)
                .ok_or_else(unassigned),
            Token::Operator(operator) => {
                let connective =
                    operator
                        .connective()
                        .ok_or_else(|| WffError::MissingConnective {
                            operator: operator.lexeme().to_owned(),
                        })?;

                let operands = self
                    .children()
                    .iter()
                    .map(|child| child.evaluate(symbols, interpretation).map(|value| value.0))
                    .collect::<Result<Vec<_>, _>>()?;

                let value = match (connective, operands.as_slice()) {
                    (Connective::Negation, [operand]) => !operand,
                    (Connective::Conjunction, [left, right]) => *left && *right,
                    (Connective::Disjunction, [left, right]) => *left || *right,
                    (Connective::Implication, [left, right]) => !left || *right,
                    (Connective::Equivalence, [left, right]) => left == right,
                    _ => {
                        return Err(WffError::ArityMismatch {
                            lexeme: operator.lexeme().to_owned(),
                            expected: connective.arity().operand_count(),
                            found: operands.len(),
                        })
                    }
                };

                Ok(TruthValue(value))
            }
            Token::OpenParen | Token::CloseParen => Err(unassigned()),
        }
    }
}

impl Evaluate for Ast {
    fn evaluate(
        &self,
        symbols: &SymbolTable,
        interpretation: &Interpretation,
    ) -> Result<TruthValue, WffError> {
        self.root().evaluate(symbols, interpretation)
    }
}

/// Whether both formulas take the same value under every interpretation of
/// their combined variables.
pub fn is_equivalent(left: &Ast, right: &Ast, symbols: &SymbolTable) -> Result<bool, WffError> {
    let variables = left
        .variables()
        .into_iter()
        .chain(right.variables())
        .collect::<IndexSet<_>>();

    for interpretation in Interpretation::generate_all(variables)? {
        if left.evaluate(symbols, &interpretation)? != right.evaluate(symbols, &interpretation)? {
            return Ok(false);
        }
    }

    Ok(true)
}
