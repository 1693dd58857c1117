use thiserror::Error;

use crate::ast::Position;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WffError {
    #[error("Unrecognized symbol '{symbol}' at offset {offset}")]
    UnrecognizedSymbol { symbol: String, offset: usize },
    #[error("Unbalanced parenthesis at token #{index}")]
    UnbalancedParenthesis { index: usize },
    #[error("Formula is empty")]
    EmptyFormula,
    #[error("Operator '{operator}' is missing an operand")]
    MissingOperand { operator: String },
    #[error("{count} operands are not joined by any operator")]
    DanglingOperands { count: usize },
    #[error("Formula nests deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
    #[error("Node '{lexeme}' expects {expected} children, got {found}")]
    ArityMismatch {
        lexeme: String,
        expected: usize,
        found: usize,
    },
    #[error("Pattern variable '{variable}' has no binding")]
    UnboundPatternVariable { variable: String },
    #[error("No node at position {position}")]
    NodeNotFound { position: Position },
    #[error("Symbol '{symbol}' has no truth value")]
    Unassigned { symbol: String },
    #[error("A truth table over {count} variables is too large")]
    TooManyVariables { count: usize },
    #[error("Operator '{operator}' does not stand for any connective")]
    MissingConnective { operator: String },
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl WffError {
    /// Whether the error was caused by the text handed to the parser rather
    /// than by a broken invariant or a malformed rule table.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            WffError::UnrecognizedSymbol { .. }
                | WffError::UnbalancedParenthesis { .. }
                | WffError::EmptyFormula
                | WffError::MissingOperand { .. }
                | WffError::DanglingOperands { .. }
                | WffError::NestingTooDeep { .. }
        )
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        WffError::InvalidConfig {
            reason: reason.into(),
        }
    }
}
