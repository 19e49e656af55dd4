//! Expression error types

use thiserror::Error;

/// Result type for expression operations
pub type ExprResult<T> = std::result::Result<T, ExprError>;

/// Errors that can occur while parsing or evaluating an expression
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    /// Malformed input
    #[error("Syntax error: {message} (char {position})")]
    Syntax { message: String, position: usize },

    /// Reference to a name that is neither a variable, constant nor unit
    #[error("Undefined symbol {0}")]
    UndefinedSymbol(String),

    /// Unknown function
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Arithmetic between incompatible units, or a unit where a number is required
    #[error("Unit mismatch: {0}")]
    UnitMismatch(String),

    /// Any other evaluation failure
    #[error("Evaluation error: {0}")]
    Evaluation(String),
}

impl ExprError {
    pub(crate) fn syntax(message: impl Into<String>, position: usize) -> Self {
        ExprError::Syntax {
            message: message.into(),
            position,
        }
    }

    /// True for errors raised by the parser rather than the evaluator
    pub fn is_syntax(&self) -> bool {
        matches!(self, ExprError::Syntax { .. })
    }
}
