#![forbid(unsafe_code)]

//! Error taxonomy for the calculation core.

use thiserror::Error;

/// Failure raised by [`crate::Calculation::compute`].
///
/// Both variants carry the inputs that caused them so callers can report
/// more than the message alone.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Division by zero is not allowed.")]
    DivisionByZero { operand1: f64, operand2: f64 },

    #[error("Unsupported operation: {operator}")]
    UnsupportedOperation { operator: String },
}

impl CalcError {
    pub fn division_by_zero(operand1: f64, operand2: f64) -> Self {
        Self::DivisionByZero { operand1, operand2 }
    }

    pub fn unsupported_operation(operator: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operator: operator.into(),
        }
    }

    /// Stable machine-readable code, used by the tool server.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DivisionByZero { .. } => "division_by_zero",
            Self::UnsupportedOperation { .. } => "unsupported_operation",
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}
