//! Calculation Errors
//!
//! Every failure the user can see ends up as one of these. The editor shows
//! [`CalculationError::display_message`] in the result region and clears it
//! after the error display delay.

use thiserror::Error;

/// Shown when the expression cannot be split into numeric operands
pub const INVALID_EXPRESSION_MESSAGE: &str = "Invalid expression";

/// Shown when the service rejects a calculation without saying why
pub const CALCULATION_ERROR_MESSAGE: &str = "Calculation error";

/// Shown when the calculation service cannot be reached
pub const NETWORK_ERROR_MESSAGE: &str = "Network error - please check if the server is running";

/// Shown when the startup health check fails
pub const SERVER_CONNECTION_FAILED_MESSAGE: &str = "Server connection failed";

/// Errors surfaced through the result display
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// An operand token was not numeric, or the operator was unknown
    #[error("invalid expression")]
    InvalidExpression,

    /// The service answered but reported failure
    #[error("calculation rejected: {}", message.as_deref().unwrap_or("no reason given"))]
    Rejected {
        /// Message supplied by the service, if any
        message: Option<String>,
    },

    /// The calculate endpoint could not be reached or returned garbage
    #[error("transport failure: {0}")]
    Transport(String),

    /// The health endpoint could not be reached
    #[error("health check failed: {0}")]
    Unreachable(String),
}

impl CalculationError {
    /// Build a rejection, treating an empty message as absent
    #[must_use]
    pub fn rejected(message: Option<String>) -> Self {
        Self::Rejected {
            message: message.filter(|m| !m.is_empty()),
        }
    }

    /// The text placed in the result display
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::InvalidExpression => INVALID_EXPRESSION_MESSAGE.to_string(),
            Self::Rejected { message } => message
                .clone()
                .unwrap_or_else(|| CALCULATION_ERROR_MESSAGE.to_string()),
            Self::Transport(_) => NETWORK_ERROR_MESSAGE.to_string(),
            Self::Unreachable(_) => SERVER_CONNECTION_FAILED_MESSAGE.to_string(),
        }
    }
}
