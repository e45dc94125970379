//! Calculation Backend Traits
//!
//! The editor never does arithmetic itself. Each binary step is handed to a
//! [`CalculatorBackend`], which in production is the HTTP service and in
//! tests is whatever mock the test needs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CalculationError;
use crate::operator::Operator;

/// Operation code for the all-clear notification
pub const CLEAR_OPERATION: &str = "ac";

/// Errors raised while talking to a backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// Request could not be sent or the response could not be read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("malformed response body: {0}")]
    Decode(String),
}

impl From<BackendError> for CalculationError {
    fn from(err: BackendError) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Body of a calculate request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Left operand (the running result during a chain)
    pub operand1: f64,
    /// Right operand
    pub operand2: f64,
    /// Operation code: `+`, `-`, `*`, `/` or `ac`
    pub operation: String,
}

impl CalculationRequest {
    /// Request for one binary step
    #[must_use]
    pub fn binary(operand1: f64, operand2: f64, operator: Operator) -> Self {
        Self {
            operand1,
            operand2,
            operation: operator.wire_code().to_string(),
        }
    }

    /// The all-clear notification (`0 ac 0`)
    #[must_use]
    pub fn clear() -> Self {
        Self {
            operand1: 0.0,
            operand2: 0.0,
            operation: CLEAR_OPERATION.to_string(),
        }
    }
}

/// Body of a calculate response
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse {
    /// Numeric result (meaningful only when `success` is true)
    #[serde(default)]
    pub result: f64,
    /// Operation the service performed
    #[serde(default)]
    pub operation: Option<String>,
    /// Whether the service performed the calculation
    #[serde(default)]
    pub success: bool,
    /// Failure reason
    #[serde(default)]
    pub error_message: Option<String>,
}

impl CalculationResponse {
    /// Successful response carrying `result`
    #[must_use]
    pub fn ok(result: f64, operation: impl Into<String>) -> Self {
        Self {
            result,
            operation: Some(operation.into()),
            success: true,
            error_message: None,
        }
    }

    /// Failed response carrying `message`
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error_message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Collapse the response into the value the evaluator threads forward
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::Rejected`] when `success` is false.
    pub fn into_outcome(self) -> Result<f64, CalculationError> {
        if self.success {
            Ok(self.result)
        } else {
            Err(CalculationError::rejected(self.error_message))
        }
    }
}

/// Calculation backend trait
///
/// Implement this to point the calculator at a different service.
#[async_trait]
pub trait CalculatorBackend: Send + Sync {
    /// Backend name for logs and the status line
    fn name(&self) -> &str;

    /// Fetch the service's health text
    async fn health_check(&self) -> Result<String, BackendError>;

    /// Perform one calculation
    ///
    /// A response with `success: false` is still `Ok`; only transport and
    /// decoding problems are errors.
    async fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResponse, BackendError>;

    /// Human-readable list of operations the service supports
    async fn supported_operations(&self) -> Result<String, BackendError>;
}
