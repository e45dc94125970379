//! Calculation Backend Abstraction
//!
//! This module provides a trait-based abstraction over the remote service
//! that performs the arithmetic, so the editor can be driven by the real
//! HTTP service or by a test double.

mod http;
mod traits;

pub use http::HttpBackend;
pub use traits::{
    BackendError, CalculationRequest, CalculationResponse, CalculatorBackend, CLEAR_OPERATION,
};
