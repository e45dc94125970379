//! HTTP Backend Implementation
//!
//! Client for the calculator REST service.
//!
//! # Service API
//!
//! - `POST /api/calculator/calculate` - one binary operation (or `ac`)
//! - `GET /api/calculator/health` - plain-text liveness message
//! - `GET /api/calculator/operations` - supported operations, carried in the
//!   `errorMessage` field of a calculate-shaped response
//!
//! The calculate endpoint answers failures with HTTP 400 and a normal JSON
//! body, so the body is decoded whatever the status code is.

use std::time::Duration;

use async_trait::async_trait;

use super::traits::{BackendError, CalculationRequest, CalculationResponse, CalculatorBackend};
use crate::config::CalculatorConfig;

/// Health checks get a shorter leash than calculations
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP calculation backend
#[derive(Clone, Debug)]
pub struct HttpBackend {
    /// Service root, without a trailing slash
    base_url: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpBackend {
    /// Create a backend for the service at `base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            http_client,
        })
    }

    /// Create from loaded configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &CalculatorConfig) -> Result<Self, BackendError> {
        Self::new(config.server_url.clone(), config.request_timeout)
    }

    /// Service root
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn calculate_url(&self) -> String {
        format!("{}/api/calculator/calculate", self.base_url)
    }

    fn health_url(&self) -> String {
        format!("{}/api/calculator/health", self.base_url)
    }

    fn operations_url(&self) -> String {
        format!("{}/api/calculator/operations", self.base_url)
    }

    /// Decode a calculate-shaped body, keeping the raw text for diagnostics
    fn decode(status: reqwest::StatusCode, body: &str) -> Result<CalculationResponse, BackendError> {
        serde_json::from_str(body).map_err(|e| {
            let snippet: String = body.chars().take(80).collect();
            BackendError::Decode(format!("{e} (status {status}, body {snippet:?})"))
        })
    }
}

#[async_trait]
impl CalculatorBackend for HttpBackend {
    fn name(&self) -> &'static str {
        "HTTP"
    }

    async fn health_check(&self) -> Result<String, BackendError> {
        let response = self
            .http_client
            .get(self.health_url())
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::warn!(%status, body = %text, "Health endpoint returned an error status");
        }
        Ok(text)
    }

    async fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResponse, BackendError> {
        tracing::debug!(
            operand1 = request.operand1,
            operand2 = request.operand2,
            operation = %request.operation,
            "Sending calculation"
        );

        let response = self
            .http_client
            .post(self.calculate_url())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Self::decode(status, &body)
    }

    async fn supported_operations(&self) -> Result<String, BackendError> {
        let response = self.http_client.get(self.operations_url()).send().await?;
        let status = response.status();
        let body = response.text().await?;
        let decoded = Self::decode(status, &body)?;
        Ok(decoded.error_message.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let backend = HttpBackend::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8080");
        assert_eq!(
            backend.calculate_url(),
            "http://localhost:8080/api/calculator/calculate"
        );
        assert_eq!(
            backend.health_url(),
            "http://localhost:8080/api/calculator/health"
        );
    }

    #[test]
    fn test_decode_rejects_html() {
        let err = HttpBackend::decode(reqwest::StatusCode::BAD_GATEWAY, "<html>oops</html>")
            .unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_decode_accepts_failure_body() {
        let body = r#"{"success":false,"errorMessage":"Invalid operation: %"}"#;
        let response = HttpBackend::decode(reqwest::StatusCode::BAD_REQUEST, body).unwrap();
        assert!(!response.success);
        assert_eq!(response.error_message.as_deref(), Some("Invalid operation: %"));
    }
}
