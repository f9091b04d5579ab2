//! Simplification backend port.
//!
//! The wire shapes here are the backend contract: `POST /simplify` takes a
//! [`SimplifyRequest`] and answers with a [`SimplifyResponse`]. The
//! implementation lives in `studyaid-client`.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Grade;

// ── DTOs ─────────────────────────────────────────────────────────────────────

/// Body of a simplification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimplifyRequest {
    /// Text to simplify. Callers trim and reject blank input beforehand.
    pub text: String,
    /// Target learning level.
    pub grade: Grade,
    /// Generation budget; the backend default applies when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_new_tokens: Option<NonZeroU32>,
}

impl SimplifyRequest {
    pub fn new(text: impl Into<String>, grade: Grade) -> Self {
        Self {
            text: text.into(),
            grade,
            max_new_tokens: None,
        }
    }

    #[must_use]
    pub const fn with_max_new_tokens(mut self, max_new_tokens: Option<NonZeroU32>) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }
}

/// Successful simplification result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifyResponse {
    /// Simplified text; may be empty.
    #[serde(default)]
    pub simplified: String,
    /// Grade the backend used.
    pub grade: Grade,
    /// Opaque fact-check payload. See [`FactChecks`](crate::domain::FactChecks).
    #[serde(default)]
    pub checks: serde_json::Value,
}

/// Backend liveness as reported by `GET /health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendHealth {
    pub ok: bool,
    /// Whether the backend has already loaded its model (first request is slow otherwise).
    #[serde(default)]
    pub model_loaded: bool,
}

// ── Error ─────────────────────────────────────────────────────────────────────

/// Errors returned by `SimplifierPort` operations.
///
/// The display text is what ends up in the transcript after `"Error: "`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimplifyError {
    /// The call did not complete within the configured timeout.
    #[error("Request timed out after {}", display_duration(*.0))]
    TimedOut(Duration),

    /// The backend answered with a non-success status.
    #[error("Backend error: {status} {body}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Response body, or empty if it could not be read.
        body: String,
    },

    /// Network or transport failure, passed through as-is.
    #[error("{0}")]
    Transport(String),

    /// The backend answered 2xx with a body that does not match the contract.
    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    /// The client could not be built (bad base URL, TLS setup, ...).
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Whole seconds as `45s`, anything finer as `Duration`'s debug form (`200ms`, `1.5s`).
fn display_duration(duration: Duration) -> String {
    if duration.subsec_nanos() == 0 {
        format!("{}s", duration.as_secs())
    } else {
        format!("{duration:?}")
    }
}

impl SimplifyError {
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut(_))
    }
}

// ── Port trait ────────────────────────────────────────────────────────────────

/// Port trait for the text-simplification backend.
///
/// Every call issues exactly one request. There are no retries and no caching.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SimplifierPort: Send + Sync {
    /// Simplify text and return the full backend response.
    async fn simplify_raw(
        &self,
        request: &SimplifyRequest,
    ) -> Result<SimplifyResponse, SimplifyError>;

    /// Simplify text and return only the simplified string.
    async fn simplify(&self, request: &SimplifyRequest) -> Result<String, SimplifyError> {
        self.simplify_raw(request)
            .await
            .map(|response| response.simplified)
    }

    /// Query backend liveness.
    async fn health(&self) -> Result<BackendHealth, SimplifyError>;

    /// Ask the backend to load its model ahead of the first request.
    async fn warmup(&self) -> Result<(), SimplifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    // Verify the trait is object-safe
    fn _assert_object_safe(_: Arc<dyn SimplifierPort>) {}

    #[test]
    fn test_request_omits_unset_token_budget() {
        let request = SimplifyRequest::new("Plants make food.", Grade::One);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"text": "Plants make food.", "grade": 1})
        );
    }

    #[test]
    fn test_request_includes_token_budget() {
        let request =
            SimplifyRequest::new("x", Grade::Three).with_max_new_tokens(NonZeroU32::new(120));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"text": "x", "grade": 3, "max_new_tokens": 120})
        );
    }

    #[test]
    fn test_response_parses_backend_shape() {
        let response: SimplifyResponse = serde_json::from_value(json!({
            "simplified": "Plants make food from light.",
            "grade": 2,
            "checks": {"missing_numbers": []}
        }))
        .unwrap();
        assert_eq!(response.grade, Grade::Two);
        assert_eq!(response.checks, json!({"missing_numbers": []}));
    }

    #[test]
    fn test_backend_error_display() {
        let err = SimplifyError::Backend {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Backend error: 500 boom");
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_timeout_error_is_distinct() {
        let err = SimplifyError::TimedOut(Duration::from_secs(45));
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "Request timed out after 45s");
    }

    #[test]
    fn test_sub_second_timeout_keeps_precision() {
        let err = SimplifyError::TimedOut(Duration::from_millis(200));
        assert_eq!(err.to_string(), "Request timed out after 200ms");

        let err = SimplifyError::TimedOut(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "Request timed out after 1.5s");
    }

    #[test]
    fn test_transport_error_passes_message_through() {
        let err = SimplifyError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "connection refused");
    }

    struct EchoPort;

    #[async_trait]
    impl SimplifierPort for EchoPort {
        async fn simplify_raw(
            &self,
            request: &SimplifyRequest,
        ) -> Result<SimplifyResponse, SimplifyError> {
            Ok(SimplifyResponse {
                simplified: format!("short: {}", request.text),
                grade: request.grade,
                checks: serde_json::Value::Null,
            })
        }

        async fn health(&self) -> Result<BackendHealth, SimplifyError> {
            Ok(BackendHealth {
                ok: true,
                model_loaded: false,
            })
        }

        async fn warmup(&self) -> Result<(), SimplifyError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_simplify_default_extracts_text() {
        let request = SimplifyRequest::new("long", Grade::Two);
        let text = EchoPort.simplify(&request).await.unwrap();
        assert_eq!(text, "short: long");
    }

    #[tokio::test]
    async fn test_mock_port_sees_request() {
        let mut mock = MockSimplifierPort::new();
        mock.expect_simplify_raw()
            .withf(|request| request.grade == Grade::One)
            .returning(|_| {
                Err(SimplifyError::Backend {
                    status: 422,
                    body: "text too short".to_string(),
                })
            });

        let request = SimplifyRequest::new("Hi", Grade::One);
        let err = mock.simplify_raw(&request).await.unwrap_err();
        assert!(matches!(err, SimplifyError::Backend { status: 422, .. }));
    }
}
