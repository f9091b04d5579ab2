//! Internal error types for backend calls.
//!
//! These errors are internal to `studyaid-client` and are mapped to the core
//! `SimplifyError` at the port boundary.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-success status.
    #[error("Backend request failed with status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body text, empty if it could not be read
        body: String,
    },

    /// The call did not finish within the configured timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}
