//! Public configuration for the simplifier client.

use std::num::NonZeroU32;
use std::time::Duration;

use studyaid_core::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};

/// Configuration for the simplifier client.
///
/// Use the builder pattern methods to customize the client configuration.
///
/// # Example
///
/// ```
/// use studyaid_client::SimplifierClientConfig;
/// use std::time::Duration;
///
/// let config = SimplifierClientConfig::new()
///     .with_base_url("http://10.0.0.5:8000")
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct SimplifierClientConfig {
    /// Base URL of the backend (endpoints are resolved against it)
    pub(crate) base_url: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Client-side bound on each call, including reading the body
    pub(crate) timeout: Duration,
    /// Generation budget applied when a request doesn't carry its own
    pub(crate) max_new_tokens: Option<NonZeroU32>,
}

impl Default for SimplifierClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ENDPOINT.to_string(),
            user_agent: concat!("studyaid-client/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_new_tokens: None,
        }
    }
}

impl SimplifierClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend base URL.
    ///
    /// Defaults to `http://127.0.0.1:8000`.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the per-call timeout.
    ///
    /// Defaults to 45 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the default generation budget.
    #[must_use]
    pub const fn with_max_new_tokens(mut self, max_new_tokens: Option<NonZeroU32>) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }
}
