//! Simplifier client: endpoint resolution, request defaults and the timeout.

use std::future::Future;
use std::num::NonZeroU32;
use std::time::Duration;

use serde::Deserialize;
use studyaid_core::{BackendHealth, SimplifyRequest, SimplifyResponse};
use url::Url;

use crate::config::SimplifierClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::{HttpBackend, ReqwestBackend};

// ============================================================================
// Type Aliases
// ============================================================================

/// Default simplifier client using the reqwest HTTP backend.
pub type DefaultSimplifierClient = SimplifierClient<ReqwestBackend>;

/// Body of `POST /warmup` responses.
#[derive(Debug, Deserialize)]
struct WarmupResponse {
    #[serde(default)]
    warmed: bool,
}

// ============================================================================
// Client
// ============================================================================

/// Client for the simplification backend.
///
/// This client is generic over an HTTP backend, allowing for easy testing.
/// Use `DefaultSimplifierClient` for production code.
pub struct SimplifierClient<B: HttpBackend> {
    backend: B,
    base_url: Url,
    timeout: Duration,
    max_new_tokens: Option<NonZeroU32>,
}

impl DefaultSimplifierClient {
    /// Create a new client with the given configuration.
    pub fn new(config: &SimplifierClientConfig) -> Result<Self, studyaid_core::SimplifyError> {
        Self::build(config).map_err(Into::into)
    }

    fn build(config: &SimplifierClientConfig) -> ClientResult<Self> {
        let backend = ReqwestBackend::new(config)?;
        SimplifierClient::with_backend(config, backend)
    }
}

impl<B: HttpBackend> SimplifierClient<B> {
    /// Create a new client with a custom backend.
    pub(crate) fn with_backend(config: &SimplifierClientConfig, backend: B) -> ClientResult<Self> {
        Ok(Self {
            backend,
            base_url: parse_base_url(&config.base_url)?,
            timeout: config.timeout,
            max_new_tokens: config.max_new_tokens,
        })
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Bound `call` by the configured timeout.
    async fn timed<T>(
        &self,
        call: impl Future<Output = ClientResult<T>> + Send,
    ) -> ClientResult<T> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| ClientError::Timeout(self.timeout))?
    }

    pub(crate) async fn post_simplify(
        &self,
        request: &SimplifyRequest,
    ) -> ClientResult<SimplifyResponse> {
        let url = self.endpoint("simplify")?;
        let request = if request.max_new_tokens.is_none() && self.max_new_tokens.is_some() {
            request.clone().with_max_new_tokens(self.max_new_tokens)
        } else {
            request.clone()
        };

        tracing::debug!(
            %url,
            grade = %request.grade,
            chars = request.text.len(),
            max_new_tokens = request.max_new_tokens.map(NonZeroU32::get),
            "Sending simplification request"
        );

        self.timed(self.backend.post_json(&url, &request)).await
    }

    pub(crate) async fn get_health(&self) -> ClientResult<BackendHealth> {
        let url = self.endpoint("health")?;
        self.timed(self.backend.get_json(&url)).await
    }

    pub(crate) async fn post_warmup(&self) -> ClientResult<()> {
        let url = self.endpoint("warmup")?;
        let response: WarmupResponse = self
            .timed(self.backend.post_json(&url, &serde_json::json!({})))
            .await?;
        tracing::info!(warmed = response.warmed, "Backend warmup finished");
        Ok(())
    }
}

/// Parse the base URL so that relative endpoints append to its path.
fn parse_base_url(raw: &str) -> ClientResult<Url> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
