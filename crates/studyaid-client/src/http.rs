//! HTTP backend abstraction for the simplifier API.
//!
//! This module provides a trait-based HTTP backend that allows for
//! dependency injection and easy testing. The production implementation
//! uses reqwest and issues exactly one request per call.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::SimplifierClientConfig;
use crate::error::{ClientError, ClientResult};

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that exchange JSON with the simplifier API.
///
/// This is an implementation detail - external code should use the
/// `SimplifierPort` trait.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// GET a URL and deserialize the JSON body.
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> ClientResult<T>;

    /// POST a JSON body to a URL and deserialize the JSON response.
    async fn post_json<B, T>(&self, url: &Url, body: &B) -> ClientResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
///
/// Timeouts are applied by the client around the whole call, so the
/// reqwest client itself is built without one.
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &SimplifierClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    /// Turn a response into JSON, or a status error carrying the body text.
    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                tracing::warn!(status = status.as_u16(), error = %e, "Failed to read error body");
                String::new()
            });
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> ClientResult<T> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url.as_str()).send().await?;
        Self::read_json(response).await
    }

    async fn post_json<B, T>(&self, url: &Url, body: &B) -> ClientResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        tracing::debug!(%url, "POST");
        let response = self.client.post(url.as_str()).json(body).send().await?;
        Self::read_json(response).await
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
