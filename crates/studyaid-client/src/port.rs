//! Port trait implementation for `SimplifierClient`.
//!
//! This module implements the core-owned `SimplifierPort` trait, mapping the
//! internal `ClientError` onto the core `SimplifyError` taxonomy.

use async_trait::async_trait;
use studyaid_core::{
    BackendHealth, SimplifierPort, SimplifyError, SimplifyRequest, SimplifyResponse,
};

use crate::client::SimplifierClient;
use crate::error::ClientError;
use crate::http::HttpBackend;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `ClientError` to core `SimplifyError`.
fn map_error(err: ClientError) -> SimplifyError {
    match err {
        ClientError::Status { status, body } => SimplifyError::Backend { status, body },
        ClientError::Timeout(duration) => SimplifyError::TimedOut(duration),
        ClientError::Network(e) if e.is_builder() => SimplifyError::Configuration(e.to_string()),
        ClientError::Network(e) if e.is_decode() => SimplifyError::InvalidResponse(e.to_string()),
        ClientError::Network(e) => SimplifyError::Transport(e.to_string()),
        ClientError::InvalidUrl(e) => SimplifyError::Configuration(e.to_string()),
        ClientError::JsonParse(e) => SimplifyError::InvalidResponse(e.to_string()),
    }
}

impl From<ClientError> for SimplifyError {
    fn from(err: ClientError) -> Self {
        map_error(err)
    }
}

// ============================================================================
// Port Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend> SimplifierPort for SimplifierClient<B> {
    async fn simplify_raw(
        &self,
        request: &SimplifyRequest,
    ) -> Result<SimplifyResponse, SimplifyError> {
        self.post_simplify(request).await.map_err(map_error)
    }

    async fn health(&self) -> Result<BackendHealth, SimplifyError> {
        self.get_health().await.map_err(map_error)
    }

    async fn warmup(&self) -> Result<(), SimplifyError> {
        self.post_warmup().await.map_err(map_error)
    }
}
