//! Settings domain types and validation.
//!
//! This module contains the client-side settings used across adapters.
//! These are pure domain types with no infrastructure dependencies.

use std::num::NonZeroU32;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{Grade, VoiceSelection};

/// Default simplification backend base URL.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";

/// Default client-side timeout for a simplification call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 45;

/// Grade used when none is chosen.
pub const DEFAULT_GRADE: Grade = Grade::Two;

/// Upper bound accepted for `max_new_tokens`.
pub const MAX_NEW_TOKENS_LIMIT: u32 = 2048;

/// Application settings structure.
///
/// All fields are optional to support partial updates and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the simplification backend.
    pub endpoint: Option<String>,

    /// Client-side timeout in seconds.
    pub timeout_secs: Option<u64>,

    /// Generation budget forwarded to the backend.
    pub max_new_tokens: Option<u32>,

    /// Grade preselected in the view.
    pub grade: Option<Grade>,

    /// Voice id, or `"auto"`.
    pub voice: Option<String>,

    /// Whether fact checks are shown next to responses.
    pub show_checks: Option<bool>,
}

impl Settings {
    /// Get the effective backend URL (with default fallback).
    pub fn effective_endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Get the effective timeout (with default fallback).
    #[must_use]
    pub fn effective_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Get the effective grade (with default fallback).
    #[must_use]
    pub fn effective_grade(&self) -> Grade {
        self.grade.unwrap_or(DEFAULT_GRADE)
    }

    /// Get the effective voice selection (automatic when unset).
    #[must_use]
    pub fn effective_voice(&self) -> VoiceSelection {
        self.voice
            .as_deref()
            .map(|v| v.parse().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Token budget as sent on the wire; zero means "backend default".
    #[must_use]
    pub fn effective_max_new_tokens(&self) -> Option<NonZeroU32> {
        self.max_new_tokens.and_then(NonZeroU32::new)
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Endpoint must start with http:// or https://, got '{0}'")]
    InvalidEndpoint(String),

    #[error("Timeout must be between 1 and 600 seconds, got {0}")]
    InvalidTimeout(u64),

    #[error("max_new_tokens must be between 1 and {MAX_NEW_TOKENS_LIMIT}, got {0}")]
    InvalidMaxNewTokens(u32),
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(ref endpoint) = settings.endpoint {
        let trimmed = endpoint.trim();
        let has_host = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"))
            .is_some_and(|rest| !rest.is_empty());
        if !has_host {
            return Err(SettingsError::InvalidEndpoint(endpoint.clone()));
        }
    }

    if let Some(timeout) = settings.timeout_secs {
        if !(1..=600).contains(&timeout) {
            return Err(SettingsError::InvalidTimeout(timeout));
        }
    }

    if let Some(tokens) = settings.max_new_tokens {
        if !(1..=MAX_NEW_TOKENS_LIMIT).contains(&tokens) {
            return Err(SettingsError::InvalidMaxNewTokens(tokens));
        }
    }

    Ok(())
}
