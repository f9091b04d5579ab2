//! CLI-specific error types and mappings.
//!
//! Maps core and adapter errors to sysexits-style exit codes.

use studyaid_core::{SettingsError, SimplifyError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument or input error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backend could not be reached or refused the request.
    #[error("{0}")]
    Backend(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow sysexits.h where one fits.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Backend(_) => 69,  // EX_UNAVAILABLE
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<SimplifyError> for CliError {
    fn from(err: SimplifyError) -> Self {
        match err {
            SimplifyError::Configuration(msg) => Self::Config(msg),
            other => Self::Backend(other.to_string()),
        }
    }
}
