//! Speech adapter error types.

use studyaid_core::SpeechError;

/// Errors that can occur while driving the system speech engine.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// No supported speech binary on `PATH`.
    #[error("No speech engine found (looked for espeak-ng, espeak, say)")]
    EngineNotFound,

    /// The engine process could not be started.
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// The engine's voice listing could not be read.
    #[error("Failed to list voices: {0}")]
    VoiceList(String),
}

impl From<VoiceError> for SpeechError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::EngineNotFound => Self::Unsupported,
            other => Self::StartFailed(other.to_string()),
        }
    }
}
