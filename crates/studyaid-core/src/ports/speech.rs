//! Speech platform port.
//!
//! Abstracts the host's text-to-speech capability: voice enumeration,
//! non-blocking playback with a completion callback, and immediate
//! cancellation. The capability is optional, so consumers hold an
//! `Option<Arc<dyn SpeechPlatform>>` and degrade to a notice when absent.

use thiserror::Error;

use crate::domain::Voice;

/// One request to read text aloud.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// Speed multiplier (1.0 = platform default).
    pub rate: f32,
    /// Pitch multiplier (1.0 = platform default).
    pub pitch: f32,
    /// Voice to use; the platform default when `None`.
    pub voice: Option<Voice>,
}

/// How an utterance ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtteranceEnd {
    /// Playback ran to completion.
    Finished,
    /// Playback was cancelled before it finished.
    Interrupted,
    /// The engine failed mid-utterance.
    Failed(String),
}

/// Invoked exactly once when a started utterance ends, on any thread.
pub type UtteranceCallback = Box<dyn FnOnce(UtteranceEnd) + Send + 'static>;

/// Errors that prevent an utterance from starting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    /// No speech engine is available on this system.
    #[error("Text-to-speech is not supported on this system")]
    Unsupported,

    /// The engine refused or failed to start.
    #[error("Failed to start speech: {0}")]
    StartFailed(String),
}

/// Port trait for the platform speech engine.
pub trait SpeechPlatform: Send + Sync {
    /// Current voice snapshot. May be empty until discovery completes, and
    /// may grow later.
    fn voices(&self) -> Vec<Voice>;

    /// Start reading `utterance` without blocking.
    ///
    /// On `Ok`, `on_done` fires exactly once when playback ends. On `Err`
    /// the callback is dropped without being called.
    fn speak(&self, utterance: Utterance, on_done: UtteranceCallback) -> Result<(), SpeechError>;

    /// Stop the active utterance, if any. Its callback reports `Interrupted`.
    fn cancel(&self);
}
