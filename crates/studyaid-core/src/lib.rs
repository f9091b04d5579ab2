//! Core domain types and port definitions for studyaid.
//!
//! This crate holds everything that does not touch the network or the
//! audio stack: the transcript state machine, the chat session that drives
//! it, voice selection, and the speech controller. Adapters live in
//! `studyaid-client` (HTTP) and `studyaid-voice` (system speech).

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod events;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    AUTO_VOICE, FactChecks, Grade, InvalidGrade, Message, MessageId, Prosody, Role, Voice,
    VoiceSelection, select_voice,
};
pub use events::SessionEvent;
pub use ports::{
    BackendHealth, SimplifierPort, SimplifyError, SimplifyRequest, SimplifyResponse, SpeechError,
    SpeechPlatform, Utterance, UtteranceCallback, UtteranceEnd,
};
pub use services::{
    ChatSession, PREVIEW_SAMPLE, PendingSubmission, SpeakOutcome, SpeechController, SubmitOutcome,
    Transcript, UNSUPPORTED_NOTICE,
};
pub use settings::{
    DEFAULT_ENDPOINT, DEFAULT_GRADE, DEFAULT_TIMEOUT_SECS, Settings, SettingsError,
    validate_settings,
};

// Silence unused dev-dependency warnings; used by integration tests only
#[cfg(test)]
use tokio_test as _;
