//! System text-to-speech adapter.
//!
//! Implements [`studyaid_core::SpeechPlatform`] by driving the host's speech
//! binary: `espeak-ng` (or `espeak`) on Linux, `say` on macOS. Each
//! utterance is one `tokio::process` child supervised by a task on the
//! runtime given to [`SystemSpeech`]; cancelling kills it.
//!
//! Voices are listed by a background task right after detection, so
//! [`SystemSpeech::voices`](studyaid_core::SpeechPlatform::voices) may be
//! empty for a moment and fill in later.

#![deny(unused_crate_dependencies)]

pub mod catalog;
pub mod engine;
pub mod error;
pub mod playback;
pub mod system;

// Re-export key types for convenience
pub use engine::{EngineKind, SpeechEngine};
pub use error::VoiceError;
pub use system::SystemSpeech;
