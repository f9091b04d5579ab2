//! Core services - the session's business logic layer.
//!
//! Services orchestrate between ports (trait interfaces) and domain logic.
//! They don't know about concrete implementations.

mod session;
mod speech;
mod transcript;

pub use session::{ChatSession, SubmitOutcome};
pub use speech::{PREVIEW_SAMPLE, SpeakOutcome, SpeechController, UNSUPPORTED_NOTICE};
pub use transcript::{PendingSubmission, Transcript};
