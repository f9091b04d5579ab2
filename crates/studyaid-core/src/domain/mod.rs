//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! infrastructure concerns (HTTP, audio, terminal).
//!
//! # Structure
//!
//! - `grade` - Learning level tag and the tone/voice parameters derived from it
//! - `message` - Transcript entries (`Message`, `MessageId`, `Role`)
//! - `voice` - Platform voices and the grade-aware voice selector
//! - `checks` - Typed view over the backend's fact-check payload

pub mod checks;
pub mod grade;
pub mod message;
pub mod voice;

pub use checks::FactChecks;
pub use grade::{Grade, InvalidGrade, Prosody};
pub use message::{Message, MessageId, Role};
pub use voice::{AUTO_VOICE, Voice, VoiceSelection, select_voice};
