//! Shared CLI presentation utilities.
//!
//! # Guidelines
//!
//! - Keep this module format-only: no domain transforms
//! - Functions return strings; handlers decide where to print them

pub mod checks;
pub mod transcript;
pub mod voices;

use console::style;

// Re-export commonly used items
pub use checks::format_checks;
pub use transcript::{assistant_ordinal, format_message};
pub use voices::{format_picks, format_voice_list};

/// A one-line notice (unsupported speech, bad command, ...).
pub fn notice(text: &str) -> String {
    style(text).yellow().to_string()
}

/// A dim status line (speaking state, grade changes).
pub fn status(text: &str) -> String {
    style(text).dim().to_string()
}
