//! Platform voices and grade-aware voice selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::grade::Grade;

/// Sentinel selection value meaning "derive the voice from the grade".
pub const AUTO_VOICE: &str = "auto";

/// A synthesis voice exposed by the speech platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Unique identifier understood by the platform.
    pub id: String,
    /// Human-readable display name.
    pub name: String,
    /// BCP-47-ish language tag (e.g. `en-US`).
    pub lang: String,
}

impl Voice {
    pub fn new(id: impl Into<String>, name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lang: lang.into(),
        }
    }

    /// Whether the language tag starts with `en`, ignoring case.
    #[must_use]
    pub fn is_english(&self) -> bool {
        self.lang
            .get(..2)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("en"))
    }
}

/// The user's voice choice: automatic or a specific voice id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VoiceSelection {
    #[default]
    Auto,
    Manual(String),
}

impl FromStr for VoiceSelection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == AUTO_VOICE {
            Ok(Self::Auto)
        } else {
            Ok(Self::Manual(s.to_string()))
        }
    }
}

impl fmt::Display for VoiceSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str(AUTO_VOICE),
            Self::Manual(id) => f.write_str(id),
        }
    }
}

/// Pick one voice for reading text at `grade`.
///
/// A manual selection whose id exists wins outright. Otherwise English
/// voices are searched with the grade's name hints in order; the first
/// hint that matches any voice decides, ties going to enumeration order.
/// Falls back to the first English voice, then to the first voice overall.
pub fn select_voice<'a>(
    voices: &'a [Voice],
    grade: Grade,
    selection: &VoiceSelection,
) -> Option<&'a Voice> {
    if voices.is_empty() {
        return None;
    }

    if let VoiceSelection::Manual(id) = selection {
        if let Some(voice) = voices.iter().find(|v| v.id == *id) {
            return Some(voice);
        }
    }

    let english: Vec<&Voice> = voices.iter().filter(|v| v.is_english()).collect();

    for hint in grade.voice_hints() {
        if let Some(voice) = english
            .iter()
            .copied()
            .find(|v| v.name.to_lowercase().contains(*hint))
        {
            return Some(voice);
        }
    }

    english.first().copied().or_else(|| voices.first())
}
