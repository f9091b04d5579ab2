//! Learning level tag.
//!
//! A grade selects the tone of the simplification request as well as the
//! rate, pitch, and preferred voice used when the result is read aloud.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected grade value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Grade must be 1, 2 or 3, got {0}")]
pub struct InvalidGrade(pub String);

/// Learning level for a simplification request.
///
/// Serialized on the wire as the bare integer `1`, `2` or `3`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Grade {
    One,
    #[default]
    Two,
    Three,
}

/// Speech rate and pitch multipliers (1.0 = platform default).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prosody {
    pub rate: f32,
    pub pitch: f32,
}

impl Grade {
    /// All grades in ascending order.
    pub const ALL: [Self; 3] = [Self::One, Self::Two, Self::Three];

    /// Numeric value sent to the backend.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Rate and pitch used when reading text for this grade.
    #[must_use]
    pub const fn prosody(self) -> Prosody {
        match self {
            Self::One => Prosody {
                rate: 0.85,
                pitch: 1.2,
            },
            Self::Two => Prosody {
                rate: 1.0,
                pitch: 1.0,
            },
            Self::Three => Prosody {
                rate: 1.15,
                pitch: 0.95,
            },
        }
    }

    /// Lowercase name fragments tried, in order, when picking a voice
    /// automatically for this grade.
    #[must_use]
    pub const fn voice_hints(self) -> &'static [&'static str] {
        match self {
            Self::One => &["child", "kid", "kids", "girl", "female"],
            Self::Two => &["aria", "zira", "samantha", "teacher"],
            Self::Three => &["male", "guy", "christopher", "daniel", "george", "narrator"],
        }
    }
}

impl TryFrom<u8> for Grade {
    type Error = InvalidGrade;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(InvalidGrade(other.to_string())),
        }
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.as_u8()
    }
}

impl FromStr for Grade {
    type Err = InvalidGrade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .map_err(|_| InvalidGrade(s.to_string()))
            .and_then(Self::try_from)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}
