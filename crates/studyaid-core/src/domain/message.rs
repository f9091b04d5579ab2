//! Transcript entry types.
//!
//! Messages are created and mutated only by [`Transcript`](crate::services::Transcript);
//! everything outside the crate sees them read-only.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::grade::Grade;

/// Placeholder text shown while an assistant entry is pending.
pub const PENDING_PLACEHOLDER: &str = "Simplifying...";

/// Text used when the backend returns an empty simplification.
pub const EMPTY_RESPONSE_TEXT: &str = "(empty response)";

/// Opaque, never-reused identifier for a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The author of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Convert role to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry in the transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    id: MessageId,
    role: Role,
    text: String,
    grade: Grade,
    meta: Option<serde_json::Value>,
    pending: bool,
}

impl Message {
    pub(crate) fn user(id: MessageId, text: String, grade: Grade) -> Self {
        Self {
            id,
            role: Role::User,
            text,
            grade,
            meta: None,
            pending: false,
        }
    }

    pub(crate) fn pending_assistant(id: MessageId, grade: Grade) -> Self {
        Self {
            id,
            role: Role::Assistant,
            text: PENDING_PLACEHOLDER.to_string(),
            grade,
            meta: None,
            pending: true,
        }
    }

    /// Settle a pending entry. A settled entry is never reopened.
    pub(crate) fn settle(&mut self, text: String, meta: Option<serde_json::Value>) {
        self.text = text;
        self.meta = meta;
        self.pending = false;
    }

    pub const fn id(&self) -> MessageId {
        self.id
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn grade(&self) -> Grade {
        self.grade
    }

    /// Fact-check payload, present only on resolved assistant entries.
    pub const fn meta(&self) -> Option<&serde_json::Value> {
        self.meta.as_ref()
    }

    pub const fn is_pending(&self) -> bool {
        self.pending
    }
}
