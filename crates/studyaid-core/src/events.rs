//! Notifications from the session to the view.
//!
//! Events are emitted over an unbounded `tokio::sync::mpsc` channel; the
//! view drains them and re-renders. They carry just enough context to
//! decide what to redraw; the authoritative state is always read back from
//! the session.

use crate::domain::MessageId;

/// Event emitted by [`ChatSession`](crate::services::ChatSession) and
/// [`SpeechController`](crate::services::SpeechController).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Transcript entries were replaced, resolved, or cleared.
    TranscriptChanged,

    /// The message being read aloud changed (`None` = nothing speaking).
    SpeakingChanged(Option<MessageId>),

    /// A user-visible notice that is not tied to a transcript entry.
    Notice(String),
}
