//! Single-turn transcript state machine.
//!
//! Each submission replaces the whole transcript with a user entry and a
//! pending assistant entry. The assistant entry is resolved exactly once,
//! either with the backend's answer or with an error string.

use crate::domain::message::EMPTY_RESPONSE_TEXT;
use crate::domain::{Grade, Message, MessageId};
use crate::ports::{SimplifyError, SimplifyRequest, SimplifyResponse};

const ERROR_PREFIX: &str = "Error: ";
const GENERIC_FAILURE: &str = "Request failed";

/// A submission that has been accepted and is waiting on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    /// Id of the pending assistant entry to resolve.
    pub assistant_id: MessageId,
    /// Request to send to the backend.
    pub request: SimplifyRequest,
}

/// Owned transcript state: the entries, the input field and the in-flight marker.
///
/// All mutation goes through the methods below so the pending/resolved
/// transition cannot be torn.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    input: String,
    in_flight: Option<MessageId>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id() == id)
    }

    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether a submission would be accepted right now.
    pub fn can_submit(&self) -> bool {
        !self.is_in_flight() && !self.input.trim().is_empty()
    }

    /// Accept the current input as a new submission.
    ///
    /// Returns `None` without touching anything when the input is blank or
    /// a request is already in flight.
    pub fn begin_submission(&mut self, grade: Grade) -> Option<PendingSubmission> {
        if !self.can_submit() {
            return None;
        }

        let text = self.input.trim().to_string();
        let user_id = MessageId::new();
        let assistant_id = MessageId::new();

        self.messages = vec![
            Message::user(user_id, text.clone(), grade),
            Message::pending_assistant(assistant_id, grade),
        ];
        self.input.clear();
        self.in_flight = Some(assistant_id);

        Some(PendingSubmission {
            assistant_id,
            request: SimplifyRequest::new(text, grade),
        })
    }

    /// Settle the pending assistant entry `id` with the backend outcome.
    ///
    /// Returns `false` and writes nothing when `id` is no longer a pending
    /// entry of this transcript (for example after [`clear`](Self::clear)).
    pub fn resolve(
        &mut self,
        id: MessageId,
        outcome: Result<SimplifyResponse, SimplifyError>,
    ) -> bool {
        if self.in_flight == Some(id) {
            self.in_flight = None;
        }

        let Some(message) = self
            .messages
            .iter_mut()
            .find(|m| m.id() == id && m.is_pending())
        else {
            return false;
        };

        match outcome {
            Ok(response) => {
                let text = if response.simplified.is_empty() {
                    EMPTY_RESPONSE_TEXT.to_string()
                } else {
                    response.simplified
                };
                message.settle(text, Some(response.checks));
            }
            Err(err) => message.settle(error_text(&err), None),
        }
        true
    }

    /// Empty the transcript and the input field and forget any in-flight request.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.input.clear();
        self.in_flight = None;
    }
}

fn error_text(err: &SimplifyError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        format!("{ERROR_PREFIX}{GENERIC_FAILURE}")
    } else {
        format!("{ERROR_PREFIX}{message}")
    }
}
