//! Chat session: drives the transcript through the simplifier port.
//!
//! The session is shared behind an `Arc` by the view. State sits behind a
//! `std::sync::Mutex` that is never held across an `.await`; the backend
//! call itself runs unlocked and is raced against a cancellation token so
//! [`ChatSession::clear`] can abandon it.

use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::speech::{SpeakOutcome, SpeechController};
use super::transcript::{PendingSubmission, Transcript};
use crate::domain::{Grade, Message, MessageId, Role, VoiceSelection};
use crate::events::SessionEvent;
use crate::ports::{SimplifierPort, SpeechPlatform};

/// How a call to [`ChatSession::submit`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input or a request already in flight; nothing happened.
    Ignored,
    /// The assistant entry was resolved (with text or an error).
    Resolved,
    /// The transcript was cleared before the backend answered.
    Cancelled,
}

#[derive(Default)]
struct SessionState {
    transcript: Transcript,
    in_flight: Option<(MessageId, CancellationToken)>,
}

/// Owns the transcript and coordinates the backend and speech.
pub struct ChatSession {
    port: Arc<dyn SimplifierPort>,
    speech: SpeechController,
    state: Mutex<SessionState>,
    max_new_tokens: Option<NonZeroU32>,
    events: UnboundedSender<SessionEvent>,
}

impl ChatSession {
    /// Create a session and the receiver for its events.
    pub fn new(
        port: Arc<dyn SimplifierPort>,
        platform: Option<Arc<dyn SpeechPlatform>>,
        selection: VoiceSelection,
    ) -> (Self, UnboundedReceiver<SessionEvent>) {
        let (events, rx) = unbounded_channel();
        let session = Self {
            port,
            speech: SpeechController::new(platform, selection, events.clone()),
            state: Mutex::new(SessionState::default()),
            max_new_tokens: None,
            events,
        };
        (session, rx)
    }

    /// Set the generation budget sent with every request.
    #[must_use]
    pub fn with_max_new_tokens(mut self, max_new_tokens: Option<NonZeroU32>) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    pub const fn speech(&self) -> &SpeechController {
        &self.speech
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.lock().transcript.set_input(text);
    }

    pub fn input(&self) -> String {
        self.lock().transcript.input().to_string()
    }

    pub fn is_in_flight(&self) -> bool {
        self.lock().transcript.is_in_flight()
    }

    /// Copy of the current transcript entries.
    pub fn snapshot(&self) -> Vec<Message> {
        self.lock().transcript.messages().to_vec()
    }

    /// Most recent assistant entry, if any.
    pub fn latest_assistant(&self) -> Option<MessageId> {
        self.lock()
            .transcript
            .messages()
            .iter()
            .rev()
            .find(|m| m.role() == Role::Assistant)
            .map(Message::id)
    }

    /// Submit the current input at `grade` and wait for the backend.
    pub async fn submit(&self, grade: Grade) -> SubmitOutcome {
        match self.begin(None, grade) {
            Some((pending, token)) => self.drive(pending, token, grade).await,
            None => SubmitOutcome::Ignored,
        }
    }

    /// Replace the input with `text` and submit it.
    ///
    /// The input is only replaced when nothing is in flight, and the
    /// submission is claimed under the same lock, so concurrent callers
    /// can never send each other's text.
    pub async fn submit_text(&self, text: impl Into<String>, grade: Grade) -> SubmitOutcome {
        match self.begin(Some(text.into()), grade) {
            Some((pending, token)) => self.drive(pending, token, grade).await,
            None => SubmitOutcome::Ignored,
        }
    }

    fn begin(
        &self,
        text: Option<String>,
        grade: Grade,
    ) -> Option<(PendingSubmission, CancellationToken)> {
        let mut state = self.lock();
        if state.transcript.is_in_flight() {
            return None;
        }
        if let Some(text) = text {
            state.transcript.set_input(text);
        }
        let pending = state.transcript.begin_submission(grade)?;
        let token = CancellationToken::new();
        state.in_flight = Some((pending.assistant_id, token.clone()));
        Some((pending, token))
    }

    async fn drive(
        &self,
        pending: PendingSubmission,
        token: CancellationToken,
        grade: Grade,
    ) -> SubmitOutcome {
        self.speech.stop();
        self.emit(SessionEvent::TranscriptChanged);

        let request = pending.request.with_max_new_tokens(self.max_new_tokens);
        info!(
            message = %pending.assistant_id,
            grade = %grade,
            chars = request.text.len(),
            "Submitting text for simplification"
        );

        let outcome = tokio::select! {
            () = token.cancelled() => {
                debug!(message = %pending.assistant_id, "Submission cancelled");
                return SubmitOutcome::Cancelled;
            }
            result = self.port.simplify_raw(&request) => result,
        };

        if let Err(ref err) = outcome {
            info!(message = %pending.assistant_id, error = %err, "Simplification failed");
        }

        let resolved = {
            let mut state = self.lock();
            if state
                .in_flight
                .as_ref()
                .is_some_and(|(id, _)| *id == pending.assistant_id)
            {
                state.in_flight = None;
            }
            state.transcript.resolve(pending.assistant_id, outcome)
        };

        if resolved {
            info!(message = %pending.assistant_id, "Submission resolved");
            self.emit(SessionEvent::TranscriptChanged);
            SubmitOutcome::Resolved
        } else {
            SubmitOutcome::Cancelled
        }
    }

    /// Empty the transcript, abandon any in-flight request and stop speech.
    pub fn clear(&self) {
        let in_flight = {
            let mut state = self.lock();
            state.transcript.clear();
            state.in_flight.take()
        };
        if let Some((id, token)) = in_flight {
            debug!(message = %id, "Cancelling in-flight request");
            token.cancel();
        }
        self.speech.stop();
        self.emit(SessionEvent::TranscriptChanged);
    }

    /// Toggle read-aloud for a resolved transcript entry.
    ///
    /// Returns `None` for unknown ids and pending entries.
    pub fn speak_message(&self, id: MessageId) -> Option<SpeakOutcome> {
        let (text, grade) = {
            let state = self.lock();
            let message = state.transcript.get(id).filter(|m| !m.is_pending())?;
            (message.text().to_string(), message.grade())
        };
        Some(self.speech.speak(&text, grade, Some(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{MockSimplifierPort, SimplifyError, SimplifyResponse};
    use serde_json::json;
    use std::time::Duration;

    fn session_with(mock: MockSimplifierPort) -> (ChatSession, UnboundedReceiver<SessionEvent>) {
        ChatSession::new(Arc::new(mock), None, VoiceSelection::Auto)
    }

    #[tokio::test]
    async fn test_submit_resolves_success() {
        let mut mock = MockSimplifierPort::new();
        mock.expect_simplify_raw()
            .withf(|request| {
                request.text == "Cells divide." && request.grade == Grade::Three
            })
            .times(1)
            .returning(|request| {
                Ok(SimplifyResponse {
                    simplified: "Cells split in two.".to_string(),
                    grade: request.grade,
                    checks: json!({"missing_numbers": []}),
                })
            });
        let (session, mut rx) = session_with(mock);

        let outcome = session.submit_text(" Cells divide. ", Grade::Three).await;
        assert_eq!(outcome, SubmitOutcome::Resolved);

        let messages = session.snapshot();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text(), "Cells split in two.");
        assert_eq!(messages[1].meta(), Some(&json!({"missing_numbers": []})));
        assert!(!session.is_in_flight());

        assert_eq!(rx.try_recv().unwrap(), SessionEvent::TranscriptChanged);
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::TranscriptChanged);
    }

    #[tokio::test]
    async fn test_submit_forwards_token_budget() {
        let mut mock = MockSimplifierPort::new();
        mock.expect_simplify_raw()
            .withf(|request| request.max_new_tokens == NonZeroU32::new(64))
            .times(1)
            .returning(|_| Err(SimplifyError::Transport("offline".to_string())));
        let (session, _rx) = session_with(mock);
        let session = session.with_max_new_tokens(NonZeroU32::new(64));

        session.submit_text("text", Grade::Two).await;
        assert_eq!(session.snapshot()[1].text(), "Error: offline");
    }

    #[tokio::test]
    async fn test_blank_submit_never_calls_backend() {
        let mut mock = MockSimplifierPort::new();
        mock.expect_simplify_raw().never();
        let (session, mut rx) = session_with(mock);

        let outcome = session.submit_text("   ", Grade::Two).await;
        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert!(session.snapshot().is_empty());
        assert_eq!(session.input(), "   ");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_timeout_becomes_error_entry() {
        let mut mock = MockSimplifierPort::new();
        mock.expect_simplify_raw()
            .returning(|_| Err(SimplifyError::TimedOut(Duration::from_secs(45))));
        let (session, _rx) = session_with(mock);

        session.submit_text("text", Grade::Two).await;
        let assistant = &session.snapshot()[1];
        assert_eq!(assistant.text(), "Error: Request timed out after 45s");
        assert!(assistant.meta().is_none());
        assert!(!assistant.is_pending());
    }

    #[tokio::test]
    async fn test_speak_message_without_platform() {
        let mut mock = MockSimplifierPort::new();
        mock.expect_simplify_raw().returning(|request| {
            Ok(SimplifyResponse {
                simplified: "short".to_string(),
                grade: request.grade,
                checks: serde_json::Value::Null,
            })
        });
        let (session, mut rx) = session_with(mock);
        session.submit_text("long", Grade::One).await;
        while rx.try_recv().is_ok() {}

        assert_eq!(session.speak_message(MessageId::new()), None);

        let latest = session.latest_assistant().unwrap();
        let outcome = session.speak_message(latest);
        assert_eq!(outcome, Some(SpeakOutcome::Unsupported));
        assert!(matches!(rx.try_recv().unwrap(), SessionEvent::Notice(_)));
    }

    #[test]
    fn test_clear_on_empty_session_is_harmless() {
        let (session, mut rx) = session_with(MockSimplifierPort::new());
        session.clear();
        session.clear();
        assert!(session.snapshot().is_empty());
        assert!(session.speech().speaking().is_none());
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::TranscriptChanged);
    }
}
