//! Session lifecycle tests against hand-written fake ports.
//!
//! The simplifier fake blocks until released so the pending state in the
//! middle of a submission can be observed with `tokio_test`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Notify;
use tokio_test::{assert_pending, assert_ready_eq, task};

use studyaid_core::{
    BackendHealth, ChatSession, Grade, PREVIEW_SAMPLE, Role, SessionEvent, SimplifierPort,
    SimplifyError, SimplifyRequest, SimplifyResponse, SpeakOutcome, SpeechError, SpeechPlatform,
    SubmitOutcome, UNSUPPORTED_NOTICE, Utterance, UtteranceCallback, Voice, VoiceSelection,
};

struct GatedPort {
    release: Notify,
    outcome: Mutex<Result<SimplifyResponse, SimplifyError>>,
    calls: AtomicUsize,
}

impl GatedPort {
    fn answering(outcome: Result<SimplifyResponse, SimplifyError>) -> Arc<Self> {
        Arc::new(Self {
            release: Notify::new(),
            outcome: Mutex::new(outcome),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SimplifierPort for GatedPort {
    async fn simplify_raw(
        &self,
        _request: &SimplifyRequest,
    ) -> Result<SimplifyResponse, SimplifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        self.outcome.lock().unwrap().clone()
    }

    async fn health(&self) -> Result<BackendHealth, SimplifyError> {
        Ok(BackendHealth {
            ok: true,
            model_loaded: true,
        })
    }

    async fn warmup(&self) -> Result<(), SimplifyError> {
        Ok(())
    }
}

#[derive(Default)]
struct FakeSpeech {
    started: AtomicUsize,
    cancels: AtomicUsize,
    spoken: Mutex<Vec<String>>,
    callbacks: Mutex<Vec<UtteranceCallback>>,
}

impl SpeechPlatform for FakeSpeech {
    fn voices(&self) -> Vec<Voice> {
        vec![Voice::new("kid", "Kids Voice", "en-US")]
    }

    fn speak(&self, utterance: Utterance, on_done: UtteranceCallback) -> Result<(), SpeechError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.spoken.lock().unwrap().push(utterance.text);
        self.callbacks.lock().unwrap().push(on_done);
        Ok(())
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

fn ok_response(simplified: &str) -> Result<SimplifyResponse, SimplifyError> {
    Ok(SimplifyResponse {
        simplified: simplified.to_string(),
        grade: Grade::Two,
        checks: json!({"missing_numbers": ["1905"], "used_spacy": true}),
    })
}

fn session(port: &Arc<GatedPort>, speech: Option<Arc<FakeSpeech>>) -> ChatSession {
    let platform = speech.map(|s| s as Arc<dyn SpeechPlatform>);
    let (session, _rx) = ChatSession::new(port.clone(), platform, VoiceSelection::Auto);
    session
}

#[test]
fn submission_is_pending_until_backend_answers() {
    let port = GatedPort::answering(ok_response("X"));
    let session = session(&port, None);
    session.set_input("Einstein published relativity in 1905.");

    let mut submit = task::spawn(session.submit(Grade::Two));
    assert_pending!(submit.poll());

    let messages = session.snapshot();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role(), Role::User);
    assert_eq!(messages[0].text(), "Einstein published relativity in 1905.");
    assert_eq!(messages[0].grade(), Grade::Two);
    assert_eq!(messages[1].role(), Role::Assistant);
    assert!(messages[1].is_pending());
    assert_eq!(session.input(), "");
    assert!(session.is_in_flight());

    port.release.notify_one();
    assert_ready_eq!(submit.poll(), SubmitOutcome::Resolved);
    drop(submit);

    let assistant = &session.snapshot()[1];
    assert_eq!(assistant.text(), "X");
    assert_eq!(
        assistant.meta(),
        Some(&json!({"missing_numbers": ["1905"], "used_spacy": true}))
    );
    assert!(!assistant.is_pending());
    assert!(!session.is_in_flight());
}

#[test]
fn second_submission_while_pending_is_ignored() {
    let port = GatedPort::answering(ok_response("X"));
    let session = session(&port, None);
    session.set_input("first");

    let mut first = task::spawn(session.submit(Grade::Two));
    assert_pending!(first.poll());

    session.set_input("second");
    let mut second = task::spawn(session.submit(Grade::Three));
    assert_ready_eq!(second.poll(), SubmitOutcome::Ignored);
    assert_eq!(session.snapshot()[0].text(), "first");
    assert_eq!(session.input(), "second");

    port.release.notify_one();
    assert_ready_eq!(first.poll(), SubmitOutcome::Resolved);
    assert_eq!(port.calls(), 1);
}

#[test]
fn backend_error_becomes_error_entry() {
    let port = GatedPort::answering(Err(SimplifyError::Backend {
        status: 500,
        body: "boom".to_string(),
    }));
    let session = session(&port, None);
    session.set_input("text");

    let mut submit = task::spawn(session.submit(Grade::Two));
    assert_pending!(submit.poll());
    port.release.notify_one();
    assert_ready_eq!(submit.poll(), SubmitOutcome::Resolved);
    drop(submit);

    let assistant = &session.snapshot()[1];
    assert_eq!(assistant.text(), "Error: Backend error: 500 boom");
    assert!(assistant.meta().is_none());
    assert!(!assistant.is_pending());
}

#[test]
fn clear_cancels_pending_request() {
    let port = GatedPort::answering(ok_response("late"));
    let session = session(&port, None);
    session.set_input("text");

    let mut submit = task::spawn(session.submit(Grade::Two));
    assert_pending!(submit.poll());

    session.clear();
    assert!(submit.is_woken());
    assert_ready_eq!(submit.poll(), SubmitOutcome::Cancelled);
    drop(submit);

    assert!(session.snapshot().is_empty());
    assert!(!session.is_in_flight());

    // A fresh submission is accepted immediately.
    session.set_input("again");
    let mut again = task::spawn(session.submit(Grade::One));
    assert_pending!(again.poll());
    assert_eq!(session.snapshot()[0].text(), "again");
}

#[test]
fn speaking_same_message_twice_starts_then_stops() {
    let port = GatedPort::answering(ok_response("Short text."));
    let speech = Arc::new(FakeSpeech::default());
    let session = session(&port, Some(Arc::clone(&speech)));
    session.set_input("Long text.");

    let mut submit = task::spawn(session.submit(Grade::One));
    assert_pending!(submit.poll());
    port.release.notify_one();
    assert_ready_eq!(submit.poll(), SubmitOutcome::Resolved);
    drop(submit);

    let id = session.latest_assistant().unwrap();
    assert_eq!(session.speak_message(id), Some(SpeakOutcome::Started));
    assert_eq!(session.speech().speaking(), Some(id));

    assert_eq!(session.speak_message(id), Some(SpeakOutcome::Stopped));
    assert_eq!(session.speech().speaking(), None);
    assert_eq!(speech.started.load(Ordering::SeqCst), 1);
}

#[test]
fn clear_always_stops_speech() {
    let port = GatedPort::answering(ok_response("Short text."));
    let speech = Arc::new(FakeSpeech::default());
    let session = session(&port, Some(Arc::clone(&speech)));

    // Nothing speaking: still safe.
    session.clear();
    assert_eq!(session.speech().speaking(), None);

    session.set_input("Long text.");
    let mut submit = task::spawn(session.submit(Grade::Two));
    assert_pending!(submit.poll());
    port.release.notify_one();
    assert_ready_eq!(submit.poll(), SubmitOutcome::Resolved);
    drop(submit);

    let id = session.latest_assistant().unwrap();
    session.speak_message(id);
    let cancels = speech.cancels.load(Ordering::SeqCst);

    session.clear();
    assert_eq!(session.speech().speaking(), None);
    assert!(speech.cancels.load(Ordering::SeqCst) > cancels);

    session.clear();
    assert_eq!(session.speech().speaking(), None);
}

#[test]
fn new_submission_stops_speech() {
    let port = GatedPort::answering(ok_response("Short text."));
    let speech = Arc::new(FakeSpeech::default());
    let session = session(&port, Some(Arc::clone(&speech)));

    assert_eq!(session.speech().preview(Grade::One), SpeakOutcome::Started);
    let cancels = speech.cancels.load(Ordering::SeqCst);

    session.set_input("Long text.");
    let mut submit = task::spawn(session.submit(Grade::One));
    assert_pending!(submit.poll());
    assert!(speech.cancels.load(Ordering::SeqCst) > cancels);
}

#[test]
fn preview_reads_the_sample_or_reports_unsupported() {
    let port = GatedPort::answering(ok_response("X"));
    let speech = Arc::new(FakeSpeech::default());
    let with_speech = session(&port, Some(Arc::clone(&speech)));
    assert_eq!(with_speech.speech().preview(Grade::Two), SpeakOutcome::Started);
    assert_eq!(*speech.spoken.lock().unwrap(), [PREVIEW_SAMPLE]);

    let (without, mut rx) = ChatSession::new(port, None, VoiceSelection::Auto);
    assert_eq!(without.speech().preview(Grade::Two), SpeakOutcome::Unsupported);
    assert_eq!(
        rx.try_recv().unwrap(),
        SessionEvent::Notice(UNSUPPORTED_NOTICE.to_string())
    );
}

#[tokio::test]
async fn events_track_the_lifecycle() {
    let port = GatedPort::answering(ok_response("X"));
    let (session, mut rx) = ChatSession::new(port.clone(), None, VoiceSelection::Auto);
    let session = Arc::new(session);

    session.set_input("text");
    let handle = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.submit(Grade::Two).await }
    });

    assert_eq!(rx.recv().await, Some(SessionEvent::TranscriptChanged));
    assert!(session.snapshot()[1].is_pending());

    port.release.notify_one();
    assert_eq!(rx.recv().await, Some(SessionEvent::TranscriptChanged));
    assert_eq!(handle.await.unwrap(), SubmitOutcome::Resolved);
    assert_eq!(session.snapshot()[1].text(), "X");
}

/// Answers with the request text after a short delay and records what it was sent.
#[derive(Default)]
struct EchoPort {
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl SimplifierPort for EchoPort {
    async fn simplify_raw(
        &self,
        request: &SimplifyRequest,
    ) -> Result<SimplifyResponse, SimplifyError> {
        self.sent.lock().unwrap().push(request.text.clone());
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        Ok(SimplifyResponse {
            simplified: format!("echo: {}", request.text),
            grade: request.grade,
            checks: serde_json::Value::Null,
        })
    }

    async fn health(&self) -> Result<BackendHealth, SimplifyError> {
        Ok(BackendHealth {
            ok: true,
            model_loaded: true,
        })
    }

    async fn warmup(&self) -> Result<(), SimplifyError> {
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submit_text_sends_each_callers_own_text() {
    for round in 0..20 {
        let port = Arc::new(EchoPort::default());
        let (session, _rx) = ChatSession::new(port.clone(), None, VoiceSelection::Auto);
        let session = Arc::new(session);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let session = Arc::clone(&session);
                let text = format!("round {round} caller {i}");
                tokio::spawn(async move {
                    let outcome = session.submit_text(text.clone(), Grade::Two).await;
                    (text, outcome)
                })
            })
            .collect();

        let mut resolved = Vec::new();
        for handle in handles {
            let (text, outcome) = handle.await.unwrap();
            assert_ne!(outcome, SubmitOutcome::Cancelled);
            if outcome == SubmitOutcome::Resolved {
                resolved.push(text);
            }
        }

        let mut sent = port.sent.lock().unwrap().clone();
        sent.sort();
        resolved.sort();
        assert!(!resolved.is_empty());
        assert_eq!(sent, resolved);

        let messages = session.snapshot();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text(), format!("echo: {}", messages[0].text()));
        assert!(!session.is_in_flight());
    }
}
