//! Speech controller: start, stop and toggle read-aloud playback.
//!
//! At most one utterance plays at a time. Every start bumps a serial, and
//! completion callbacks only clear the speaking state when their serial is
//! still current, so a late callback from a cancelled utterance never
//! clobbers the one that replaced it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::domain::{Grade, MessageId, Voice, VoiceSelection, select_voice};
use crate::events::SessionEvent;
use crate::ports::{SpeechError, SpeechPlatform, Utterance, UtteranceEnd};

/// Notice shown when no speech engine is available.
pub const UNSUPPORTED_NOTICE: &str = "Text-to-speech is not supported on this system.";

/// Sentence used by [`SpeechController::preview`].
pub const PREVIEW_SAMPLE: &str = "Hello! This is how I will read your simplified text.";

/// Result of a [`SpeechController::speak`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// Playback started.
    Started,
    /// The message was already speaking; playback was stopped instead.
    Stopped,
    /// No speech platform; a notice was emitted.
    Unsupported,
    /// The platform refused to start the utterance.
    Failed(String),
}

#[derive(Debug, Default)]
struct SpeakingState {
    serial: u64,
    message: Option<MessageId>,
}

type SharedState = Arc<Mutex<SpeakingState>>;

fn lock(state: &Mutex<SpeakingState>) -> MutexGuard<'_, SpeakingState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Wraps the optional speech platform and tracks which message is speaking.
pub struct SpeechController {
    platform: Option<Arc<dyn SpeechPlatform>>,
    selection: Mutex<VoiceSelection>,
    state: SharedState,
    events: UnboundedSender<SessionEvent>,
}

impl SpeechController {
    pub fn new(
        platform: Option<Arc<dyn SpeechPlatform>>,
        selection: VoiceSelection,
        events: UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            platform,
            selection: Mutex::new(selection),
            state: SharedState::default(),
            events,
        }
    }

    pub const fn is_supported(&self) -> bool {
        self.platform.is_some()
    }

    /// Current voice snapshot; empty when unsupported or still discovering.
    pub fn voices(&self) -> Vec<Voice> {
        self.platform
            .as_ref()
            .map(|p| p.voices())
            .unwrap_or_default()
    }

    pub fn selection(&self) -> VoiceSelection {
        self.selection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_selection(&self, selection: VoiceSelection) {
        *self.selection.lock().unwrap_or_else(PoisonError::into_inner) = selection;
    }

    /// The voice `speak` would use for `grade` right now.
    pub fn selected_voice(&self, grade: Grade) -> Option<Voice> {
        let voices = self.voices();
        select_voice(&voices, grade, &self.selection()).cloned()
    }

    /// Message currently being read aloud.
    pub fn speaking(&self) -> Option<MessageId> {
        lock(&self.state).message
    }

    /// Read `text` aloud, or stop if `message_id` is already speaking.
    pub fn speak(&self, text: &str, grade: Grade, message_id: Option<MessageId>) -> SpeakOutcome {
        let Some(platform) = self.platform.as_ref() else {
            self.emit(SessionEvent::Notice(UNSUPPORTED_NOTICE.to_string()));
            return SpeakOutcome::Unsupported;
        };

        if let Some(id) = message_id {
            let mut state = lock(&self.state);
            if state.message == Some(id) {
                state.serial += 1;
                state.message = None;
                drop(state);
                platform.cancel();
                debug!(message = %id, "Speech toggled off");
                self.emit(SessionEvent::SpeakingChanged(None));
                return SpeakOutcome::Stopped;
            }
        }

        // The platform may run the old callback synchronously, so no lock here.
        platform.cancel();

        let voices = platform.voices();
        let voice = select_voice(&voices, grade, &self.selection()).cloned();
        let prosody = grade.prosody();
        let utterance = Utterance {
            text: text.to_string(),
            rate: prosody.rate,
            pitch: prosody.pitch,
            voice,
        };

        let (serial, previous) = {
            let mut state = lock(&self.state);
            state.serial += 1;
            let previous = std::mem::replace(&mut state.message, message_id);
            (state.serial, previous)
        };
        if previous != message_id {
            self.emit(SessionEvent::SpeakingChanged(message_id));
        }

        debug!(
            grade = %grade,
            voice = utterance.voice.as_ref().map_or("default", |v| v.name.as_str()),
            chars = text.len(),
            "Starting utterance"
        );

        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        let on_done = Box::new(move |end: UtteranceEnd| {
            if let UtteranceEnd::Failed(reason) = &end {
                warn!(%reason, "Utterance failed");
            }
            if let Some(Some(_)) = clear_if_current(&state, serial) {
                let _ = events.send(SessionEvent::SpeakingChanged(None));
            }
        });

        match platform.speak(utterance, on_done) {
            Ok(()) => SpeakOutcome::Started,
            Err(err) => {
                warn!(error = %err, "Speech platform refused utterance");
                if let Some(Some(_)) = clear_if_current(&self.state, serial) {
                    self.emit(SessionEvent::SpeakingChanged(None));
                }
                match err {
                    SpeechError::Unsupported => {
                        self.emit(SessionEvent::Notice(UNSUPPORTED_NOTICE.to_string()));
                        SpeakOutcome::Unsupported
                    }
                    SpeechError::StartFailed(reason) => SpeakOutcome::Failed(reason),
                }
            }
        }
    }

    /// Speak a sample sentence for `grade` without attaching it to a message.
    pub fn preview(&self, grade: Grade) -> SpeakOutcome {
        self.speak(PREVIEW_SAMPLE, grade, None)
    }

    /// Cancel playback and clear the speaking state unconditionally.
    pub fn stop(&self) {
        let previous = {
            let mut state = lock(&self.state);
            state.serial += 1;
            state.message.take()
        };
        if let Some(platform) = self.platform.as_ref() {
            platform.cancel();
        }
        if previous.is_some() {
            self.emit(SessionEvent::SpeakingChanged(None));
        }
    }

    fn emit(&self, event: SessionEvent) {
        // The view may have gone away; nothing to do then.
        let _ = self.events.send(event);
    }
}

/// Clear the speaking state if `serial` is still current.
///
/// Returns `None` when stale, otherwise the message that was cleared.
fn clear_if_current(state: &Mutex<SpeakingState>, serial: u64) -> Option<Option<MessageId>> {
    let mut state = lock(state);
    (state.serial == serial).then(|| state.message.take())
}
