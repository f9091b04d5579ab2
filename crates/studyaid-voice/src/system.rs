//! [`SpeechPlatform`] implementation backed by the system speech binary.

use std::process::Stdio;
use std::time::Duration;

use studyaid_core::{SpeechError, SpeechPlatform, Utterance, UtteranceCallback, Voice};
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::catalog::parse_voices;
use crate::engine::SpeechEngine;
use crate::error::VoiceError;
use crate::playback::Playback;

/// Speech through `espeak-ng`, `espeak` or `say`.
///
/// The port is synchronous; work that waits on a process runs as tasks on
/// the runtime handed in at construction.
pub struct SystemSpeech {
    engine: SpeechEngine,
    /// `None` until voice discovery finishes.
    voices: watch::Receiver<Option<Vec<Voice>>>,
    playback: Playback,
}

impl SystemSpeech {
    /// Detect an engine and start voice discovery on `runtime`.
    pub fn detect(runtime: Handle) -> Result<Self, VoiceError> {
        let engine = SpeechEngine::detect()?;
        Ok(Self::new(engine, runtime))
    }

    /// Wrap `engine` and start voice discovery on `runtime`.
    pub fn new(engine: SpeechEngine, runtime: Handle) -> Self {
        let (publish, voices) = watch::channel(None);

        let discovery_engine = engine.clone();
        runtime.spawn(async move {
            let found = match list_voices(&discovery_engine).await {
                Ok(found) => {
                    tracing::info!(
                        engine = %discovery_engine.kind(),
                        count = found.len(),
                        "Speech voices discovered"
                    );
                    found
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Voice discovery failed; using engine default");
                    Vec::new()
                }
            };
            publish.send_replace(Some(found));
        });

        Self {
            engine,
            voices,
            playback: Playback::new(runtime),
        }
    }

    pub const fn engine(&self) -> &SpeechEngine {
        &self.engine
    }

    /// Wait until discovery finishes or `timeout` elapses, then return the voices.
    pub async fn wait_for_voices(&self, timeout: Duration) -> Vec<Voice> {
        let mut voices = self.voices.clone();
        match tokio::time::timeout(timeout, voices.wait_for(Option::is_some)).await {
            Ok(Ok(found)) => found.clone().unwrap_or_default(),
            Ok(Err(_)) | Err(_) => self.voices(),
        }
    }
}

/// Run the engine's voice listing and parse it.
async fn list_voices(engine: &SpeechEngine) -> Result<Vec<Voice>, VoiceError> {
    let output = engine
        .command(&engine.voice_list_args())
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| VoiceError::Spawn {
            program: engine.name(),
            source,
        })?;

    if !output.status.success() {
        return Err(VoiceError::VoiceList(format!(
            "{} exited with {}",
            engine.name(),
            output.status
        )));
    }

    let listing = String::from_utf8_lossy(&output.stdout);
    Ok(parse_voices(engine.kind(), &listing))
}

impl SpeechPlatform for SystemSpeech {
    fn voices(&self) -> Vec<Voice> {
        self.voices.borrow().clone().unwrap_or_default()
    }

    fn speak(&self, utterance: Utterance, on_done: UtteranceCallback) -> Result<(), SpeechError> {
        let args = self.engine.speak_args(&utterance);
        let command = self.engine.command(&args);
        self.playback
            .play(command, &self.engine.name(), utterance.text, on_done)
            .map_err(|e| {
                tracing::warn!(error = %e, "Speech engine failed to start");
                SpeechError::from(e)
            })
    }

    fn cancel(&self) {
        self.playback.stop();
    }
}
