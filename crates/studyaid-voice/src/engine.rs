//! Speech engine detection and command-line construction.

use std::fmt;
use std::path::PathBuf;

use studyaid_core::Utterance;
use tokio::process::Command;

use crate::error::VoiceError;

/// Words per minute at rate 1.0 for both engines.
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// espeak pitch at multiplier 1.0 (its scale is 0-99).
const BASE_PITCH: f32 = 50.0;

/// Which command-line dialect the engine speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// `espeak-ng` or legacy `espeak`.
    Espeak,
    /// macOS `say`.
    Say,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Espeak => write!(f, "espeak"),
            Self::Say => write!(f, "say"),
        }
    }
}

/// Binaries tried in order, with their dialect.
const CANDIDATES: &[(&str, EngineKind)] = &[
    ("espeak-ng", EngineKind::Espeak),
    ("espeak", EngineKind::Espeak),
    ("say", EngineKind::Say),
];

/// A speech binary found on this system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechEngine {
    kind: EngineKind,
    program: PathBuf,
}

impl SpeechEngine {
    pub fn new(kind: EngineKind, program: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            program: program.into(),
        }
    }

    /// Find the first supported engine on `PATH`.
    pub fn detect() -> Result<Self, VoiceError> {
        for (name, kind) in CANDIDATES {
            if let Ok(path) = which::which(name) {
                tracing::debug!(engine = %kind, path = %path.display(), "Speech engine found");
                return Ok(Self::new(*kind, path));
            }
        }
        Err(VoiceError::EngineNotFound)
    }

    pub const fn kind(&self) -> EngineKind {
        self.kind
    }

    /// Display name of the binary, for logs and errors.
    pub fn name(&self) -> String {
        self.program.file_name().map_or_else(
            || self.program.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        )
    }

    /// Arguments that print the voice listing.
    pub fn voice_list_args(&self) -> Vec<String> {
        match self.kind {
            EngineKind::Espeak => vec!["--voices".to_string()],
            EngineKind::Say => vec!["-v".to_string(), "?".to_string()],
        }
    }

    /// Arguments that read `utterance` from stdin.
    pub fn speak_args(&self, utterance: &Utterance) -> Vec<String> {
        let mut args = Vec::new();
        match self.kind {
            EngineKind::Espeak => {
                let rate = words_per_minute(utterance.rate).to_string();
                let pitch = espeak_pitch(utterance.pitch).to_string();
                args.extend(["-s".to_string(), rate]);
                args.extend(["-p".to_string(), pitch]);
                if let Some(voice) = &utterance.voice {
                    args.extend(["-v".to_string(), voice.id.clone()]);
                }
                args.push("--stdin".to_string());
            }
            EngineKind::Say => {
                // say has no pitch control.
                let rate = words_per_minute(utterance.rate).to_string();
                args.extend(["-r".to_string(), rate]);
                if let Some(voice) = &utterance.voice {
                    args.extend(["-v".to_string(), voice.id.clone()]);
                }
                args.extend(["-f".to_string(), "-".to_string()]);
            }
        }
        args
    }

    pub(crate) fn command(&self, args: &[String]) -> Command {
        let mut command = Command::new(&self.program);
        command.args(args);
        command
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn words_per_minute(rate: f32) -> u32 {
    (BASE_WORDS_PER_MINUTE * rate).round().max(1.0) as u32
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn espeak_pitch(pitch: f32) -> u32 {
    (BASE_PITCH * pitch).round().clamp(0.0, 99.0) as u32
}
