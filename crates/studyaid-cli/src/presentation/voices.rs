//! Voice list rendering for `voices` and `/voices`.

use console::style;
use studyaid_core::{Grade, Voice, VoiceSelection, select_voice};

/// Numbered voice list; the manually selected voice is starred.
pub fn format_voice_list(voices: &[Voice], selection: &VoiceSelection) -> String {
    if voices.is_empty() {
        return "No voices found; the engine default voice will be used.".to_string();
    }

    let width = voices.iter().map(|v| v.name.chars().count()).max().unwrap_or(0);
    voices
        .iter()
        .enumerate()
        .map(|(index, voice)| {
            let marker = match selection {
                VoiceSelection::Manual(id) if *id == voice.id => "*",
                _ => " ",
            };
            format!(
                "{marker}{:>3}. {:<width$}  {}  {}",
                index + 1,
                voice.name,
                style(&voice.lang).dim(),
                style(&voice.id).dim(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Which voice each grade would use with the current selection.
pub fn format_picks(voices: &[Voice], selection: &VoiceSelection) -> String {
    Grade::ALL
        .iter()
        .map(|grade| {
            let pick = select_voice(voices, *grade, selection)
                .map_or("engine default", |voice| voice.name.as_str());
            format!("grade {grade}: {pick}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
