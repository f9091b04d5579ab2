//! Voice listing parsers.
//!
//! Both engines print a human-readable table; these parsers turn it into
//! [`Voice`] values. Unparseable lines are skipped.

use studyaid_core::Voice;

use crate::engine::EngineKind;

/// Parse the voice listing of `kind`.
pub fn parse_voices(kind: EngineKind, listing: &str) -> Vec<Voice> {
    match kind {
        EngineKind::Espeak => parse_espeak(listing),
        EngineKind::Say => parse_say(listing),
    }
}

/// Parse `espeak-ng --voices` output.
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  2  en-us           --/M      English_(America)  gmw/en-US            (en 10)
/// ```
///
/// The id is the `File` column (what `-v` accepts). The gender column is
/// appended to the name so name-based heuristics can see it.
pub fn parse_espeak(listing: &str) -> Vec<Voice> {
    listing
        .lines()
        .filter_map(|line| {
            let mut columns = line.split_whitespace();
            let priority = columns.next()?;
            if priority.parse::<u32>().is_err() {
                return None; // header
            }
            let lang = columns.next()?;
            let age_gender = columns.next()?;
            let name = columns.next()?.replace('_', " ");
            let file = columns.next()?;

            let name = match age_gender.rsplit('/').next() {
                Some("F") => format!("{name} (female)"),
                Some("M") => format!("{name} (male)"),
                _ => name,
            };
            Some(Voice::new(file, name, lang))
        })
        .collect()
}

/// Parse `say -v ?` output.
///
/// ```text
/// Samantha            en_US    # Hello, my name is Samantha.
/// Eddy (English (UK)) en_GB    # Hello! My name is Eddy.
/// ```
///
/// The name is also the id.
pub fn parse_say(listing: &str) -> Vec<Voice> {
    listing
        .lines()
        .filter_map(|line| {
            let left = line.split('#').next()?.trim_end();
            let (name, lang) = left.rsplit_once(char::is_whitespace)?;
            let name = name.trim();
            if name.is_empty() || lang.is_empty() {
                return None;
            }
            Some(Voice::new(name, name, lang.replace('_', "-")))
        })
        .collect()
}
