//! Slash-command grammar for the interactive chat.
//!
//! Any line not starting with `/` is text to simplify. A leading `//`
//! escapes a literal slash.

use studyaid_core::Grade;

/// Argument of `/voice`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceArg {
    Auto,
    /// 1-based position in the `/voices` listing.
    Index(usize),
    Id(String),
}

/// One parsed REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Blank line.
    Empty,
    /// Text to simplify.
    Text(String),
    Grade(Grade),
    Clear,
    ToggleChecks,
    Voices,
    Voice(VoiceArg),
    Preview,
    /// Toggle read-aloud for the n-th (1-based) assistant reply, or the latest.
    Speak(Option<usize>),
    Help,
    Quit,
    /// Known command with a bad argument; carries the usage hint.
    Invalid(String),
    Unknown(String),
}

pub const HELP: &str = "\
Type a paragraph and press Enter to simplify it.

  /grade 1|2|3         set the reading grade
  /checks              show or hide fact checks
  /voices              list speech voices
  /voice auto|N|ID     choose a voice (N from /voices)
  /preview             read a sample sentence with the current voice
  /speak [N]           read reply N aloud (latest by default); again to stop
  /clear               clear the conversation
  /help                show this help
  /quit                exit";

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        if let Some(escaped) = line.strip_prefix("//") {
            return Self::Text(format!("/{escaped}"));
        }
        let Some(command) = line.strip_prefix('/') else {
            return Self::Text(line.to_string());
        };

        let (name, arg) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(name, arg)| (name, arg.trim()));

        match name.to_lowercase().as_str() {
            "grade" | "g" => arg
                .parse()
                .map_or_else(|_| Self::Invalid("usage: /grade 1|2|3".into()), Self::Grade),
            "clear" => Self::Clear,
            "checks" => Self::ToggleChecks,
            "voices" => Self::Voices,
            "voice" => parse_voice(arg),
            "preview" => Self::Preview,
            "speak" | "s" => {
                if arg.is_empty() {
                    Self::Speak(None)
                } else {
                    match arg.parse::<usize>() {
                        Ok(n) if n > 0 => Self::Speak(Some(n)),
                        _ => Self::Invalid("usage: /speak [N]".into()),
                    }
                }
            }
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => Self::Unknown(name.to_string()),
        }
    }
}

fn parse_voice(arg: &str) -> ReplCommand {
    if arg.is_empty() {
        return ReplCommand::Invalid("usage: /voice auto|N|ID".into());
    }
    if arg.eq_ignore_ascii_case("auto") {
        return ReplCommand::Voice(VoiceArg::Auto);
    }
    match arg.parse::<usize>() {
        Ok(0) => ReplCommand::Invalid("voice numbers start at 1".into()),
        Ok(n) => ReplCommand::Voice(VoiceArg::Index(n)),
        Err(_) => ReplCommand::Voice(VoiceArg::Id(arg.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_submitted_trimmed() {
        assert_eq!(
            ReplCommand::parse("  The mitochondria is the powerhouse.  "),
            ReplCommand::Text("The mitochondria is the powerhouse.".into())
        );
        assert_eq!(ReplCommand::parse("   "), ReplCommand::Empty);
    }

    #[test]
    fn test_double_slash_escapes() {
        assert_eq!(
            ReplCommand::parse("//etc is a directory"),
            ReplCommand::Text("/etc is a directory".into())
        );
    }

    #[test]
    fn test_grade() {
        assert_eq!(
            ReplCommand::parse("/grade 3"),
            ReplCommand::Grade(Grade::Three)
        );
        assert_eq!(ReplCommand::parse("/g 1"), ReplCommand::Grade(Grade::One));
        assert!(matches!(
            ReplCommand::parse("/grade 5"),
            ReplCommand::Invalid(_)
        ));
        assert!(matches!(
            ReplCommand::parse("/grade"),
            ReplCommand::Invalid(_)
        ));
    }

    #[test]
    fn test_voice_arguments() {
        assert_eq!(
            ReplCommand::parse("/voice AUTO"),
            ReplCommand::Voice(VoiceArg::Auto)
        );
        assert_eq!(
            ReplCommand::parse("/voice 2"),
            ReplCommand::Voice(VoiceArg::Index(2))
        );
        assert_eq!(
            ReplCommand::parse("/voice gmw/en-US"),
            ReplCommand::Voice(VoiceArg::Id("gmw/en-US".into()))
        );
        assert_eq!(
            ReplCommand::parse("/voice Eddy (English (US))"),
            ReplCommand::Voice(VoiceArg::Id("Eddy (English (US))".into()))
        );
        assert!(matches!(
            ReplCommand::parse("/voice 0"),
            ReplCommand::Invalid(_)
        ));
        assert!(matches!(
            ReplCommand::parse("/voice"),
            ReplCommand::Invalid(_)
        ));
    }

    #[test]
    fn test_speak() {
        assert_eq!(ReplCommand::parse("/speak"), ReplCommand::Speak(None));
        assert_eq!(ReplCommand::parse("/speak 2"), ReplCommand::Speak(Some(2)));
        assert!(matches!(
            ReplCommand::parse("/speak 0"),
            ReplCommand::Invalid(_)
        ));
        assert!(matches!(
            ReplCommand::parse("/speak two"),
            ReplCommand::Invalid(_)
        ));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(ReplCommand::parse("/clear"), ReplCommand::Clear);
        assert_eq!(ReplCommand::parse("/checks"), ReplCommand::ToggleChecks);
        assert_eq!(ReplCommand::parse("/voices"), ReplCommand::Voices);
        assert_eq!(ReplCommand::parse("/preview"), ReplCommand::Preview);
        assert_eq!(ReplCommand::parse("/HELP"), ReplCommand::Help);
        assert_eq!(ReplCommand::parse("/exit"), ReplCommand::Quit);
        assert_eq!(
            ReplCommand::parse("/frobnicate now"),
            ReplCommand::Unknown("frobnicate".into())
        );
    }
}
