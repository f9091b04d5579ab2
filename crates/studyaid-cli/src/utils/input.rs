//! Input collection for one-shot commands.

use std::io::{self, IsTerminal, Read};

use anyhow::{Context, Result};

use crate::error::CliError;

/// Read all of stdin when it is piped; `None` when it is a terminal.
pub fn read_piped_stdin() -> Result<Option<String>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }
    let mut buffer = String::new();
    stdin
        .lock()
        .read_to_string(&mut buffer)
        .context("Failed to read piped input")?;
    Ok(Some(buffer))
}

/// Pick the text to simplify: the argument if given, else piped input.
///
/// Blank text is an argument error.
pub fn resolve_text(arg: Option<String>, piped: Option<String>) -> Result<String, CliError> {
    let text = arg.or(piped).unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        return Err(CliError::Arguments(
            "no text given; pass TEXT or pipe it on stdin".to_string(),
        ));
    }
    Ok(text.to_string())
}
