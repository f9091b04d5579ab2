//! `simplify` handler: one request, printed to stdout.

use anyhow::Result;
use studyaid_core::domain::message::EMPTY_RESPONSE_TEXT;
use studyaid_core::{
    Grade, MessageId, SessionEvent, SimplifyRequest, SpeakOutcome, SpeechController,
};
use tokio::sync::mpsc::unbounded_channel;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{format_checks, notice};
use crate::utils::{read_piped_stdin, resolve_text};

pub async fn execute(ctx: &CliContext, text: Option<String>, speak: bool) -> Result<()> {
    let piped = if text.is_none() {
        read_piped_stdin()?
    } else {
        None
    };
    let text = resolve_text(text, piped)?;
    let grade = ctx.settings.effective_grade();

    let request = SimplifyRequest::new(text, grade)
        .with_max_new_tokens(ctx.settings.effective_max_new_tokens());
    let response = ctx
        .simplifier
        .simplify_raw(&request)
        .await
        .map_err(CliError::from)?;

    let simplified = if response.simplified.is_empty() {
        EMPTY_RESPONSE_TEXT
    } else {
        response.simplified.as_str()
    };
    println!("{simplified}");

    if ctx.settings.show_checks.unwrap_or(false) {
        println!("{}", format_checks(&response.checks));
    }

    if speak {
        speak_and_wait(ctx, simplified, grade).await;
    }
    Ok(())
}

/// Read `text` aloud and return when playback ends or Ctrl-C is pressed.
async fn speak_and_wait(ctx: &CliContext, text: &str, grade: Grade) {
    let (events, mut rx) = unbounded_channel();
    let controller = SpeechController::new(
        ctx.speech_platform(),
        ctx.settings.effective_voice(),
        events,
    );

    // A throwaway id makes the controller report when playback ends.
    let id = MessageId::new();
    match controller.speak(text, grade, Some(id)) {
        SpeakOutcome::Started => {}
        SpeakOutcome::Failed(reason) => {
            eprintln!("{}", notice(&format!("Could not start speech: {reason}")));
            return;
        }
        SpeakOutcome::Unsupported | SpeakOutcome::Stopped => {
            while let Ok(event) = rx.try_recv() {
                if let SessionEvent::Notice(text) = event {
                    eprintln!("{}", notice(&text));
                }
            }
            return;
        }
    }

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(SessionEvent::SpeakingChanged(None)) | None => break,
                Some(_) => {}
            },
            _ = tokio::signal::ctrl_c() => {
                controller.stop();
                break;
            }
        }
    }
}
