//! `voices` handler.

use std::time::Duration;

use anyhow::Result;
use studyaid_core::{UNSUPPORTED_NOTICE, VoiceSelection};

use crate::bootstrap::CliContext;
use crate::presentation::{format_picks, format_voice_list, notice};

/// How long to wait for the engine's voice listing.
const DISCOVERY_WAIT: Duration = Duration::from_secs(5);

pub async fn execute(ctx: &CliContext) -> Result<()> {
    let Some(speech) = ctx.speech.as_ref() else {
        println!("{}", notice(UNSUPPORTED_NOTICE));
        return Ok(());
    };

    let voices = speech.wait_for_voices(DISCOVERY_WAIT).await;
    let selection = ctx.settings.effective_voice();

    println!("Engine: {}", speech.engine().name());
    println!("{}", format_voice_list(&voices, &selection));

    if let VoiceSelection::Manual(id) = &selection {
        if !voices.iter().any(|v| v.id == *id) {
            println!(
                "{}",
                notice(&format!("Voice '{id}' not found; choosing automatically."))
            );
        }
    }

    println!();
    println!("{}", format_picks(&voices, &selection));
    Ok(())
}
