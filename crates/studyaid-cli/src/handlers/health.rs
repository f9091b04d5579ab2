//! `health` and `warmup` handlers.

use anyhow::Result;
use console::style;

use crate::bootstrap::CliContext;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext) -> Result<()> {
    let health = ctx.simplifier.health().await.map_err(CliError::from)?;

    println!("Backend: {}", ctx.settings.effective_endpoint());
    println!(
        "Status:  {}",
        if health.ok {
            style("ok").green()
        } else {
            style("not ok").red()
        }
    );
    println!(
        "Model:   {}",
        if health.model_loaded {
            "loaded"
        } else {
            "not loaded (run `studyaid warmup`)"
        }
    );

    if !health.ok {
        let reason = "backend reported it is not healthy".to_string();
        return Err(CliError::Backend(reason).into());
    }
    Ok(())
}

pub async fn warmup(ctx: &CliContext) -> Result<()> {
    println!("Warming up {}...", ctx.settings.effective_endpoint());
    ctx.simplifier.warmup().await.map_err(CliError::from)?;
    println!("{}", style("Model loaded.").green());
    Ok(())
}
