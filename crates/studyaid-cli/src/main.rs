//! CLI entry point - the composition root.
//!
//! Parses flags, wires adapters through `bootstrap` and dispatches to a
//! handler. Errors are printed once here and mapped to an exit code.

use std::process::ExitCode;

use clap::Parser;

use studyaid_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers, init_logging};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before clap reads its env-backed flags
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::from_cli(&cli)?;
    let ctx = bootstrap(config)?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => handlers::chat::execute(&ctx).await?,
        Commands::Simplify { text, speak } => handlers::simplify::execute(&ctx, text, speak).await?,
        Commands::Voices => handlers::voices::execute(&ctx).await?,
        Commands::Health => handlers::health::execute(&ctx).await?,
        Commands::Warmup => handlers::health::warmup(&ctx).await?,
    }

    Ok(())
}
