//! Main CLI parser and top-level argument handling.
//!
//! Global options double as the configuration layer: each one can also be
//! supplied through a `STUDYAID_*` environment variable (or a `.env` file).

use clap::Parser;
use studyaid_core::{AUTO_VOICE, DEFAULT_ENDPOINT, DEFAULT_GRADE, DEFAULT_TIMEOUT_SECS, Grade};

use crate::commands::Commands;

/// Simplify text to a reading grade and optionally read it aloud.
#[derive(Parser, Debug)]
#[command(name = "studyaid")]
#[command(about = "Simplify text for young readers, with optional read-aloud")]
#[command(version)]
pub struct Cli {
    /// Base URL of the simplification backend
    #[arg(long, global = true, env = "STUDYAID_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Seconds to wait for the backend before giving up
    #[arg(
        long = "timeout",
        global = true,
        env = "STUDYAID_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub timeout_secs: u64,

    /// Target reading grade (1, 2 or 3)
    #[arg(short, long, global = true, env = "STUDYAID_GRADE", default_value_t = DEFAULT_GRADE)]
    pub grade: Grade,

    /// Voice id for read-aloud, or "auto"
    #[arg(long, global = true, env = "STUDYAID_VOICE", default_value = AUTO_VOICE)]
    pub voice: String,

    /// Generation budget forwarded to the backend
    #[arg(long, global = true, env = "STUDYAID_MAX_NEW_TOKENS")]
    pub max_new_tokens: Option<u32>,

    /// Show fact checks next to each response
    #[arg(long, global = true)]
    pub checks: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
