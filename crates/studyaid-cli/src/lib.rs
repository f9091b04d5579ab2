//! Terminal front end for studyaid.
//!
//! `main.rs` is the composition root. Everything else is a library so the
//! parser and the REPL command grammar can be tested without a terminal.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by main.rs only
use dotenvy as _;

pub mod bootstrap;
pub mod chat_commands;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;
pub mod utils;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap, init_logging};
pub use chat_commands::ReplCommand;
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
