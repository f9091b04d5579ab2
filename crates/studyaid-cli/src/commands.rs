//! Subcommand definitions.

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive chat (the default when no command is given)
    Chat,
    /// Simplify one text and print the result
    Simplify {
        /// Text to simplify; read from piped stdin when omitted
        text: Option<String>,
        /// Read the result aloud before exiting
        #[arg(long)]
        speak: bool,
    },
    /// List speech voices and the automatic pick for each grade
    Voices,
    /// Check whether the backend is up and its model is loaded
    Health,
    /// Ask the backend to load its model ahead of the first request
    Warmup,
}
