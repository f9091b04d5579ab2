//! Small helpers shared by handlers.

pub mod input;

pub use input::{read_piped_stdin, resolve_text};
