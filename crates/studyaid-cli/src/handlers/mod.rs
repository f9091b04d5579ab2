//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that:
//!   1. Collect CLI-specific input
//!   2. Call core services or ports
//!   3. Format output through `presentation`
//!
//! Handlers should NOT build adapters or hold transcript state themselves.

pub mod chat;
pub mod health;
pub mod simplify;
pub mod voices;
