//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `reqwest` or process types in any signature
//! - Adapters map their internal errors to the port error at the boundary
//! - Speech is optional: callers hold `Option<Arc<dyn SpeechPlatform>>`

pub mod simplifier;
pub mod speech;

pub use simplifier::{
    BackendHealth, SimplifierPort, SimplifyError, SimplifyRequest, SimplifyResponse,
};
pub use speech::{SpeechError, SpeechPlatform, Utterance, UtteranceCallback, UtteranceEnd};

#[cfg(test)]
pub use simplifier::MockSimplifierPort;
