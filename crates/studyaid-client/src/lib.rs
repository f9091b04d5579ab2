//! HTTP adapter for the text-simplification backend.
//!
//! Implements [`studyaid_core::SimplifierPort`] on top of `reqwest`. The
//! backend exposes three endpoints:
//!
//! - `POST /simplify` with `{ text, grade, max_new_tokens? }`
//! - `GET /health`
//! - `POST /warmup`
//!
//! Every call is a single request bounded by the configured timeout. There
//! are no retries.
//!
//! ```no_run
//! use std::time::Duration;
//! use studyaid_client::{DefaultSimplifierClient, SimplifierClientConfig};
//!
//! let config = SimplifierClientConfig::new()
//!     .with_base_url("http://127.0.0.1:8000")
//!     .with_timeout(Duration::from_secs(45));
//! let client = DefaultSimplifierClient::new(&config)?;
//! # Ok::<(), studyaid_core::SimplifyError>(())
//! ```

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// DefaultSimplifierClient is meant to be used through the SimplifierPort
// trait, not its internal generic structure
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod port;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultSimplifierClient;

// Configuration
pub use config::SimplifierClientConfig;

// Silence unused dev-dependency warnings
#[cfg(test)]
use wiremock as _;
