//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where adapters are wired together:
//! - the HTTP simplifier client (via studyaid-client)
//! - the system speech platform (via studyaid-voice), when one exists
//! - the chat session (via studyaid-core)
//!
//! Handlers receive a [`CliContext`] and never build adapters themselves.

use std::sync::Arc;

use studyaid_client::{DefaultSimplifierClient, SimplifierClientConfig};
use studyaid_core::{
    ChatSession, SessionEvent, Settings, SimplifierPort, SpeechPlatform, validate_settings,
};
use studyaid_voice::SystemSpeech;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;
use crate::parser::Cli;

/// Filter used with `--verbose` when `RUST_LOG` is unset.
const VERBOSE_FILTER: &str =
    "warn,studyaid_core=debug,studyaid_client=debug,studyaid_voice=debug,studyaid_cli=debug";

/// Install the stderr tracing subscriber.
///
/// `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
}

/// Validated settings for one invocation.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub settings: Settings,
}

impl CliConfig {
    /// Build settings from parsed flags (which already include env vars).
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let settings = Settings {
            endpoint: Some(cli.endpoint.trim().to_string()),
            timeout_secs: Some(cli.timeout_secs),
            max_new_tokens: cli.max_new_tokens,
            grade: Some(cli.grade),
            voice: Some(cli.voice.clone()),
            show_checks: Some(cli.checks),
        };
        validate_settings(&settings)?;
        Ok(Self { settings })
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    pub settings: Settings,
    pub simplifier: Arc<dyn SimplifierPort>,
    /// `None` when no speech engine was found on this system.
    pub speech: Option<Arc<SystemSpeech>>,
}

impl CliContext {
    /// The speech adapter as the core port type.
    pub fn speech_platform(&self) -> Option<Arc<dyn SpeechPlatform>> {
        self.speech
            .as_ref()
            .map(|speech| Arc::clone(speech) as Arc<dyn SpeechPlatform>)
    }

    /// Start a chat session against the configured backend and speech engine.
    pub fn session(&self) -> (ChatSession, UnboundedReceiver<SessionEvent>) {
        let (session, events) = ChatSession::new(
            Arc::clone(&self.simplifier),
            self.speech_platform(),
            self.settings.effective_voice(),
        );
        (
            session.with_max_new_tokens(self.settings.effective_max_new_tokens()),
            events,
        )
    }
}

/// Build the context from validated config.
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let settings = config.settings;

    let client_config = SimplifierClientConfig::new()
        .with_base_url(settings.effective_endpoint())
        .with_timeout(settings.effective_timeout())
        .with_max_new_tokens(settings.effective_max_new_tokens())
        .with_user_agent(concat!("studyaid-cli/", env!("CARGO_PKG_VERSION")));
    let client = DefaultSimplifierClient::new(&client_config)?;

    // Called from inside the async entry point, so a runtime is current.
    let speech = match SystemSpeech::detect(Handle::current()) {
        Ok(speech) => {
            tracing::debug!(engine = %speech.engine().kind(), "Speech available");
            Some(Arc::new(speech))
        }
        Err(e) => {
            tracing::info!(reason = %e, "Speech unavailable");
            None
        }
    };

    Ok(CliContext {
        settings,
        simplifier: Arc::new(client),
        speech,
    })
}
