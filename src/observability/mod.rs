//! Observability.
//!
//! The library only emits `tracing` events and `metrics` samples; nothing is
//! printed unless the host installs a subscriber. The `beesql` binary does so
//! through [`init_logging`].

mod logging;

pub use logging::{LOG_ENV, LogFormat, LoggingConfig};

use crate::config::LoggingSettings;
use crate::{Error, Result};
use std::sync::OnceLock;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static LOGGING_INIT: OnceLock<()> = OnceLock::new();

/// Installs the global `tracing` subscriber from config settings.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if logging was already initialized.
pub fn init_from_settings(settings: &LoggingSettings, verbose: bool) -> Result<()> {
    init_logging(LoggingConfig::from_settings(Some(settings), verbose))
}

/// Installs the global `tracing` subscriber, writing to stderr.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if logging was already initialized.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    if LOGGING_INIT.get().is_some() {
        return Err(Error::Configuration(
            "logging already initialized".to_string(),
        ));
    }

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true)
                    .with_target(true),
            )
            .with(config.filter)
            .try_init()
            .map_err(init_error)?,
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(config.filter)
            .try_init()
            .map_err(init_error)?,
    }

    LOGGING_INIT
        .set(())
        .map_err(|()| Error::Configuration("failed to mark logging initialized".to_string()))
}

/// Helper to convert init errors.
#[allow(clippy::needless_pass_by_value)]
fn init_error(e: tracing_subscriber::util::TryInitError) -> Error {
    Error::Configuration(format!("logging init failed: {e}"))
}
