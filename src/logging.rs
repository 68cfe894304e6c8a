//! `tracing` subscriber setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingSettings;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{filter}': {message}")]
    InvalidFilter { filter: String, message: String },

    #[error("Failed to initialize logging: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Build the filter: `RUST_LOG` wins over the configured directive.
pub fn build_filter(settings: &LoggingSettings) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&settings.filter).map_err(|e| LoggingError::InvalidFilter {
        filter: settings.filter.clone(),
        message: e.to_string(),
    })
}

/// Install a compact stderr subscriber for the process.
///
/// Stdout stays free for command output. Calling this twice returns
/// [`LoggingError::AlreadyInitialized`].
pub fn init_logging(settings: &LoggingSettings) -> Result<(), LoggingError> {
    let env_filter = build_filter(settings)?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()?;

    Ok(())
}
