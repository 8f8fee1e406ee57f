//! Process-wide log setup: a tracing subscriber with an `EnvFilter`, pretty
//! or JSON output, and `log` records forwarded into it.

use inquiry_desk::config::{LogFormat, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::ServerError;

/// Builds the filter: `RUST_LOG` when set, else the configured directive.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, ServerError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.filter).map_err(|e| {
            ServerError::Logging(format!("invalid log filter '{}': {}", config.filter, e))
        }),
    }
}

pub fn init_logging(config: &LoggingConfig) -> Result<(), ServerError> {
    let filter = build_filter(config)?;

    tracing_log::LogTracer::init()
        .map_err(|e| ServerError::Logging(format!("failed to bridge log records: {}", e)))?;

    let registry = Registry::default().with(filter);
    let result = match config.format {
        LogFormat::Pretty => {
            tracing::subscriber::set_global_default(registry.with(fmt::layer().with_target(true)))
        }
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().json().with_current_span(true)),
        ),
    };
    result.map_err(|e| ServerError::Logging(format!("failed to install subscriber: {}", e)))
}
