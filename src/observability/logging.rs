//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Select JSON or pretty output
//! - Honor `RUST_LOG` over the configured level
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - Events carry the current request span (method, uri, request ID)

use tracing_subscriber::{
    filter::ParseError, fmt, layer::SubscriberExt, util::SubscriberInitExt,
    util::TryInitError, EnvFilter,
};

use crate::config::{LogFormat, ObservabilityConfig};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("failed to install subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Build the level filter: `RUST_LOG` if set, else the configured level.
pub fn build_filter(config: &ObservabilityConfig) -> Result<EnvFilter, ParseError> {
    EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))
}

/// Install the global subscriber.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), LoggingError> {
    let registry = tracing_subscriber::registry().with(build_filter(config)?);

    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true).with_span_list(false))
            .try_init()?,
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init()?,
    }

    Ok(())
}
