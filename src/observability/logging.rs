//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber
//! - Hand out named loggers, one per server role
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` overrides the configured level

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Error type for logger construction and subscriber setup.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("logger name must not be empty")]
    InvalidName,
    #[error("invalid log filter {directive:?}: {message}")]
    InvalidFilter { directive: String, message: String },
    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// A named logger: a `server` span carrying the role name.
///
/// Events recorded inside the span (the serving loop, request traces)
/// carry the name as context.
#[derive(Debug, Clone)]
pub struct Logger {
    name: String,
    span: tracing::Span,
}

impl Logger {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let span = tracing::info_span!("server", name = %name);
        Self { name, span }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn span(&self) -> &tracing::Span {
        &self.span
    }
}

/// Creates loggers for server roles.
pub trait LoggerFactory: Send + Sync {
    fn new_logger(&self, name: &str) -> Result<Logger, LoggingError>;
}

/// Default factory backed by the global tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLoggerFactory;

impl LoggerFactory for TracingLoggerFactory {
    fn new_logger(&self, name: &str) -> Result<Logger, LoggingError> {
        if name.trim().is_empty() {
            return Err(LoggingError::InvalidName);
        }
        Ok(Logger::new(name))
    }
}

/// Install the global subscriber described by `config`.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| LoggingError::InvalidFilter {
            directive: config.log_level.clone(),
            message: e.to_string(),
        })?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };

    result.map_err(|e| LoggingError::Install(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_names_loggers() {
        let logger = TracingLoggerFactory.new_logger("caduceus.health").unwrap();
        assert_eq!(logger.name(), "caduceus.health");
    }

    #[test]
    fn factory_rejects_blank_names() {
        assert!(matches!(
            TracingLoggerFactory.new_logger(""),
            Err(LoggingError::InvalidName)
        ));
        assert!(matches!(
            TracingLoggerFactory.new_logger("   "),
            Err(LoggingError::InvalidName)
        ));
    }

    #[test]
    fn bad_filter_is_reported() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = ObservabilityConfig {
            log_level: "webpa_server=notalevel".into(),
            ..Default::default()
        };
        assert!(matches!(
            init_logging(&config),
            Err(LoggingError::InvalidFilter { .. })
        ));
    }
}
