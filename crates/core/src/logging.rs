use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::errors::CoreError;

/// Console logging setup for hosts embedding the core (CLI, desktop shell, tests).
///
/// The library itself only emits `tracing` events; nothing is printed until
/// the host calls [`init_logging`].
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub service_name: String,
    pub environment: String,
    pub log_level: String,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            service_name: std::env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "carteira".to_string()),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.log_level.trim().is_empty() {
            return Err(CoreError::Config("log level must not be empty".to_string()));
        }
        tracing_subscriber::EnvFilter::try_new(&self.log_level)
            .map_err(|e| CoreError::Config(format!("invalid log filter '{}': {e}", self.log_level)))?;
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            service_name: "carteira".to_string(),
            environment: "development".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Install a global `fmt` subscriber filtered by `config.log_level`.
///
/// Fails if the filter is invalid or a global subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<(), CoreError> {
    config.validate()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| CoreError::Config(format!("failed to install subscriber: {e}")))?;

    tracing::info!(
        service = %config.service_name,
        environment = %config.environment,
        "console logging initialized"
    );
    Ok(())
}
