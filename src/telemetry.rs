//! Logging initialization.
//!
//! Sets up a tracing-subscriber registry with an env filter and a fmt layer.
//! Called by the host binary; library code only emits events.

use crate::env::EnvSource;
use crate::error::{Error, Result};

/// Environment variable consulted for the fallback log level.
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

/// Configuration for logging initialization.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set (e.g. "info" or "envboot=debug").
    pub default_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Take the fallback level from `LOG_LEVEL`, defaulting to "info".
    pub fn from_source<E: EnvSource + ?Sized>(source: &E) -> Self {
        source
            .var(LOG_LEVEL_VAR)
            .map(|default_level| Self { default_level })
            .unwrap_or_default()
    }
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the fallback level is not a valid filter or a global
/// subscriber was already set.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.default_level).map_err(|e| {
            Error::Other(format!("invalid log level {:?}: {e}", config.default_level))
        })?,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| Error::Other(format!("failed to init tracing subscriber: {e}")))
}
