//! Typed configuration handed to the host application.
//!
//! Built once at startup from an [`EnvSource`]. The secret key is wrapped in
//! `secrecy::SecretString` so it never shows up in logs or `Debug` output.

pub mod app;
pub mod secrets;

pub use app::{AppConfig, ConfigTarget};

use crate::env::{EnvSource, ProcessEnv};
use secrecy::SecretString;

/// Environment variable holding the application's secret key.
pub const SECRET_KEY_VAR: &str = "SECRET_KEY";

/// Configuration field the secret key is written to.
pub const SECRET_KEY_FIELD: &str = "SECRET_KEY";

#[derive(Debug, Default)]
pub struct Config {
    /// `None` when the variable is not defined. An empty value is kept as-is.
    pub secret_key: Option<SecretString>,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// Load `.env` definitions first (see [`crate::env::EnvLoader`]) if they
    /// should be visible here.
    pub fn from_env() -> Self {
        Self::from_source(&ProcessEnv)
    }

    /// Read configuration from any environment source.
    pub fn from_source<E: EnvSource + ?Sized>(source: &E) -> Self {
        Self {
            secret_key: source.var(SECRET_KEY_VAR).map(SecretString::from),
        }
    }

    /// Write the secret key into the application's configuration.
    ///
    /// The field is always written, with `None` when the key is unset, so a
    /// value left over from an earlier run is replaced.
    pub fn apply<T: ConfigTarget + ?Sized>(self, target: &mut T) {
        tracing::debug!(
            field = SECRET_KEY_FIELD,
            present = self.secret_key.is_some(),
            "assigning secret key"
        );
        target.set(SECRET_KEY_FIELD, self.secret_key);
    }
}
