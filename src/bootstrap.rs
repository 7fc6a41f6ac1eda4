//! Startup sequence: load `.env` definitions, then assign the secret key.

use crate::config::{Config, ConfigTarget};
use crate::env::{EnvLoader, LoadReport};
use crate::error::Result;

/// Load definitions with `loader`, then write `SECRET_KEY` into `target`.
///
/// Run once before the application starts handling requests. Running it
/// again leaves the field with the same value.
///
/// # Errors
///
/// Only when a definitions file exists but cannot be read. A missing file or
/// an unset variable is not an error.
pub fn bootstrap<T: ConfigTarget + ?Sized>(
    target: &mut T,
    loader: &EnvLoader,
) -> Result<LoadReport> {
    let report = loader.load()?;
    let config = Config::from_env();

    tracing::info!(
        definitions = report.loaded(),
        applied = report.applied.len(),
        secret_key_set = config.secret_key.is_some(),
        "configuration bootstrapped"
    );

    config.apply(target);
    Ok(report)
}

/// [`bootstrap`] with the default loader: nearest `.env` from the current
/// directory, ambient environment wins.
pub fn bootstrap_default<T: ConfigTarget + ?Sized>(target: &mut T) -> Result<LoadReport> {
    bootstrap(target, &EnvLoader::new())
}
