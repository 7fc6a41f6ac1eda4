//! Secret handling utilities.
//!
//! Re-exports the secrecy types used in configuration values, plus a helper
//! for comparing a stored secret without copying it out.

pub use secrecy::{ExposeSecret, SecretString};

/// True when `secret` holds exactly `expected`.
pub fn secret_eq(secret: &SecretString, expected: &str) -> bool {
    secret.expose_secret() == expected
}
