//! Environment variable sources and the `.env` loader.
//!
//! Lookups go through [`EnvSource`] so configuration can be built from the
//! process environment, from a layered view over a definitions file, or from
//! a plain map in tests.

pub mod definitions;
pub mod loader;

pub use definitions::Definitions;
pub use loader::{DEFAULT_FILENAME, EnvLoader, LayeredEnv, LoadReport, Precedence};

use std::collections::{BTreeMap, HashMap};
use std::env::VarError;
use std::hash::BuildHasher;

/// Read access to a set of environment variables.
pub trait EnvSource {
    /// Returns the value of `key`, or `None` if it is not defined.
    fn var(&self, key: &str) -> Option<String>;

    /// Whether `key` is defined, even if its value cannot be read as text.
    fn contains(&self, key: &str) -> bool {
        self.var(key).is_some()
    }
}

/// The environment table of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        match std::env::var(key) {
            Ok(value) => Some(value),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(_)) => {
                tracing::warn!(
                    var = key,
                    "environment variable is not valid unicode, treating as unset"
                );
                None
            }
        }
    }

    fn contains(&self, key: &str) -> bool {
        std::env::var_os(key).is_some()
    }
}

impl<S: BuildHasher> EnvSource for HashMap<String, String, S> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }

    fn contains(&self, key: &str) -> bool {
        (**self).contains(key)
    }
}
