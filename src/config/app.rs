//! The host application's configuration store.
//!
//! The application owns its configuration object; this crate only needs to
//! write one field into it, through [`ConfigTarget`].

use secrecy::SecretString;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// A configuration object that accepts keyed secret values.
pub trait ConfigTarget {
    /// Set `key` to `value`, replacing any previous value.
    fn set(&mut self, key: &str, value: Option<SecretString>);
}

/// Minimal keyed configuration store for applications without their own.
///
/// A key that was set to `None` is distinct from a key that was never set.
#[derive(Debug, Default)]
pub struct AppConfig {
    entries: BTreeMap<String, Option<SecretString>>,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value stored under `key`, if it was set to something.
    pub fn get(&self, key: &str) -> Option<&SecretString> {
        self.entries.get(key).and_then(Option::as_ref)
    }

    /// Whether `key` has been written, including writes of `None`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ConfigTarget for AppConfig {
    fn set(&mut self, key: &str, value: Option<SecretString>) {
        self.entries.insert(key.to_string(), value);
    }
}

impl ConfigTarget for BTreeMap<String, Option<SecretString>> {
    fn set(&mut self, key: &str, value: Option<SecretString>) {
        self.insert(key.to_string(), value);
    }
}

impl<S: BuildHasher> ConfigTarget for HashMap<String, Option<SecretString>, S> {
    fn set(&mut self, key: &str, value: Option<SecretString>) {
        self.insert(key.to_string(), value);
    }
}
