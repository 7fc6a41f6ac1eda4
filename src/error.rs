//! Error types for envboot.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The definitions file exists but could not be opened or read.
    #[error("cannot read definitions file {}: {source}", path.display())]
    Definitions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
