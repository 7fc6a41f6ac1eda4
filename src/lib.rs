//! # envboot
//!
//! Startup configuration bootstrap for a host application.
//!
//! Loads `KEY=VALUE` definitions from a local `.env` file into the process
//! environment, then copies `SECRET_KEY` into the application's configuration
//! object before it starts serving requests.

pub mod bootstrap;
pub mod config;
pub mod env;
pub mod error;
pub mod telemetry;

pub use bootstrap::{bootstrap, bootstrap_default};
pub use error::{Error, Result};
