//! Integration tests for logging initialization.

use envboot::Error;
use envboot::telemetry::{LoggingConfig, init_logging};
use serial_test::serial;

fn clear_rust_log() {
    unsafe {
        std::env::remove_var("RUST_LOG");
    }
}

#[test]
#[serial]
fn logging_initializes_once() {
    clear_rust_log();
    let first = init_logging(LoggingConfig::default());
    assert!(first.is_ok());

    // A global subscriber can only be set once per process.
    let second = init_logging(LoggingConfig {
        default_level: "debug".to_string(),
    });
    assert!(second.is_err());
}

#[test]
#[serial]
fn invalid_default_level_is_rejected() {
    clear_rust_log();
    let result = init_logging(LoggingConfig {
        default_level: "envboot=verbose".to_string(),
    });

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Other(ref msg) if msg.contains("invalid log level")));
}
