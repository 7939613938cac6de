//! Integration tests for logging system

use bridge_traits::time::{ConsoleLogger, LogLevel};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use core_runtime::Error;
use std::sync::Arc;

#[test]
fn test_init_logging_only_once() {
    // A process has a single global subscriber, so the second call must fail
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_logger_sink(Arc::new(ConsoleLogger::default()));

    init_logging(config.clone()).unwrap();
    tracing::info!(target: "core_sync", "replicating versioned changes");

    match init_logging(config) {
        Err(Error::Config(msg)) => assert!(msg.contains("Failed to initialize logging")),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn test_invalid_filter_is_rejected() {
    let config = LoggingConfig::default().with_filter("core_sync=[");

    assert!(matches!(init_logging(config), Err(Error::Config(_))));
}

#[test]
fn test_default_format_follows_build_profile() {
    let expected = if cfg!(debug_assertions) {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    };

    assert_eq!(LoggingConfig::default().format, expected);
    assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn)
        .with_filter("core_sync=trace")
        .with_spans(false)
        .with_target(false)
        .with_thread_info(true);

    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.level, LogLevel::Warn);
    assert_eq!(config.filter, Some("core_sync=trace".to_string()));
    assert!(!config.enable_spans);
    assert!(!config.display_target);
    assert!(config.display_thread_info);
    assert!(config.logger_sink.is_none());
}
