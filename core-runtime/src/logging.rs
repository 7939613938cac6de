//! # Logging
//!
//! `tracing` subscriber setup for the sync engine.
//!
//! [`init_logging`] installs one global subscriber made of:
//! - an `EnvFilter` (the engine crates at the configured level, everything
//!   else at `warn`, unless a custom filter is given)
//! - a formatting layer writing Pretty, JSON or Compact lines to stdout
//! - a [`LoggerSinkLayer`] that mirrors events into a host
//!   [`LoggerSink`], when one is configured
//!
//! ```ignore
//! use bridge_traits::time::{ConsoleLogger, LogLevel};
//! use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
//! use std::sync::Arc;
//!
//! init_logging(
//!     LoggingConfig::default()
//!         .with_format(LogFormat::Json)
//!         .with_level(LogLevel::Debug)
//!         .with_logger_sink(Arc::new(ConsoleLogger::default())),
//! )?;
//! ```

use crate::error::{Error, Result};

use bridge_traits::time::{LogEntry, LogLevel, LoggerSink};

use std::fmt;
use std::io;
use std::str::FromStr;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::{LookupSpan, Registry};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Crates whose events follow the configured level by default.
const ENGINE_TARGETS: &[&str] = &[
    "repo_sync_workspace",
    "bridge_traits",
    "core_runtime",
    "core_quota",
    "core_sync",
];

/// Output format of the formatting layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human readable
    Pretty,
    /// One JSON object per event
    Json,
    /// Single-line, human readable
    Compact,
}

impl Default for LogFormat {
    /// Pretty in debug builds, JSON in release builds.
    fn default() -> Self {
        if cfg!(debug_assertions) {
            LogFormat::Pretty
        } else {
            LogFormat::Json
        }
    }
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            other => Err(Error::Config(format!("Unknown log format: {}", other))),
        }
    }
}

/// Logging configuration
#[derive(Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Level applied to the engine crates
    pub level: LogLevel,
    /// Full `EnvFilter` directive string, replaces the default filter
    pub filter: Option<String>,
    /// Host sink receiving a copy of every event
    pub logger_sink: Option<Arc<dyn LoggerSink>>,
    /// Log span enter/exit (Pretty) or span context (JSON)
    pub enable_spans: bool,
    pub display_target: bool,
    pub display_thread_info: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Info,
            filter: None,
            logger_sink: None,
            enable_spans: true,
            display_target: true,
            display_thread_info: false,
        }
    }
}

impl fmt::Debug for LoggingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingConfig")
            .field("format", &self.format)
            .field("level", &self.level)
            .field("filter", &self.filter)
            .field("logger_sink", &self.logger_sink.is_some())
            .field("enable_spans", &self.enable_spans)
            .field("display_target", &self.display_target)
            .field("display_thread_info", &self.display_thread_info)
            .finish()
    }
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_logger_sink(mut self, sink: Arc<dyn LoggerSink>) -> Self {
        self.logger_sink = Some(sink);
        self
    }

    pub fn with_spans(mut self, enable: bool) -> Self {
        self.enable_spans = enable;
        self
    }

    pub fn with_target(mut self, display: bool) -> Self {
        self.display_target = display;
        self
    }

    pub fn with_thread_info(mut self, display: bool) -> Self {
        self.display_thread_info = display;
        self
    }

    /// Directive string the subscriber filters with
    pub fn filter_directives(&self) -> String {
        match &self.filter {
            Some(custom) => custom.clone(),
            None => {
                let mut directives = vec!["warn".to_string()];
                directives.extend(
                    ENGINE_TARGETS
                        .iter()
                        .map(|target| format!("{}={}", target, self.level.as_str())),
                );
                directives.join(",")
            }
        }
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns [`Error::Config`] if the filter does not parse or a global
/// subscriber is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;
    let fmt_layer = format_layer(&config);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(LoggerSinkLayer::new(config.logger_sink))
        .with(filter)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_new(config.filter_directives())
        .map_err(|e| Error::Config(format!("Invalid log filter: {}", e)))
}

fn format_layer(config: &LoggingConfig) -> Box<dyn Layer<Registry> + Send + Sync> {
    let base = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_target(config.display_target)
        .with_thread_ids(config.display_thread_info)
        .with_thread_names(config.display_thread_info);

    match config.format {
        LogFormat::Pretty => base
            .pretty()
            .with_span_events(if config.enable_spans {
                FmtSpan::ACTIVE
            } else {
                FmtSpan::NONE
            })
            .boxed(),
        LogFormat::Json => base
            .json()
            .flatten_event(true)
            .with_current_span(config.enable_spans)
            .with_span_list(config.enable_spans)
            .boxed(),
        LogFormat::Compact => base.compact().boxed(),
    }
}

/// Layer copying events into a [`LoggerSink`].
///
/// Inside a tokio runtime the sink call is spawned; elsewhere it runs to
/// completion on a temporary current-thread runtime.
pub struct LoggerSinkLayer {
    sink: Option<Arc<dyn LoggerSink>>,
}

impl LoggerSinkLayer {
    pub fn new(sink: Option<Arc<dyn LoggerSink>>) -> Self {
        Self { sink }
    }
}

impl<S> Layer<S> for LoggerSinkLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let Some(sink) = &self.sink else {
            return;
        };

        let metadata = event.metadata();
        let level = log_level(metadata.level());
        if level < sink.min_level() {
            return;
        }

        let mut entry = LogEntry::new(level, metadata.target(), String::new());
        event.record(&mut EntryVisitor(&mut entry));
        if entry.message.is_empty() {
            entry.message = metadata.name().to_string();
        }
        if let Some(span) = ctx.event_span(event) {
            entry = entry.with_span(span.name());
        }

        forward(Arc::clone(sink), entry);
    }
}

fn forward(sink: Arc<dyn LoggerSink>, entry: LogEntry) {
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        handle.spawn(async move {
            if let Err(err) = sink.log(entry).await {
                eprintln!("LoggerSink error: {}", err);
            }
        });
        return;
    }

    match tokio::runtime::Builder::new_current_thread().build() {
        Ok(runtime) => {
            if let Err(err) = runtime.block_on(sink.log(entry)) {
                eprintln!("LoggerSink error: {}", err);
            }
        }
        Err(err) => eprintln!("LoggerSink runtime error: {}", err),
    }
}

/// Fills a [`LogEntry`] from event fields; `message` becomes the entry text.
struct EntryVisitor<'a>(&'a mut LogEntry);

impl EntryVisitor<'_> {
    fn put(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.0.message = value;
        } else {
            self.0.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for EntryVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.put(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{:?}", value));
    }
}

fn log_level(level: &tracing::Level) -> LogLevel {
    match *level {
        tracing::Level::TRACE => LogLevel::Trace,
        tracing::Level::DEBUG => LogLevel::Debug,
        tracing::Level::INFO => LogLevel::Info,
        tracing::Level::WARN => LogLevel::Warn,
        tracing::Level::ERROR => LogLevel::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as SinkResult;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CapturingSink {
        entries: Mutex<Vec<LogEntry>>,
        min: Option<LogLevel>,
    }

    #[async_trait]
    impl LoggerSink for CapturingSink {
        async fn log(&self, entry: LogEntry) -> SinkResult<()> {
            self.entries.lock().unwrap().push(entry);
            Ok(())
        }

        fn min_level(&self) -> LogLevel {
            self.min.unwrap_or(LogLevel::Trace)
        }
    }

    fn capture(sink: &Arc<CapturingSink>) -> impl Subscriber + Send + Sync {
        let sink: Arc<dyn LoggerSink> = sink.clone();
        tracing_subscriber::registry().with(LoggerSinkLayer::new(Some(sink)))
    }

    #[test]
    fn test_default_filter_covers_engine_crates() {
        let directives = LoggingConfig::default()
            .with_level(LogLevel::Debug)
            .filter_directives();

        assert!(directives.starts_with("warn,"));
        for target in ENGINE_TARGETS {
            assert!(directives.contains(&format!("{}=debug", target)));
        }
    }

    #[test]
    fn test_custom_filter_replaces_default() {
        let config = LoggingConfig::default().with_filter("core_quota=trace");

        assert_eq!(config.filter_directives(), "core_quota=trace");
        assert!(build_filter(&config).is_ok());
    }

    #[test]
    fn test_invalid_filter() {
        let config = LoggingConfig::default().with_filter("core_sync=[");
        assert!(matches!(build_filter(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_sink_layer_forwards_fields() {
        let sink = Arc::new(CapturingSink::default());
        let _guard = tracing::subscriber::set_default(capture(&sink));

        tracing::warn!(target: "core_sync", path = "a/b.json", attempts = 2, "Failed to create resource");

        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Warn);
        assert_eq!(entries[0].target, "core_sync");
        assert_eq!(entries[0].message, "Failed to create resource");
        assert_eq!(entries[0].fields.get("path").map(String::as_str), Some("a/b.json"));
        assert_eq!(entries[0].fields.get("attempts").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_sink_layer_records_span_name() {
        let sink = Arc::new(CapturingSink::default());
        let _guard = tracing::subscriber::set_default(capture(&sink));

        let span = tracing::info_span!("incremental_sync");
        span.in_scope(|| tracing::info!("Replicating 2 versioned changes"));

        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries[0].span.as_deref(), Some("incremental_sync"));
        assert_eq!(entries[0].message, "Replicating 2 versioned changes");
    }

    #[test]
    fn test_sink_layer_respects_min_level() {
        let sink = Arc::new(CapturingSink {
            min: Some(LogLevel::Warn),
            ..Default::default()
        });
        let _guard = tracing::subscriber::set_default(capture(&sink));

        tracing::debug!("dropped");
        tracing::error!("kept");

        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "kept");
    }
}
