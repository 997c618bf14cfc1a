//! Logging utilities for the Remap CLI
//!
//! This module provides:
//! - Session request IDs attached to operation spans
//! - Redaction of personal data before documents reach trace output
//! - Performance timing spans
//! - Structured logging setup (compact, full, JSON) to stderr or a file
//!
//! The core library logs through the `log` facade; those records are
//! forwarded into the same subscriber.

use crate::config::LoggingConfig as FileLoggingConfig;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{field, Span};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Global request ID for the current session
static REQUEST_ID: OnceLock<String> = OnceLock::new();

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter
    pub level: String,
    /// Output format: compact, full, json
    pub format: LogFormat,
    /// Enable console output
    pub console: bool,
    /// Optional file output path
    pub file: Option<PathBuf>,
    /// Include thread IDs
    pub thread_ids: bool,
    /// Include file and line numbers
    pub source_location: bool,
    /// Module-based filtering
    pub module_filter: HashMap<String, String>,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact format for production
    Compact,
    /// Full format with all details
    Full,
    /// JSON structured format
    Json,
}

impl LogFormat {
    /// Parse a format name, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "compact" => Some(Self::Compact),
            "full" => Some(Self::Full),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            console: true,
            file: None,
            thread_ids: false,
            source_location: false,
            module_filter: HashMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Create logging config from verbosity level
    pub fn from_verbosity(verbosity: u8) -> Self {
        let mut config = Self::default();

        match verbosity {
            0 => {}
            1 => {
                config.level = "info".to_string();
            }
            2 => {
                config.level = "debug".to_string();
                config.source_location = true;
            }
            _ => {
                config.level = "trace".to_string();
                config.format = LogFormat::Full;
                config.source_location = true;
                config.thread_ids = true;
            }
        }

        config
    }

    /// Apply settings from the configuration file
    ///
    /// A configured level only applies when no `-v` flag raised it.
    pub fn merge_with_file(&mut self, file: &FileLoggingConfig, verbosity: u8) {
        if verbosity == 0 {
            if let Some(level) = &file.level {
                self.level = level.clone();
            }
        }
        if let Some(format) = file.format.as_deref().and_then(LogFormat::parse) {
            self.format = format;
        }
        if file.file.is_some() {
            self.file = file.file.clone();
        }
        self.module_filter
            .extend(file.modules.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Apply environment overrides
    pub fn merge_with_env(&mut self) {
        // REMAP_LOG_FORMAT
        if let Ok(format) = std::env::var("REMAP_LOG_FORMAT") {
            match LogFormat::parse(&format) {
                Some(format) => self.format = format,
                None => eprintln!("Warning: invalid REMAP_LOG_FORMAT '{}', using default", format),
            }
        }

        // REMAP_LOG_FILE
        if let Ok(file) = std::env::var("REMAP_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }

        // REMAP_LOG_CONSOLE
        if let Ok(console) = std::env::var("REMAP_LOG_CONSOLE") {
            self.console = console.to_lowercase() == "true" || console == "1";
        }
    }
}

/// Initialize the global logging system
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let env_filter = create_env_filter(&config)?;
    let (writer, ansi) = create_writer(&config)?;

    // `try_init` also installs the `log` bridge so core records are captured
    let initialized = match config.format {
        LogFormat::Compact => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .with_target(true)
            .with_ansi(ansi)
            .with_thread_ids(config.thread_ids)
            .with_file(config.source_location)
            .with_line_number(config.source_location)
            .compact()
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .with_thread_ids(config.thread_ids)
            .with_file(config.source_location)
            .with_line_number(config.source_location)
            .json()
            .try_init(),
        LogFormat::Full => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .with_target(true)
            .with_ansi(ansi)
            .with_thread_ids(config.thread_ids)
            .with_file(config.source_location)
            .with_line_number(config.source_location)
            .try_init(),
    };
    initialized.map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;

    let request_id = generate_request_id();
    REQUEST_ID.set(request_id.clone()).map_err(|_| {
        Error::other("Failed to set request ID - request tracking may not work correctly")
    })?;

    tracing::debug!(
        request_id = %request_id,
        config = ?config,
        "Logging system initialized"
    );

    Ok(())
}

/// Pick the log destination; stdout is reserved for command output
fn create_writer(config: &LoggingConfig) -> Result<(BoxMakeWriter, bool)> {
    if let Some(path) = &config.file {
        let file_name = path
            .file_name()
            .ok_or_else(|| Error::config(format!("log file '{}' has no file name", path.display())))?;
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&directory)?;
        let appender = tracing_appender::rolling::never(directory, file_name);
        return Ok((BoxMakeWriter::new(appender), false));
    }

    if config.console {
        use is_terminal::IsTerminal;
        let ansi = std::io::stderr().is_terminal();
        Ok((BoxMakeWriter::new(std::io::stderr), ansi))
    } else {
        Ok((BoxMakeWriter::new(std::io::sink), false))
    }
}

/// Create environment filter based on configuration
fn create_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    for (module, level) in &config.module_filter {
        filter = filter.add_directive(
            format!("{}={}", module, level)
                .parse()
                .map_err(|e| Error::config(format!("Invalid filter directive: {}", e)))?,
        );
    }

    Ok(filter)
}

/// Generate a unique request ID for this session
pub fn generate_request_id() -> String {
    format!("req_{}", Uuid::new_v4().simple())
}

/// Get the current request ID
pub fn current_request_id() -> Option<&'static str> {
    REQUEST_ID.get().map(|s| s.as_str())
}

/// Create a span with request ID and timing
pub fn create_operation_span(operation: &str, details: Option<&str>) -> Span {
    tracing::info_span!(
        "operation",
        operation = operation,
        request_id = current_request_id().unwrap_or("unknown"),
        details = details.unwrap_or(""),
        duration_ms = field::Empty,
    )
}

/// Personal data redaction for documents written to trace logs
///
/// Applicant records carry identifiers and contact details; trace output
/// must not echo them verbatim.
pub mod redaction {
    use regex::Regex;
    use serde_json::Value;
    use std::sync::OnceLock;

    const MASK: &str = "***";

    static EMAIL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    static NATIONAL_ID_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    static CARD_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

    fn pattern(cell: &'static OnceLock<Option<Regex>>, source: &str) -> Option<&'static Regex> {
        cell.get_or_init(|| Regex::new(source).ok()).as_ref()
    }

    /// Mask e-mail addresses, national ID numbers and card numbers in text
    pub fn redact_sensitive(input: &str) -> String {
        let patterns = [
            pattern(&EMAIL_REGEX, r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}"),
            pattern(&NATIONAL_ID_REGEX, r"\b\d{3}-\d{2}-\d{4}\b"),
            pattern(&CARD_REGEX, r"\b(?:\d[ -]?){12,15}\d\b"),
        ];

        let mut result = input.to_string();
        for regex in patterns.into_iter().flatten() {
            result = regex.replace_all(&result, MASK).into_owned();
        }
        result
    }

    /// Redact sensitive values of a JSON document in place
    pub fn redact_json_value(value: &mut Value) {
        match value {
            Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    if is_sensitive_key(key) {
                        *val = Value::String(MASK.to_string());
                    } else {
                        redact_json_value(val);
                    }
                }
            }
            Value::Array(items) => items.iter_mut().for_each(redact_json_value),
            Value::String(s) => *s = redact_sensitive(s),
            _ => {}
        }
    }

    /// Whether a key names a field whose value is always masked
    fn is_sensitive_key(key: &str) -> bool {
        let key = key.to_lowercase().replace(['_', '-'], "");
        [
            "ssn",
            "nationalid",
            "passport",
            "password",
            "secret",
            "token",
            "accountnumber",
            "cardnumber",
            "iban",
        ]
        .iter()
        .any(|needle| key.contains(needle))
    }
}

/// Performance timing utilities
pub mod timing {
    use std::time::Instant;
    use tracing::Span;

    /// A timer that automatically logs duration when dropped
    pub struct Timer {
        start: Instant,
        span: Span,
        operation: String,
    }

    impl Timer {
        pub fn new(operation: &str) -> Self {
            Self::build(operation, None)
        }

        pub fn with_details(operation: &str, details: &str) -> Self {
            Self::build(operation, Some(details))
        }

        fn build(operation: &str, details: Option<&str>) -> Self {
            Self {
                start: Instant::now(),
                span: super::create_operation_span(operation, details),
                operation: operation.to_string(),
            }
        }

        /// Get elapsed time without finishing the timer
        pub fn elapsed(&self) -> std::time::Duration {
            self.start.elapsed()
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            let duration = self.start.elapsed();
            self.span.record("duration_ms", duration.as_millis() as u64);

            tracing::debug!(
                operation = %self.operation,
                duration_ms = duration.as_millis() as u64,
                "Operation completed"
            );
        }
    }
}
