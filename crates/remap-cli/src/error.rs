//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from remap-core library
    #[error("{0}")]
    Core(#[from] remap_core::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Invalid file format
    #[error("Invalid file format for {}: expected {}", path.display(), expected)]
    InvalidFormat { path: PathBuf, expected: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// A rule set did not pass `check`
    #[error("{failed} of {total} rule(s) failed the check")]
    CheckFailed { failed: usize, total: usize },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl From<remap_core::ExpressionError> for Error {
    fn from(error: remap_core::ExpressionError) -> Self {
        Self::Core(error.into())
    }
}

impl From<remap_core::StreamError> for Error {
    fn from(error: remap_core::StreamError) -> Self {
        Self::Core(error.into())
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(core) if core.is_format_error() => 4,
            Self::Core(_) => 2,
            Self::FileNotFound { .. } => 3,
            Self::InvalidFormat { .. } => 4,
            Self::Config(_) => 5,
            Self::InvalidArgs(_) => 6,
            Self::CheckFailed { .. } => 7,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

/// Extension trait for displaying errors with context
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context(self, msg: &str) -> Result<T>;

    /// Add context with a closure (only evaluated on error)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other {
                message: format!("{}: {}", msg, inner),
            }
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other {
                message: format!("{}: {}", f(), inner),
            }
        })
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remap_core::FormatError;

    #[test]
    fn test_exit_codes_are_distinct_by_kind() {
        let not_found = Error::FileNotFound {
            path: PathBuf::from("rules.json"),
        };
        assert_eq!(not_found.exit_code(), 3);
        assert_eq!(Error::config("bad").exit_code(), 5);
        assert_eq!(Error::CheckFailed { failed: 1, total: 3 }.exit_code(), 7);
        assert_eq!(Error::other("boom").exit_code(), 99);
    }

    #[test]
    fn test_stream_format_error_exit_code() {
        let format = FormatError::UnexpectedEof {
            expected: "'}'".to_string(),
            offset: 12,
        };
        let error: Error = remap_core::StreamError::Format(format).into();
        assert_eq!(error.exit_code(), 4);

        let io = remap_core::StreamError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert_eq!(Error::from(io).exit_code(), 2);
    }

    #[test]
    fn test_only_invalid_args_show_help() {
        assert!(Error::invalid_args("--value needs JSON").should_show_help());
        assert!(!Error::other("x").should_show_help());
    }

    #[test]
    fn test_context_wraps_message() {
        let result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let error = result.context("reading rules").unwrap_err();
        assert_eq!(error.to_string(), "reading rules: IO error: gone");
    }

    #[test]
    fn test_format_error_without_color() {
        let error = Error::config("missing key");
        assert_eq!(
            format_error(&error, false),
            "Error: Configuration error: missing key"
        );
    }
}
