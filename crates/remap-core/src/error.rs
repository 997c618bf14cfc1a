//! Error types for the Remap core library
//!
//! This module defines the crate-wide error type. Per-field failures never
//! reach callers of the batch API; they are logged and the offending rule is
//! skipped. Framing failures of a streamed object and I/O failures do surface
//! through [`Error`].

use crate::expression::ExpressionError;
use crate::stream::StreamError;
use crate::transformer::TransformationError;
use thiserror::Error;

/// Main error type for Remap operations
#[derive(Error, Debug)]
pub enum Error {
    /// A mapping rule cannot be applied as written
    #[error("Invalid rule{}: {message}", rule_id.map(|id| format!(" #{}", id)).unwrap_or_default())]
    InvalidRule {
        message: String,
        rule_id: Option<u64>,
    },

    /// A single field transformation failed
    #[error("Transformation failed: {0}")]
    Transformation(#[from] TransformationError),

    /// An expression could not be parsed or evaluated
    #[error("Expression error: {0}")]
    Expression(#[from] ExpressionError),

    /// The streaming transformer rejected its input or could not write output
    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Engine configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid rule error
    pub fn invalid_rule(message: impl Into<String>, rule_id: Option<u64>) -> Self {
        Error::InvalidRule {
            message: message.into(),
            rule_id,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Whether this error reports malformed framing of a streamed object
    pub fn is_format_error(&self) -> bool {
        matches!(self, Error::Stream(StreamError::Format(_)))
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::FormatError;

    #[test]
    fn test_invalid_rule_display() {
        let err = Error::invalid_rule("source path is empty", Some(7));
        assert_eq!(err.to_string(), "Invalid rule #7: source path is empty");

        let err = Error::invalid_rule("source path is empty", None);
        assert_eq!(err.to_string(), "Invalid rule: source path is empty");
    }

    #[test]
    fn test_format_error_detection() {
        let err: Error = StreamError::Format(FormatError::UnexpectedEof {
            expected: "end of object".to_string(),
            offset: 5,
        })
        .into();
        assert!(err.is_format_error());

        let err: Error = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert!(!err.is_format_error());
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse_err.into();
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
