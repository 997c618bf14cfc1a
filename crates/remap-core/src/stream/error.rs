//! Error types for the streaming transformer
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Errors raised while streaming an object
#[derive(Error, Debug)]
pub enum StreamError {
    /// The input is not a well-formed JSON object
    #[error("Malformed input: {0}")]
    Format(#[from] FormatError),

    /// Reading input or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Framing errors, each carrying the byte offset where it was detected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("expected '{{' at offset {offset}, found {found}")]
    ExpectedObjectStart { found: String, offset: usize },

    #[error("object keys must be strings, found {found} at offset {offset}")]
    NonStringKey { found: String, offset: usize },

    #[error("expected ':' at offset {offset}, found {found}")]
    ExpectedColon { found: String, offset: usize },

    #[error("expected ',' or '}}' at offset {offset}, found {found}")]
    ExpectedCommaOrEnd { found: String, offset: usize },

    #[error("expected a key after ',' at offset {offset}, found {found}")]
    ExpectedKey { found: String, offset: usize },

    #[error("invalid key at offset {offset}: {message}")]
    InvalidKey { message: String, offset: usize },

    #[error("invalid value at offset {offset}: {message}")]
    InvalidValue { message: String, offset: usize },

    #[error("value starting at offset {offset} exceeds the {limit} byte limit")]
    ValueTooLarge { limit: usize, offset: usize },

    #[error("key starting at offset {offset} exceeds the {limit} byte limit")]
    KeyTooLarge { limit: usize, offset: usize },

    #[error("unexpected {found} after the end of the object at offset {offset}")]
    TrailingData { found: String, offset: usize },

    #[error("unexpected end of input at offset {offset}, expected {expected}")]
    UnexpectedEof { expected: String, offset: usize },
}

impl FormatError {
    /// Byte offset into the input where the error was detected
    pub fn offset(&self) -> usize {
        match self {
            FormatError::ExpectedObjectStart { offset, .. }
            | FormatError::NonStringKey { offset, .. }
            | FormatError::ExpectedColon { offset, .. }
            | FormatError::ExpectedCommaOrEnd { offset, .. }
            | FormatError::ExpectedKey { offset, .. }
            | FormatError::InvalidKey { offset, .. }
            | FormatError::InvalidValue { offset, .. }
            | FormatError::ValueTooLarge { offset, .. }
            | FormatError::KeyTooLarge { offset, .. }
            | FormatError::TrailingData { offset, .. }
            | FormatError::UnexpectedEof { offset, .. } => *offset,
        }
    }
}

impl StreamError {
    /// The framing error, if this is one
    pub fn as_format(&self) -> Option<&FormatError> {
        match self {
            StreamError::Format(e) => Some(e),
            StreamError::Io(_) => None,
        }
    }
}

/// Describe an input byte for error messages
pub(crate) fn describe_byte(byte: u8) -> String {
    if byte.is_ascii_graphic() {
        format!("'{}'", byte as char)
    } else {
        format!("byte 0x{:02x}", byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_offset() {
        let err = FormatError::ExpectedObjectStart {
            found: describe_byte(b'['),
            offset: 0,
        };
        assert_eq!(err.to_string(), "expected '{' at offset 0, found '['");
        assert_eq!(err.offset(), 0);

        let err = FormatError::ExpectedCommaOrEnd {
            found: describe_byte(b'\n'),
            offset: 12,
        };
        assert_eq!(err.to_string(), "expected ',' or '}' at offset 12, found byte 0x0a");
        assert_eq!(err.offset(), 12);
    }

    #[test]
    fn test_stream_error_wraps_format() {
        let err: StreamError = FormatError::UnexpectedEof {
            expected: "'}'".to_string(),
            offset: 9,
        }
        .into();
        assert_eq!(err.as_format().map(FormatError::offset), Some(9));
        assert!(err.to_string().starts_with("Malformed input:"));
    }
}
