//! Byte scanner that finds the extent of one JSON value
//!
//! The scanner only tracks enough structure to know where a value ends:
//! string literals (with escapes) and bracket depth. Validation of the bytes
//! is left to `serde_json` once the value is complete.
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the Apache-2.0 license

use super::error::{describe_byte, FormatError};
use serde_json::Value;

/// Result of pushing one byte into the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    /// The value continues
    Continue,
    /// The value is complete. `consumed` is false when the byte terminated a
    /// bare scalar and belongs to whatever follows it.
    Complete { consumed: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Container,
    String,
    Scalar,
}

/// Accumulates the bytes of a single value
#[derive(Debug)]
pub struct ValueScanner {
    buffer: Vec<u8>,
    kind: ValueKind,
    depth: usize,
    in_string: bool,
    escaped: bool,
    start: usize,
    limit: Option<usize>,
}

impl ValueScanner {
    /// Create a scanner, optionally bounding the size of one value
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            buffer: Vec::new(),
            kind: ValueKind::Scalar,
            depth: 0,
            in_string: false,
            escaped: false,
            start: 0,
            limit,
        }
    }

    /// Start a new value with its first byte, found at `offset`
    pub fn begin(&mut self, byte: u8, offset: usize) -> Result<Scan, FormatError> {
        self.buffer.clear();
        self.depth = 0;
        self.in_string = false;
        self.escaped = false;
        self.start = offset;

        self.kind = match byte {
            b'{' | b'[' => {
                self.depth = 1;
                ValueKind::Container
            }
            b'"' => ValueKind::String,
            b'-' | b'0'..=b'9' | b't' | b'f' | b'n' => ValueKind::Scalar,
            other => {
                return Err(FormatError::InvalidValue {
                    message: format!("expected a value, found {}", describe_byte(other)),
                    offset,
                })
            }
        };

        self.append(byte)?;
        Ok(Scan::Continue)
    }

    /// Feed the next byte of the current value
    pub fn push(&mut self, byte: u8) -> Result<Scan, FormatError> {
        match self.kind {
            ValueKind::Scalar => {
                if matches!(byte, b',' | b'}' | b']' | b' ' | b'\t' | b'\n' | b'\r') {
                    return Ok(Scan::Complete { consumed: false });
                }
                self.append(byte)?;
                Ok(Scan::Continue)
            }
            ValueKind::String => {
                self.append(byte)?;
                if self.escaped {
                    self.escaped = false;
                } else if byte == b'\\' {
                    self.escaped = true;
                } else if byte == b'"' {
                    return Ok(Scan::Complete { consumed: true });
                }
                Ok(Scan::Continue)
            }
            ValueKind::Container => {
                self.append(byte)?;
                if self.in_string {
                    if self.escaped {
                        self.escaped = false;
                    } else if byte == b'\\' {
                        self.escaped = true;
                    } else if byte == b'"' {
                        self.in_string = false;
                    }
                    return Ok(Scan::Continue);
                }
                match byte {
                    b'"' => self.in_string = true,
                    b'{' | b'[' => self.depth += 1,
                    b'}' | b']' => {
                        self.depth -= 1;
                        if self.depth == 0 {
                            return Ok(Scan::Complete { consumed: true });
                        }
                    }
                    _ => {}
                }
                Ok(Scan::Continue)
            }
        }
    }

    /// Decode the completed value and reset the buffer
    pub fn decode(&mut self) -> Result<Value, FormatError> {
        let result = serde_json::from_slice(&self.buffer).map_err(|e| FormatError::InvalidValue {
            message: e.to_string(),
            offset: self.start,
        });
        self.buffer.clear();
        result
    }

    /// Offset of the first byte of the current value
    pub fn start(&self) -> usize {
        self.start
    }

    fn append(&mut self, byte: u8) -> Result<(), FormatError> {
        if let Some(limit) = self.limit {
            if self.buffer.len() >= limit {
                return Err(FormatError::ValueTooLarge {
                    limit,
                    offset: self.start,
                });
            }
        }
        self.buffer.push(byte);
        Ok(())
    }
}
