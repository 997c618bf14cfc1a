//! Push-driven transformer for a single streamed JSON object
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the Apache-2.0 license

use super::error::{describe_byte, FormatError, StreamError};
use super::scanner::{Scan, ValueScanner};
use super::state::StreamState;
use super::EntryTransform;
use crate::config::StreamConfig;
use serde_json::Value;
use std::io::{self, Write};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// Rewrites the entries of one JSON object as its bytes arrive
///
/// Bytes are pushed with [`feed`](Self::feed) in chunks of any size; each
/// entry is decoded, passed through the [`EntryTransform`] and written to the
/// output as soon as its value is complete. Only the value currently being
/// read is buffered.
///
/// Output is written as it is produced, so a malformed input leaves a partial
/// object in the writer. After an error the transformer must be discarded.
pub struct StreamTransformer<W: Write, T: EntryTransform> {
    writer: W,
    transform: T,
    state: StreamState,
    scanner: ValueScanner,
    max_key_bytes: Option<usize>,
    key_buffer: Vec<u8>,
    key_escaped: bool,
    key_start: usize,
    pending_key: Option<String>,
    offset: usize,
    bom_matched: usize,
    entries: usize,
}

impl<W: Write, T: EntryTransform> StreamTransformer<W, T> {
    /// Create a transformer writing to `writer`
    pub fn new(writer: W, transform: T) -> Self {
        Self::with_config(writer, transform, &StreamConfig::default())
    }

    /// Create a transformer with explicit limits
    pub fn with_config(writer: W, transform: T, config: &StreamConfig) -> Self {
        Self {
            writer,
            transform,
            state: StreamState::ExpectObjectOpen,
            scanner: ValueScanner::new(config.max_value_bytes),
            max_key_bytes: config.max_value_bytes,
            key_buffer: Vec::new(),
            key_escaped: false,
            key_start: 0,
            pending_key: None,
            offset: 0,
            bom_matched: 0,
            entries: 0,
        }
    }

    /// Push the next chunk of input
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), StreamError> {
        for &byte in chunk {
            self.push(byte)?;
            self.offset += 1;
        }
        Ok(())
    }

    /// Signal end of input and return the writer
    ///
    /// Fails with [`FormatError::UnexpectedEof`] unless the closing brace of
    /// the object has been read.
    pub fn finish(mut self) -> Result<W, StreamError> {
        if !self.state.is_done() {
            return Err(FormatError::UnexpectedEof {
                expected: self.state.expected().to_string(),
                offset: self.offset,
            }
            .into());
        }
        self.writer.flush()?;
        log::debug!(
            "Streamed {} entries from {} bytes",
            self.entries,
            self.offset
        );
        Ok(self.writer)
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn bytes_consumed(&self) -> usize {
        self.offset
    }

    pub fn entries_written(&self) -> usize {
        self.entries
    }

    /// The output written so far
    pub fn writer(&self) -> &W {
        &self.writer
    }

    fn push(&mut self, byte: u8) -> Result<(), StreamError> {
        match self.state {
            StreamState::ExpectObjectOpen => {
                if self.in_leading_bom(byte) || is_whitespace(byte) {
                    return Ok(());
                }
                if byte != b'{' {
                    return Err(FormatError::ExpectedObjectStart {
                        found: describe_byte(byte),
                        offset: self.offset,
                    }
                    .into());
                }
                self.writer.write_all(b"{")?;
                self.state = StreamState::ExpectKeyOrClose;
            }
            StreamState::ExpectKeyOrClose | StreamState::ExpectKey => {
                if is_whitespace(byte) {
                    return Ok(());
                }
                match byte {
                    b'"' => self.begin_key(),
                    b'}' if self.state == StreamState::ExpectKeyOrClose => self.close()?,
                    b'}' => {
                        return Err(FormatError::ExpectedKey {
                            found: describe_byte(byte),
                            offset: self.offset,
                        }
                        .into())
                    }
                    other => {
                        return Err(FormatError::NonStringKey {
                            found: describe_byte(other),
                            offset: self.offset,
                        }
                        .into())
                    }
                }
            }
            StreamState::InKey => {
                if let Some(limit) = self.max_key_bytes {
                    if self.key_buffer.len() >= limit {
                        return Err(FormatError::KeyTooLarge {
                            limit,
                            offset: self.key_start,
                        }
                        .into());
                    }
                }
                self.key_buffer.push(byte);
                if self.key_escaped {
                    self.key_escaped = false;
                } else if byte == b'\\' {
                    self.key_escaped = true;
                } else if byte == b'"' {
                    let key: String = serde_json::from_slice(&self.key_buffer).map_err(|e| {
                        FormatError::InvalidKey {
                            message: e.to_string(),
                            offset: self.key_start,
                        }
                    })?;
                    self.pending_key = Some(key);
                    self.state = StreamState::HaveKey;
                }
            }
            StreamState::HaveKey => {
                if is_whitespace(byte) {
                    return Ok(());
                }
                if byte != b':' {
                    return Err(FormatError::ExpectedColon {
                        found: describe_byte(byte),
                        offset: self.offset,
                    }
                    .into());
                }
                self.state = StreamState::ExpectValue;
            }
            StreamState::ExpectValue => {
                if is_whitespace(byte) {
                    return Ok(());
                }
                self.scanner.begin(byte, self.offset)?;
                self.state = StreamState::InValue;
            }
            StreamState::InValue => match self.scanner.push(byte)? {
                Scan::Continue => {}
                Scan::Complete { consumed } => {
                    self.complete_entry()?;
                    self.state = StreamState::AfterValue;
                    if !consumed {
                        return self.push(byte);
                    }
                }
            },
            StreamState::AfterValue => {
                if is_whitespace(byte) {
                    return Ok(());
                }
                match byte {
                    b',' => self.state = StreamState::ExpectKey,
                    b'}' => self.close()?,
                    other => {
                        return Err(FormatError::ExpectedCommaOrEnd {
                            found: describe_byte(other),
                            offset: self.offset,
                        }
                        .into())
                    }
                }
            }
            StreamState::Done => {
                if !is_whitespace(byte) {
                    return Err(FormatError::TrailingData {
                        found: describe_byte(byte),
                        offset: self.offset,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    /// A UTF-8 byte order mark is tolerated only as the first bytes of input
    fn in_leading_bom(&mut self, byte: u8) -> bool {
        let matched = self.bom_matched;
        if matched == self.offset && matched < UTF8_BOM.len() && UTF8_BOM[matched] == byte {
            self.bom_matched += 1;
            return true;
        }
        false
    }

    fn begin_key(&mut self) {
        self.key_buffer.clear();
        self.key_buffer.push(b'"');
        self.key_escaped = false;
        self.key_start = self.offset;
        self.state = StreamState::InKey;
    }

    fn close(&mut self) -> io::Result<()> {
        self.writer.write_all(b"}")?;
        self.state = StreamState::Done;
        Ok(())
    }

    fn complete_entry(&mut self) -> Result<(), StreamError> {
        let value = self.scanner.decode()?;
        let key = self.pending_key.take().unwrap_or_default();
        let (key, value) = self.transform.transform_entry(key, value);
        self.write_entry(&key, &value)?;
        self.entries += 1;
        Ok(())
    }

    fn write_entry(&mut self, key: &str, value: &Value) -> io::Result<()> {
        if self.entries > 0 {
            self.writer.write_all(b",")?;
        }
        serde_json::to_writer(&mut self.writer, key)?;
        self.writer.write_all(b":")?;
        serde_json::to_writer(&mut self.writer, value)?;
        Ok(())
    }
}
