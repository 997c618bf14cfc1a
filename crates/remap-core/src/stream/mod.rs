//! Streaming transformation of one large JSON object
//!
//! The input must be a single JSON object. Its top-level entries are read one
//! at a time, rewritten by an [`EntryTransform`] and written straight to the
//! output, so memory use is bounded by the largest single value rather than by
//! the document.
//!
//! Two entry transforms are provided:
//!
//! - any `FnMut(String, Value) -> (String, Value)` closure
//! - [`RuleDrivenTransform`], which applies single-key mapping rules
//!
//! # Examples
//!
//! ```
//! use remap_core::rule::MappingRule;
//! use remap_core::stream::stream_transform_with_rules;
//!
//! let rules = vec![MappingRule::new(["a"], ["x"]).with_transform("toString")];
//! let output = stream_transform_with_rules(&br#"{"a":1,"b":2}"#[..], Vec::new(), &rules).unwrap();
//! assert_eq!(String::from_utf8(output).unwrap(), r#"{"x":"1","b":2}"#);
//! ```
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod rules;
pub mod scanner;
pub mod state;
pub mod transformer;


#[cfg(test)]
mod prop_tests;

pub use error::{FormatError, StreamError};
pub use rules::RuleDrivenTransform;
pub use state::StreamState;
pub use transformer::StreamTransformer;

use crate::config::StreamConfig;
use crate::rule::MappingRule;
use serde_json::Value;
use std::io::{ErrorKind, Read, Write};

/// Rewrites one top-level entry of a streamed object
pub trait EntryTransform {
    /// Map a key and its decoded value to the key and value to write
    fn transform_entry(&mut self, key: String, value: Value) -> (String, Value);
}

impl<F> EntryTransform for F
where
    F: FnMut(String, Value) -> (String, Value),
{
    fn transform_entry(&mut self, key: String, value: Value) -> (String, Value) {
        self(key, value)
    }
}

/// Stream `reader` into `writer`, rewriting each entry with `transform`
pub fn stream_transform<R, W, T>(reader: R, writer: W, transform: T) -> Result<W, StreamError>
where
    R: Read,
    W: Write,
    T: EntryTransform,
{
    stream_transform_with_config(reader, writer, transform, &StreamConfig::default())
}

/// Like [`stream_transform`], with explicit chunk size and value limit
pub fn stream_transform_with_config<R, W, T>(
    mut reader: R,
    writer: W,
    transform: T,
    config: &StreamConfig,
) -> Result<W, StreamError>
where
    R: Read,
    W: Write,
    T: EntryTransform,
{
    let mut transformer = StreamTransformer::with_config(writer, transform, config);
    let mut chunk = vec![0u8; config.chunk_size.max(1)];
    loop {
        let read = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        transformer.feed(&chunk[..read])?;
    }
    transformer.finish()
}

/// Stream `reader` into `writer`, applying the single-key rules in `rules`
pub fn stream_transform_with_rules<R, W>(reader: R, writer: W, rules: &[MappingRule]) -> Result<W, StreamError>
where
    R: Read,
    W: Write,
{
    stream_transform(reader, writer, RuleDrivenTransform::new(rules))
}
