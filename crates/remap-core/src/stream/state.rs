//! Parser states of the streaming transformer
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the Apache-2.0 license

use std::fmt;

/// Where the transformer is within the top-level object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Nothing but whitespace seen so far
    ExpectObjectOpen,
    /// Just after `{`: a key or an immediate `}`
    ExpectKeyOrClose,
    /// Just after `,`: a key must follow
    ExpectKey,
    /// Inside a key's string literal
    InKey,
    /// Key complete, waiting for `:`
    HaveKey,
    /// After `:`, waiting for the first byte of the value
    ExpectValue,
    /// Inside a value
    InValue,
    /// Value complete, waiting for `,` or `}`
    AfterValue,
    /// Closing `}` seen; only whitespace may follow
    Done,
}

impl StreamState {
    /// What the input must provide next, for end-of-input errors
    pub fn expected(&self) -> &'static str {
        match self {
            StreamState::ExpectObjectOpen => "'{'",
            StreamState::ExpectKeyOrClose => "a key or '}'",
            StreamState::ExpectKey => "a key",
            StreamState::InKey => "the end of the key",
            StreamState::HaveKey => "':'",
            StreamState::ExpectValue => "a value",
            StreamState::InValue => "the end of the value",
            StreamState::AfterValue => "',' or '}'",
            StreamState::Done => "end of input",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, StreamState::Done)
    }
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamState::ExpectObjectOpen => "expect-object-open",
            StreamState::ExpectKeyOrClose => "expect-key-or-close",
            StreamState::ExpectKey => "expect-key",
            StreamState::InKey => "in-key",
            StreamState::HaveKey => "have-key",
            StreamState::ExpectValue => "expect-value",
            StreamState::InValue => "in-value",
            StreamState::AfterValue => "after-value",
            StreamState::Done => "done",
        };
        f.write_str(name)
    }
}
