//! Nested key access for documents
//!
//! Lookups are best effort: a missing key or a non-object intermediate yields
//! `None` rather than an error. Writes force their way through, replacing any
//! non-object intermediate with a fresh object.
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the Apache-2.0 license

use crate::types::{Document, Path};
use serde_json::{Map, Value};

/// Get the value at `path`, if every intermediate node is an object
pub fn get_nested<'a>(document: &'a Document, path: &Path) -> Option<&'a Value> {
    let (last, parents) = path.split_last()?;

    let mut current = document;
    for key in parents {
        match current.get(key) {
            Some(Value::Object(next)) => current = next,
            _ => return None,
        }
    }
    current.get(last)
}

/// Write `value` at `path`, creating intermediate objects as needed
///
/// An empty path is a no-op.
pub fn set_nested(document: &mut Document, path: &Path, value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = document;
    for key in parents {
        let slot = current
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(next) = slot else {
            return;
        };
        current = next;
    }
    current.insert(last.clone(), value);
}

/// Split a destination path into its top-level key and the value to write there
///
/// `["user", "name"]` with `"Ann"` becomes `("user", {"name": "Ann"})`. Returns
/// `None` for an empty path.
pub fn nest_value(path: &Path, value: Value) -> Option<(String, Value)> {
    let (first, rest) = path.split_first()?;
    let nested = rest.iter().rev().fold(value, |inner, key| {
        let mut map = Map::new();
        map.insert(key.clone(), inner);
        Value::Object(map)
    });
    Some((first.clone(), nested))
}
