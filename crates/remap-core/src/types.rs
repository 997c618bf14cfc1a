//! Core data types shared across the engine
//!
//! Documents are plain `serde_json` objects. The workspace enables the
//! `preserve_order` feature so keys keep insertion order: batch output follows
//! rule order and streamed objects keep their encounter order.
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A tree of string keys to JSON values
pub type Document = Map<String, Value>;

/// Ordered sequence of keys addressing a location inside a [`Document`]
pub type Path = [String];

/// Request envelope used by services that wrap the engine
///
/// Rule stores keyed by client receive the document to reshape under
/// `input_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformRequest {
    /// The document to transform
    #[serde(alias = "inputData")]
    pub input_data: Document,
}

impl TransformRequest {
    /// Wrap a document in a request envelope
    pub fn new(input_data: Document) -> Self {
        Self { input_data }
    }

    /// Accept either an envelope or a bare document
    ///
    /// A value is treated as an envelope only when its sole key is
    /// `input_data` (or `inputData`) and that key holds an object.
    pub fn from_value(value: Value) -> Option<Document> {
        match value {
            Value::Object(mut map) => {
                if map.len() == 1 {
                    let key = ["input_data", "inputData"]
                        .into_iter()
                        .find(|k| matches!(map.get(*k), Some(Value::Object(_))));
                    if let Some(key) = key {
                        if let Some(Value::Object(inner)) = map.remove(key) {
                            return Some(inner);
                        }
                    }
                }
                Some(map)
            }
            _ => None,
        }
    }
}

/// Human readable name of a JSON value's type
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_is_unwrapped() {
        let doc = TransformRequest::from_value(json!({"input_data": {"a": 1}})).unwrap();
        assert_eq!(Value::Object(doc), json!({"a": 1}));

        let doc = TransformRequest::from_value(json!({"inputData": {"b": 2}})).unwrap();
        assert_eq!(Value::Object(doc), json!({"b": 2}));
    }

    #[test]
    fn test_bare_document_is_kept() {
        let doc = TransformRequest::from_value(json!({"input_data": {"a": 1}, "x": 2})).unwrap();
        assert_eq!(doc.len(), 2);

        let doc = TransformRequest::from_value(json!({"input_data": "scalar"})).unwrap();
        assert_eq!(Value::Object(doc), json!({"input_data": "scalar"}));

        assert!(TransformRequest::from_value(json!([1, 2])).is_none());
    }

    #[test]
    fn test_request_deserializes() {
        let req: TransformRequest =
            serde_json::from_value(json!({"input_data": {"customer": {"firstName": "John"}}})).unwrap();
        assert_eq!(req.input_data["customer"]["firstName"], "John");
    }

    #[test]
    fn test_value_type_names() {
        assert_eq!(value_type_name(&json!(null)), "null");
        assert_eq!(value_type_name(&json!(1.5)), "number");
        assert_eq!(value_type_name(&json!({})), "object");
    }
}
