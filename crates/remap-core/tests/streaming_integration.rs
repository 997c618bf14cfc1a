//! Integration tests for the streaming transformer


use remap_core::{
    stream_transform, stream_transform_with_config, stream_transform_with_rules, FormatError, StreamConfig,
    StreamError, StreamTransformer, RuleDrivenTransform,
};
use serde_json::{json, Value};
use std::io::Read;
use test_support::*;

#[test]
fn test_flat_rule_example() {
    let rules = vec![rule("a", "x", "toString")];
    let output = stream_transform_with_rules(&br#"{"a":1,"b":2}"#[..], Vec::new(), &rules).unwrap();
    assert_eq!(String::from_utf8(output).unwrap(), r#"{"x":"1","b":2}"#);
}

#[test]
fn test_missing_close_brace_is_format_error() {
    let rules = vec![rule("a", "x", "toString")];
    let err = stream_transform_with_rules(&br#"{"a":1,"b":2"#[..], Vec::new(), &rules).unwrap_err();
    assert!(matches!(err, StreamError::Format(FormatError::UnexpectedEof { .. })));
}

#[test]
fn test_streamed_record_matches_batch_for_flat_rules() {
    let record = applicant("jane", "doe", "female");
    let rules = vec![
        rule("firstName", "first_name", "capitalize"),
        rule("gender", "gender", "mapGender"),
        rule("dob", "dob", "formatDate"),
    ];

    let input = serde_json::to_vec(&record).unwrap();
    let streamed = stream_transform_with_rules(&input[..], Vec::new(), &rules).unwrap();
    let streamed: Value = serde_json::from_slice(&streamed).unwrap();

    let batch = remap_core::apply_rules(&doc(record), &rules);
    for (key, value) in &batch {
        assert_eq!(&streamed[key], value);
    }
    // keys without a rule survive streaming but not batch mapping
    assert_eq!(streamed["income"], json!(60000));
}

/// Reader that hands out its data a few bytes at a time
struct Trickle<'a> {
    data: &'a [u8],
    step: usize,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.step.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

#[test]
fn test_large_object_in_small_reads() {
    let mut object = serde_json::Map::new();
    for i in 0..500 {
        object.insert(format!("field_{i}"), json!({"index": i, "tags": ["x", "y"], "note": "a,b}c"}));
    }
    let input = serde_json::to_vec(&object).unwrap();

    let config = StreamConfig {
        chunk_size: 7,
        max_value_bytes: Some(256),
    };
    let reader = Trickle { data: &input, step: 5 };
    let mut count = 0;
    let output = stream_transform_with_config(
        reader,
        Vec::new(),
        |key: String, value: Value| {
            count += 1;
            (key, value["index"].clone())
        },
        &config,
    )
    .unwrap();

    assert_eq!(count, 500);
    let parsed: serde_json::Map<String, Value> = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed["field_499"], json!(499));
    assert_eq!(parsed.keys().next().map(String::as_str), Some("field_0"));
}

#[test]
fn test_push_api_with_rule_driven_transform() {
    let rules = vec![rule("status", "meta.status", "toLowerCase")];
    let mut transformer = StreamTransformer::new(Vec::new(), RuleDrivenTransform::new(&rules));
    for chunk in [&b"{\"status\":"[..], &b"\"ACT"[..], &b"IVE\", \"id\": 4}"[..]] {
        transformer.feed(chunk).unwrap();
    }
    let output = transformer.finish().unwrap();
    assert_eq!(output, br#"{"meta":{"status":"active"},"id":4}"#);
}

#[test]
fn test_non_object_input_rejected() {
    let err = stream_transform(&b"[]"[..], Vec::new(), |k: String, v: Value| (k, v)).unwrap_err();
    assert!(matches!(
        err.as_format(),
        Some(FormatError::ExpectedObjectStart { offset: 0, .. })
    ));
}
