//! Property-based tests for the streaming transformer
//!
//! Identity streaming must reproduce the object, and the output must not
//! depend on how the input is split into chunks. Arbitrary input must end in
//! a result, never a panic.

use super::{stream_transform, StreamTransformer};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-zA-Z0-9 ,:{}\\[\\]\"\\\\-]{0,20}".prop_map(Value::String),
    ];

    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            proptest::collection::vec(("[a-z]{1,6}", inner), 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

fn object_strategy() -> impl Strategy<Value = Map<String, Value>> {
    proptest::collection::vec(("[a-zA-Z_\"\\\\ ]{1,8}", json_value_strategy()), 0..6)
        .prop_map(|entries| entries.into_iter().collect())
}

fn identity(key: String, value: Value) -> (String, Value) {
    (key, value)
}

proptest! {
    /// Property: streaming with the identity callback reproduces the object
    #[test]
    fn prop_identity_round_trip(object in object_strategy(), pretty in any::<bool>()) {
        let input = if pretty {
            serde_json::to_vec_pretty(&object).unwrap()
        } else {
            serde_json::to_vec(&object).unwrap()
        };
        let output = stream_transform(&input[..], Vec::new(), identity).unwrap();
        let parsed: Map<String, Value> = serde_json::from_slice(&output).unwrap();
        prop_assert_eq!(parsed, object);
    }

    /// Property: chunk boundaries never change the output
    #[test]
    fn prop_chunking_is_invisible(object in object_strategy(), chunk in 1usize..16) {
        let input = serde_json::to_vec_pretty(&object).unwrap();
        let whole = stream_transform(&input[..], Vec::new(), identity).unwrap();

        let mut transformer = StreamTransformer::new(Vec::new(), identity);
        for piece in input.chunks(chunk) {
            transformer.feed(piece).unwrap();
        }
        prop_assert_eq!(transformer.finish().unwrap(), whole);
    }

    /// Property: a truncated object is always rejected
    #[test]
    fn prop_truncation_is_rejected(object in object_strategy(), cut in any::<prop::sample::Index>()) {
        let input = serde_json::to_vec(&object).unwrap();
        let end = cut.index(input.len());
        prop_assert!(stream_transform(&input[..end], Vec::new(), identity).is_err());
    }

    /// Property: arbitrary bytes are rejected or accepted, never a panic
    #[test]
    fn prop_arbitrary_bytes_terminate(input in proptest::collection::vec(any::<u8>(), 0..256)) {
        let _ = stream_transform(&input[..], Vec::new(), identity);
    }

    /// Property: near-JSON text either fails cleanly or yields a valid object
    #[test]
    fn prop_json_like_text_terminates(input in r#"[{}\[\]":, 0-9a-z\\\-.]{0,64}"#) {
        if let Ok(output) = stream_transform(input.as_bytes(), Vec::new(), identity) {
            let parsed: Result<Map<String, Value>, _> = serde_json::from_slice(&output);
            prop_assert!(parsed.is_ok(), "accepted {:?} but wrote {:?}", input, output);
        }
    }
}
