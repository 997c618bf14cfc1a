//! Tests for the transform catalog
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the Apache-2.0 license

use super::{apply_transform, built_in, TransformKind};
use serde_json::{json, Value};

fn apply(value: Value, name: &str) -> Value {
    apply_transform(&value, name)
}

#[test]
fn test_catalog_table() {
    let cases = vec![
        (json!("hello"), "toUpperCase", json!("HELLO")),
        (json!("WORLD"), "toLowerCase", json!("world")),
        (json!("john"), "capitalize", json!("John")),
        (json!("Male"), "mapGender", json!("M")),
        (json!("Female"), "mapGender", json!("F")),
        (json!("yes"), "toBool", json!(true)),
        (json!("no"), "toBool", json!(false)),
    ];

    for (value, name, expected) in cases {
        assert_eq!(apply(value.clone(), name), expected, "{} applied to {}", name, value);
    }
}

#[test]
fn test_copy_and_unknown_are_identity() {
    let value = json!({"nested": [1, "two", null]});
    assert_eq!(apply(value.clone(), "copy"), value);
    assert_eq!(apply(value.clone(), ""), value);
    assert_eq!(apply(value.clone(), "reverseEverything"), value);
    assert_eq!(apply(value.clone(), "COPY"), value);
}

#[test]
fn test_from_name_round_trips_canonical_names() {
    for kind in TransformKind::ALL {
        assert_eq!(TransformKind::from_name(kind.name()), kind);
        assert!(TransformKind::is_known(kind.name()));
    }
    assert!(TransformKind::is_known(""));
    assert!(!TransformKind::is_known("toupper"));
    assert_eq!(TransformKind::ToBool.to_string(), "toBool");
}

#[test]
fn test_to_string() {
    assert_eq!(apply(json!(1), "toString"), json!("1"));
    assert_eq!(apply(json!(2.5), "toString"), json!("2.5"));
    assert_eq!(apply(json!(-7), "toString"), json!("-7"));
    assert_eq!(apply(json!(true), "toString"), json!("true"));
    assert_eq!(apply(json!(null), "toString"), json!("null"));
    assert_eq!(apply(json!("plain"), "toString"), json!("plain"));
    assert_eq!(apply(json!({"a": [1, 2]}), "toString"), json!("{\"a\":[1,2]}"));
}

#[test]
fn test_case_transforms_pass_non_strings_through() {
    assert_eq!(apply(json!(42), "toUpperCase"), json!(42));
    assert_eq!(apply(json!(false), "toLowerCase"), json!(false));
    assert_eq!(apply(json!(["a"]), "capitalize"), json!(["a"]));
}

#[test]
fn test_capitalize() {
    assert_eq!(apply(json!("mIXED case"), "capitalize"), json!("Mixed case"));
    assert_eq!(apply(json!(""), "capitalize"), json!(""));
    assert_eq!(apply(json!("é"), "capitalize"), json!("É"));
}

#[test]
fn test_map_gender() {
    assert_eq!(apply(json!("Male"), "mapGender"), json!("M"));
    assert_eq!(apply(json!("FEMALE"), "mapGender"), json!("F"));
    assert_eq!(apply(json!("other"), "mapGender"), json!("O"));
    assert_eq!(apply(json!(""), "mapGender"), json!("O"));
    assert_eq!(apply(json!(123), "mapGender"), json!(123));
}

#[test]
fn test_to_bool() {
    assert_eq!(apply(json!("yes"), "toBool"), json!(true));
    assert_eq!(apply(json!("TRUE"), "toBool"), json!(true));
    assert_eq!(apply(json!("No"), "toBool"), json!(false));
    assert_eq!(apply(json!(true), "toBool"), json!(true));
    assert_eq!(apply(json!(false), "toBool"), json!(false));
    assert_eq!(apply(json!(42), "toBool"), json!(false));
    assert_eq!(apply(json!(null), "toBool"), json!(false));
}

#[test]
fn test_format_date_layouts() {
    assert_eq!(apply(json!("15-March-2023"), "formatDate"), json!("2023-03-15"));
    assert_eq!(apply(json!("15-Mar-2023"), "formatDate"), json!("2023-03-15"));
    assert_eq!(apply(json!("15/March/2023"), "formatDate"), json!("2023-03-15"));
    assert_eq!(apply(json!("15-March-23"), "formatDate"), json!("2023-03-15"));
    assert_eq!(apply(json!("2023-03-15"), "formatDate"), json!("2023-03-15"));
    assert_eq!(
        apply(json!("2023-03-15T23:30:00+05:00"), "formatDate"),
        json!("2023-03-15")
    );
}

#[test]
fn test_format_date_passthrough() {
    assert_eq!(apply(json!("not a date"), "formatDate"), json!("not a date"));
    assert_eq!(apply(json!("31-February-2023"), "formatDate"), json!("31-February-2023"));
    assert_eq!(apply(json!(20230315), "formatDate"), json!(20230315));
}

#[test]
fn test_format_date_requires_exact_field_widths() {
    for input in ["15-Mar-23", "5-March-2023", "15/Mar/2023", "2023-3-15"] {
        assert_eq!(apply(json!(input), "formatDate"), json!(input), "{input}");
    }
    assert_eq!(apply(json!("05-march-2023"), "formatDate"), json!("2023-03-05"));
    assert_eq!(apply(json!("05-MAR-2023"), "formatDate"), json!("2023-03-05"));
}

#[test]
fn test_parse_date_prefers_first_layout() {
    let date = built_in::parse_date("01-January-2024").unwrap();
    assert_eq!(date.to_string(), "2024-01-01");
    assert!(built_in::parse_date("2024/01/01").is_none());
}
