//! Built-in catalog transforms
//!
//! Each function is pure and total: values of a type a transform does not
//! handle pass through unchanged (except `to_bool`, which coerces them to
//! `false`).
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the Apache-2.0 license

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

/// Date layouts tried in order by [`format_date`], as chrono format strings
pub const DATE_LAYOUTS: &[&str] = &[
    "%d-%B-%Y", // 15-March-2023
    "%d-%b-%Y", // 15-Mar-2023
    "%d/%B/%Y", // 15/March/2023
    "%d-%B-%y", // 15-March-23
    "%Y-%m-%d", // 2023-03-15
];

/// Output layout of [`format_date`]
pub const OUTPUT_DATE_LAYOUT: &str = "%Y-%m-%d";

/// Render a value as its default string representation
///
/// Strings are kept verbatim; every other value becomes its compact JSON text.
pub fn to_string(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.clone()),
        other => Value::String(other.to_string()),
    }
}

/// Uppercase a string
pub fn to_upper_case(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.to_uppercase()),
        other => other.clone(),
    }
}

/// Lowercase a string
pub fn to_lower_case(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.to_lowercase()),
        other => other.clone(),
    }
}

/// Uppercase the first character of a string and lowercase the rest
pub fn capitalize(value: &Value) -> Value {
    match value {
        Value::String(s) => {
            let mut chars = s.chars();
            match chars.next() {
                Some(first) => {
                    let mut out: String = first.to_uppercase().collect();
                    out.push_str(&chars.as_str().to_lowercase());
                    Value::String(out)
                }
                None => Value::String(String::new()),
            }
        }
        other => other.clone(),
    }
}

/// Map a gender label to a single-letter code
pub fn map_gender(value: &Value) -> Value {
    match value {
        Value::String(s) => {
            let code = if s.eq_ignore_ascii_case("male") {
                "M"
            } else if s.eq_ignore_ascii_case("female") {
                "F"
            } else {
                "O"
            };
            Value::String(code.to_string())
        }
        other => other.clone(),
    }
}

/// Coerce a value to a boolean
pub fn to_bool(value: &Value) -> Value {
    match value {
        Value::String(s) => {
            Value::Bool(s.eq_ignore_ascii_case("yes") || s.eq_ignore_ascii_case("true"))
        }
        Value::Bool(b) => Value::Bool(*b),
        _ => Value::Bool(false),
    }
}

/// Reformat a date string as `YYYY-MM-DD`
///
/// Tries [`DATE_LAYOUTS`] in order, then RFC 3339. A string no layout accepts
/// is returned unchanged.
pub fn format_date(value: &Value) -> Value {
    match value {
        Value::String(s) => match parse_date(s) {
            Some(date) => Value::String(date.format(OUTPUT_DATE_LAYOUT).to_string()),
            None => Value::String(s.clone()),
        },
        other => other.clone(),
    }
}

/// Parse a date using the first layout that accepts the whole input
///
/// Day and month numbers are two digits, years under `%Y` four, and month
/// names are matched without regard to case.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    DATE_LAYOUTS
        .iter()
        .find_map(|layout| {
            NaiveDate::parse_from_str(input, layout)
                .ok()
                // chrono reads "5", "Mar" and "23" where the layout spells
                // "05", "March" and "2023"; only the exact field widths count
                .filter(|date| date.format(layout).to_string().eq_ignore_ascii_case(input))
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|dt| dt.date_naive())
        })
}
