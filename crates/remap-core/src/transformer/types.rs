//! Core types for the transform catalog
//!
//! This module defines the closed set of named catalog transforms and the
//! error raised when a rule's value cannot be computed.
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the Apache-2.0 license

use super::built_in;
use crate::expression::ExpressionError;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while transforming a single field
///
/// Catalog transforms are total, so only expressions fail.
#[derive(Error, Debug, Clone)]
pub enum TransformationError {
    /// A rule expression could not be evaluated
    #[error("Expression '{expression}' failed for rule {rule}: {source}")]
    Expression {
        rule: String,
        expression: String,
        #[source]
        source: ExpressionError,
    },
}

/// A named, pure value-to-value conversion
///
/// Unknown names resolve to [`TransformKind::Copy`] so a misspelt transform
/// degrades to identity instead of failing the rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    /// Identity
    Copy,
    /// Render as a string
    ToString,
    /// Uppercase strings
    ToUpperCase,
    /// Lowercase strings
    ToLowerCase,
    /// Uppercase the first character, lowercase the rest
    Capitalize,
    /// `male`/`female`/other to `M`/`F`/`O`
    MapGender,
    /// Coerce to a boolean
    ToBool,
    /// Reformat recognised dates as `YYYY-MM-DD`
    FormatDate,
}

impl TransformKind {
    /// Every catalog entry, in display order
    pub const ALL: [TransformKind; 8] = [
        TransformKind::Copy,
        TransformKind::ToString,
        TransformKind::ToUpperCase,
        TransformKind::ToLowerCase,
        TransformKind::Capitalize,
        TransformKind::MapGender,
        TransformKind::ToBool,
        TransformKind::FormatDate,
    ];

    /// Resolve a transform name; unknown and empty names are identity
    pub fn from_name(name: &str) -> Self {
        match name {
            "copy" | "" => TransformKind::Copy,
            "toString" => TransformKind::ToString,
            "toUpperCase" => TransformKind::ToUpperCase,
            "toLowerCase" => TransformKind::ToLowerCase,
            "capitalize" => TransformKind::Capitalize,
            "mapGender" => TransformKind::MapGender,
            "toBool" => TransformKind::ToBool,
            "formatDate" => TransformKind::FormatDate,
            other => {
                log::debug!("Unknown transform '{}', falling back to copy", other);
                TransformKind::Copy
            }
        }
    }

    /// Whether `name` names a catalog entry (the empty name counts as copy)
    pub fn is_known(name: &str) -> bool {
        name.is_empty() || Self::ALL.iter().any(|kind| kind.name() == name)
    }

    /// Canonical name of the transform
    pub fn name(&self) -> &'static str {
        match self {
            TransformKind::Copy => "copy",
            TransformKind::ToString => "toString",
            TransformKind::ToUpperCase => "toUpperCase",
            TransformKind::ToLowerCase => "toLowerCase",
            TransformKind::Capitalize => "capitalize",
            TransformKind::MapGender => "mapGender",
            TransformKind::ToBool => "toBool",
            TransformKind::FormatDate => "formatDate",
        }
    }

    /// One-line description for listings
    pub fn description(&self) -> &'static str {
        match self {
            TransformKind::Copy => "returns the value unchanged",
            TransformKind::ToString => "renders the value as a string",
            TransformKind::ToUpperCase => "uppercases strings",
            TransformKind::ToLowerCase => "lowercases strings",
            TransformKind::Capitalize => "uppercases the first character and lowercases the rest",
            TransformKind::MapGender => "maps male/female/other to M/F/O",
            TransformKind::ToBool => "yes/true to true, anything else to false",
            TransformKind::FormatDate => "reformats recognised dates as YYYY-MM-DD",
        }
    }

    /// Apply the transform to a value
    ///
    /// Values of a type the transform does not handle come back unchanged.
    pub fn apply(&self, value: &Value) -> Value {
        match self {
            TransformKind::Copy => value.clone(),
            TransformKind::ToString => built_in::to_string(value),
            TransformKind::ToUpperCase => built_in::to_upper_case(value),
            TransformKind::ToLowerCase => built_in::to_lower_case(value),
            TransformKind::Capitalize => built_in::capitalize(value),
            TransformKind::MapGender => built_in::map_gender(value),
            TransformKind::ToBool => built_in::to_bool(value),
            TransformKind::FormatDate => built_in::format_date(value),
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Apply the catalog transform called `name` to `value`
pub fn apply_transform(value: &Value, name: &str) -> Value {
    TransformKind::from_name(name).apply(value)
}
