//! Mapping rules and the fluent builder used to construct them
//!
//! A rule translates one source field into one destination field, optionally
//! through a catalog transform or an expression. Rules are read-only while a
//! transformation runs; the same slice may be shared by concurrent calls.
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::transformer::TransformKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single field-level transformation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRule {
    /// Identifier assigned by the rule store, used in logs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Keys locating the source value, outermost first
    #[serde(alias = "sourcePath")]
    pub source_path: Vec<String>,
    /// Keys locating where the computed value is written
    #[serde(alias = "destinationPath")]
    pub destination_path: Vec<String>,
    /// Catalog transform name; empty or unknown means copy
    #[serde(default, alias = "transformType")]
    pub transform_type: String,
    /// Expression computing the value; takes precedence when non-empty
    #[serde(default, alias = "transformLogic", skip_serializing_if = "Option::is_none")]
    pub transform_logic: Option<String>,
    /// Marks the source as required for callers that pre-populate defaults
    #[serde(default)]
    pub required: bool,
    /// Default used by [`prepopulate_defaults`](crate::mapper::prepopulate_defaults)
    #[serde(default, alias = "defaultValue", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl MappingRule {
    /// Create a copy rule between two paths
    pub fn new<S, D>(source_path: S, destination_path: D) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            id: None,
            source_path: source_path.into_iter().map(Into::into).collect(),
            destination_path: destination_path.into_iter().map(Into::into).collect(),
            transform_type: String::new(),
            transform_logic: None,
            required: false,
            default_value: None,
        }
    }

    /// Set the catalog transform name
    pub fn with_transform(mut self, name: impl Into<String>) -> Self {
        self.transform_type = name.into();
        self
    }

    /// Set the expression used to compute the value
    pub fn with_logic(mut self, expression: impl Into<String>) -> Self {
        self.transform_logic = Some(expression.into());
        self
    }

    /// Resolve the catalog entry named by `transform_type`
    pub fn transform_kind(&self) -> TransformKind {
        TransformKind::from_name(&self.transform_type)
    }

    /// The expression to evaluate, if one is set and non-blank
    pub fn expression(&self) -> Option<&str> {
        self.transform_logic
            .as_deref()
            .map(str::trim)
            .filter(|logic| !logic.is_empty())
    }

    /// Whether the source path addresses a top-level key
    pub fn is_single_segment(&self) -> bool {
        self.source_path.len() == 1
    }

    /// Short description for log lines
    pub fn label(&self) -> String {
        let prefix = self.id.map(|id| format!("#{} ", id)).unwrap_or_default();
        format!(
            "{}{} -> {}",
            prefix,
            self.source_path.join("."),
            self.destination_path.join(".")
        )
    }

    /// Check that the rule can be applied
    ///
    /// Only what application needs is checked: both paths are non-empty and
    /// contain no empty keys.
    pub fn validate(&self) -> Result<()> {
        if self.source_path.is_empty() {
            return Err(Error::invalid_rule("source path is empty", self.id));
        }
        if self.destination_path.is_empty() {
            return Err(Error::invalid_rule("destination path is empty", self.id));
        }
        if self.source_path.iter().any(String::is_empty) {
            return Err(Error::invalid_rule(
                format!("source path '{}' contains an empty key", self.source_path.join(".")),
                self.id,
            ));
        }
        if self.destination_path.iter().any(String::is_empty) {
            return Err(Error::invalid_rule(
                format!(
                    "destination path '{}' contains an empty key",
                    self.destination_path.join(".")
                ),
                self.id,
            ));
        }
        Ok(())
    }
}

/// Validate every rule in a set, stopping at the first invalid one
pub fn validate_rules(rules: &[MappingRule]) -> Result<()> {
    rules.iter().try_for_each(MappingRule::validate)
}

/// Split a dotted path such as `customer.firstName` into keys
///
/// Surrounding whitespace of each key is trimmed; empty keys are kept so that
/// validation can report them.
pub fn parse_path(path: &str) -> Vec<String> {
    let path = path.trim();
    if path.is_empty() {
        return Vec::new();
    }
    path.split('.').map(|key| key.trim().to_string()).collect()
}

/// Builder for creating mapping rules
pub struct MappingRuleBuilder {
    id: Option<u64>,
    source_path: Vec<String>,
    destination_path: Option<Vec<String>>,
    transform_type: String,
    transform_logic: Option<String>,
    required: bool,
    default_value: Option<Value>,
}

impl MappingRuleBuilder {
    /// Create a new rule builder from a dotted source path
    pub fn new(source_path: &str) -> Self {
        Self::from_keys(parse_path(source_path))
    }

    /// Create a new rule builder from source keys
    pub fn from_keys<I>(keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            id: None,
            source_path: keys.into_iter().map(Into::into).collect(),
            destination_path: None,
            transform_type: String::new(),
            transform_logic: None,
            required: false,
            default_value: None,
        }
    }

    /// Set the rule identifier
    pub fn id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the dotted destination path
    pub fn destination(mut self, path: &str) -> Self {
        self.destination_path = Some(parse_path(path));
        self
    }

    /// Set the destination keys
    pub fn destination_keys<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.destination_path = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Set the catalog transform
    pub fn transform(mut self, name: impl Into<String>) -> Self {
        self.transform_type = name.into();
        self
    }

    /// Set the expression
    pub fn logic(mut self, expression: impl Into<String>) -> Self {
        self.transform_logic = Some(expression.into());
        self
    }

    /// Mark the source as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the default used when pre-populating absent sources
    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Build the mapping rule
    ///
    /// The destination defaults to the source path when none was given.
    pub fn build(self) -> Result<MappingRule> {
        let destination_path = self
            .destination_path
            .unwrap_or_else(|| self.source_path.clone());

        let rule = MappingRule {
            id: self.id,
            source_path: self.source_path,
            destination_path,
            transform_type: self.transform_type,
            transform_logic: self.transform_logic,
            required: self.required,
            default_value: self.default_value,
        };
        rule.validate()?;
        Ok(rule)
    }
}
