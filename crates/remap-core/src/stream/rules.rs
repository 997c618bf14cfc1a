//! Rule-driven entry transform for streamed objects
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the Apache-2.0 license

use super::EntryTransform;
use crate::path::nest_value;
use crate::rule::MappingRule;
use serde_json::Value;
use std::collections::HashMap;

/// Rewrites streamed entries using the rules whose source is a single key
///
/// For each key the first rule whose source path is exactly that key wins.
/// Its catalog transform is applied and the result is written under the
/// rule's destination, nested when the destination has several keys. Keys
/// without a rule pass through unchanged, and so do values of a type the
/// transform does not handle.
///
/// Expressions (`transform_logic`) are not evaluated here; a streamed entry
/// has no surrounding document to bind to `input`.
#[derive(Debug, Clone)]
pub struct RuleDrivenTransform<'r> {
    by_key: HashMap<&'r str, &'r MappingRule>,
}

impl<'r> RuleDrivenTransform<'r> {
    /// Index the single-segment rules of `rules` by source key
    pub fn new(rules: &'r [MappingRule]) -> Self {
        let mut by_key = HashMap::new();
        for rule in rules.iter().filter(|rule| rule.is_single_segment()) {
            by_key.entry(rule.source_path[0].as_str()).or_insert(rule);
        }
        Self { by_key }
    }

    /// The rule that applies to `key`, if any
    pub fn rule_for(&self, key: &str) -> Option<&'r MappingRule> {
        self.by_key.get(key).copied()
    }
}

impl EntryTransform for RuleDrivenTransform<'_> {
    fn transform_entry(&mut self, key: String, value: Value) -> (String, Value) {
        let Some(rule) = self.rule_for(&key) else {
            return (key, value);
        };
        if rule.destination_path.is_empty() {
            return (key, value);
        }

        let transformed = rule.transform_kind().apply(&value);
        nest_value(&rule.destination_path, transformed).unwrap_or((key, Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = vec![
            MappingRule::new(["a"], ["first"]).with_transform("toString"),
            MappingRule::new(["a"], ["second"]),
        ];
        let mut transform = RuleDrivenTransform::new(&rules);
        assert_eq!(
            transform.transform_entry("a".into(), json!(1)),
            ("first".to_string(), json!("1"))
        );
    }

    #[test]
    fn test_nested_rules_are_ignored() {
        let rules = vec![MappingRule::new(["a", "b"], ["x"])];
        let mut transform = RuleDrivenTransform::new(&rules);
        assert!(transform.rule_for("a").is_none());
        assert_eq!(
            transform.transform_entry("a".into(), json!({"b": 1})),
            ("a".to_string(), json!({"b": 1}))
        );
    }

    #[test]
    fn test_nested_destination() {
        let rules = vec![MappingRule::new(["gender"], ["person", "sex"]).with_transform("mapGender")];
        let mut transform = RuleDrivenTransform::new(&rules);
        assert_eq!(
            transform.transform_entry("gender".into(), json!("male")),
            ("person".to_string(), json!({"sex": "M"}))
        );
    }

    #[test]
    fn test_logic_is_not_evaluated() {
        let rules = vec![MappingRule::new(["n"], ["m"]).with_logic("value * 2")];
        let mut transform = RuleDrivenTransform::new(&rules);
        assert_eq!(
            transform.transform_entry("n".into(), json!(2)),
            ("m".to_string(), json!(2))
        );
    }

    #[test]
    fn test_unhandled_value_type_is_renamed_unchanged() {
        let rules = vec![MappingRule::new(["flag"], ["upper"]).with_transform("toUpperCase")];
        let mut transform = RuleDrivenTransform::new(&rules);
        assert_eq!(
            transform.transform_entry("flag".into(), json!([1, "a"])),
            ("upper".to_string(), json!([1, "a"]))
        );
    }
}
