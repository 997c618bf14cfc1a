//! Rule application and batch transformation
//!
//! [`MappingEngine::apply_rules`] walks the rules in order, reading each
//! source value from the input and writing the transformed value into a fresh
//! output document. A rule whose source is absent, or whose transform fails,
//! contributes nothing; neither aborts the remaining rules.
//!
//! [`MappingEngine::transform`] adds batch detection on top: when the input
//! carries an array under the configured collection key, every object element
//! is mapped on its own and the results are collected under the output key.
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the Apache-2.0 license

use crate::config::EngineConfig;
use crate::expression::{EvalContext, Evaluator, ExprEvaluator};
use crate::path::{get_nested, set_nested};
use crate::rule::MappingRule;
use crate::transformer::TransformationError;
use crate::types::Document;
use serde_json::Value;

/// What happened when a single rule was applied
#[derive(Debug, Clone)]
pub enum RuleOutcome {
    /// The destination was written
    Applied,
    /// The source path did not resolve; nothing was written
    SourceAbsent,
    /// The transform failed; nothing was written
    Failed(TransformationError),
}

impl RuleOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RuleOutcome::Applied)
    }
}

/// Applies rule sets to documents
#[derive(Debug, Clone, Default)]
pub struct MappingEngine<E: Evaluator = ExprEvaluator> {
    config: EngineConfig,
    evaluator: E,
}

impl MappingEngine<ExprEvaluator> {
    /// Create an engine with the default configuration and expression language
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with a custom configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            evaluator: ExprEvaluator,
        }
    }
}

impl<E: Evaluator> MappingEngine<E> {
    /// Replace the expression evaluator
    pub fn with_evaluator<F: Evaluator>(self, evaluator: F) -> MappingEngine<F> {
        MappingEngine {
            config: self.config,
            evaluator,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Apply every rule to `input`, returning a new document
    pub fn apply_rules(&self, input: &Document, rules: &[MappingRule]) -> Document {
        let mut output = Document::new();
        for rule in rules {
            match self.apply_rule(input, rule, &mut output) {
                RuleOutcome::Applied => {}
                RuleOutcome::SourceAbsent => {
                    log::debug!("Skipping rule {}: source not present", rule.label());
                }
                RuleOutcome::Failed(e) => {
                    log::warn!("Skipping rule {}: {}", rule.label(), e);
                }
            }
        }
        output
    }

    /// Apply a single rule, writing into `output` only on success
    pub fn apply_rule(&self, input: &Document, rule: &MappingRule, output: &mut Document) -> RuleOutcome {
        let Some(value) = get_nested(input, &rule.source_path) else {
            return RuleOutcome::SourceAbsent;
        };

        match self.compute(input, rule, value) {
            Ok(transformed) => {
                set_nested(output, &rule.destination_path, transformed);
                RuleOutcome::Applied
            }
            Err(e) => RuleOutcome::Failed(e),
        }
    }

    /// Transform a single record or, when the batch shape is detected, every record
    pub fn transform(&self, input: &Document, rules: &[MappingRule]) -> Document {
        match self.batch_records(input) {
            Some(records) => {
                let mapped: Vec<Value> = records
                    .iter()
                    .filter_map(|record| match record {
                        Value::Object(record) => Some(Value::Object(self.apply_rules(record, rules))),
                        _ => {
                            log::debug!(
                                "Skipping non-object element in '{}'",
                                self.config.batch.collection_key
                            );
                            None
                        }
                    })
                    .collect();

                log::debug!(
                    "Transformed {} of {} records",
                    mapped.len(),
                    records.len()
                );

                let mut output = Document::new();
                output.insert(self.config.batch.output_key.clone(), Value::Array(mapped));
                output
            }
            None => self.apply_rules(input, rules),
        }
    }

    /// The records of a batch request, if `input` has the batch shape
    pub fn batch_records<'a>(&self, input: &'a Document) -> Option<&'a Vec<Value>> {
        if !self.config.batch.enabled {
            return None;
        }
        input.get(&self.config.batch.collection_key)?.as_array()
    }

    fn compute(&self, input: &Document, rule: &MappingRule, value: &Value) -> Result<Value, TransformationError> {
        match rule.expression() {
            Some(expression) => self
                .evaluator
                .evaluate(expression, &EvalContext::for_rule(value, input))
                .map_err(|source| TransformationError::Expression {
                    rule: rule.label(),
                    expression: expression.to_string(),
                    source,
                }),
            None => Ok(rule.transform_kind().apply(value)),
        }
    }
}

/// Apply `rules` to `input` with the default engine
pub fn apply_rules(input: &Document, rules: &[MappingRule]) -> Document {
    MappingEngine::new().apply_rules(input, rules)
}

/// Transform `input` with the default engine, detecting the batch shape
pub fn transform(input: &Document, rules: &[MappingRule]) -> Document {
    MappingEngine::new().transform(input, rules)
}

/// Fill in defaults for required rules whose source is absent
///
/// Returns a copy of `input` where each `required` rule that carries a
/// `default_value` and whose source path does not resolve has the default
/// written at its source path. String defaults that read as a JSON number,
/// boolean or null are stored as that value, so `"30"` becomes `30`.
pub fn prepopulate_defaults(input: &Document, rules: &[MappingRule]) -> Document {
    let mut prepared = input.clone();
    for rule in rules.iter().filter(|rule| rule.required) {
        let Some(default) = &rule.default_value else {
            continue;
        };
        if get_nested(&prepared, &rule.source_path).is_some() {
            continue;
        }
        log::debug!("Using default value for required rule {}", rule.label());
        set_nested(&mut prepared, &rule.source_path, coerce_default(default));
    }
    prepared
}

fn coerce_default(default: &Value) -> Value {
    if let Value::String(text) = default {
        if let Ok(parsed) = serde_json::from_str::<Value>(text.trim()) {
            if !parsed.is_object() && !parsed.is_array() && !parsed.is_string() {
                return parsed;
            }
        }
    }
    default.clone()
}
