//! Transform command handler

use crate::cli::TransformArgs;
use crate::config::Config;
use crate::error::Result;
use crate::handlers::utils;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use remap_core::{prepopulate_defaults, Document, MappingEngine, MappingRule, RuleOutcome};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

/// The outcome of one rule against one record
#[derive(Debug, Clone, Serialize)]
pub struct RuleTrace {
    /// Position of the record in a batch, absent for a single document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<usize>,
    pub rule: String,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Handle the transform command
#[instrument(skip_all, fields(rules = %args.rules.display()))]
pub fn handle_transform(args: TransformArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("transform", &args.rules.display().to_string());

    let rules = utils::load_valid_rules(&args.rules)?;
    let engine = MappingEngine::with_config(config.engine.clone());

    let mut input = utils::load_document(args.input.as_deref())?;
    if args.apply_defaults {
        input = with_defaults(&engine, input, &rules);
    }

    let records = engine.batch_records(&input).map(Vec::len);
    match records {
        Some(count) => info!(records = count, "Transforming batch"),
        None => info!("Transforming single document"),
    }

    let result = Value::Object(engine.transform(&input, &rules));

    if args.explain {
        output.section("Rule Outcomes")?;
        output.rule_traces(&explain(&engine, &input, &rules))?;
        output.section("Result")?;
    }

    match &args.save_to {
        Some(path) => {
            utils::save_value(path, &result)?;
            output.success(&format!("✓ Output saved to {}", path.display()))?;
        }
        None => output.data(&result)?,
    }

    Ok(())
}

/// Fill required defaults in the document, or in every record of a batch
fn with_defaults(engine: &MappingEngine, mut input: Document, rules: &[MappingRule]) -> Document {
    if engine.batch_records(&input).is_none() {
        return prepopulate_defaults(&input, rules);
    }

    let key = &engine.config().batch.collection_key;
    if let Some(Value::Array(records)) = input.get_mut(key) {
        for record in records.iter_mut() {
            if let Value::Object(fields) = record {
                *fields = prepopulate_defaults(fields, rules);
            }
        }
    }
    input
}

/// Apply each rule on its own and record what happened
fn explain(engine: &MappingEngine, input: &Document, rules: &[MappingRule]) -> Vec<RuleTrace> {
    let trace_record = |record: Option<usize>, document: &Document| {
        let mut scratch = Document::new();
        rules
            .iter()
            .map(|rule| {
                let (outcome, detail) = match engine.apply_rule(document, rule, &mut scratch) {
                    RuleOutcome::Applied => ("applied", None),
                    RuleOutcome::SourceAbsent => ("absent", None),
                    RuleOutcome::Failed(e) => ("failed", Some(e.to_string())),
                };
                RuleTrace {
                    record,
                    rule: rule.label(),
                    outcome,
                    detail,
                }
            })
            .collect::<Vec<_>>()
    };

    match engine.batch_records(input) {
        Some(records) => records
            .iter()
            .enumerate()
            .filter_map(|(i, record)| record.as_object().map(|fields| trace_record(Some(i), fields)))
            .flatten()
            .collect(),
        None => trace_record(None, input),
    }
}
