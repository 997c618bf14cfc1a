//! Check command handler
//!
//! Loads a rule set and reports, per rule, whether it can be applied and
//! whether it behaves differently from what its author likely intended.

use crate::cli::CheckArgs;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use crate::handlers::utils;
use remap_core::expression::Expression;
use remap_core::{MappingRule, TransformKind};
use serde::Serialize;
use std::collections::HashMap;

/// Result of checking one rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

/// Findings for a single rule
#[derive(Debug, Clone, Serialize)]
pub struct RuleCheck {
    /// 1-based position in the rule file
    pub index: usize,
    pub rule: String,
    /// Catalog transform name, or `expression`
    pub computed_by: String,
    pub status: CheckStatus,
    pub issues: Vec<String>,
}

/// Findings for a whole rule set
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub total: usize,
    pub passed: usize,
    pub warnings: usize,
    pub errors: usize,
    pub rules: Vec<RuleCheck>,
}

impl CheckReport {
    /// Number of rules that fail the check at the given strictness
    pub fn failures(&self, strict: bool) -> usize {
        if strict {
            self.warnings + self.errors
        } else {
            self.errors
        }
    }
}

/// Handle the check command
pub fn handle_check(args: CheckArgs, output: &mut OutputWriter) -> Result<()> {
    output.info(&format!("Checking rules: {}", args.rules.display()))?;

    let rules = utils::load_rules(&args.rules)?;
    let report = check_rules(&rules);
    output.check_report(&report)?;

    let failed = report.failures(args.strict);
    if !args.strict && report.warnings > 0 {
        output.warning(&format!(
            "{} rule(s) have warnings; pass --strict to fail on them",
            report.warnings
        ))?;
    }
    if failed > 0 {
        return Err(Error::CheckFailed {
            failed,
            total: report.total,
        });
    }

    output.success("✓ Rule set is valid")
}

/// Check every rule, including interactions between rules
pub fn check_rules(rules: &[MappingRule]) -> CheckReport {
    let mut destinations: HashMap<&[String], usize> = HashMap::new();
    let mut stream_keys: HashMap<&str, usize> = HashMap::new();

    let checks: Vec<RuleCheck> = rules
        .iter()
        .enumerate()
        .map(|(i, rule)| {
            let index = i + 1;
            let mut errors = Vec::new();
            let mut warnings = Vec::new();

            if let Err(e) = rule.validate() {
                errors.push(e.to_string());
            }

            match rule.expression() {
                Some(expression) => {
                    if let Err(e) = Expression::parse(expression) {
                        errors.push(format!("expression does not parse: {}", e));
                    }
                    if !rule.transform_type.is_empty() {
                        warnings.push(format!(
                            "transform '{}' is ignored because transform_logic is set",
                            rule.transform_type
                        ));
                    }
                }
                None if !TransformKind::is_known(&rule.transform_type) => {
                    warnings.push(format!(
                        "unknown transform '{}' copies the value unchanged",
                        rule.transform_type
                    ));
                }
                None => {}
            }

            if rule.default_value.is_some() && !rule.required {
                warnings.push("default_value is only used when the rule is required".to_string());
            }

            if !rule.destination_path.is_empty() {
                if let Some(earlier) = destinations.insert(&rule.destination_path, index) {
                    warnings.push(format!(
                        "overwrites '{}' already written by rule {}",
                        rule.destination_path.join("."),
                        earlier
                    ));
                }
            }

            if rule.is_single_segment() {
                let key = rule.source_path[0].as_str();
                match stream_keys.get(key) {
                    Some(first) => warnings.push(format!(
                        "never used when streaming; rule {} already handles key '{}'",
                        first, key
                    )),
                    None => {
                        stream_keys.insert(key, index);
                    }
                }
            }

            let status = if !errors.is_empty() {
                CheckStatus::Error
            } else if !warnings.is_empty() {
                CheckStatus::Warning
            } else {
                CheckStatus::Ok
            };
            errors.extend(warnings);

            RuleCheck {
                index,
                rule: rule.label(),
                computed_by: match rule.expression() {
                    Some(_) => "expression".to_string(),
                    None => rule.transform_kind().name().to_string(),
                },
                status,
                issues: errors,
            }
        })
        .collect();

    let count = |status: CheckStatus| checks.iter().filter(|c| c.status == status).count();
    CheckReport {
        total: checks.len(),
        passed: count(CheckStatus::Ok),
        warnings: count(CheckStatus::Warning),
        errors: count(CheckStatus::Error),
        rules: checks,
    }
}
