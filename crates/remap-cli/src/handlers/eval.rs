//! Eval command handler

use crate::cli::EvalArgs;
use crate::error::{Error, Result};
use crate::handlers::utils;
use crate::output::OutputWriter;
use remap_core::expression::Expression;
use remap_core::{Document, EvalContext};
use serde_json::Value;

/// Handle the eval command
///
/// `--value` binds `value`; `--input` binds `input`, and that document's
/// top-level keys also resolve as bare names.
pub fn handle_eval(args: EvalArgs, output: &mut OutputWriter) -> Result<()> {
    let expression = Expression::parse(&args.expression)?;
    tracing::debug!(expression = %expression, ast = ?expression.ast(), "Parsed expression");

    let value = args
        .value
        .as_deref()
        .map(|raw| {
            serde_json::from_str::<Value>(raw)
                .map_err(|e| Error::invalid_args(format!("--value is not valid JSON: {}", e)))
        })
        .transpose()?;

    let input: Option<Document> = args
        .input
        .as_deref()
        .map(|path| utils::load_document(Some(path)))
        .transpose()?;

    let mut context = EvalContext::new();
    if let Some(value) = &value {
        context = context.with_value(value);
    }
    if let Some(input) = &input {
        context = context.with_input(input).with_globals(input);
    }

    let result = expression.evaluate(&context)?;
    output.data(&result)
}
