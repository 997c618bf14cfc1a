//! Expression language for custom rule logic
//!
//! A rule's `transform_logic` is a small expression evaluated with `value`
//! bound to the source value and `input` bound to the whole input document.
//!
//! # Syntax
//!
//! - Literals: `42`, `2.5`, `"text"`, `'text'`, `true`, `false`, `null`
//! - Access: `input.user.name`, `value[0]`, `value[-1]`, `input["odd key"]`
//! - Arithmetic: `+ - * / %` (`+` concatenates when either side is a string)
//! - Comparison: `== != < <= > >=`
//! - Logic: `&&`/`and`, `||`/`or`, `!`/`not`, `a ?? b`, `cond ? a : b`
//! - Functions: `len`, `upper`, `lower`, `trim`, `string`, `number`
//!
//! Integer arithmetic is checked and `/` always produces a float.
//!
//! # Examples
//!
//! ```
//! use remap_core::expression::{EvalContext, Evaluator, ExprEvaluator};
//! use serde_json::json;
//!
//! let value = json!(10);
//! let result = ExprEvaluator
//!     .evaluate("value * 2", &EvalContext::new().with_value(&value))
//!     .unwrap();
//! assert_eq!(result, json!(20));
//! ```
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the Apache-2.0 license

pub mod ast;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;

#[cfg(test)]
mod tests;

pub use ast::{BinaryOperator, Expr, UnaryOperator};
pub use error::ExpressionError;
pub use interpreter::{is_truthy, values_equal, FUNCTIONS};

use crate::types::Document;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Variables visible to an expression
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalContext<'a> {
    /// Bound to `value`
    pub value: Option<&'a Value>,
    /// Bound to `input`
    pub input: Option<&'a Document>,
    /// Every key is bound as a variable of the same name
    pub globals: Option<&'a Document>,
}

impl<'a> EvalContext<'a> {
    /// An empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for a rule: `value` and `input`
    pub fn for_rule(value: &'a Value, input: &'a Document) -> Self {
        Self {
            value: Some(value),
            input: Some(input),
            globals: None,
        }
    }

    pub fn with_value(mut self, value: &'a Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_input(mut self, input: &'a Document) -> Self {
        self.input = Some(input);
        self
    }

    pub fn with_globals(mut self, globals: &'a Document) -> Self {
        self.globals = Some(globals);
        self
    }
}

/// Evaluates rule expressions
///
/// The mapping engine is generic over this trait so callers can plug in a
/// different expression language. Closures with the matching signature
/// implement it.
pub trait Evaluator {
    /// Evaluate `expression` against `context`
    fn evaluate(&self, expression: &str, context: &EvalContext<'_>) -> Result<Value, ExpressionError>;
}

impl<F> Evaluator for F
where
    F: Fn(&str, &EvalContext<'_>) -> Result<Value, ExpressionError>,
{
    fn evaluate(&self, expression: &str, context: &EvalContext<'_>) -> Result<Value, ExpressionError> {
        self(expression, context)
    }
}

/// The built-in expression language
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprEvaluator;

impl Evaluator for ExprEvaluator {
    fn evaluate(&self, expression: &str, context: &EvalContext<'_>) -> Result<Value, ExpressionError> {
        Expression::parse(expression)?.evaluate(context)
    }
}

/// A parsed expression that can be evaluated repeatedly
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    ast: Expr,
}

impl Expression {
    /// Parse expression text
    pub fn parse(source: &str) -> Result<Self, ExpressionError> {
        Ok(Self {
            source: source.to_string(),
            ast: parser::parse(source)?,
        })
    }

    /// Evaluate against a context
    pub fn evaluate(&self, context: &EvalContext<'_>) -> Result<Value, ExpressionError> {
        interpreter::evaluate(&self.ast, context)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &Expr {
        &self.ast
    }
}

impl FromStr for Expression {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expression::parse(s)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Evaluate `expression` with every key of `environment` bound as a variable
///
/// ```
/// use remap_core::expression::evaluate_expression;
/// use serde_json::json;
///
/// let env = json!({"value": 10}).as_object().cloned().unwrap();
/// assert_eq!(evaluate_expression("value * 2", &env).unwrap(), json!(20));
/// ```
pub fn evaluate_expression(expression: &str, environment: &Document) -> Result<Value, ExpressionError> {
    ExprEvaluator.evaluate(expression, &EvalContext::new().with_globals(environment))
}
