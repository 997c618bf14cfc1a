//! Tree-walking evaluator for parsed expressions
//!
//! Member and index chains are resolved against borrowed data; only the leaf
//! a chain ends at is cloned. Operators work on owned values.
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the Apache-2.0 license

use super::ast::{BinaryOperator, Expr, UnaryOperator};
use super::error::ExpressionError;
use super::parser::MAX_DEPTH;
use super::EvalContext;
use crate::transformer::built_in;
use crate::types::{value_type_name, Document};
use serde_json::{Number, Value};
use std::cell::Cell;
use std::cmp::Ordering;

/// Built-in functions callable from expressions
pub const FUNCTIONS: &[&str] = &["len", "upper", "lower", "trim", "string", "number"];

/// An evaluated operand that may still borrow from the context
enum Slot<'a> {
    Borrowed(&'a Value),
    Document(&'a Document),
    Owned(Value),
}

impl Slot<'_> {
    fn into_owned(self) -> Value {
        match self {
            Slot::Borrowed(value) => value.clone(),
            Slot::Document(document) => Value::Object(document.clone()),
            Slot::Owned(value) => value,
        }
    }
}

/// Evaluate an expression against a context
///
/// Trees built by hand rather than parsed are held to the same
/// [`MAX_DEPTH`] as parsed ones.
pub fn evaluate(expr: &Expr, context: &EvalContext<'_>) -> Result<Value, ExpressionError> {
    Interpreter {
        context,
        depth: Cell::new(0),
    }
    .value(expr)
}

struct Interpreter<'c, 'a> {
    context: &'c EvalContext<'a>,
    depth: Cell<usize>,
}

impl<'c, 'a> Interpreter<'c, 'a> {
    fn value(&self, expr: &Expr) -> Result<Value, ExpressionError> {
        Ok(self.slot(expr)?.into_owned())
    }

    fn slot<'e>(&self, expr: &'e Expr) -> Result<Slot<'e>, ExpressionError>
    where
        'a: 'e,
    {
        let depth = self.depth.get() + 1;
        if depth > MAX_DEPTH {
            return Err(ExpressionError::TooDeep { limit: MAX_DEPTH });
        }
        self.depth.set(depth);
        let slot = self.eval_slot(expr);
        self.depth.set(depth - 1);
        slot
    }

    fn eval_slot<'e>(&self, expr: &'e Expr) -> Result<Slot<'e>, ExpressionError>
    where
        'a: 'e,
    {
        match expr {
            Expr::Literal(value) => Ok(Slot::Borrowed(value)),
            Expr::Variable(name) => self.variable(name),
            Expr::Member { object, property } => {
                let object = self.slot(object)?;
                member(object, property)
            }
            Expr::Index { object, index } => {
                let object = self.slot(object)?;
                let index = self.value(index)?;
                index_into(object, &index)
            }
            Expr::Unary { operator, operand } => {
                let operand = self.value(operand)?;
                unary(*operator, operand).map(Slot::Owned)
            }
            Expr::Binary {
                left,
                operator,
                right,
            } => self.binary(left, *operator, right).map(Slot::Owned),
            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                if is_truthy(&self.value(condition)?) {
                    self.slot(then_branch)
                } else {
                    self.slot(else_branch)
                }
            }
            Expr::Call { function, args } => self.call(function, args).map(Slot::Owned),
        }
    }

    fn variable<'e>(&self, name: &str) -> Result<Slot<'e>, ExpressionError>
    where
        'a: 'e,
    {
        let context = self.context;
        match (name, context.value, context.input) {
            ("value", Some(value), _) => Ok(Slot::Borrowed(value)),
            ("input", _, Some(input)) => Ok(Slot::Document(input)),
            _ => context
                .globals
                .and_then(|globals| globals.get(name))
                .map(Slot::Borrowed)
                .ok_or_else(|| ExpressionError::UnknownVariable {
                    name: name.to_string(),
                }),
        }
    }

    fn binary(&self, left: &Expr, operator: BinaryOperator, right: &Expr) -> Result<Value, ExpressionError> {
        // Short-circuiting operators evaluate the right side lazily
        match operator {
            BinaryOperator::And => {
                let left = is_truthy(&self.value(left)?);
                return Ok(Value::Bool(left && is_truthy(&self.value(right)?)));
            }
            BinaryOperator::Or => {
                let left = is_truthy(&self.value(left)?);
                return Ok(Value::Bool(left || is_truthy(&self.value(right)?)));
            }
            BinaryOperator::Coalesce => {
                let left = self.value(left)?;
                return if left.is_null() { self.value(right) } else { Ok(left) };
            }
            _ => {}
        }

        let left = self.value(left)?;
        let right = self.value(right)?;
        match operator {
            BinaryOperator::Add => add(&left, &right),
            BinaryOperator::Subtract => arithmetic(operator, &left, &right, i64::checked_sub, |a, b| a - b),
            BinaryOperator::Multiply => arithmetic(operator, &left, &right, i64::checked_mul, |a, b| a * b),
            BinaryOperator::Divide => divide(&left, &right),
            BinaryOperator::Remainder => remainder(&left, &right),
            BinaryOperator::Equal => Ok(Value::Bool(values_equal(&left, &right))),
            BinaryOperator::NotEqual => Ok(Value::Bool(!values_equal(&left, &right))),
            BinaryOperator::LessThan => compare(operator, &left, &right).map(|o| Value::Bool(o == Ordering::Less)),
            BinaryOperator::LessThanOrEqual => {
                compare(operator, &left, &right).map(|o| Value::Bool(o != Ordering::Greater))
            }
            BinaryOperator::GreaterThan => {
                compare(operator, &left, &right).map(|o| Value::Bool(o == Ordering::Greater))
            }
            BinaryOperator::GreaterThanOrEqual => {
                compare(operator, &left, &right).map(|o| Value::Bool(o != Ordering::Less))
            }
            // short-circuiting operators returned above
            BinaryOperator::And | BinaryOperator::Or | BinaryOperator::Coalesce => Ok(Value::Null),
        }
    }

    fn call(&self, function: &str, args: &[Expr]) -> Result<Value, ExpressionError> {
        if !FUNCTIONS.contains(&function) {
            return Err(ExpressionError::UnknownFunction {
                name: function.to_string(),
            });
        }
        if args.len() != 1 {
            return Err(ExpressionError::Arity {
                function: function.to_string(),
                expected: 1,
                found: args.len(),
            });
        }

        let arg = self.value(&args[0])?;
        match function {
            "len" => match &arg {
                Value::String(s) => Ok(Value::from(s.chars().count())),
                Value::Array(items) => Ok(Value::from(items.len())),
                Value::Object(map) => Ok(Value::from(map.len())),
                Value::Null => Ok(Value::from(0)),
                other => Err(ExpressionError::type_mismatch("len", value_type_name(other))),
            },
            "upper" => string_function(function, &arg, str::to_uppercase),
            "lower" => string_function(function, &arg, str::to_lowercase),
            "trim" => string_function(function, &arg, |s| s.trim().to_string()),
            "string" => Ok(built_in::to_string(&arg)),
            _ => to_number(&arg),
        }
    }
}

fn member<'e>(object: Slot<'e>, property: &str) -> Result<Slot<'e>, ExpressionError> {
    match object {
        Slot::Document(document) => Ok(lookup(document.get(property))),
        Slot::Borrowed(Value::Object(map)) => Ok(lookup(map.get(property))),
        Slot::Owned(Value::Object(mut map)) => Ok(Slot::Owned(map.remove(property).unwrap_or(Value::Null))),
        Slot::Borrowed(other) => member_of_non_object(other, property),
        Slot::Owned(other) => member_of_non_object(&other, property),
    }
}

fn member_of_non_object<'e>(value: &Value, property: &str) -> Result<Slot<'e>, ExpressionError> {
    if value.is_null() {
        return Ok(Slot::Owned(Value::Null));
    }
    Err(ExpressionError::type_mismatch(
        ".",
        format!("{} (property '{}')", value_type_name(value), property),
    ))
}

fn index_into<'e>(object: Slot<'e>, index: &Value) -> Result<Slot<'e>, ExpressionError> {
    if let Value::String(key) = index {
        return member(object, key);
    }

    let object_type = match &object {
        Slot::Document(_) => "object",
        Slot::Borrowed(value) => value_type_name(value),
        Slot::Owned(value) => value_type_name(value),
    };
    let mismatch = || ExpressionError::type_mismatch("[]", format!("{} and {}", object_type, value_type_name(index)));

    let Some(position) = index.as_i64() else {
        return Err(mismatch());
    };

    match object {
        Slot::Borrowed(Value::Array(items)) => Ok(lookup(resolve_index(items.len(), position).and_then(|i| items.get(i)))),
        Slot::Owned(Value::Array(mut items)) => Ok(Slot::Owned(
            resolve_index(items.len(), position)
                .map(|i| items.swap_remove(i))
                .unwrap_or(Value::Null),
        )),
        Slot::Borrowed(Value::Null) | Slot::Owned(Value::Null) => Ok(Slot::Owned(Value::Null)),
        _ => Err(mismatch()),
    }
}

/// Negative indices count from the end
fn resolve_index(len: usize, index: i64) -> Option<usize> {
    if index >= 0 {
        usize::try_from(index).ok().filter(|i| *i < len)
    } else {
        let back = usize::try_from(index.unsigned_abs()).ok()?;
        len.checked_sub(back)
    }
}

fn lookup(found: Option<&Value>) -> Slot<'_> {
    found.map(Slot::Borrowed).unwrap_or(Slot::Owned(Value::Null))
}

fn unary(operator: UnaryOperator, operand: Value) -> Result<Value, ExpressionError> {
    match operator {
        UnaryOperator::Not => Ok(Value::Bool(!is_truthy(&operand))),
        UnaryOperator::Negate => match &operand {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i.checked_neg().map(Value::from).ok_or(ExpressionError::Overflow {
                        operator: "-".to_string(),
                    })
                } else {
                    float_result("-", -n.as_f64().unwrap_or(f64::NAN))
                }
            }
            other => Err(ExpressionError::type_mismatch("-", value_type_name(other))),
        },
    }
}

fn add(left: &Value, right: &Value) -> Result<Value, ExpressionError> {
    if left.is_string() || right.is_string() {
        let mut out = render(left);
        out.push_str(&render(right));
        return Ok(Value::String(out));
    }
    arithmetic(BinaryOperator::Add, left, right, i64::checked_add, |a, b| a + b)
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn arithmetic(
    operator: BinaryOperator,
    left: &Value,
    right: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, ExpressionError> {
    let (Value::Number(a), Value::Number(b)) = (left, right) else {
        return Err(mismatch(operator, left, right));
    };

    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => int_op(x, y).map(Value::from).ok_or(ExpressionError::Overflow {
            operator: operator.to_string(),
        }),
        _ => float_result(&operator.to_string(), float_op(as_f64(a), as_f64(b))),
    }
}

fn divide(left: &Value, right: &Value) -> Result<Value, ExpressionError> {
    let (Value::Number(a), Value::Number(b)) = (left, right) else {
        return Err(mismatch(BinaryOperator::Divide, left, right));
    };
    let divisor = as_f64(b);
    if divisor == 0.0 {
        return Err(ExpressionError::DivisionByZero);
    }
    float_result("/", as_f64(a) / divisor)
}

fn remainder(left: &Value, right: &Value) -> Result<Value, ExpressionError> {
    let (Some(a), Some(b)) = (left.as_i64(), right.as_i64()) else {
        return Err(mismatch(BinaryOperator::Remainder, left, right));
    };
    if b == 0 {
        return Err(ExpressionError::DivisionByZero);
    }
    a.checked_rem(b).map(Value::from).ok_or(ExpressionError::Overflow {
        operator: "%".to_string(),
    })
}

fn compare(operator: BinaryOperator, left: &Value, right: &Value) -> Result<Ordering, ExpressionError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(compare_numbers(a, b)),
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        _ => Err(mismatch(operator, left, right)),
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => x.cmp(&y),
        // Finite by construction, so partial_cmp always succeeds
        _ => as_f64(a).partial_cmp(&as_f64(b)).unwrap_or(Ordering::Equal),
    }
}

/// Structural equality where numbers compare by numeric value
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b) == Ordering::Equal,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| values_equal(x, y)))
        }
        _ => left == right,
    }
}

/// Truthiness used by `!`, `&&`, `||` and `?:`
///
/// `null`, `false`, zero, and empty strings, arrays and objects are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => as_f64(n) != 0.0,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn string_function(function: &str, arg: &Value, f: impl Fn(&str) -> String) -> Result<Value, ExpressionError> {
    match arg {
        Value::String(s) => Ok(Value::String(f(s))),
        other => Err(ExpressionError::type_mismatch(function, value_type_name(other))),
    }
}

fn to_number(arg: &Value) -> Result<Value, ExpressionError> {
    match arg {
        Value::Number(_) => Ok(arg.clone()),
        Value::Bool(b) => Ok(Value::from(i64::from(*b))),
        Value::String(s) => {
            let text = s.trim();
            if let Ok(i) = text.parse::<i64>() {
                return Ok(Value::from(i));
            }
            text.parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| ExpressionError::type_mismatch("number", format!("string {:?}", s)))
        }
        other => Err(ExpressionError::type_mismatch("number", value_type_name(other))),
    }
}

fn as_f64(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

fn float_result(operator: &str, result: f64) -> Result<Value, ExpressionError> {
    Number::from_f64(result)
        .map(Value::Number)
        .ok_or_else(|| ExpressionError::NonFinite {
            operator: operator.to_string(),
        })
}

fn mismatch(operator: BinaryOperator, left: &Value, right: &Value) -> ExpressionError {
    ExpressionError::type_mismatch(
        operator.to_string(),
        format!("{} and {}", value_type_name(left), value_type_name(right)),
    )
}
