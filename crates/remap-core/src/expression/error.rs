//! Error types for rule expressions
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Errors raised while parsing or evaluating an expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// The expression text is malformed
    #[error("Syntax error at position {position}: {message}")]
    Syntax {
        message: String,
        position: usize,
        expected: Vec<String>,
        found: String,
    },

    /// A variable is not bound in the evaluation context
    #[error("Unknown variable '{name}'")]
    UnknownVariable { name: String },

    /// A function name is not one of the built-ins
    #[error("Unknown function '{name}'")]
    UnknownFunction { name: String },

    /// A built-in was called with the wrong number of arguments
    #[error("Function {function}() expects {expected} argument(s), got {found}")]
    Arity {
        function: String,
        expected: usize,
        found: usize,
    },

    /// An operator or function received operands it cannot handle
    #[error("Type mismatch in '{operator}': cannot apply to {operands}")]
    TypeMismatch { operator: String, operands: String },

    /// Division or remainder by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Integer arithmetic overflowed
    #[error("Integer overflow in '{operator}'")]
    Overflow { operator: String },

    /// A float result cannot be represented in JSON
    #[error("Result of '{operator}' is not a finite number")]
    NonFinite { operator: String },

    /// An expression tree nests deeper than the evaluator allows
    #[error("Expression nests deeper than {limit} levels")]
    TooDeep { limit: usize },
}

impl ExpressionError {
    /// Create a syntax error with position and context
    pub fn syntax(
        message: impl Into<String>,
        position: usize,
        expected: Vec<String>,
        found: impl Into<String>,
    ) -> Self {
        ExpressionError::Syntax {
            message: message.into(),
            position,
            expected,
            found: found.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(operator: impl Into<String>, operands: impl Into<String>) -> Self {
        ExpressionError::TypeMismatch {
            operator: operator.into(),
            operands: operands.into(),
        }
    }

    /// Whether the error was raised before evaluation started
    pub fn is_syntax(&self) -> bool {
        matches!(self, ExpressionError::Syntax { .. })
    }
}
