//! Recursive descent parser for rule expressions
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! conditional    := coalesce ( "?" conditional ":" conditional )?
//! coalesce       := or ( "??" or )*
//! or             := and ( ( "||" | "or" ) and )*
//! and            := equality ( ( "&&" | "and" ) equality )*
//! equality       := comparison ( ( "==" | "!=" ) comparison )*
//! comparison     := additive ( ( "<" | "<=" | ">" | ">=" ) additive )*
//! additive       := multiplicative ( ( "+" | "-" ) multiplicative )*
//! multiplicative := unary ( ( "*" | "/" | "%" ) unary )*
//! unary          := ( "-" | "!" | "not" ) unary | postfix
//! postfix        := primary ( "." IDENT | "[" conditional "]" )*
//! primary        := literal | IDENT | IDENT "(" args ")" | "(" conditional ")"
//! ```
//!
//! Trees deeper than [`MAX_DEPTH`] are rejected while parsing, and so are
//! more than [`MAX_DEPTH`] nested groups, so neither parsing nor evaluation
//! can exhaust the stack.
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the Apache-2.0 license

use super::ast::{BinaryOperator, Expr, UnaryOperator};
use super::error::ExpressionError;
use super::lexer::{Lexer, Token, TokenKind};
use serde_json::{Number, Value};

/// Maximum depth of an expression tree
pub const MAX_DEPTH: usize = 100;

/// Parser over a token stream
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    /// Depth of the expression most recently parsed
    depth: usize,
    /// Currently open groups, ternaries and unary operators
    nesting: usize,
}

impl Parser {
    /// Tokenize `input` and prepare to parse it
    pub fn new(input: &str) -> Result<Self, ExpressionError> {
        Ok(Self {
            tokens: Lexer::new(input).tokenize()?,
            position: 0,
            depth: 0,
            nesting: 0,
        })
    }

    /// Parse a complete expression, rejecting trailing tokens
    pub fn parse(mut self) -> Result<Expr, ExpressionError> {
        if self.peek().kind == TokenKind::Eof {
            return Err(ExpressionError::syntax(
                "Empty expression",
                self.peek().position,
                vec!["expression".to_string()],
                "EOF",
            ));
        }

        let expr = self.parse_conditional()?;

        let token = self.peek();
        if token.kind != TokenKind::Eof {
            return Err(ExpressionError::syntax(
                "Unexpected token after expression",
                token.position,
                vec!["EOF".to_string()],
                token.kind.describe(),
            ));
        }

        Ok(expr)
    }

    fn parse_conditional(&mut self) -> Result<Expr, ExpressionError> {
        self.enter()?;
        let expr = self.parse_ternary();
        self.nesting -= 1;
        expr
    }

    fn parse_ternary(&mut self) -> Result<Expr, ExpressionError> {
        let condition = self.parse_coalesce()?;
        if !self.eat(&TokenKind::Question) {
            return Ok(condition);
        }
        let position = self.last_position();
        let condition_depth = self.depth;

        let then_branch = self.parse_conditional()?;
        let then_depth = self.depth;
        self.expect(TokenKind::Colon)?;
        let else_branch = self.parse_conditional()?;
        self.node(condition_depth.max(then_depth).max(self.depth), position)?;

        Ok(Expr::Conditional {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    fn parse_coalesce(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_or()?;
        while self.eat(&TokenKind::Coalesce) {
            let (position, left_depth) = (self.last_position(), self.depth);
            let right = self.parse_or()?;
            self.node(left_depth.max(self.depth), position)?;
            left = Expr::binary(left, BinaryOperator::Coalesce, right);
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::Or) {
            let (position, left_depth) = (self.last_position(), self.depth);
            let right = self.parse_and()?;
            self.node(left_depth.max(self.depth), position)?;
            left = Expr::binary(left, BinaryOperator::Or, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_equality()?;
        while self.eat(&TokenKind::And) {
            let (position, left_depth) = (self.last_position(), self.depth);
            let right = self.parse_equality()?;
            self.node(left_depth.max(self.depth), position)?;
            left = Expr::binary(left, BinaryOperator::And, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_comparison()?;
        loop {
            let operator = match self.peek().kind {
                TokenKind::EqEq => BinaryOperator::Equal,
                TokenKind::NotEq => BinaryOperator::NotEqual,
                _ => return Ok(left),
            };
            let position = self.advance().position;
            let left_depth = self.depth;
            let right = self.parse_comparison()?;
            self.node(left_depth.max(self.depth), position)?;
            left = Expr::binary(left, operator, right);
        }
    }

    fn parse_comparison(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_additive()?;
        loop {
            let operator = match self.peek().kind {
                TokenKind::Lt => BinaryOperator::LessThan,
                TokenKind::Le => BinaryOperator::LessThanOrEqual,
                TokenKind::Gt => BinaryOperator::GreaterThan,
                TokenKind::Ge => BinaryOperator::GreaterThanOrEqual,
                _ => return Ok(left),
            };
            let position = self.advance().position;
            let left_depth = self.depth;
            let right = self.parse_additive()?;
            self.node(left_depth.max(self.depth), position)?;
            left = Expr::binary(left, operator, right);
        }
    }

    fn parse_additive(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let operator = match self.peek().kind {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Subtract,
                _ => return Ok(left),
            };
            let position = self.advance().position;
            let left_depth = self.depth;
            let right = self.parse_multiplicative()?;
            self.node(left_depth.max(self.depth), position)?;
            left = Expr::binary(left, operator, right);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_unary()?;
        loop {
            let operator = match self.peek().kind {
                TokenKind::Star => BinaryOperator::Multiply,
                TokenKind::Slash => BinaryOperator::Divide,
                TokenKind::Percent => BinaryOperator::Remainder,
                _ => return Ok(left),
            };
            let position = self.advance().position;
            let left_depth = self.depth;
            let right = self.parse_unary()?;
            self.node(left_depth.max(self.depth), position)?;
            left = Expr::binary(left, operator, right);
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ExpressionError> {
        let operator = match self.peek().kind {
            TokenKind::Minus => UnaryOperator::Negate,
            TokenKind::Not => UnaryOperator::Not,
            _ => return self.parse_postfix(),
        };
        let position = self.advance().position;
        self.enter()?;
        let operand = self.parse_unary();
        self.nesting -= 1;
        let operand = operand?;

        // Fold negative literals so i64::MIN stays representable
        if operator == UnaryOperator::Negate {
            if let Expr::Literal(Value::Number(n)) = &operand {
                if let Some(i) = n.as_i64() {
                    if let Some(negated) = i.checked_neg() {
                        return Ok(Expr::Literal(Value::from(negated)));
                    }
                }
            }
        }

        self.node(self.depth, position)?;
        Ok(Expr::unary(operator, operand))
    }

    fn parse_postfix(&mut self) -> Result<Expr, ExpressionError> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat(&TokenKind::Dot) {
                let token = self.advance();
                let property = match token.kind {
                    TokenKind::Ident(name) => name,
                    // Keywords are valid member names: `input.null`
                    TokenKind::True => "true".to_string(),
                    TokenKind::False => "false".to_string(),
                    TokenKind::Null => "null".to_string(),
                    TokenKind::Integer(n) if n >= 0 => n.to_string(),
                    other => {
                        return Err(ExpressionError::syntax(
                            "Expected property name after '.'",
                            token.position,
                            vec!["identifier".to_string()],
                            other.describe(),
                        ))
                    }
                };
                self.node(self.depth, token.position)?;
                expr = Expr::Member {
                    object: Box::new(expr),
                    property,
                };
            } else if self.eat(&TokenKind::LBracket) {
                let (position, object_depth) = (self.last_position(), self.depth);
                let index = self.parse_conditional()?;
                self.expect(TokenKind::RBracket)?;
                self.node(object_depth.max(self.depth), position)?;
                expr = Expr::Index {
                    object: Box::new(expr),
                    index: Box::new(index),
                };
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ExpressionError> {
        let token = self.advance();
        self.depth = 1;
        match token.kind {
            TokenKind::Integer(n) => Ok(Expr::Literal(Value::from(n))),
            TokenKind::Float(f) => Number::from_f64(f)
                .map(|n| Expr::Literal(Value::Number(n)))
                .ok_or_else(|| {
                    ExpressionError::syntax("Number is not finite", token.position, Vec::new(), f.to_string())
                }),
            TokenKind::Str(s) => Ok(Expr::Literal(Value::String(s))),
            TokenKind::True => Ok(Expr::Literal(Value::Bool(true))),
            TokenKind::False => Ok(Expr::Literal(Value::Bool(false))),
            TokenKind::Null => Ok(Expr::Literal(Value::Null)),
            TokenKind::Ident(name) => {
                if self.eat(&TokenKind::LParen) {
                    let (args, args_depth) = self.parse_arguments()?;
                    self.node(args_depth, token.position)?;
                    Ok(Expr::Call {
                        function: name,
                        args,
                    })
                } else {
                    Ok(Expr::Variable(name))
                }
            }
            TokenKind::LParen => {
                let inner = self.parse_conditional()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            other => Err(ExpressionError::syntax(
                "Expected expression",
                token.position,
                vec![
                    "literal".to_string(),
                    "identifier".to_string(),
                    "(".to_string(),
                ],
                other.describe(),
            )),
        }
    }

    /// Arguments up to the closing parenthesis, with the deepest one's depth
    fn parse_arguments(&mut self) -> Result<(Vec<Expr>, usize), ExpressionError> {
        let mut args = Vec::new();
        let mut depth = 0;
        if self.eat(&TokenKind::RParen) {
            return Ok((args, depth));
        }
        loop {
            args.push(self.parse_conditional()?);
            depth = depth.max(self.depth);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen)?;
            return Ok((args, depth));
        }
    }

    /// Open a nested group
    fn enter(&mut self) -> Result<(), ExpressionError> {
        if self.nesting >= MAX_DEPTH {
            return Err(too_deep(self.peek().position));
        }
        self.nesting += 1;
        Ok(())
    }

    /// Record a node built over children at most `children` deep
    fn node(&mut self, children: usize, position: usize) -> Result<(), ExpressionError> {
        let depth = children + 1;
        if depth > MAX_DEPTH {
            return Err(too_deep(position));
        }
        self.depth = depth;
        Ok(())
    }

    fn last_position(&self) -> usize {
        self.tokens
            .get(self.position.saturating_sub(1))
            .map_or(0, |token| token.position)
    }

    fn peek(&self) -> &Token {
        // tokenize() always ends with Eof, and advance() never moves past it
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ExpressionError> {
        let token = self.peek();
        if token.kind == kind {
            self.advance();
            Ok(())
        } else {
            Err(ExpressionError::syntax(
                format!("Expected '{}'", kind.describe()),
                token.position,
                vec![kind.describe()],
                token.kind.describe(),
            ))
        }
    }
}

fn too_deep(position: usize) -> ExpressionError {
    ExpressionError::syntax(
        "Expression nesting too deep",
        position,
        Vec::new(),
        format!("more than {} levels", MAX_DEPTH),
    )
}

/// Parse an expression string into an AST
pub fn parse(input: &str) -> Result<Expr, ExpressionError> {
    Parser::new(input)?.parse()
}
