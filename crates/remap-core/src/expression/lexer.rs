//! Tokenizer for rule expressions
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the Apache-2.0 license

use super::error::ExpressionError;
use std::iter::Peekable;
use std::str::CharIndices;

/// Token kinds produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Integer(i64),
    Float(f64),
    Str(String),
    Ident(String),
    True,
    False,
    Null,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,
    Question,
    Coalesce,
    Colon,
    Dot,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Eof,
}

/// A token with the byte offset where it starts
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

impl TokenKind {
    /// How the token reads in error messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Integer(n) => n.to_string(),
            TokenKind::Float(n) => n.to_string(),
            TokenKind::Str(s) => format!("{:?}", s),
            TokenKind::Ident(name) => name.clone(),
            TokenKind::True => "true".to_string(),
            TokenKind::False => "false".to_string(),
            TokenKind::Null => "null".to_string(),
            TokenKind::Plus => "+".to_string(),
            TokenKind::Minus => "-".to_string(),
            TokenKind::Star => "*".to_string(),
            TokenKind::Slash => "/".to_string(),
            TokenKind::Percent => "%".to_string(),
            TokenKind::EqEq => "==".to_string(),
            TokenKind::NotEq => "!=".to_string(),
            TokenKind::Lt => "<".to_string(),
            TokenKind::Le => "<=".to_string(),
            TokenKind::Gt => ">".to_string(),
            TokenKind::Ge => ">=".to_string(),
            TokenKind::And => "&&".to_string(),
            TokenKind::Or => "||".to_string(),
            TokenKind::Not => "!".to_string(),
            TokenKind::Question => "?".to_string(),
            TokenKind::Coalesce => "??".to_string(),
            TokenKind::Colon => ":".to_string(),
            TokenKind::Dot => ".".to_string(),
            TokenKind::Comma => ",".to_string(),
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::LBracket => "[".to_string(),
            TokenKind::RBracket => "]".to_string(),
            TokenKind::Eof => "EOF".to_string(),
        }
    }
}

/// Expression tokenizer
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over the given input
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Tokenize the whole input; the last token is always `Eof`
    pub fn tokenize(mut self) -> Result<Vec<Token>, ExpressionError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ExpressionError> {
        self.skip_whitespace();

        let Some((position, ch)) = self.chars.next() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                position: self.input.len(),
            });
        };

        let kind = match ch {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            ':' => TokenKind::Colon,
            '.' => TokenKind::Dot,
            ',' => TokenKind::Comma,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '=' => {
                if self.eat('=') {
                    TokenKind::EqEq
                } else {
                    return Err(ExpressionError::syntax(
                        "Assignment is not supported",
                        position,
                        vec!["==".to_string()],
                        "=",
                    ));
                }
            }
            '!' => {
                if self.eat('=') {
                    TokenKind::NotEq
                } else {
                    TokenKind::Not
                }
            }
            '<' => {
                if self.eat('=') {
                    TokenKind::Le
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            '&' => {
                if self.eat('&') {
                    TokenKind::And
                } else {
                    return Err(ExpressionError::syntax(
                        "Expected '&&'",
                        position,
                        vec!["&&".to_string()],
                        "&",
                    ));
                }
            }
            '|' => {
                if self.eat('|') {
                    TokenKind::Or
                } else {
                    return Err(ExpressionError::syntax(
                        "Expected '||'",
                        position,
                        vec!["||".to_string()],
                        "|",
                    ));
                }
            }
            '?' => {
                if self.eat('?') {
                    TokenKind::Coalesce
                } else {
                    TokenKind::Question
                }
            }
            '"' | '\'' => TokenKind::Str(self.read_string(ch, position)?),
            c if c.is_ascii_digit() => self.read_number(position)?,
            c if c.is_alphabetic() || c == '_' || c == '$' => self.read_word(position),
            other => {
                return Err(ExpressionError::syntax(
                    "Unexpected character",
                    position,
                    Vec::new(),
                    other.to_string(),
                ))
            }
        };

        Ok(Token { kind, position })
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if matches!(self.chars.peek(), Some((_, c)) if *c == expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map(|(i, _)| *i).unwrap_or(self.input.len())
    }

    fn read_string(&mut self, quote: char, start: usize) -> Result<String, ExpressionError> {
        let mut out = String::new();
        loop {
            match self.chars.next() {
                Some((_, c)) if c == quote => return Ok(out),
                Some((escape_pos, '\\')) => {
                    let escaped = match self.chars.next() {
                        Some((_, 'n')) => '\n',
                        Some((_, 't')) => '\t',
                        Some((_, 'r')) => '\r',
                        Some((_, '\\')) => '\\',
                        Some((_, '\'')) => '\'',
                        Some((_, '"')) => '"',
                        Some((_, 'u')) => self.read_unicode_escape(escape_pos)?,
                        Some((_, other)) => {
                            return Err(ExpressionError::syntax(
                                "Unknown escape sequence",
                                escape_pos,
                                vec!["n".into(), "t".into(), "r".into(), "\\".into(), "u".into()],
                                other.to_string(),
                            ))
                        }
                        None => break,
                    };
                    out.push(escaped);
                }
                Some((_, c)) => out.push(c),
                None => break,
            }
        }
        Err(ExpressionError::syntax(
            "Unterminated string literal",
            start,
            vec![quote.to_string()],
            "EOF",
        ))
    }

    fn read_unicode_escape(&mut self, escape_pos: usize) -> Result<char, ExpressionError> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .chars
                .next()
                .and_then(|(_, c)| c.to_digit(16))
                .ok_or_else(|| {
                    ExpressionError::syntax(
                        "Invalid unicode escape",
                        escape_pos,
                        vec!["4 hex digits".to_string()],
                        "",
                    )
                })?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| {
            ExpressionError::syntax(
                "Invalid unicode code point",
                escape_pos,
                Vec::new(),
                format!("\\u{:04x}", code),
            )
        })
    }

    fn read_number(&mut self, start: usize) -> Result<TokenKind, ExpressionError> {
        let mut is_float = false;
        self.consume_digits();

        // A dot only belongs to the number when a digit follows it
        let mut lookahead = self.chars.clone();
        if matches!(lookahead.next(), Some((_, '.')))
            && matches!(lookahead.peek(), Some((_, c)) if c.is_ascii_digit())
        {
            is_float = true;
            self.chars.next();
            self.consume_digits();
        }

        if matches!(self.chars.peek(), Some((_, 'e' | 'E'))) {
            is_float = true;
            self.chars.next();
            if matches!(self.chars.peek(), Some((_, '+' | '-'))) {
                self.chars.next();
            }
            if !matches!(self.chars.peek(), Some((_, c)) if c.is_ascii_digit()) {
                let at = self.offset();
                return Err(ExpressionError::syntax(
                    "Malformed exponent",
                    at,
                    vec!["digit".to_string()],
                    self.input[at..].chars().next().map(String::from).unwrap_or_else(|| "EOF".into()),
                ));
            }
            self.consume_digits();
        }

        let end = self.offset();
        let text = &self.input[start..end];
        if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| ExpressionError::syntax("Invalid number", start, Vec::new(), text))
        } else {
            text.parse::<i64>()
                .map(TokenKind::Integer)
                .map_err(|_| ExpressionError::syntax("Integer literal out of range", start, Vec::new(), text))
        }
    }

    fn consume_digits(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_ascii_digit()) {
            self.chars.next();
        }
    }

    fn read_word(&mut self, start: usize) -> TokenKind {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_alphanumeric() || *c == '_' || *c == '$') {
            self.chars.next();
        }
        let end = self.offset();
        match &self.input[start..end] {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" | "nil" => TokenKind::Null,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            word => TokenKind::Ident(word.to_string()),
        }
    }
}
