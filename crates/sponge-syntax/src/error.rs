//! Error types for the front half of the Spongelang toolchain.
//!
//! Lexing and parsing each report a single, categorized failure: the first
//! error wins and nothing is recovered. Every error carries the
//! [`Position`] of the offending input so a driver can point at it.
//!
//! # Examples
//!
//! ```rust
//! use sponge_syntax::error::{LexError, Position};
//!
//! let err = LexError::UnexpectedCharacter {
//!     ch: '#',
//!     position: Position { line: 2, col: 7 },
//! };
//! assert_eq!(err.to_string(), "unexpected character '#' at 2:7");
//! assert_eq!(err.position(), Position { line: 2, col: 7 });
//! ```

use std::fmt;

use thiserror::Error;

use crate::token::TokenKind;

/// A 1-based line/column location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Failures produced while scanning source text into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at {position}")]
    UnexpectedCharacter { ch: char, position: Position },

    /// `position` is the opening quote.
    #[error("unterminated string starting at {position}")]
    UnterminatedString { position: Position },

    /// A digit run too large for `i64`. Literals are unsigned and `-` is
    /// applied afterwards, so `i64::MIN` has no literal form and must be
    /// written as `-9223372036854775807 - 1`.
    #[error("integer literal {literal} does not fit in 64 bits at {position}")]
    NumberOutOfRange { literal: String, position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnexpectedCharacter { position, .. }
            | LexError::UnterminatedString { position }
            | LexError::NumberOutOfRange { position, .. } => *position,
        }
    }
}

/// What the parser was looking for when it gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    /// One specific token, e.g. `)` or `;`.
    Token(TokenKind),
    Identifier,
    Expression,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "'{}'", kind),
            Expected::Identifier => f.write_str("identifier"),
            Expected::Expression => f.write_str("expression"),
        }
    }
}

/// Failures produced while building the AST from tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected}, found '{found}' at {position}")]
    Expected {
        expected: Expected,
        found: TokenKind,
        position: Position,
    },

    /// The stream ran out while `expected` was still required.
    #[error("unexpected end of input at {position}: expected {expected}")]
    UnexpectedEndOfInput {
        expected: Expected,
        position: Position,
    },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::Expected { position, .. }
            | ParseError::UnexpectedEndOfInput { position, .. } => *position,
        }
    }
}
