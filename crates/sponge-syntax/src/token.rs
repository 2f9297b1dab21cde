//! Token definitions for the Spongelang language.
//!
//! Tokens are the smallest meaningful units of Spongelang source code. The
//! lexer produces them in source order, always ending with
//! [`TokenKind::EndOfInput`], so the parser never has to special-case an
//! exhausted stream.
//!
//! # Token Categories
//!
//! - **Literals**: integers and double-quoted strings (`42`, `"hi"`)
//! - **Identifiers**: variable and function names (`x`, `make_adder`)
//! - **Keywords**: `if`, `else`, `fn`, `let`, `return`
//! - **Operators**: `+ - * / =`
//! - **Punctuation**: `( ) { } , ;`
//!
//! # Examples
//!
//! ```rust
//! use sponge_syntax::{Token, TokenKind};
//!
//! let keyword = Token { kind: TokenKind::Fn, line: 1, col: 1 };
//! let name = Token { kind: TokenKind::Identifier("add".to_string()), line: 1, col: 4 };
//!
//! assert_eq!(keyword.kind.to_string(), "fn");
//! assert_eq!(name.position().col, 4);
//! ```

use std::fmt;

use crate::error::Position;

/// Token types that can be produced by the Spongelang lexer.
///
/// Tokens carry their semantic content (the text of identifiers, the value
/// of number literals) together with their syntactic category. The
/// [`Display`](fmt::Display) impl writes a token back in source form, which
/// is what [`render_tokens`] relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Literals ===

    /// A non-negative integer literal. Signs are an operator concern.
    Number(i64),

    /// An identifier that did not match any keyword.
    Identifier(String),

    /// The raw text between a pair of double quotes.
    StringLiteral(String),

    // === Punctuation ===

    /// Left parenthesis `(`
    LParen,

    /// Right parenthesis `)`
    RParen,

    /// Left brace `{`
    LBrace,

    /// Right brace `}`
    RBrace,

    /// Comma separator `,`
    Comma,

    /// Statement terminator `;`
    Semicolon,

    // === Operators ===

    /// Addition operator `+`
    Plus,

    /// Subtraction or negation operator `-`
    Minus,

    /// Multiplication operator `*`
    Star,

    /// Division operator `/`
    Slash,

    /// Binding operator `=` used by `let`
    Assign,

    // === Keywords ===

    /// The `if` keyword
    If,

    /// The `else` keyword
    Else,

    /// The `fn` keyword - function declarations
    Fn,

    /// The `let` keyword - variable bindings
    Let,

    /// The `return` keyword
    Return,

    /// End-of-input sentinel; always the last token of a stream.
    EndOfInput,
}

impl TokenKind {
    /// Resolves an identifier-shaped word against the keyword table.
    ///
    /// Returns `None` for words that are plain identifiers.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        match word {
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            "fn" => Some(TokenKind::Fn),
            "let" => Some(TokenKind::Let),
            "return" => Some(TokenKind::Return),
            _ => None,
        }
    }

    /// Maps a single-character symbol to its token, if it is one.
    pub fn symbol(c: char) -> Option<TokenKind> {
        match c {
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Star),
            '/' => Some(TokenKind::Slash),
            '=' => Some(TokenKind::Assign),
            ',' => Some(TokenKind::Comma),
            ';' => Some(TokenKind::Semicolon),
            _ => None,
        }
    }

    /// True for the end-of-input sentinel.
    pub fn is_end(&self) -> bool {
        matches!(self, TokenKind::EndOfInput)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Number(n) => return write!(f, "{}", n),
            TokenKind::Identifier(name) => return write!(f, "{}", name),
            TokenKind::StringLiteral(s) => return write!(f, "\"{}\"", s),
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Assign => "=",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Fn => "fn",
            TokenKind::Let => "let",
            TokenKind::Return => "return",
            TokenKind::EndOfInput => "",
        };
        f.write_str(text)
    }
}

/// A token with its source location.
///
/// `line` and `col` are 1-based and point at the first character of the
/// token. For [`TokenKind::EndOfInput`] they point just past the last
/// character of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The type and semantic content of this token
    pub kind: TokenKind,

    /// Line number in the source (1-based)
    pub line: usize,

    /// Column number in the source (1-based)
    pub col: usize,
}

impl Token {
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            col: self.col,
        }
    }
}

/// Writes a token sequence back out as source text.
///
/// Tokens are separated by single spaces and the end-of-input sentinel is
/// dropped. Lexing the result yields the same sequence of token kinds.
///
/// ```rust
/// use sponge_syntax::{render_tokens, Token, TokenKind};
///
/// let tokens = vec![
///     Token { kind: TokenKind::Number(1), line: 1, col: 1 },
///     Token { kind: TokenKind::Plus, line: 1, col: 2 },
///     Token { kind: TokenKind::Number(2), line: 1, col: 3 },
///     Token { kind: TokenKind::Semicolon, line: 1, col: 4 },
///     Token { kind: TokenKind::EndOfInput, line: 1, col: 5 },
/// ];
/// assert_eq!(render_tokens(&tokens), "1 + 2 ;");
/// ```
pub fn render_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter(|t| !t.kind.is_end())
        .map(|t| t.kind.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
