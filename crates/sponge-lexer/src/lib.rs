//! Spongelang lexer: converts source text into tokens.
use sponge_syntax::error::{LexError, Position};
use sponge_syntax::token::{Token, TokenKind};
use tracing::debug;

/// Tokenize `source` in one call.
///
/// Pure: the same input always yields the same tokens. The sequence always
/// ends with [`TokenKind::EndOfInput`].
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

/// Streaming character scanner that produces tokens with positions.
pub struct Lexer {
    src: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    /// Create a new lexer over the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    fn position(&self) -> Position {
        Position {
            line: self.line,
            col: self.col,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\n' | '\r') = self.peek() {
            self.advance();
        }
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.position();
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let val: i64 = s.parse().map_err(|_| LexError::NumberOutOfRange {
            literal: s.clone(),
            position: start,
        })?;
        Ok(Token {
            kind: TokenKind::Number(val),
            line: start.line,
            col: start.col,
        })
    }

    fn read_ident_or_keyword(&mut self) -> Token {
        let start = self.position();
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let kind = TokenKind::keyword(&s).unwrap_or(TokenKind::Identifier(s));
        Token {
            kind,
            line: start.line,
            col: start.col,
        }
    }

    /// Reads a string literal. The caller has not consumed the opening quote.
    fn read_string(&mut self) -> Result<Token, LexError> {
        let start = self.position();
        self.advance();
        let mut s = String::new();
        while let Some(c) = self.advance() {
            if c == '"' {
                return Ok(Token {
                    kind: TokenKind::StringLiteral(s),
                    line: start.line,
                    col: start.col,
                });
            }
            s.push(c);
        }
        Err(LexError::UnterminatedString { position: start })
    }

    /// Tokenize the entire input into a vector of tokens ending with `EndOfInput`.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let line = self.line;
            let col = self.col;
            let tk = match self.peek() {
                None => {
                    tokens.push(Token {
                        kind: TokenKind::EndOfInput,
                        line,
                        col,
                    });
                    break;
                }
                Some('"') => self.read_string()?,
                Some(c) if c.is_ascii_digit() => self.read_number()?,
                Some(c) if c.is_ascii_alphabetic() || c == '_' => self.read_ident_or_keyword(),
                Some(c) => match TokenKind::symbol(c) {
                    Some(kind) => {
                        self.advance();
                        Token { kind, line, col }
                    }
                    None => {
                        return Err(LexError::UnexpectedCharacter {
                            ch: c,
                            position: Position { line, col },
                        });
                    }
                },
            };
            tokens.push(tk);
        }
        debug!(count = tokens.len(), "tokenized source");
        Ok(tokens)
    }
}
