//! Recursive-descent parser over the token stream.
//!
//! One token of lookahead, no backtracking. Expressions use two precedence
//! tiers (`+ -` over `* /`), both left-associative.

use sponge_stack::ensure_sufficient_stack;
use sponge_syntax::ast::*;
use sponge_syntax::error::{Expected, ParseError};
use sponge_syntax::token::{Token, TokenKind};
use tracing::debug;

type Result<T> = std::result::Result<T, ParseError>;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Returned by `peek` once `tokens` is exhausted, so a stream without a
    /// trailing sentinel behaves like one that has it.
    end: Token,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = match tokens.last() {
            Some(t) if t.kind.is_end() => t.clone(),
            Some(t) => Token {
                kind: TokenKind::EndOfInput,
                line: t.line,
                col: t.col + t.kind.to_string().chars().count(),
            },
            None => Token {
                kind: TokenKind::EndOfInput,
                line: 1,
                col: 1,
            },
        };
        Self { tokens, pos: 0, end }
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.end)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error_here(&self, expected: Expected) -> ParseError {
        let tok = self.peek();
        if tok.kind.is_end() {
            ParseError::UnexpectedEndOfInput {
                expected,
                position: tok.position(),
            }
        } else {
            ParseError::Expected {
                expected,
                found: tok.kind.clone(),
                position: tok.position(),
            }
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(Expected::Token(kind)))
        }
    }

    fn expect_identifier(&mut self) -> Result<String> {
        match &self.peek().kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.error_here(Expected::Identifier)),
        }
    }

    /// Parse the whole token stream. Stops at the first error.
    pub fn parse_program(&mut self) -> Result<Program> {
        let mut stmts = Vec::new();
        while !self.peek().kind.is_end() {
            stmts.push(self.parse_stmt()?);
        }
        debug!(statements = stmts.len(), "parsed program");
        Ok(Program { stmts })
    }

    pub fn parse_stmt(&mut self) -> Result<Stmt> {
        ensure_sufficient_stack(|| match self.peek().kind {
            TokenKind::Let => self.parse_let(),
            TokenKind::If => self.parse_if(),
            TokenKind::Fn => self.parse_fn_decl().map(Stmt::FnDecl),
            TokenKind::Return => self.parse_return(),
            TokenKind::LBrace => self.parse_block().map(Stmt::Block),
            _ => {
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Expr(expr))
            }
        })
    }

    fn parse_let(&mut self) -> Result<Stmt> {
        self.expect(TokenKind::Let)?;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::Assign)?;
        let init = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Let { name, init })
    }

    fn parse_if(&mut self) -> Result<Stmt> {
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        let then_block = self.parse_block()?;
        let else_block = if self.eat(&TokenKind::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            then_block,
            else_block,
        })
    }

    fn parse_fn_decl(&mut self) -> Result<FnDecl> {
        self.expect(TokenKind::Fn)?;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                params.push(self.expect_identifier()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(FnDecl { name, params, body })
    }

    fn parse_return(&mut self) -> Result<Stmt> {
        self.expect(TokenKind::Return)?;
        let value = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Return(value))
    }

    pub fn parse_block(&mut self) -> Result<Block> {
        self.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.peek().kind.is_end() {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Block { stmts })
    }

    /// `Expr := Term (("+"|"-") Term)*`
    pub fn parse_expr(&mut self) -> Result<Expr> {
        ensure_sufficient_stack(|| {
            let mut left = self.parse_term()?;
            loop {
                let op = match self.peek().kind {
                    TokenKind::Plus => BinaryOp::Add,
                    TokenKind::Minus => BinaryOp::Sub,
                    _ => break,
                };
                self.advance();
                let right = self.parse_term()?;
                left = Expr::binary(op, left, right);
            }
            Ok(left)
        })
    }

    /// `Term := Factor (("*"|"/") Factor)*`
    fn parse_term(&mut self) -> Result<Expr> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Expr> {
        match &self.peek().kind {
            TokenKind::Number(n) => {
                let n = *n;
                self.advance();
                Ok(Expr::NumberLiteral(n))
            }
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                if self.eat(&TokenKind::LParen) {
                    let args = self.parse_args()?;
                    Ok(Expr::Call { callee: name, args })
                } else {
                    Ok(Expr::Identifier(name))
                }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Minus => {
                self.advance();
                let operand = ensure_sufficient_stack(|| self.parse_factor())?;
                Ok(Expr::Negate(Box::new(operand)))
            }
            _ => Err(self.error_here(Expected::Expression)),
        }
    }

    /// Arguments after an already consumed `(`, through the closing `)`.
    fn parse_args(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }
}
