//! Clock text lexer using logos

use super::token::{Token, TokenKind};
use crate::common::{HtError, HtResult, Span};
use logos::Logos;

/// Lexer for a single clock text field
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    peeked: Option<Token>,
    at_eof: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            peeked: None,
            at_eof: false,
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> HtResult<Token> {
        if let Some(token) = self.peeked.take() {
            return Ok(token);
        }

        if self.at_eof {
            let len = self.inner.source().len();
            return Ok(Token::new(TokenKind::Eof, Span::new(len, len)));
        }

        match self.inner.next() {
            Some(Ok(kind)) => Ok(Token::new(kind, Span::from(self.inner.span()))),
            Some(Err(())) => Err(HtError::malformed_duration(
                self.inner.source(),
                format!(
                    "unexpected character '{}' at column {}",
                    self.inner.slice(),
                    self.inner.span().start + 1
                ),
            )),
            None => {
                self.at_eof = true;
                let len = self.inner.source().len();
                Ok(Token::new(TokenKind::Eof, Span::new(len, len)))
            }
        }
    }

    /// Peek at the next token without consuming it
    pub fn peek(&mut self) -> HtResult<&Token> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.next_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    /// Consume the next token if it matches, return true if consumed
    pub fn match_token(&mut self, expected: &TokenKind) -> HtResult<bool> {
        if std::mem::discriminant(&self.peek()?.kind) == std::mem::discriminant(expected) {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Expect a specific token kind, error if not found
    pub fn expect(&mut self, expected: TokenKind) -> HtResult<Token> {
        let token = self.next_token()?;
        if std::mem::discriminant(&token.kind) == std::mem::discriminant(&expected) {
            Ok(token)
        } else {
            Err(HtError::malformed_duration(
                self.source(),
                format!(
                    "expected {}, found {} at column {}",
                    expected,
                    token.kind,
                    token.span.start + 1
                ),
            ))
        }
    }

    /// Expect a run of digits and return them
    pub fn expect_digits(&mut self, what: &str) -> HtResult<String> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::Digits(digits) => Ok(digits),
            other => Err(HtError::malformed_duration(
                self.source(),
                format!("expected {what}, found {other} at column {}", token.span.start + 1),
            )),
        }
    }

    /// Get the source being lexed
    pub fn source(&self) -> &'a str {
        self.inner.source()
    }
}
