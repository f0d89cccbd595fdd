//! Parser state and token stream management

use super::super::lexer::tokens::*;
use crate::error::ParseError;
use crate::util::diagnostic::codes::{self, DiagnosticBuilder};
use crate::util::span::Span;

/// Parser state for tracking position in the token stream
#[derive(Debug)]
pub struct ParserState<'a> {
    /// Token stream, always terminated by `Eof`
    tokens: &'a [Token],
    /// Current position in token stream
    pos: usize,
    /// Source file name for errors
    file: &'a str,
}

impl<'a> ParserState<'a> {
    /// Create a new parser state
    #[inline]
    pub fn new(
        tokens: &'a [Token],
        file: &'a str,
    ) -> Self {
        Self {
            tokens,
            pos: 0,
            file,
        }
    }

    /// Check if at end of token stream
    #[inline]
    pub fn at_end(&self) -> bool {
        self.current().is_eof()
    }

    /// Current token; the `Eof` token once the stream is exhausted
    #[inline]
    pub fn current(&self) -> &'a Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    /// Token `n` positions ahead
    #[inline]
    pub fn peek_nth(
        &self,
        n: usize,
    ) -> &'a Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.pos + n).min(last)]
    }

    /// Span of the current token
    #[inline]
    pub fn span(&self) -> Span {
        self.current().span
    }

    /// Span of the previous token
    #[inline]
    pub fn prev_span(&self) -> Span {
        match self.pos.checked_sub(1) {
            Some(prev) => self.tokens[prev].span,
            None => self.span(),
        }
    }

    /// Advance to the next token and return the one just consumed
    #[inline]
    pub fn bump(&mut self) -> &'a Token {
        let token = self.current();
        if !token.is_eof() {
            self.pos += 1;
        }
        token
    }

    /// Check the current token kind
    #[inline]
    pub fn at(
        &self,
        kind: &TokenKind,
    ) -> bool {
        &self.current().kind == kind
    }

    /// Consume the current token when it matches
    #[inline]
    pub fn eat(
        &mut self,
        kind: &TokenKind,
    ) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the expected token or fail with `PARSE_EXPECTED_TOKEN`
    pub fn expect(
        &mut self,
        kind: &TokenKind,
    ) -> Result<&'a Token, ParseError> {
        if self.at(kind) {
            return Ok(self.bump());
        }
        Err(self.error_here(
            codes::issue(codes::PARSE_EXPECTED_TOKEN)
                .param("expected", kind.to_string())
                .param("actual", self.current().kind.describe()),
        ))
    }

    /// Error located at the current token
    pub fn error_here(
        &self,
        builder: DiagnosticBuilder,
    ) -> ParseError {
        self.error_at(builder, self.span())
    }

    /// Error at an arbitrary span
    pub fn error_at(
        &self,
        builder: DiagnosticBuilder,
        span: Span,
    ) -> ParseError {
        ParseError::new(builder, self.file, span)
    }

    /// `LEX_UNEXPECTED_TOKEN` for the current token
    pub fn unexpected(&self) -> ParseError {
        self.error_here(
            codes::issue(codes::LEX_UNEXPECTED_TOKEN).param("token", self.current().kind.describe()),
        )
    }
}
