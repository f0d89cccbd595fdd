//! Pratt Parser expression parsing
//!
//! Only two infix forms exist: postfix access `x[...]` and right associative assignment
//! `x = y`. Everything else is a prefix form.

use super::ast::*;
use super::state::*;
use crate::error::ParseError;
use crate::frontend::lexer::tokens::{Token, TokenKind};
use crate::util::diagnostic::codes;

/// Binding power levels
pub const BP_LOWEST: u8 = 0;
pub const BP_ASSIGN: u8 = 10;
pub const BP_UNARY: u8 = 80;
pub const BP_ACCESS: u8 = 90;

impl<'a> ParserState<'a> {
    /// Parse an expression whose infix operators bind at least `min_bp`
    pub fn parse_expression(
        &mut self,
        min_bp: u8,
    ) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            match self.current().kind {
                TokenKind::LBracket if BP_ACCESS >= min_bp => {
                    lhs = self.parse_access(lhs)?;
                }
                TokenKind::Assign if BP_ASSIGN >= min_bp => {
                    self.bump();
                    let rhs = self.parse_expression(BP_ASSIGN)?;
                    let span = lhs.span().to(rhs.span());
                    lhs = Expr::Assignment {
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                        span,
                    };
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    /// Prefix forms
    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let token = self.current();
        let span = token.span;
        let expr = match &token.kind {
            TokenKind::Minus => return self.parse_minus(),
            TokenKind::LBracket => return self.parse_array(),
            TokenKind::LBrace => return self.parse_hash(),
            TokenKind::KwType => return self.parse_type_declaration(),
            TokenKind::KwFunction => return self.parse_function(),
            TokenKind::KwNode => return self.parse_node(),
            TokenKind::KwClass => {
                return Err(self.error_here(codes::issue(codes::PARSE_CLASS_NOT_VALID_HERE)))
            }
            TokenKind::Eof => {
                return Err(self.error_here(
                    codes::issue(codes::PARSE_EXPECTED_TOKEN)
                        .param("expected", "expression")
                        .param("actual", "end of input"),
                ))
            }
            TokenKind::Integer(n) => Expr::constant(Literal::Integer(*n), span),
            TokenKind::Float(x) => Expr::constant(Literal::Float(*x), span),
            TokenKind::String(s) => Expr::constant(Literal::String(s.clone()), span),
            TokenKind::KwTrue => Expr::constant(Literal::Boolean(true), span),
            TokenKind::KwFalse => Expr::constant(Literal::Boolean(false), span),
            TokenKind::KwUndef => Expr::constant(Literal::Undef, span),
            TokenKind::KwDefault => Expr::constant(Literal::Default, span),
            TokenKind::Regexp(source) => Expr::Regexp(source.clone(), span),
            TokenKind::Heredoc { text, syntax } => Expr::Heredoc {
                text: text.clone(),
                syntax: syntax.clone(),
                span,
            },
            TokenKind::Identifier(name) => Expr::Identifier(name.clone(), span),
            TokenKind::TypeName(name) => Expr::TypeName(name.clone(), span),
            _ => return Err(self.unexpected()),
        };
        self.bump();
        Ok(expr)
    }

    /// `-` must touch its operand. Negative numbers are single tokens, so the operand here is
    /// never a number.
    fn parse_minus(&mut self) -> Result<Expr, ParseError> {
        let minus = self.bump();
        let operand = self.current();
        if !minus.span.is_adjacent_to(&operand.span) || operand.is_eof() {
            return Err(self.error_at(
                codes::issue(codes::PARSE_ILLEGAL_EPP_PARAMETERS),
                minus.span.to(operand.span),
            ));
        }

        let operand = self.parse_expression(BP_UNARY)?;
        let span = minus.span.to(operand.span());
        Ok(Expr::Negate(Box::new(operand), span))
    }

    /// Comma separated expressions up to `close`; a trailing comma is allowed
    fn parse_list(
        &mut self,
        close: &TokenKind,
    ) -> Result<Vec<Expr>, ParseError> {
        let mut items = Vec::new();
        while !self.at(close) {
            items.push(self.parse_expression(BP_LOWEST)?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(close)?;
        Ok(items)
    }

    fn parse_array(&mut self) -> Result<Expr, ParseError> {
        let open = self.bump();
        let elements = self.parse_list(&TokenKind::RBracket)?;
        Ok(Expr::Array(elements, open.span.to(self.prev_span())))
    }

    fn parse_hash(&mut self) -> Result<Expr, ParseError> {
        let open = self.bump();
        let mut entries = Vec::new();
        while !self.at(&TokenKind::RBrace) {
            let key = match self.keyword_key() {
                Some(key) => key,
                None => self.parse_expression(BP_ASSIGN + 1)?,
            };
            if !self.eat(&TokenKind::FatArrow) {
                return Err(self.error_here(codes::issue(codes::PARSE_EXPECTED_FARROW_AFTER_KEY)));
            }
            let value = self.parse_expression(BP_LOWEST)?;
            entries.push((key, value));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(Expr::Hash(entries, open.span.to(self.prev_span())))
    }

    /// A keyword directly followed by `=>` is a bare word key
    fn keyword_key(&mut self) -> Option<Expr> {
        let token = self.current();
        match token.kind {
            TokenKind::KwType
            | TokenKind::KwFunction
            | TokenKind::KwNode
            | TokenKind::KwClass
            | TokenKind::KwUnless
            | TokenKind::KwElsif
            | TokenKind::KwInherits => {}
            _ => return None,
        }
        if !matches!(self.peek_nth(1).kind, TokenKind::FatArrow) {
            return None;
        }
        self.bump();
        Some(Expr::Identifier(token.kind.to_string(), token.span))
    }

    fn parse_access(
        &mut self,
        target: Expr,
    ) -> Result<Expr, ParseError> {
        self.bump();
        if self.at(&TokenKind::RBracket) {
            return Err(self.error_here(
                codes::issue(codes::PARSE_EXPECTED_TOKEN)
                    .param("expected", "expression")
                    .param("actual", "]"),
            ));
        }
        let params = self.parse_list(&TokenKind::RBracket)?;
        let span = target.span().to(self.prev_span());
        Ok(Expr::Access {
            target: Box::new(target),
            params,
            span,
        })
    }

    fn parse_type_declaration(&mut self) -> Result<Expr, ParseError> {
        let keyword = self.bump();
        let name: &Token = self.current();
        match &name.kind {
            TokenKind::TypeName(type_name) => {
                self.bump();
                Ok(Expr::TypeDeclaration(type_name.clone(), keyword.span.to(name.span)))
            }
            TokenKind::String(_) => Err(self.error_here(codes::issue(codes::PARSE_QUOTED_NOT_VALID_NAME))),
            _ => Err(self.error_here(codes::issue(codes::PARSE_EXPECTED_TYPE_NAME_AFTER_TYPE))),
        }
    }
}
