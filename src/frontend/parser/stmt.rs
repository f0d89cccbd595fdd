//! Definitions: `function` and `node`
//!
//! Both parse into the tree so that the evaluator can reject them with a validation error
//! instead of a syntax error.

use super::ast::*;
use super::expr::{BP_ASSIGN, BP_LOWEST};
use super::state::*;
use crate::error::ParseError;
use crate::frontend::lexer::tokens::TokenKind;
use crate::util::diagnostic::codes;

impl<'a> ParserState<'a> {
    /// `function name(params) [>> ReturnType] { [body] }`
    pub(super) fn parse_function(&mut self) -> Result<Expr, ParseError> {
        let keyword = self.bump();
        let name = match &self.current().kind {
            TokenKind::Identifier(name) => name.clone(),
            _ => return Err(self.error_here(codes::issue(codes::PARSE_EXPECTED_NAME_AFTER_FUNCTION))),
        };
        self.bump();

        self.expect(&TokenKind::LParen)?;
        let mut parameters = Vec::new();
        while !self.at(&TokenKind::RParen) {
            parameters.push(self.parse_parameter()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;

        let return_type = if self.eat(&TokenKind::RShift) {
            Some(Box::new(self.parse_expression(BP_ASSIGN + 1)?))
        } else {
            None
        };
        let body = self.parse_block()?;

        Ok(Expr::FunctionDefinition {
            name,
            parameters,
            return_type,
            body,
            span: keyword.span.to(self.prev_span()),
        })
    }

    fn parse_parameter(&mut self) -> Result<Parameter, ParseError> {
        let start = self.span();
        let type_expr = match self.current().kind {
            TokenKind::Variable(_) => None,
            _ => Some(self.parse_expression(BP_ASSIGN + 1)?),
        };
        let name = match &self.current().kind {
            TokenKind::Variable(name) => name.clone(),
            _ => return Err(self.error_here(codes::issue(codes::PARSE_EXPECTED_VARIABLE))),
        };
        self.bump();
        let value = if self.eat(&TokenKind::Assign) {
            Some(self.parse_expression(BP_ASSIGN + 1)?)
        } else {
            None
        };
        Ok(Parameter {
            name,
            type_expr,
            value,
            span: start.to(self.prev_span()),
        })
    }

    /// `node host, ... [inherits host] { [body] }`
    pub(super) fn parse_node(&mut self) -> Result<Expr, ParseError> {
        let keyword = self.bump();
        let mut host_matches = vec![self.parse_host_match()?];
        while self.eat(&TokenKind::Comma) {
            if self.at(&TokenKind::LBrace) || self.at(&TokenKind::KwInherits) {
                break;
            }
            host_matches.push(self.parse_host_match()?);
        }
        let parent = if self.eat(&TokenKind::KwInherits) {
            Some(Box::new(self.parse_host_match()?))
        } else {
            None
        };
        let body = self.parse_block()?;

        Ok(Expr::NodeDefinition {
            host_matches,
            parent,
            body,
            span: keyword.span.to(self.prev_span()),
        })
    }

    /// A quoted name, a regexp, `default`, or a dotted bare host name
    fn parse_host_match(&mut self) -> Result<Expr, ParseError> {
        let token = self.current();
        match &token.kind {
            TokenKind::String(name) => {
                self.bump();
                Ok(Expr::constant(Literal::String(name.clone()), token.span))
            }
            TokenKind::Regexp(source) => {
                self.bump();
                Ok(Expr::Regexp(source.clone(), token.span))
            }
            TokenKind::KwDefault => {
                self.bump();
                Ok(Expr::constant(Literal::Default, token.span))
            }
            TokenKind::Identifier(first) => {
                self.bump();
                let mut host = first.clone();
                while self.eat(&TokenKind::Dot) {
                    match &self.current().kind {
                        TokenKind::Identifier(segment) => host.push_str(&format!(".{}", segment)),
                        TokenKind::Integer(n) => host.push_str(&format!(".{}", n)),
                        _ => {
                            return Err(self.error_here(codes::issue(
                                codes::PARSE_EXPECTED_NAME_OR_NUMBER_AFTER_DOT,
                            )))
                        }
                    }
                    self.bump();
                }
                Ok(Expr::constant(Literal::String(host), token.span.to(self.prev_span())))
            }
            _ => Err(self.error_here(codes::issue(codes::PARSE_EXPECTED_HOSTNAME))),
        }
    }

    /// `{ }` or `{ expression }`
    fn parse_block(&mut self) -> Result<Option<Box<Expr>>, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        if self.eat(&TokenKind::RBrace) {
            return Ok(None);
        }
        let body = self.parse_expression(BP_LOWEST)?;
        self.expect(&TokenKind::RBrace)?;
        Ok(Some(Box::new(body)))
    }
}
