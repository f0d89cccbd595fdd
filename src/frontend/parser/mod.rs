//! Parser module
//!
//! A small Pratt parser for the type-expression language. It turns the token stream of one
//! source file into a single expression tree.

pub mod ast;
mod expr;
mod state;
mod stmt;

#[cfg(test)]
mod tests;

pub use expr::{BP_ACCESS, BP_ASSIGN, BP_LOWEST, BP_UNARY};
pub use state::ParserState;

use crate::error::ParseError;
use crate::frontend::lexer::tokens::Token;
use crate::util::diagnostic::codes;
use crate::util::span::Span;
use ast::Expr;

/// Parse a token stream into one expression
///
/// The whole stream must be consumed; trailing tokens are an error.
pub fn parse(
    tokens: &[Token],
    file: &str,
) -> Result<Expr, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::new(
            codes::issue(codes::PARSE_EXPECTED_TOKEN)
                .param("expected", "expression")
                .param("actual", "end of input"),
            file,
            Span::dummy(),
        ));
    }
    let mut state = ParserState::new(tokens, file);
    let expr = state.parse_expression(BP_LOWEST)?;
    if !state.at_end() {
        return Err(state.unexpected());
    }
    tracing::debug!(kind = expr.kind_name(), "parsed expression");
    Ok(expr)
}
