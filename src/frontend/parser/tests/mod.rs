//! Parser tests
//!
//! - basic: constants, names and negation
//! - collections: arrays, hashes and access
//! - heredoc: heredocs inside expressions
//! - definitions: `function`, `node` and `type` declarations
//! - errors: syntax errors and their codes
//! - printer: printed trees parse back to equal trees
//! - fuzz: property based round trips

mod basic;
mod collections;
mod definitions;
mod fuzz;

use crate::frontend::parse_str;
use crate::frontend::parser::ast::{Expr, Literal};
use crate::util::span::Span;

fn parse(source: &str) -> Expr {
    parse_str(source).unwrap_or_else(|e| panic!("{:?} failed: {}", source, e))
}

fn error_code(source: &str) -> &'static str {
    parse_str(source).unwrap_err().code
}

fn constant(literal: Literal) -> Expr {
    Expr::Literal(literal, Span::dummy())
}

fn int(n: i64) -> Expr {
    constant(Literal::Integer(n))
}

fn float(x: f64) -> Expr {
    constant(Literal::Float(x))
}

fn string(s: &str) -> Expr {
    constant(Literal::String(s.to_string()))
}

fn identifier(name: &str) -> Expr {
    Expr::Identifier(name.to_string(), Span::dummy())
}

fn type_name(name: &str) -> Expr {
    Expr::TypeName(name.to_string(), Span::dummy())
}

fn array(elements: Vec<Expr>) -> Expr {
    Expr::Array(elements, Span::dummy())
}

fn hash(entries: Vec<(Expr, Expr)>) -> Expr {
    Expr::Hash(entries, Span::dummy())
}

fn access(
    target: Expr,
    params: Vec<Expr>,
) -> Expr {
    Expr::Access {
        target: Box::new(target),
        params,
        span: Span::dummy(),
    }
}

fn heredoc(
    text: &str,
    syntax: Option<&str>,
) -> Expr {
    Expr::Heredoc {
        text: text.to_string(),
        syntax: syntax.map(str::to_string),
        span: Span::dummy(),
    }
}
