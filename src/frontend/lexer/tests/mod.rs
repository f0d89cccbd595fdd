//! Lexer tests
//!
//! - basic: names, keywords, punctuation, comments and spans
//! - literals: numbers, strings and regexps
//! - heredoc: heredoc declarations, margins and escapes
//! - errors: issue codes raised by the lexer

mod basic;
mod errors;
mod literals;

use super::{tokenize_str, TokenKind};

/// Token kinds without the trailing `Eof`
fn kinds(source: &str) -> Vec<TokenKind> {
    let mut tokens = tokenize_str(source).unwrap();
    assert!(tokens.pop().unwrap().is_eof());
    tokens.into_iter().map(|t| t.kind).collect()
}

/// The single token of `source`
fn single(source: &str) -> TokenKind {
    let mut kinds = kinds(source);
    assert_eq!(kinds.len(), 1, "expected one token in {:?}", source);
    kinds.remove(0)
}

fn error_code(source: &str) -> &'static str {
    tokenize_str(source).unwrap_err().code
}

fn string(text: &str) -> TokenKind {
    TokenKind::String(text.to_string())
}

fn heredoc(text: &str) -> TokenKind {
    TokenKind::Heredoc {
        text: text.to_string(),
        syntax: None,
    }
}
