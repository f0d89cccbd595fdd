//! Front end
//!
//! Source text → tokens → expression tree.

pub mod lexer;
pub mod parser;

pub use parser::ast::{Expr, Literal, Parameter};

use crate::error::ParseError;
use crate::util::span::SourceFile;

/// Parse a source file into one expression
pub fn parse(source: &SourceFile) -> Result<Expr, ParseError> {
    let tokens = lexer::tokenize(source)?;
    parser::parse(&tokens, &source.name)
}

/// Parse a string under the name `<string>`
pub fn parse_str(source: &str) -> Result<Expr, ParseError> {
    parse(&SourceFile::new("<string>", source))
}
