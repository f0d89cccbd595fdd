//! Lexer
//!
//! Turns type-expression source into tokens:
//! - names, type names and `$variables`
//! - integers (decimal, octal, hex) and floats
//! - single and double quoted strings, regexps and heredocs
//! - punctuation and the few keywords the expression language knows

mod heredoc;
pub mod literals;
pub mod tokenizer;
pub mod tokens;

#[cfg(test)]
mod tests;

pub use tokenizer::Lexer;
pub use tokens::{Token, TokenKind};

use crate::error::ParseError;
use crate::util::span::SourceFile;

/// Tokenize a whole source file. The last token is always `Eof`.
pub fn tokenize(source: &SourceFile) -> Result<Vec<Token>, ParseError> {
    tracing::debug!(file = %source.name, chars = source.content.len(), "lexing");

    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let eof = token.is_eof();
        tracing::trace!(token = %token.kind, span = %token.span, "token");
        tokens.push(token);
        if eof {
            break;
        }
    }

    tracing::debug!(count = tokens.len(), "lexing complete");
    Ok(tokens)
}

/// Tokenize a string under the name `<string>`
pub fn tokenize_str(source: &str) -> Result<Vec<Token>, ParseError> {
    tokenize(&SourceFile::new("<string>", source))
}
