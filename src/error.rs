//! Error types
//!
//! Three kinds of failure are kept apart: issue-coded front-end errors (lexer, parser and
//! validator), type assertion errors that carry the path of the failing value, and resolver
//! errors for names, references and version checks.

use thiserror::Error;

use crate::util::diagnostic::{codes, Diagnostic};
use crate::util::span::Span;

/// Lexer or parser failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({code}) at {file}:{line}:{column}", line = .span.start.line, column = .span.start.column)]
pub struct ParseError {
    /// Stable issue code
    pub code: &'static str,
    /// Rendered message
    pub message: String,
    /// Source file name
    pub file: String,
    /// Location of the offending text
    pub span: Span,
}

impl ParseError {
    pub(crate) fn new(
        builder: codes::DiagnosticBuilder,
        file: &str,
        span: Span,
    ) -> Self {
        let diagnostic = builder.build();
        Self {
            code: diagnostic.code,
            message: diagnostic.message,
            file: file.to_string(),
            span,
        }
    }

    /// Char offset of the offending text
    pub fn offset(&self) -> usize {
        self.span.start.offset
    }

    /// Length of the offending text in chars
    pub fn length(&self) -> usize {
        self.span.len()
    }

    /// Convert for rendering
    pub fn to_diagnostic(&self) -> Diagnostic {
        codes::issue(self.code)
            .in_file(self.file.clone())
            .at(self.span)
            .build_with_message(self.message.clone())
    }
}

/// An expression that parses but cannot be turned into a type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({code}) at {line}:{column}", line = .span.start.line, column = .span.start.column)]
pub struct ValidationError {
    /// Stable `VALIDATE_*` code
    pub code: &'static str,
    /// Rendered message
    pub message: String,
    /// Location of the expression
    pub span: Span,
}

impl ValidationError {
    pub(crate) fn new(
        builder: codes::DiagnosticBuilder,
        span: Span,
    ) -> Self {
        let diagnostic = builder.build();
        Self {
            code: diagnostic.code,
            message: diagnostic.message,
            span,
        }
    }

    /// Convert for rendering
    pub fn to_diagnostic(&self) -> Diagnostic {
        codes::issue(self.code)
            .at(self.span)
            .build_with_message(self.message.clone())
    }
}

/// A value does not match the type it is asserted against
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_path(.path, .message))]
pub struct TypeAssertionError {
    /// Location of the failing value, such as `initHash['types']['Foo']`
    pub path: String,
    /// What went wrong
    pub message: String,
}

fn join_path(
    path: &str,
    message: &str,
) -> String {
    if path.is_empty() {
        message.to_string()
    } else {
        format!("{} {}", path, message)
    }
}

impl TypeAssertionError {
    pub fn new(
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A name, reference or version cannot be resolved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TypeResolverError {
    pub message: String,
}

impl TypeResolverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Any failure of the type core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PcoreError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    TypeAssertion(#[from] TypeAssertionError),
    #[error(transparent)]
    TypeResolver(#[from] TypeResolverError),
}

impl PcoreError {
    /// The issue code for front-end errors
    pub fn code(&self) -> Option<&'static str> {
        match self {
            PcoreError::Parse(e) => Some(e.code),
            PcoreError::Validation(e) => Some(e.code),
            _ => None,
        }
    }
}

/// Result type of the crate
pub type Result<T> = std::result::Result<T, PcoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::span::SourceFile;

    #[test]
    fn test_parse_error_display() {
        let file = SourceFile::new("x.pp", "ab\n  12x");
        let span = file.span_from_range(5, 8);
        let err = ParseError::new(codes::issue(codes::LEX_DIGIT_EXPECTED), "x.pp", span);
        assert_eq!(err.to_string(), "Digit expected (LEX_DIGIT_EXPECTED) at x.pp:2:3");
        assert_eq!(err.offset(), 5);
        assert_eq!(err.length(), 3);
        assert_eq!(err.to_diagnostic().file.as_deref(), Some("x.pp"));
    }

    #[test]
    fn test_assertion_path() {
        let err = TypeAssertionError::new("initHash['types']", "expects a Hash value, got Integer");
        assert_eq!(
            err.to_string(),
            "initHash['types'] expects a Hash value, got Integer"
        );
        let err = TypeAssertionError::new("", "bad range");
        assert_eq!(err.to_string(), "bad range");
    }

    #[test]
    fn test_code_of_wrapped_errors() {
        let err: PcoreError = TypeResolverError::new("nope").into();
        assert_eq!(err.code(), None);
        assert_eq!(err.to_string(), "nope");
    }
}
