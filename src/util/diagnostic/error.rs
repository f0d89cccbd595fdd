//! Diagnostic data structures
//!
//! - `Diagnostic` holds a fully rendered message; it is produced by a
//!   [`DiagnosticBuilder`](super::codes::DiagnosticBuilder) so that every code shown to a user is
//!   registered in the issue catalog.
//! - Lexer, parser and validator errors convert into a `Diagnostic` for rendering.

use crate::util::span::Span;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A rendered diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity
    pub severity: Severity,
    /// Issue code, such as `LEX_DIGIT_EXPECTED`
    pub code: &'static str,
    /// Rendered message
    pub message: String,
    /// Optional help text
    pub help: Option<String>,
    /// Source file name
    pub file: Option<String>,
    /// Location
    pub span: Option<Span>,
}

impl Diagnostic {
    pub(crate) fn new(
        severity: Severity,
        code: &'static str,
        message: String,
    ) -> Self {
        Self {
            severity,
            code,
            message,
            help: None,
            file: None,
            span: None,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}
