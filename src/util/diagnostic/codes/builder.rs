//! Diagnostic builder
//!
//! Renders `{param}` placeholders of an issue's message template.

use crate::util::diagnostic::{Diagnostic, Severity};
use crate::util::span::Span;

/// Diagnostic builder with template parameters
#[derive(Debug, Clone)]
pub struct DiagnosticBuilder {
    code: &'static str,
    message_template: &'static str,
    params: Vec<(&'static str, String)>,
    severity: Severity,
    help: Option<String>,
    file: Option<String>,
    span: Option<Span>,
}

impl DiagnosticBuilder {
    /// Create a new builder
    pub fn new(
        code: &'static str,
        template: &'static str,
    ) -> Self {
        Self {
            code,
            message_template: template,
            params: Vec::new(),
            severity: Severity::Error,
            help: None,
            file: None,
            span: None,
        }
    }

    /// Add a template parameter
    pub fn param(
        mut self,
        key: &'static str,
        value: impl Into<String>,
    ) -> Self {
        self.params.push((key, value.into()));
        self
    }

    /// Set the location
    #[inline]
    pub fn at(
        mut self,
        span: Span,
    ) -> Self {
        self.span = Some(span);
        self
    }

    /// Set the source file name
    #[inline]
    pub fn in_file(
        mut self,
        file: impl Into<String>,
    ) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Add help text
    #[inline]
    pub fn help(
        mut self,
        help: impl Into<String>,
    ) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Downgrade to a warning
    #[inline]
    pub fn warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    /// Render the message template
    pub fn message(&self) -> String {
        render_template(self.message_template, &self.params)
    }

    /// Build the diagnostic
    pub fn build(self) -> Diagnostic {
        let mut diagnostic = Diagnostic::new(self.severity, self.code, self.message());
        diagnostic.help = self.help;
        diagnostic.file = self.file;
        diagnostic.span = self.span;
        diagnostic
    }

    /// Build the diagnostic with an already rendered message
    pub fn build_with_message(
        self,
        message: String,
    ) -> Diagnostic {
        let mut diagnostic = self.build();
        diagnostic.message = message;
        diagnostic
    }
}

/// Replace every `{key}` with its parameter value. Unknown keys are left in place.
pub(crate) fn render_template(
    template: &str,
    params: &[(&'static str, String)],
) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '{' {
            out.push(c);
            continue;
        }
        let mut key = String::new();
        let mut closed = false;
        while let Some(&n) = chars.peek() {
            chars.next();
            if n == '}' {
                closed = true;
                break;
            }
            key.push(n);
        }
        match params.iter().find(|(k, _)| *k == key) {
            Some((_, value)) if closed => out.push_str(value),
            _ => {
                debug_assert!(!closed, "missing template parameter '{}'", key);
                out.push('{');
                out.push_str(&key);
                if closed {
                    out.push('}');
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template() {
        let params = vec![("expected", "]".to_string()), ("actual", ")".to_string())];
        assert_eq!(
            render_template("Expected '{expected}', got '{actual}'", &params),
            "Expected ']', got ')'"
        );
        assert_eq!(render_template("no params", &[]), "no params");
    }

    #[test]
    fn test_build_carries_location() {
        let diagnostic = DiagnosticBuilder::new("LEX_INVALID_OPERATOR", "invalid operator '{op}'")
            .param("op", ">")
            .in_file("x.pp")
            .help("remove it")
            .build();
        assert_eq!(diagnostic.code, "LEX_INVALID_OPERATOR");
        assert_eq!(diagnostic.message, "invalid operator '>'");
        assert_eq!(diagnostic.file.as_deref(), Some("x.pp"));
        assert_eq!(diagnostic.help.as_deref(), Some("remove it"));
        assert!(diagnostic.severity.is_error());
    }
}
