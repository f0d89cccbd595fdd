//! Diagnostics
//!
//! Error reporting, the issue catalog and a plain-text renderer.
//!
//! # Modules
//!
//! - [`error`] - diagnostic data (Diagnostic, Severity)
//! - [`codes`] - issue catalog and builder
//!
//! # Example
//!
//! ```
//! use pcore::util::diagnostic::{codes, DiagnosticRenderer, EmitterConfig};
//! use pcore::util::span::SourceFile;
//!
//! let file = SourceFile::new("init.pp", "Integer[1,");
//! let span = file.span_from_range(10, 10);
//! let diagnostic = codes::issue(codes::PARSE_EXPECTED_TOKEN)
//!     .param("expected", "]")
//!     .param("actual", "end of input")
//!     .at(span)
//!     .build();
//! let renderer = DiagnosticRenderer::with_config(EmitterConfig { use_colors: false, ..Default::default() });
//! assert!(renderer.render(&diagnostic, Some(&file)).contains("PARSE_EXPECTED_TOKEN"));
//! ```

pub mod codes;
pub mod error;

pub use codes::{DiagnosticBuilder, IssueDefinition, IssuePhase};
pub use error::{Diagnostic, Severity};

use owo_colors::OwoColorize;

use crate::util::span::SourceFile;

/// Renderer configuration
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// Use ANSI colors
    pub use_colors: bool,
    /// Show the source line with an underline
    pub show_source: bool,
    /// Show help text
    pub show_help: bool,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            use_colors: true,
            show_source: true,
            show_help: true,
        }
    }
}

/// Diagnostic renderer
#[derive(Debug, Clone, Default)]
pub struct DiagnosticRenderer {
    config: EmitterConfig,
}

impl DiagnosticRenderer {
    /// Renderer with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer with a custom configuration
    pub fn with_config(config: EmitterConfig) -> Self {
        Self { config }
    }

    /// Render one diagnostic
    pub fn render(
        &self,
        diagnostic: &Diagnostic,
        source_file: Option<&SourceFile>,
    ) -> String {
        let mut output = self.render_header(diagnostic);

        if self.config.show_source {
            output.push_str(&self.render_location(diagnostic, source_file));
            if let Some(snippet) = self.render_snippet(diagnostic, source_file) {
                output.push_str(&snippet);
            }
        }

        if self.config.show_help {
            if let Some(help) = &diagnostic.help {
                output.push_str(&format!("  = {}: {}\n", self.bold("help"), help));
            }
        }
        output
    }

    /// Render several diagnostics against the same file
    pub fn render_all<'a>(
        &self,
        diagnostics: impl IntoIterator<Item = &'a Diagnostic>,
        source_file: Option<&SourceFile>,
    ) -> String {
        let mut output = String::new();
        for diagnostic in diagnostics {
            output.push_str(&self.render(diagnostic, source_file));
            output.push('\n');
        }
        output
    }

    fn render_header(
        &self,
        diagnostic: &Diagnostic,
    ) -> String {
        let severity = diagnostic.severity.to_string();
        let severity = if !self.config.use_colors {
            severity
        } else if diagnostic.severity.is_error() {
            severity.red().bold().to_string()
        } else {
            severity.yellow().bold().to_string()
        };
        format!(
            "{}{}: {}\n",
            severity,
            self.bold(&format!("[{}]", diagnostic.code)),
            diagnostic.message
        )
    }

    fn render_location(
        &self,
        diagnostic: &Diagnostic,
        source_file: Option<&SourceFile>,
    ) -> String {
        match diagnostic.span {
            Some(span) if !span.is_dummy() => {
                let file_name = diagnostic
                    .file
                    .as_deref()
                    .or(source_file.map(|sf| sf.name.as_str()))
                    .unwrap_or("<unknown>");
                format!(
                    " --> {}:{}:{}\n",
                    file_name, span.start.line, span.start.column
                )
            }
            _ => String::new(),
        }
    }

    fn render_snippet(
        &self,
        diagnostic: &Diagnostic,
        source_file: Option<&SourceFile>,
    ) -> Option<String> {
        let span = diagnostic.span?;
        if span.is_dummy() {
            return None;
        }
        let line = source_file?.line_text(span.start.line)?;
        let width = if span.end.line == span.start.line {
            span.end.column.saturating_sub(span.start.column).max(1)
        } else {
            line.chars().count().saturating_sub(span.start.column - 1).max(1)
        };
        let carets = "^".repeat(width);
        let carets = if self.config.use_colors {
            carets.red().to_string()
        } else {
            carets
        };
        Some(format!(
            "{:>4} | {}\n     | {}{}\n",
            span.start.line,
            line,
            " ".repeat(span.start.column - 1),
            carets
        ))
    }

    fn bold(
        &self,
        text: &str,
    ) -> String {
        if self.config.use_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}
