//! Issue catalog
//!
//! Every error surfaced by the lexer, the parser and the evaluator carries one of these stable
//! codes. Downstream tooling pattern-matches on them, so codes are never renamed.

pub mod builder;
pub mod lexer;
pub mod parser;
pub mod validator;

pub use builder::DiagnosticBuilder;
pub use lexer::*;
pub use parser::*;
pub use validator::*;

use once_cell::sync::Lazy;

/// Phase that raises an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssuePhase {
    Lexer,
    Parser,
    Validator,
}

impl std::fmt::Display for IssuePhase {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            IssuePhase::Lexer => write!(f, "Lexer"),
            IssuePhase::Parser => write!(f, "Parser"),
            IssuePhase::Validator => write!(f, "Validator"),
        }
    }
}

/// Issue definition (metadata only)
#[derive(Debug, Clone, Copy)]
pub struct IssueDefinition {
    /// Stable code, such as `LEX_DIGIT_EXPECTED`
    pub code: &'static str,
    /// Raising phase
    pub phase: IssuePhase,
    /// Message template with `{param}` placeholders
    pub message_template: &'static str,
}

static ISSUES: Lazy<Vec<IssueDefinition>> = Lazy::new(|| {
    let mut issues: Vec<IssueDefinition> = Vec::new();
    issues.extend_from_slice(lexer::LEXER_ISSUES);
    issues.extend_from_slice(parser::PARSER_ISSUES);
    issues.extend_from_slice(validator::VALIDATOR_ISSUES);
    issues
});

impl IssueDefinition {
    /// Find an issue by code
    pub fn find(code: &str) -> Option<&'static Self> {
        ISSUES.iter().find(|c| c.code == code)
    }

    /// All issues
    pub fn all() -> &'static [Self] {
        &ISSUES
    }

    /// Issues raised by one phase
    pub fn by_phase(phase: IssuePhase) -> impl Iterator<Item = &'static Self> {
        ISSUES.iter().filter(move |c| c.phase == phase)
    }

    /// Create a builder for this issue
    pub fn builder(&self) -> DiagnosticBuilder {
        DiagnosticBuilder::new(self.code, self.message_template)
    }
}

/// Builder for a registered code.
///
/// Codes are the constants exported by this module; an unregistered code renders its own name as
/// the message.
pub fn issue(code: &'static str) -> DiagnosticBuilder {
    match IssueDefinition::find(code) {
        Some(definition) => definition.builder(),
        None => DiagnosticBuilder::new(code, code),
    }
}
