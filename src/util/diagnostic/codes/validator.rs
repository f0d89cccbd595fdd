//! Validation issues raised while turning expressions into types

use super::{IssueDefinition, IssuePhase};

pub const VALIDATE_APPENDS_DELETES_NO_LONGER_SUPPORTED: &str =
    "VALIDATE_APPENDS_DELETES_NO_LONGER_SUPPORTED";
pub const VALIDATE_CROSS_SCOPE_ASSIGNMENT: &str = "VALIDATE_CROSS_SCOPE_ASSIGNMENT";
pub const VALIDATE_IDEM_EXPRESSION_NOT_LAST: &str = "VALIDATE_IDEM_EXPRESSION_NOT_LAST";
pub const VALIDATE_ILLEGAL_ASSIGNMENT_VIA_INDEX: &str = "VALIDATE_ILLEGAL_ASSIGNMENT_VIA_INDEX";
pub const VALIDATE_ILLEGAL_ATTRIBUTE_APPEND: &str = "VALIDATE_ILLEGAL_ATTRIBUTE_APPEND";
pub const VALIDATE_ILLEGAL_EXPRESSION: &str = "VALIDATE_ILLEGAL_EXPRESSION";
pub const VALIDATE_ILLEGAL_NUMERIC_ASSIGNMENT: &str = "VALIDATE_ILLEGAL_NUMERIC_ASSIGNMENT";
pub const VALIDATE_NOT_RVALUE: &str = "VALIDATE_NOT_RVALUE";

/// Validator issue list
pub static VALIDATOR_ISSUES: &[IssueDefinition] = &[
    IssueDefinition {
        code: VALIDATE_APPENDS_DELETES_NO_LONGER_SUPPORTED,
        phase: IssuePhase::Validator,
        message_template: "The operator '{operator}' is no longer supported",
    },
    IssueDefinition {
        code: VALIDATE_CROSS_SCOPE_ASSIGNMENT,
        phase: IssuePhase::Validator,
        message_template: "Illegal attempt to assign to '{name}'. Cannot assign to variables in other namespaces",
    },
    IssueDefinition {
        code: VALIDATE_IDEM_EXPRESSION_NOT_LAST,
        phase: IssuePhase::Validator,
        message_template: "This {expression} has no effect. A value was produced and then forgotten",
    },
    IssueDefinition {
        code: VALIDATE_ILLEGAL_ASSIGNMENT_VIA_INDEX,
        phase: IssuePhase::Validator,
        message_template: "Illegal attempt to assign via [index/key]. Not an assignable reference",
    },
    IssueDefinition {
        code: VALIDATE_ILLEGAL_ATTRIBUTE_APPEND,
        phase: IssuePhase::Validator,
        message_template: "Illegal +> operation on attribute {attribute}",
    },
    IssueDefinition {
        code: VALIDATE_ILLEGAL_EXPRESSION,
        phase: IssuePhase::Validator,
        message_template: "Illegal expression. {expression} is unacceptable as {feature} in {container}",
    },
    IssueDefinition {
        code: VALIDATE_ILLEGAL_NUMERIC_ASSIGNMENT,
        phase: IssuePhase::Validator,
        message_template: "Illegal attempt to assign to the numeric value '{value}'",
    },
    IssueDefinition {
        code: VALIDATE_NOT_RVALUE,
        phase: IssuePhase::Validator,
        message_template: "Invalid use of expression. {expression} does not produce a value",
    },
];
