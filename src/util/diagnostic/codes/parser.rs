//! Parser issues

use super::{IssueDefinition, IssuePhase};

pub const PARSE_CLASS_NOT_VALID_HERE: &str = "PARSE_CLASS_NOT_VALID_HERE";
pub const PARSE_ELSIF_IN_UNLESS: &str = "PARSE_ELSIF_IN_UNLESS";
pub const PARSE_EXPECTED_ATTRIBUTE_NAME: &str = "PARSE_EXPECTED_ATTRIBUTE_NAME";
pub const PARSE_EXPECTED_CLASS_NAME: &str = "PARSE_EXPECTED_CLASS_NAME";
pub const PARSE_EXPECTED_FARROW_AFTER_KEY: &str = "PARSE_EXPECTED_FARROW_AFTER_KEY";
pub const PARSE_EXPECTED_NAME_OR_NUMBER_AFTER_DOT: &str = "PARSE_EXPECTED_NAME_OR_NUMBER_AFTER_DOT";
pub const PARSE_EXPECTED_NAME_AFTER_FUNCTION: &str = "PARSE_EXPECTED_NAME_AFTER_FUNCTION";
pub const PARSE_EXPECTED_HOSTNAME: &str = "PARSE_EXPECTED_HOSTNAME";
pub const PARSE_EXPECTED_TITLE: &str = "PARSE_EXPECTED_TITLE";
pub const PARSE_EXPECTED_TOKEN: &str = "PARSE_EXPECTED_TOKEN";
pub const PARSE_EXPECTED_TYPE_NAME_AFTER_TYPE: &str = "PARSE_EXPECTED_TYPE_NAME_AFTER_TYPE";
pub const PARSE_EXPECTED_VARIABLE: &str = "PARSE_EXPECTED_VARIABLE";
pub const PARSE_ILLEGAL_EPP_PARAMETERS: &str = "PARSE_ILLEGAL_EPP_PARAMETERS";
pub const PARSE_INVALID_RESOURCE: &str = "PARSE_INVALID_RESOURCE";
pub const PARSE_INVALID_ATTRIBUTE: &str = "PARSE_INVALID_ATTRIBUTE";
pub const PARSE_INHERITS_MUST_BE_TYPE_NAME: &str = "PARSE_INHERITS_MUST_BE_TYPE_NAME";
pub const PARSE_RESOURCE_WITHOUT_TITLE: &str = "PARSE_RESOURCE_WITHOUT_TITLE";
pub const PARSE_QUOTED_NOT_VALID_NAME: &str = "PARSE_QUOTED_NOT_VALID_NAME";

/// Parser issue list
pub static PARSER_ISSUES: &[IssueDefinition] = &[
    IssueDefinition {
        code: PARSE_CLASS_NOT_VALID_HERE,
        phase: IssuePhase::Parser,
        message_template: "'class' keyword not allowed at this location",
    },
    IssueDefinition {
        code: PARSE_ELSIF_IN_UNLESS,
        phase: IssuePhase::Parser,
        message_template: "elsif not supported in unless expression",
    },
    IssueDefinition {
        code: PARSE_EXPECTED_ATTRIBUTE_NAME,
        phase: IssuePhase::Parser,
        message_template: "Expected attribute name",
    },
    IssueDefinition {
        code: PARSE_EXPECTED_CLASS_NAME,
        phase: IssuePhase::Parser,
        message_template: "Expected name of class",
    },
    IssueDefinition {
        code: PARSE_EXPECTED_FARROW_AFTER_KEY,
        phase: IssuePhase::Parser,
        message_template: "Expected '=>' to follow hash key",
    },
    IssueDefinition {
        code: PARSE_EXPECTED_NAME_OR_NUMBER_AFTER_DOT,
        phase: IssuePhase::Parser,
        message_template: "Expected name or number to follow '.'",
    },
    IssueDefinition {
        code: PARSE_EXPECTED_NAME_AFTER_FUNCTION,
        phase: IssuePhase::Parser,
        message_template: "Expected a name to follow keyword 'function'",
    },
    IssueDefinition {
        code: PARSE_EXPECTED_HOSTNAME,
        phase: IssuePhase::Parser,
        message_template: "Hostname expected",
    },
    IssueDefinition {
        code: PARSE_EXPECTED_TITLE,
        phase: IssuePhase::Parser,
        message_template: "Resource title expected",
    },
    IssueDefinition {
        code: PARSE_EXPECTED_TOKEN,
        phase: IssuePhase::Parser,
        message_template: "Expected token '{expected}', got '{actual}'",
    },
    IssueDefinition {
        code: PARSE_EXPECTED_TYPE_NAME_AFTER_TYPE,
        phase: IssuePhase::Parser,
        message_template: "Expected type name to follow 'type'",
    },
    IssueDefinition {
        code: PARSE_EXPECTED_VARIABLE,
        phase: IssuePhase::Parser,
        message_template: "Expected variable declaration",
    },
    IssueDefinition {
        code: PARSE_ILLEGAL_EPP_PARAMETERS,
        phase: IssuePhase::Parser,
        message_template: "Ambiguous '-' expression. The operator must be directly followed by its operand",
    },
    IssueDefinition {
        code: PARSE_INVALID_RESOURCE,
        phase: IssuePhase::Parser,
        message_template: "Invalid resource expression",
    },
    IssueDefinition {
        code: PARSE_INVALID_ATTRIBUTE,
        phase: IssuePhase::Parser,
        message_template: "Invalid attribute operation",
    },
    IssueDefinition {
        code: PARSE_INHERITS_MUST_BE_TYPE_NAME,
        phase: IssuePhase::Parser,
        message_template: "Expected type name to follow 'inherits'",
    },
    IssueDefinition {
        code: PARSE_RESOURCE_WITHOUT_TITLE,
        phase: IssuePhase::Parser,
        message_template: "This expression is invalid. Did you try declaring a '{name}' resource without a title?",
    },
    IssueDefinition {
        code: PARSE_QUOTED_NOT_VALID_NAME,
        phase: IssuePhase::Parser,
        message_template: "A quoted string is not valid as a name here",
    },
];
