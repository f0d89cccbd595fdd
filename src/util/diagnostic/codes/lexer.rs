//! Lexer issues

use super::{IssueDefinition, IssuePhase};

pub const LEX_DIGIT_EXPECTED: &str = "LEX_DIGIT_EXPECTED";
pub const LEX_HEXDIGIT_EXPECTED: &str = "LEX_HEXDIGIT_EXPECTED";
pub const LEX_OCTALDIGIT_EXPECTED: &str = "LEX_OCTALDIGIT_EXPECTED";
pub const LEX_INTEGER_OUT_OF_RANGE: &str = "LEX_INTEGER_OUT_OF_RANGE";
pub const LEX_DOUBLE_COLON_NOT_FOLLOWED_BY_NAME: &str = "LEX_DOUBLE_COLON_NOT_FOLLOWED_BY_NAME";
pub const LEX_INVALID_NAME: &str = "LEX_INVALID_NAME";
pub const LEX_INVALID_TYPE_NAME: &str = "LEX_INVALID_TYPE_NAME";
pub const LEX_INVALID_VARIABLE_NAME: &str = "LEX_INVALID_VARIABLE_NAME";
pub const LEX_INVALID_OPERATOR: &str = "LEX_INVALID_OPERATOR";
pub const LEX_MALFORMED_INTERPOLATION: &str = "LEX_MALFORMED_INTERPOLATION";
pub const LEX_MALFORMED_UNICODE_ESCAPE: &str = "LEX_MALFORMED_UNICODE_ESCAPE";
pub const LEX_UNTERMINATED_STRING: &str = "LEX_UNTERMINATED_STRING";
pub const LEX_UNTERMINATED_COMMENT: &str = "LEX_UNTERMINATED_COMMENT";
pub const LEX_UNBALANCED_EPP_COMMENT: &str = "LEX_UNBALANCED_EPP_COMMENT";
pub const LEX_HEREDOC_EMPTY_TAG: &str = "LEX_HEREDOC_EMPTY_TAG";
pub const LEX_HEREDOC_ILLEGAL_ESCAPE: &str = "LEX_HEREDOC_ILLEGAL_ESCAPE";
pub const LEX_HEREDOC_MULTIPLE_ESCAPE: &str = "LEX_HEREDOC_MULTIPLE_ESCAPE";
pub const LEX_HEREDOC_MULTIPLE_SYNTAX: &str = "LEX_HEREDOC_MULTIPLE_SYNTAX";
pub const LEX_HEREDOC_MULTIPLE_TAG: &str = "LEX_HEREDOC_MULTIPLE_TAG";
pub const LEX_HEREDOC_DECL_UNTERMINATED: &str = "LEX_HEREDOC_DECL_UNTERMINATED";
pub const LEX_HEREDOC_UNTERMINATED: &str = "LEX_HEREDOC_UNTERMINATED";
pub const LEX_UNEXPECTED_TOKEN: &str = "LEX_UNEXPECTED_TOKEN";

/// Lexer issue list
pub static LEXER_ISSUES: &[IssueDefinition] = &[
    IssueDefinition {
        code: LEX_DIGIT_EXPECTED,
        phase: IssuePhase::Lexer,
        message_template: "Digit expected",
    },
    IssueDefinition {
        code: LEX_HEXDIGIT_EXPECTED,
        phase: IssuePhase::Lexer,
        message_template: "Hexadecimal digit expected",
    },
    IssueDefinition {
        code: LEX_OCTALDIGIT_EXPECTED,
        phase: IssuePhase::Lexer,
        message_template: "Octal digit expected",
    },
    IssueDefinition {
        code: LEX_INTEGER_OUT_OF_RANGE,
        phase: IssuePhase::Lexer,
        message_template: "Integer literal '{value}' does not fit in 64 bits",
    },
    IssueDefinition {
        code: LEX_DOUBLE_COLON_NOT_FOLLOWED_BY_NAME,
        phase: IssuePhase::Lexer,
        message_template: "'::' not followed by a name segment",
    },
    IssueDefinition {
        code: LEX_INVALID_NAME,
        phase: IssuePhase::Lexer,
        message_template: "Invalid name '{name}'",
    },
    IssueDefinition {
        code: LEX_INVALID_TYPE_NAME,
        phase: IssuePhase::Lexer,
        message_template: "Invalid type name '{name}'",
    },
    IssueDefinition {
        code: LEX_INVALID_VARIABLE_NAME,
        phase: IssuePhase::Lexer,
        message_template: "Invalid variable name",
    },
    IssueDefinition {
        code: LEX_INVALID_OPERATOR,
        phase: IssuePhase::Lexer,
        message_template: "Invalid operator '{operator}'",
    },
    IssueDefinition {
        code: LEX_MALFORMED_INTERPOLATION,
        phase: IssuePhase::Lexer,
        message_template: "Malformed interpolation expression",
    },
    IssueDefinition {
        code: LEX_MALFORMED_UNICODE_ESCAPE,
        phase: IssuePhase::Lexer,
        message_template: "Malformed unicode escape sequence",
    },
    IssueDefinition {
        code: LEX_UNTERMINATED_STRING,
        phase: IssuePhase::Lexer,
        message_template: "Unterminated {kind} string",
    },
    IssueDefinition {
        code: LEX_UNTERMINATED_COMMENT,
        phase: IssuePhase::Lexer,
        message_template: "Unterminated /* */ comment",
    },
    IssueDefinition {
        code: LEX_UNBALANCED_EPP_COMMENT,
        phase: IssuePhase::Lexer,
        message_template: "Reaching end after opening <%# without seeing %>",
    },
    IssueDefinition {
        code: LEX_HEREDOC_EMPTY_TAG,
        phase: IssuePhase::Lexer,
        message_template: "Heredoc tag cannot be empty",
    },
    IssueDefinition {
        code: LEX_HEREDOC_ILLEGAL_ESCAPE,
        phase: IssuePhase::Lexer,
        message_template: "Illegal heredoc escape '{flag}'",
    },
    IssueDefinition {
        code: LEX_HEREDOC_MULTIPLE_ESCAPE,
        phase: IssuePhase::Lexer,
        message_template: "More than one heredoc escape specification",
    },
    IssueDefinition {
        code: LEX_HEREDOC_MULTIPLE_SYNTAX,
        phase: IssuePhase::Lexer,
        message_template: "More than one syntax declaration in heredoc",
    },
    IssueDefinition {
        code: LEX_HEREDOC_MULTIPLE_TAG,
        phase: IssuePhase::Lexer,
        message_template: "More than one tag declaration in heredoc",
    },
    IssueDefinition {
        code: LEX_HEREDOC_DECL_UNTERMINATED,
        phase: IssuePhase::Lexer,
        message_template: "Unterminated heredoc declaration",
    },
    IssueDefinition {
        code: LEX_HEREDOC_UNTERMINATED,
        phase: IssuePhase::Lexer,
        message_template: "Heredoc without end-tagged line",
    },
    IssueDefinition {
        code: LEX_UNEXPECTED_TOKEN,
        phase: IssuePhase::Lexer,
        message_template: "Unexpected token '{token}'",
    },
];
