//! Issue codes raised by the lexer

use super::*;

#[test]
fn test_number_errors() {
    assert_eq!(error_code("08"), "LEX_OCTALDIGIT_EXPECTED");
    assert_eq!(error_code("0x"), "LEX_HEXDIGIT_EXPECTED");
    assert_eq!(error_code("0x1g"), "LEX_HEXDIGIT_EXPECTED");
    assert_eq!(error_code("123hey"), "LEX_DIGIT_EXPECTED");
    assert_eq!(error_code("1."), "LEX_DIGIT_EXPECTED");
    assert_eq!(error_code("1e"), "LEX_DIGIT_EXPECTED");
    assert_eq!(error_code("99999999999999999999"), "LEX_INTEGER_OUT_OF_RANGE");
    assert_eq!(error_code("9223372036854775808"), "LEX_INTEGER_OUT_OF_RANGE");
    assert_eq!(error_code("-9223372036854775809"), "LEX_INTEGER_OUT_OF_RANGE");
    assert_eq!(error_code("0x10000000000000000"), "LEX_INTEGER_OUT_OF_RANGE");
    let err = tokenize_str("[-99999999999999999999]").unwrap_err();
    assert_eq!(err.message, "Integer literal '-99999999999999999999' does not fit in 64 bits");
    assert_eq!(err.offset(), 1);
}

#[test]
fn test_name_errors() {
    assert_eq!(error_code("Some::type"), "LEX_INVALID_TYPE_NAME");
    assert_eq!(error_code("some::Type"), "LEX_INVALID_NAME");
    assert_eq!(error_code("_x"), "LEX_INVALID_NAME");
    assert_eq!(error_code("a::"), "LEX_DOUBLE_COLON_NOT_FOLLOWED_BY_NAME");
    assert_eq!(error_code(":: x"), "LEX_DOUBLE_COLON_NOT_FOLLOWED_BY_NAME");
    assert_eq!(error_code("$"), "LEX_INVALID_VARIABLE_NAME");
    assert_eq!(error_code("$Foo"), "LEX_INVALID_VARIABLE_NAME");
}

#[test]
fn test_string_errors() {
    assert_eq!(error_code(r#""\u123""#), "LEX_MALFORMED_UNICODE_ESCAPE");
    assert_eq!(error_code(r#""\ug123""#), "LEX_MALFORMED_UNICODE_ESCAPE");
    assert_eq!(error_code(r#""\u{}""#), "LEX_MALFORMED_UNICODE_ESCAPE");
    assert_eq!(error_code(r#""\u{1234567}""#), "LEX_MALFORMED_UNICODE_ESCAPE");
    assert_eq!(error_code(r#""\u{12""#), "LEX_MALFORMED_UNICODE_ESCAPE");
    assert_eq!(error_code(r#""\uD83D""#), "LEX_MALFORMED_UNICODE_ESCAPE");
    assert_eq!(error_code(r#""${x""#), "LEX_MALFORMED_INTERPOLATION");
    assert_eq!(error_code("\"abc"), "LEX_UNTERMINATED_STRING");
    assert_eq!(error_code("'abc"), "LEX_UNTERMINATED_STRING");
    assert_eq!(error_code("/abc"), "LEX_UNTERMINATED_STRING");
    assert_eq!(error_code("/abc\n/"), "LEX_UNTERMINATED_STRING");
}

#[test]
fn test_operator_and_comment_errors() {
    assert_eq!(error_code("{'a' = > 1}"), "LEX_INVALID_OPERATOR");
    assert_eq!(error_code("a | b"), "LEX_INVALID_OPERATOR");
    assert_eq!(error_code("a ; b"), "LEX_UNEXPECTED_TOKEN");
    assert_eq!(error_code("1 /* open"), "LEX_UNTERMINATED_COMMENT");
    assert_eq!(error_code("<%# open"), "LEX_UNBALANCED_EPP_COMMENT");
}

#[test]
fn test_error_location() {
    let err = tokenize_str("Integer[1, 2x]").unwrap_err();
    assert_eq!(err.code, "LEX_DIGIT_EXPECTED");
    assert_eq!(err.offset(), 11);
    assert_eq!(err.file, "<string>");
    assert!(err.to_string().contains("LEX_DIGIT_EXPECTED"));
}
