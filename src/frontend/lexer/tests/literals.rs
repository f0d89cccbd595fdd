//! Numbers, strings and regexps

use super::*;

#[test]
fn test_integers() {
    assert_eq!(single("123"), TokenKind::Integer(123));
    assert_eq!(single("0"), TokenKind::Integer(0));
    assert_eq!(single("0x1F"), TokenKind::Integer(31));
    assert_eq!(single("0XfF"), TokenKind::Integer(255));
    assert_eq!(single("0777"), TokenKind::Integer(511));
    assert_eq!(single("9223372036854775807"), TokenKind::Integer(i64::MAX));
    assert_eq!(single("-9223372036854775808"), TokenKind::Integer(i64::MIN));
    assert_eq!(single("-0x8000000000000000"), TokenKind::Integer(i64::MIN));
}

#[test]
fn test_floats() {
    assert_eq!(single("1.5"), TokenKind::Float(1.5));
    assert_eq!(single("0.3e7"), TokenKind::Float(3.0e6));
    assert_eq!(single("32.3e7"), TokenKind::Float(3.23e8));
    assert_eq!(single("1e5"), TokenKind::Float(1e5));
    assert_eq!(single("2.5E-3"), TokenKind::Float(2.5e-3));
}

#[test]
fn test_single_quoted() {
    assert_eq!(single(r"'it\'s'"), string("it's"));
    assert_eq!(single(r"'a\\b'"), string("a\\b"));
    assert_eq!(single(r"'a\nb'"), string("a\\nb"));
    assert_eq!(single("'two\nlines'"), string("two\nlines"));
}

#[test]
fn test_double_quoted_escapes() {
    assert_eq!(single(r#""a\tb\nc\sd""#), string("a\tb\nc d"));
    assert_eq!(single(r#""\"\'\\\$""#), string("\"'\\$"));
    assert_eq!(single(r#""\q""#), string("\\q"));
}

#[test]
fn test_unicode_escapes() {
    assert_eq!(single(r#""é""#), string("é"));
    assert_eq!(single(r#""\u{1F600}""#), string("😀"));
    assert_eq!(single(r#""\u{1}""#), string("\u{1}"));
    assert_eq!(single(r#""😀""#), string("😀"));
}

#[test]
fn test_interpolation_is_kept_verbatim() {
    assert_eq!(single(r#""a${x}b""#), string("a${x}b"));
    assert_eq!(single(r#""${h[{a => 1}]}""#), string("${h[{a => 1}]}"));
    assert_eq!(single(r#""$x""#), string("$x"));
}

#[test]
fn test_regexp() {
    assert_eq!(single(r"/a\/b\d+/"), TokenKind::Regexp(r"a/b\d+".into()));
    assert_eq!(single("//"), TokenKind::Regexp(String::new()));
}
