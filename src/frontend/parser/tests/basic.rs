//! Constants, names and negation

use super::*;

#[test]
fn test_booleans_and_keywords() {
    assert_eq!(parse("false"), constant(Literal::Boolean(false)));
    assert_eq!(parse("true"), constant(Literal::Boolean(true)));
    assert_eq!(parse("undef"), constant(Literal::Undef));
    assert_eq!(parse("default"), constant(Literal::Default));
}

#[test]
fn test_double_quoted_control_chars() {
    assert_eq!(
        parse(r#""string\nwith\t\\t,\s\\s, \\r, and \\n\r\n""#),
        string("string\nwith\t\\t, \\s, \\r, and \\n\r\n")
    );
    assert_eq!(parse(r#""string\"with\"quotes""#), string("string\"with\"quotes"));
    assert_eq!(parse(r#""string'with'quotes""#), string("string'with'quotes"));
}

#[test]
fn test_unicode_escapes() {
    assert_eq!(parse(r#""x\u{1f452}y""#), string("x\u{1f452}y"));
    assert_eq!(parse(r#""x\u2713y""#), string("x\u{2713}y"));
}

#[test]
fn test_numbers() {
    assert_eq!(parse("123"), int(123));
    assert_eq!(parse("-123"), int(-123));
    assert_eq!(parse("-0x10"), int(-16));
    assert_eq!(parse("32e7"), float(32e7));
    assert_eq!(parse("32e-7"), float(32e-7));
    assert_eq!(parse("-32.3e7"), float(-32.3e7));
    assert_eq!(parse("32.3e-7"), float(32.3e-7));
}

#[test]
fn test_names() {
    assert_eq!(parse("my::type"), identifier("my::type"));
    assert_eq!(parse("My::Type"), type_name("My::Type"));
}

#[test]
fn test_negative_identifier() {
    assert_eq!(
        parse("-my::type"),
        Expr::Negate(Box::new(identifier("my::type")), Span::dummy())
    );
}

#[test]
fn test_regexp() {
    assert_eq!(
        parse(r"/pattern\/with\/slash/"),
        Expr::Regexp("pattern/with/slash".into(), Span::dummy())
    );
}

#[test]
fn test_assignment_is_right_associative() {
    let expected = Expr::Assignment {
        lhs: Box::new(identifier("a")),
        rhs: Box::new(Expr::Assignment {
            lhs: Box::new(identifier("b")),
            rhs: Box::new(int(1)),
            span: Span::dummy(),
        }),
        span: Span::dummy(),
    };
    assert_eq!(parse("a = b = 1"), expected);
}

#[test]
fn test_spans_cover_source() {
    let expr = parse("  Array[Integer]");
    let span = expr.span();
    assert_eq!((span.start.offset, span.end.offset), (2, 16));
    assert_eq!(parse("-12").span().len(), 3);
}
