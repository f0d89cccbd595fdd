//! Names, keywords, punctuation, comments and spans

use super::*;

#[test]
fn test_empty_source() {
    let tokens = tokenize_str("").unwrap();
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is_eof());
}

#[test]
fn test_whitespace_only() {
    assert!(kinds("  \t\r\n  ").is_empty());
}

#[test]
fn test_names() {
    assert_eq!(
        kinds("foo::bar Foo::Bar $x $a::b_2"),
        vec![
            TokenKind::Identifier("foo::bar".into()),
            TokenKind::TypeName("Foo::Bar".into()),
            TokenKind::Variable("x".into()),
            TokenKind::Variable("a::b_2".into()),
        ]
    );
}

#[test]
fn test_top_scope_prefix_is_dropped() {
    assert_eq!(single("::Foo::Bar"), TokenKind::TypeName("Foo::Bar".into()));
    assert_eq!(single("::foo"), TokenKind::Identifier("foo".into()));
}

#[test]
fn test_keywords() {
    assert_eq!(
        kinds("type undef true false default function node class unless elsif inherits"),
        vec![
            TokenKind::KwType,
            TokenKind::KwUndef,
            TokenKind::KwTrue,
            TokenKind::KwFalse,
            TokenKind::KwDefault,
            TokenKind::KwFunction,
            TokenKind::KwNode,
            TokenKind::KwClass,
            TokenKind::KwUnless,
            TokenKind::KwElsif,
            TokenKind::KwInherits,
        ]
    );
    // Only bare words are keywords
    assert_eq!(single("type::x"), TokenKind::Identifier("type::x".into()));
}

#[test]
fn test_punctuation() {
    assert_eq!(
        kinds("[ ] { } ( ) , : . @ - = => >>"),
        vec![
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::Comma,
            TokenKind::Colon,
            TokenKind::Dot,
            TokenKind::At,
            TokenKind::Minus,
            TokenKind::Assign,
            TokenKind::FatArrow,
            TokenKind::RShift,
        ]
    );
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        kinds("# line\n1 /* block\n comment */ 2 <%# epp %>3"),
        vec![TokenKind::Integer(1), TokenKind::Integer(2), TokenKind::Integer(3)]
    );
}

#[test]
fn test_spans_count_chars() {
    let tokens = tokenize_str("  abc\n Foo").unwrap();
    let span = tokens[0].span;
    assert_eq!((span.start.offset, span.end.offset), (2, 5));
    assert_eq!((span.start.line, span.start.column), (1, 3));

    // `é` is one char even though it takes two bytes
    let unexpected = tokenize_str("\n é").unwrap_err();
    assert_eq!(unexpected.code, "LEX_UNEXPECTED_TOKEN");
    assert_eq!(unexpected.offset(), 2);
    assert_eq!((unexpected.span.start.line, unexpected.span.start.column), (2, 2));
}

#[test]
fn test_minus_adjacency_is_visible_in_spans() {
    let tokens = tokenize_str("-a - 2").unwrap();
    assert!(tokens[0].span.is_adjacent_to(&tokens[1].span));
    assert!(!tokens[2].span.is_adjacent_to(&tokens[3].span));
    assert_eq!(tokens[3].kind, TokenKind::Integer(2));
}

#[test]
fn test_minus_touching_digits_is_part_of_the_number() {
    assert_eq!(
        kinds("-1 - 2 -0x10 -1.5"),
        vec![
            TokenKind::Integer(-1),
            TokenKind::Minus,
            TokenKind::Integer(2),
            TokenKind::Integer(-16),
            TokenKind::Float(-1.5),
        ]
    );
}
