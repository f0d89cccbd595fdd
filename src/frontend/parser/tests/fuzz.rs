//! Property based round trips through the printer

use super::*;
use crate::frontend::lexer::TokenKind;
use proptest::prelude::*;

fn leaf_strategy() -> impl Strategy<Value = Expr> {
    prop_oneof![
        any::<i64>().prop_map(int),
        (-1.0e12f64..1.0e12).prop_map(float),
        "[a-z ']{0,8}".prop_map(|s| string(&s)),
        "[a-z][a-z0-9_]{0,6}"
            .prop_filter("not a keyword", |s| TokenKind::keyword(s).is_none())
            .prop_map(|s| identifier(&s)),
        "[A-Z][a-z0-9_]{0,6}".prop_map(|s| type_name(&s)),
        "[a-z.+/]{0,6}".prop_map(|s| Expr::Regexp(s, Span::dummy())),
        Just(constant(Literal::Undef)),
        Just(constant(Literal::Default)),
        any::<bool>().prop_map(|b| constant(Literal::Boolean(b))),
    ]
}

fn expr_strategy() -> impl Strategy<Value = Expr> {
    leaf_strategy().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(array),
            prop::collection::vec((inner.clone(), inner.clone()), 0..3).prop_map(hash),
            ("[A-Z][a-z]{0,5}", prop::collection::vec(inner.clone(), 1..4))
                .prop_map(|(name, params)| access(type_name(&name), params)),
        ]
    })
}

/// Assignments only at the top, where `=` cannot be mistaken for a hash key separator
fn program_strategy() -> impl Strategy<Value = Expr> {
    prop_oneof![
        expr_strategy(),
        ("[A-Z][a-z]{0,5}(::[A-Z][a-z]{0,3})?", expr_strategy()).prop_map(|(name, rhs)| {
            Expr::Assignment {
                lhs: Box::new(Expr::TypeDeclaration(name, Span::dummy())),
                rhs: Box::new(rhs),
                span: Span::dummy(),
            }
        }),
    ]
}

proptest! {
    #[test]
    fn test_printed_tree_parses_to_equal_tree(expr in program_strategy()) {
        let printed = expr.to_string();
        let reparsed = parse_str(&printed);
        prop_assert!(reparsed.is_ok(), "{:?} failed: {:?}", printed, reparsed);
        prop_assert_eq!(reparsed.unwrap(), expr);
    }

    #[test]
    fn test_lexer_never_panics(source in "\\PC{0,40}") {
        let _ = parse_str(&source);
    }
}
