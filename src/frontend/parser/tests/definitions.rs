//! `function`, `node` and `type` declarations

use super::*;
use crate::frontend::parser::ast::Parameter;

#[test]
fn test_type_declaration() {
    assert_eq!(parse("type MyType"), Expr::TypeDeclaration("MyType".into(), Span::dummy()));
    assert_eq!(
        parse("type MyType = Integer"),
        Expr::Assignment {
            lhs: Box::new(Expr::TypeDeclaration("MyType".into(), Span::dummy())),
            rhs: Box::new(type_name("Integer")),
            span: Span::dummy(),
        }
    );
}

#[test]
fn test_function_definition() {
    let expected = Expr::FunctionDefinition {
        name: "f".into(),
        parameters: vec![
            Parameter {
                name: "a".into(),
                type_expr: Some(type_name("Integer")),
                value: Some(int(1)),
                span: Span::dummy(),
            },
            Parameter {
                name: "b".into(),
                type_expr: None,
                value: None,
                span: Span::dummy(),
            },
        ],
        return_type: Some(Box::new(type_name("String"))),
        body: Some(Box::new(string("x"))),
        span: Span::dummy(),
    };
    assert_eq!(parse("function f(Integer $a = 1, $b) >> String { 'x' }"), expected);
}

#[test]
fn test_empty_function() {
    match parse("function my::f() { }") {
        Expr::FunctionDefinition { name, parameters, body, .. } => {
            assert_eq!(name, "my::f");
            assert!(parameters.is_empty());
            assert!(body.is_none());
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_node_definition() {
    let expected = Expr::NodeDefinition {
        host_matches: vec![
            string("web.example.com"),
            Expr::Regexp("^db".into(), Span::dummy()),
            constant(Literal::Default),
        ],
        parent: Some(Box::new(string("base"))),
        body: None,
        span: Span::dummy(),
    };
    assert_eq!(parse("node web.example.com, /^db/, default inherits 'base' { }"), expected);
}

#[test]
fn test_definition_errors() {
    assert_eq!(error_code("function 'f'() {}"), "PARSE_EXPECTED_NAME_AFTER_FUNCTION");
    assert_eq!(error_code("function f(Integer) {}"), "PARSE_EXPECTED_VARIABLE");
    assert_eq!(error_code("function f() 1"), "PARSE_EXPECTED_TOKEN");
    assert_eq!(error_code("node [1] {}"), "PARSE_EXPECTED_HOSTNAME");
    assert_eq!(error_code("node a.[1] {}"), "PARSE_EXPECTED_NAME_OR_NUMBER_AFTER_DOT");
    assert_eq!(error_code("class foo {}"), "PARSE_CLASS_NOT_VALID_HERE");
    assert_eq!(error_code("type foo"), "PARSE_EXPECTED_TYPE_NAME_AFTER_TYPE");
    assert_eq!(error_code("type 'Foo'"), "PARSE_QUOTED_NOT_VALID_NAME");
}
