//! Arrays, hashes and access

use super::*;

#[test]
fn test_access() {
    assert_eq!(parse("A[1, 'b']"), access(type_name("A"), vec![int(1), string("b")]));
    assert_eq!(parse("A[1,]"), access(type_name("A"), vec![int(1)]));
}

#[test]
fn test_nested_access() {
    assert_eq!(
        parse("Hash[String, Array[Integer[0]]]"),
        access(
            type_name("Hash"),
            vec![
                type_name("String"),
                access(type_name("Array"), vec![access(type_name("Integer"), vec![int(0)])]),
            ]
        )
    );
}

#[test]
fn test_chained_access() {
    assert_eq!(
        parse("A[1][2]"),
        access(access(type_name("A"), vec![int(1)]), vec![int(2)])
    );
}

#[test]
fn test_arrays() {
    assert_eq!(parse("[1, 2.3, 8]"), array(vec![int(1), float(2.3), int(8)]));
    assert_eq!(parse("[]"), array(vec![]));
    assert_eq!(parse("[1,]"), array(vec![int(1)]));
}

#[test]
fn test_hashes() {
    assert_eq!(
        parse("{'a' => 1, 'b' => 8}"),
        hash(vec![(string("a"), int(1)), (string("b"), int(8))])
    );
    assert_eq!(parse("{}"), hash(vec![]));
    assert_eq!(
        parse("{a => [1], B => {}}"),
        hash(vec![(identifier("a"), array(vec![int(1)])), (type_name("B"), hash(vec![]))])
    );
}

#[test]
fn test_keywords_as_hash_keys() {
    assert_eq!(
        parse("{type => Integer, value => 0}"),
        hash(vec![(identifier("type"), type_name("Integer")), (identifier("value"), int(0))])
    );
    assert_eq!(
        parse("{class => 1, default => 2}"),
        hash(vec![(identifier("class"), int(1)), (constant(Literal::Default), int(2))])
    );
    assert!(parse_str("{type => }").is_err());
}
