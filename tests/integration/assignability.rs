//! Assignability between resolved types

use pcore::frontend;
use pcore::{Pcore, Type, Value};

fn types(pcore: &Pcore, sources: &[&str]) -> Vec<Type> {
    sources
        .iter()
        .map(|s| pcore.resolve_type(s).unwrap_or_else(|e| panic!("{}: {}", s, e)))
        .collect()
}

#[test]
fn test_assignable_pairs() {
    let pcore = Pcore::new().unwrap();
    let pairs = [
        ("Integer[0, 10]", "Integer[2, 5]"),
        ("Numeric", "Float[1.0]"),
        ("String", "Enum[a, b]"),
        ("Pattern[/^a/]", "Enum[ab, ac]"),
        ("Optional[Integer]", "Undef"),
        ("Variant[String, Integer]", "Integer[1, 2]"),
        ("Array[Numeric]", "Tuple[Integer, Float]"),
        ("Hash[String, Integer]", "Struct[{a => Integer[1, 2]}]"),
        ("Struct[{a => Integer}]", "Hash[Enum[a], Integer, 1, 1]"),
        ("Collection", "Array[String]"),
        ("Callable[String]", "Callable[Scalar]"),
        ("Data", "Array[Hash[String, Integer]]"),
    ];
    for (sup, sub) in pairs {
        let t = types(&pcore, &[sup, sub]);
        assert!(t[0].is_assignable(&t[1]), "{} should accept {}", sup, sub);
    }
}

#[test]
fn test_not_assignable_pairs() {
    let pcore = Pcore::new().unwrap();
    let pairs = [
        ("Integer[2, 5]", "Integer[0, 10]"),
        ("Enum[a]", "Enum[a, b]"),
        ("Enum", "Enum[a]"),
        ("Undef", "Optional[Integer]"),
        ("NotUndef[Optional[Integer]]", "Undef"),
        ("Struct[{a => Integer}]", "Struct[{a => Integer, b => Integer}]"),
        ("Array[Integer, 2, 3]", "Array[Integer]"),
        ("Hash[String, String]", "Hash[String, Integer]"),
    ];
    for (sup, sub) in pairs {
        let t = types(&pcore, &[sup, sub]);
        assert!(!t[0].is_assignable(&t[1]), "{} should not accept {}", sup, sub);
    }
}

#[test]
fn test_mutually_recursive_aliases_terminate() {
    let pcore = Pcore::new().unwrap();
    let mut evaluator = pcore.type_evaluator();
    let ping = frontend::parse_str("Variant[Integer, Array[Pong]]").unwrap();
    let pong = frontend::parse_str("Variant[Integer, Array[Ping]]").unwrap();
    let a = evaluator.declare_type("Ping", ping, None).unwrap();
    let b = evaluator.declare_type("Pong", pong, None).unwrap();
    evaluator.resolve_alias(&a).unwrap();
    assert!(a.is_resolved() && b.is_resolved());
    assert!(a.is_assignable(&b));
    assert!(b.is_assignable(&a));
    assert!(a.is_assignable(&a));
    let value = Value::Array(vec![Value::Array(vec![Value::Integer(1)])]);
    assert!(a.is_instance(&value));
}

#[test]
fn test_object_inheritance() {
    let pcore = Pcore::new().unwrap();
    let animal = pcore
        .resolve_type("type Animal = Object[{attributes => {name => String}}]")
        .unwrap();
    let dog = pcore
        .resolve_type("type Dog = Object[{parent => Animal, attributes => {barks => Boolean}}]")
        .unwrap();
    assert!(animal.is_assignable(&dog));
    assert!(!dog.is_assignable(&animal));
}
