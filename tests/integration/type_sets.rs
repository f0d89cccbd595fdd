//! Type sets, their references and scoped lookup

use pcore::types::factory::*;
use pcore::types::{TypeKind, TypeSetType};
use pcore::util::config::{PcoreConfig, RUNTIME_NAME_AUTHORITY};
use pcore::{Pcore, PcoreError, Type, Value};

fn library(version: &str, foo: Type) -> Type {
    let init = Value::hash_of([
        ("pcore_version", Value::from("1.0.0")),
        ("version", Value::from(version)),
        ("types", Value::hash_of([("Foo", Value::Type(foo))])),
    ]);
    type_set(TypeSetType::from_init_hash(Some("Lib"), RUNTIME_NAME_AUTHORITY, &init).unwrap())
}

fn references(ranges: &[(&str, &str)]) -> Value {
    let references = ranges.iter().map(|(alias, range)| {
        (
            *alias,
            Value::hash_of([("name", Value::from("Lib")), ("version_range", Value::from(*range))]),
        )
    });
    Value::hash_of([
        ("pcore_version", Value::from("1.0.0")),
        ("references", Value::hash_of(references)),
    ])
}

#[test]
fn test_overlapping_reference_ranges() {
    let init = references(&[("A", "1.x"), ("B", ">=1.5.0")]);
    let err = TypeSetType::from_init_hash(None, RUNTIME_NAME_AUTHORITY, &init).unwrap_err();
    assert!(matches!(err, PcoreError::TypeResolver(_)));
    assert!(err
        .to_string()
        .contains("more than once using overlapping version ranges"));
}

#[test]
fn test_disjoint_reference_ranges() {
    let init = references(&[("A", "1.x"), ("B", "2.x")]);
    let set = TypeSetType::from_init_hash(None, RUNTIME_NAME_AUTHORITY, &init).unwrap();
    let first = library("1.4.0", integer());
    let second = library("2.0.1", string());
    set.references["A"].bind(&first).unwrap();
    set.references["B"].bind(&second).unwrap();
    assert_eq!(set.get("A::Foo").unwrap(), integer());
    assert_eq!(set.get("B::Foo").unwrap(), string());
    assert_eq!(set.get("b::foo").unwrap(), string());
    assert!(set.is_resolved());

    let err = set.references["A"].bind(&library("2.0.0", integer())).unwrap_err();
    assert!(err.message.contains("incompatible version"));
}

#[test]
fn test_alias_collides_with_type() {
    let init = Value::hash_of([
        ("pcore_version", Value::from("1.0.0")),
        ("types", Value::hash_of([("Lib", Value::Type(integer()))])),
        (
            "references",
            Value::hash_of([(
                "Lib",
                Value::hash_of([("name", Value::from("Lib")), ("version_range", Value::from("1.x"))]),
            )]),
        ),
    ]);
    let err = TypeSetType::from_init_hash(None, RUNTIME_NAME_AUTHORITY, &init).unwrap_err();
    assert!(err.to_string().contains("collides with the name of a declared type"));
}

#[test]
fn test_unsupported_pcore_version() {
    let pcore = Pcore::new().unwrap();
    let err = pcore
        .resolve_type("TypeSet[{pcore_version => '2.0.0'}]")
        .unwrap_err();
    assert!(err.to_string().contains("is not understood by this runtime"));
}

#[test]
fn test_named_set_requires_version() {
    let pcore = Pcore::new().unwrap();
    let err = pcore
        .resolve_type("type Unversioned = TypeSet[{pcore_version => '1.0.0'}]")
        .unwrap_err();
    assert_eq!(err.to_string(), "initHash expects a value for key 'version'");
}

#[test]
fn test_types_see_each_other_inside_the_set() {
    let pcore = Pcore::new().unwrap();
    let set = pcore
        .resolve_type(
            "type Geo = TypeSet[{
                pcore_version => '1.0.0',
                version => '0.1.0',
                types => {
                    Point => Object[{attributes => {x => Float, y => Float}}],
                    Polygon => Array[Point, 3],
                    Shape => Variant[Point, Polygon]
                }
            }]",
        )
        .unwrap();
    let resolved = set.resolved();
    let TypeKind::TypeSet(geo) = resolved.kind() else {
        panic!("expected a TypeSet");
    };
    assert!(geo.is_resolved());
    let point = geo.get("Point").unwrap();
    assert_eq!(point.resolved().name(), Some("Geo::Point"));
    let polygon = geo.get("polygon").unwrap();
    assert!(polygon.resolved().to_string().starts_with("Array[Geo::Point, 3"));
    assert!(pcore.load_type("Geo::Shape").is_some());
    assert_eq!(geo.name_for(&polygon).as_deref(), Some("Polygon"));
}

fn is_resolved_set(t: &Type) -> bool {
    match t.resolved().kind() {
        TypeKind::TypeSet(set) => set.is_resolved(),
        _ => false,
    }
}

#[test]
fn test_case_sensitive_configuration() {
    let source = "type Names = TypeSet[{pcore_version => '1.0.0', version => '1.0.0', types => {Foo => Integer, Bar => FOO}}]";

    let config = PcoreConfig {
        case_insensitive_lookup: false,
        ..PcoreConfig::default()
    };
    let strict = Pcore::with_config(config).unwrap();
    let set = strict.resolve_type(source).unwrap();
    assert!(!is_resolved_set(&set));

    let lenient = Pcore::new().unwrap();
    let set = lenient.resolve_type(source).unwrap();
    assert!(is_resolved_set(&set));
}

#[test]
fn test_declared_types_are_found_in_any_case() {
    let pcore = Pcore::new().unwrap();
    let set = pcore
        .resolve_type("type Names = TypeSet[{pcore_version => '1.0.0', version => '1.0.0', types => {Foo => Integer}}]")
        .unwrap();
    let resolved = set.resolved();
    let TypeKind::TypeSet(names) = resolved.kind() else {
        panic!("expected a TypeSet");
    };
    let foo = names.get("foo").unwrap();
    assert!(foo.ptr_eq(&names.get("FOO").unwrap()));
    assert!(foo.ptr_eq(&names.get("Foo").unwrap()));
    assert_eq!(foo.resolved(), integer());
    assert!(pcore.load_type("Names::Foo").unwrap().ptr_eq(&foo));
}

#[test]
fn test_types_differing_only_in_case() {
    let pcore = Pcore::new().unwrap();
    let err = pcore
        .resolve_type("TypeSet[{pcore_version => '1.0.0', types => {Foo => Integer, FOO => String}}]")
        .unwrap_err();
    assert!(matches!(err, PcoreError::TypeResolver(_)));
    assert!(err.to_string().contains("differ only in case"), "{}", err);
}

#[test]
fn test_reference_alias_descends_into_the_referenced_set() {
    let pcore = Pcore::new().unwrap();
    pcore
        .resolve_type("type Lib = TypeSet[{pcore_version => '1.0.0', version => '1.4.0', types => {Foo => Integer}}]")
        .unwrap();
    let app = pcore
        .resolve_type(
            "type App = TypeSet[{
                pcore_version => '1.0.0',
                version => '1.0.0',
                references => {L => {name => 'Lib', version_range => '1.x'}},
                types => {Bar => Array[L::Foo]}
            }]",
        )
        .unwrap();
    let resolved = app.resolved();
    let TypeKind::TypeSet(app) = resolved.kind() else {
        panic!("expected a TypeSet");
    };
    let foo = app.get("L::Foo").unwrap();
    assert_eq!(foo.name(), Some("Lib::Foo"));
    assert!(foo.ptr_eq(&app.get("l::foo").unwrap()));
    assert_eq!(foo.resolved(), integer());

    let bar = app.get("Bar").unwrap();
    assert!(bar.is_instance(&Value::Array(vec![Value::Integer(3)])));
    assert!(!bar.is_instance(&Value::Array(vec![Value::from("x")])));

    let err = pcore
        .resolve_type(
            "TypeSet[{pcore_version => '1.0.0', references => {
                A => {name => 'Lib', version_range => '1.x'},
                B => {name => 'Lib', version_range => '>=1.5.0'}
            }}]",
        )
        .unwrap_err();
    assert!(matches!(err, PcoreError::TypeResolver(_)));
}
