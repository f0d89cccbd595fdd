//! End-to-end resolution of type expressions

use pcore::frontend::{self, Expr};
use pcore::types::factory::*;
use pcore::types::{IntegerType, TypeKind};
use pcore::{Pcore, PcoreError, Value};

fn resolve(source: &str) -> pcore::Result<pcore::Type> {
    Pcore::new().unwrap().resolve_type(source)
}

#[test]
fn test_array_of_integers_with_size() {
    let t = resolve("Array[Integer,2,8]").unwrap();
    let TypeKind::Array(array) = t.kind() else {
        panic!("expected an Array, got {}", t);
    };
    assert!(array.element.ptr_eq(&integer()));
    assert_eq!(array.size, IntegerType { min: 2, max: 8 });
    assert_eq!(t.to_string(), "Array[Integer, 2, 8]");
}

#[test]
fn test_overlapping_integer_variant() {
    let t = resolve("Variant[Integer[10,20],Integer[18,28]]").unwrap();
    assert_eq!(t, integer_range(10, 28).unwrap());
    assert_eq!(t.to_string(), "Integer[10, 28]");
}

#[test]
fn test_struct_with_optional_member() {
    let t = resolve("Struct[{Optional[a::b]=>String, b::c=>Integer[1,0x5a]}]").unwrap();
    let TypeKind::Struct(s) = t.kind() else {
        panic!("expected a Struct, got {}", t);
    };
    assert_eq!(s.elements.len(), 2);
    assert_eq!(s.size(), IntegerType { min: 1, max: 2 });

    let only_required = Value::hash_of([("b::c", Value::Integer(5))]);
    assert!(t.is_instance(&only_required));
    let both = Value::hash_of([("a::b", Value::from("x")), ("b::c", Value::Integer(90))]);
    assert!(t.is_instance(&both));
    let out_of_range = Value::hash_of([("b::c", Value::Integer(91))]);
    assert!(!t.is_instance(&out_of_range));
    let extra = Value::hash_of([("b::c", Value::Integer(1)), ("z", Value::Integer(1))]);
    assert!(!t.is_instance(&extra));
}

#[test]
fn test_reversed_integer_bounds() {
    let err = resolve("Integer[2,1]").unwrap_err();
    assert!(matches!(err, PcoreError::TypeAssertion(_)));
    assert!(err.to_string().contains("'from' must be less or equal to 'to'"));
}

#[test]
fn test_heredoc_margin_and_trim() {
    let source = "@(END)\n    This is\n    heredoc text\n    |- END\n";
    let expr = frontend::parse_str(source).unwrap();
    let Expr::Heredoc { text, syntax, .. } = expr else {
        panic!("expected a heredoc, got {:?}", expr);
    };
    assert_eq!(text, "This is\nheredoc text");
    assert_eq!(syntax, None);
}

#[test]
fn test_parse_errors_carry_codes() {
    let err = resolve("Integer[123hey]").unwrap_err();
    assert_eq!(err.code(), Some("LEX_DIGIT_EXPECTED"));
    let err = resolve("Some::type").unwrap_err();
    assert_eq!(err.code(), Some("LEX_INVALID_TYPE_NAME"));
    let err = resolve("Integer[99999999999999999999]").unwrap_err();
    assert_eq!(err.code(), Some("LEX_INTEGER_OUT_OF_RANGE"));
}

#[test]
fn test_extreme_integer_bounds() {
    let lowest = resolve("Integer[-9223372036854775808, -9223372036854775807]").unwrap();
    assert!(lowest.is_instance(&Value::Integer(i64::MIN)));
    assert!(!lowest.is_instance(&Value::Integer(0)));
    let all = resolve("Integer[-9223372036854775808]").unwrap();
    assert!(all.is_assignable(&resolve("Integer").unwrap()));
}

#[test]
fn test_access_forms() {
    let cases = [
        ("Array[2,8]", "Array[Any, 2, 8]"),
        ("Hash[0,10]", "Hash[Unit, Unit, 0, 10]"),
        ("Tuple[Integer,Float,4]", "Tuple[Integer, Float, 4]"),
        ("Enum[a,b,c]", "Enum['a', 'b', 'c']"),
        ("Class['MyClass']", "Class['MyClass']"),
        ("Resource['file','/tmp']", "Resource['File', '/tmp']"),
        ("Resource['TypeName', 'title']", "Resource['TypeName', 'title']"),
        ("Resource['typeName', 'title']", "Resource['TypeName', 'title']"),
        ("Integer[default, 5]", "Integer[default, 5]"),
    ];
    for (source, printed) in cases {
        let t = resolve(source).unwrap_or_else(|e| panic!("{}: {}", source, e));
        assert_eq!(t.to_string(), printed, "printing {}", source);
    }
}

#[test]
fn test_printed_types_resolve_to_equal_types() {
    let sources = [
        "Callable[[String, Integer], Boolean]",
        "Struct[{'a' => String, Optional['b'] => Integer}]",
        "Optional[Pattern[/a\\/b/]]",
        "Timespan['00:10:00', default]",
        "SemVer['>=1.0.0 <2.0.0']",
        "Runtime['ruby', 'Semantic::Version']",
    ];
    for source in sources {
        let t = resolve(source).unwrap_or_else(|e| panic!("{}: {}", source, e));
        let again = resolve(&t.to_string()).unwrap_or_else(|e| panic!("{}: {}", t, e));
        assert_eq!(t, again, "round trip of {}", source);
    }
}

#[test]
fn test_data_accepts_nested_values() {
    let data = resolve("Data").unwrap();
    let nested = Value::hash_of([(
        "list",
        Value::Array(vec![Value::Integer(1), Value::from("two"), Value::Undef]),
    )]);
    assert!(data.is_instance(&nested));
    assert!(!data.is_instance(&Value::Type(integer())));
}
