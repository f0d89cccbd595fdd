//! Object types, their instances and the meta types of the type system itself

use pcore::types::factory::*;
use pcore::types::infer::infer;
use pcore::{Pcore, PcoreError, Value};

fn declare_shapes(pcore: &Pcore) {
    pcore
        .resolve_type("type Shape = Object[{attributes => {name => String, layer => {type => Integer, value => 0}}}]")
        .unwrap();
    pcore
        .resolve_type("type Circle = Object[{parent => Shape, attributes => {radius => Float[0.0]}}]")
        .unwrap();
}

#[test]
fn test_instances_of_declared_objects() {
    let pcore = Pcore::new().unwrap();
    declare_shapes(&pcore);
    let circle_type = pcore.load_type("Circle").unwrap();

    let circle = pcore
        .create_object(&circle_type, vec![Value::from("c"), Value::Integer(2), Value::Float(1.5)])
        .unwrap();
    let Value::Object(instance) = &circle else {
        panic!("expected an object, got {:?}", circle);
    };
    assert_eq!(instance.get("radius").unwrap(), Value::Float(1.5));
    assert!(circle_type.is_instance(&circle));
    assert!(pcore.load_type("Shape").unwrap().is_instance(&circle));
    assert!(infer(&circle).ptr_eq(&circle_type));

    let shape_type = pcore.load_type("Shape").unwrap();
    let shape = pcore.create_object(&shape_type, vec![Value::from("s")]).unwrap();
    let Value::Object(instance) = &shape else {
        panic!("expected an object, got {:?}", shape);
    };
    assert_eq!(instance.get("layer").unwrap(), Value::Integer(0));
    assert!(!circle_type.is_instance(&shape));
    assert_eq!(pcore.project(&shape).unwrap(), vec![Value::from("s")]);
}

#[test]
fn test_invalid_object_arguments() {
    let pcore = Pcore::new().unwrap();
    declare_shapes(&pcore);
    let circle_type = pcore.load_type("Circle").unwrap();

    let err = pcore
        .create_object(&circle_type, vec![Value::from("c"), Value::Integer(0), Value::Float(-1.0)])
        .unwrap_err();
    assert!(matches!(err, PcoreError::TypeAssertion(_)));
    assert!(err.to_string().starts_with("Circle['radius']"));

    let err = pcore.create_object(&circle_type, vec![Value::from("c")]).unwrap_err();
    assert_eq!(err.to_string(), "Circle['radius'] expects a value");

    let args = vec![Value::Undef; 4];
    let err = pcore.create_object(&circle_type, args).unwrap_err();
    assert_eq!(err.to_string(), "Circle expects at most 3 arguments, got 4");

    let err = pcore.create_object(&integer(), Vec::new()).unwrap_err();
    assert!(matches!(err, PcoreError::TypeResolver(_)));
}

#[test]
fn test_meta_types_build_and_project_types() {
    let pcore = Pcore::new().unwrap();
    let meta = pcore.load_type("Pcore::IntegerType").unwrap();
    let built = pcore
        .create_object(&meta, vec![Value::Integer(1), Value::Integer(5)])
        .unwrap();
    assert_eq!(built, Value::Type(integer_range(1, 5).unwrap()));

    let projected = pcore.project(&Value::Type(hash_of(string(), integer()))).unwrap();
    assert_eq!(projected, vec![Value::Type(string()), Value::Type(integer()), Value::Undef]);

    let err = pcore.project(&Value::Integer(3)).unwrap_err();
    assert!(err.to_string().contains("expects an Object or a Type"));
}

#[test]
fn test_forks_share_declared_types() {
    let pcore = Pcore::new().unwrap();
    pcore.resolve_type("type Small = Integer[1, 3]").unwrap();

    std::thread::scope(|scope| {
        for n in 1..=3 {
            let fork = pcore.fork();
            scope.spawn(move || {
                let t = fork.resolve_type("Array[Small, 1]").unwrap();
                assert!(t.is_instance(&Value::Array(vec![Value::Integer(n)])));
                assert!(!t.is_instance(&Value::Array(vec![Value::Integer(n + 3)])));
            });
        }
    });
}
