//! Init hash descriptors
//!
//! Object types and type sets are declared with a hash. Each hash is checked against one of the
//! struct types below before it is read, so a malformed declaration fails with a path to the
//! offending entry instead of a missing key further down.

use once_cell::sync::Lazy;

use super::factory::*;
use super::{RegexpType, StructElement, Type};

pub const KEY_NAME: &str = "name";
pub const KEY_PARENT: &str = "parent";
pub const KEY_ATTRIBUTES: &str = "attributes";
pub const KEY_CONSTANTS: &str = "constants";
pub const KEY_FUNCTIONS: &str = "functions";
pub const KEY_EQUALITY: &str = "equality";
pub const KEY_EQUALITY_INCLUDE_TYPE: &str = "equality_include_type";
pub const KEY_SERIALIZATION: &str = "serialization";
pub const KEY_TYPE: &str = "type";
pub const KEY_KIND: &str = "kind";
pub const KEY_VALUE: &str = "value";
pub const KEY_FINAL: &str = "final";
pub const KEY_OVERRIDE: &str = "override";
pub const KEY_PCORE_URI: &str = "pcore_uri";
pub const KEY_PCORE_VERSION: &str = "pcore_version";
pub const KEY_NAME_AUTHORITY: &str = "name_authority";
pub const KEY_VERSION: &str = "version";
pub const KEY_VERSION_RANGE: &str = "version_range";
pub const KEY_TYPES: &str = "types";
pub const KEY_REFERENCES: &str = "references";

/// The path prefix of init hash assertion errors
pub const INIT_HASH_PATH: &str = "initHash";

fn name_pattern(source: &str) -> Type {
    pattern(vec![RegexpType::new(source).expect("init name pattern")])
}

fn required(
    name: &str,
    value: Type,
) -> StructElement {
    StructElement {
        name: name.to_string(),
        key: string_value(name),
        value,
    }
}

fn optional_key(
    name: &str,
    value: Type,
) -> StructElement {
    StructElement {
        name: name.to_string(),
        key: optional(string_value(name)),
        value,
    }
}

/// `Foo::Bar`
pub static TYPE_QUALIFIED_REFERENCE: Lazy<Type> = Lazy::new(|| name_pattern(r"\A[A-Z]\w*(?:::[A-Z]\w*)*\z"));

/// `Foo`
pub static TYPE_SIMPLE_TYPE_NAME: Lazy<Type> = Lazy::new(|| name_pattern(r"\A[A-Z]\w*\z"));

/// Attribute and function names
pub static TYPE_MEMBER_NAME: Lazy<Type> = Lazy::new(|| name_pattern(r"\A[a-z_]\w*\z"));

pub static TYPE_URI: Lazy<Type> = Lazy::new(|| string_sized(super::IntegerType { min: 1, max: i64::MAX }));

pub static TYPE_STRING_OR_VERSION: Lazy<Type> = Lazy::new(|| variant(vec![TYPE_URI.clone(), sem_ver()]));

pub static TYPE_STRING_OR_RANGE: Lazy<Type> = Lazy::new(|| variant(vec![TYPE_URI.clone(), sem_ver_range()]));

pub static TYPE_ATTRIBUTE_KIND: Lazy<Type> = Lazy::new(|| {
    enumeration(
        vec![
            "constant".into(),
            "derived".into(),
            "given_or_derived".into(),
            "reference".into(),
        ],
        false,
    )
});

/// `{type => T, kind => K, value => V, final => B, override => B}`
pub static TYPE_ATTRIBUTE_INIT: Lazy<Type> = Lazy::new(|| {
    struct_type(vec![
        required(KEY_TYPE, type_default()),
        optional_key(KEY_KIND, TYPE_ATTRIBUTE_KIND.clone()),
        optional_key(KEY_VALUE, any()),
        optional_key(KEY_FINAL, boolean()),
        optional_key(KEY_OVERRIDE, boolean()),
    ])
});

pub static TYPE_FUNCTION_INIT: Lazy<Type> = Lazy::new(|| {
    struct_type(vec![
        required(KEY_TYPE, type_type(callable_default())),
        optional_key(KEY_FINAL, boolean()),
        optional_key(KEY_OVERRIDE, boolean()),
    ])
});

pub static TYPE_OBJECT_INIT: Lazy<Type> = Lazy::new(|| {
    let member_names = TYPE_MEMBER_NAME.clone();
    struct_type(vec![
        optional_key(KEY_NAME, TYPE_QUALIFIED_REFERENCE.clone()),
        optional_key(KEY_PARENT, type_default()),
        optional_key(
            KEY_ATTRIBUTES,
            hash_of(
                member_names.clone(),
                variant(vec![type_default(), TYPE_ATTRIBUTE_INIT.clone()]),
            ),
        ),
        optional_key(KEY_CONSTANTS, hash_of(member_names.clone(), any())),
        optional_key(
            KEY_FUNCTIONS,
            hash_of(
                member_names.clone(),
                variant(vec![type_type(callable_default()), TYPE_FUNCTION_INIT.clone()]),
            ),
        ),
        optional_key(
            KEY_EQUALITY,
            variant(vec![member_names.clone(), array_of(member_names.clone())]),
        ),
        optional_key(KEY_EQUALITY_INCLUDE_TYPE, boolean()),
        optional_key(KEY_SERIALIZATION, array_of(member_names)),
    ])
});

pub static TYPE_TYPE_REFERENCE_INIT: Lazy<Type> = Lazy::new(|| {
    struct_type(vec![
        required(KEY_NAME, TYPE_QUALIFIED_REFERENCE.clone()),
        required(KEY_VERSION_RANGE, TYPE_STRING_OR_RANGE.clone()),
        optional_key(KEY_NAME_AUTHORITY, TYPE_URI.clone()),
    ])
});

pub static TYPE_TYPESET_INIT: Lazy<Type> = Lazy::new(|| {
    let non_empty = super::IntegerType { min: 1, max: i64::MAX };
    struct_type(vec![
        optional_key(KEY_PCORE_URI, TYPE_URI.clone()),
        required(KEY_PCORE_VERSION, TYPE_STRING_OR_VERSION.clone()),
        optional_key(KEY_NAME_AUTHORITY, TYPE_URI.clone()),
        optional_key(KEY_NAME, TYPE_QUALIFIED_REFERENCE.clone()),
        optional_key(KEY_VERSION, TYPE_STRING_OR_VERSION.clone()),
        optional_key(
            KEY_TYPES,
            hash(TYPE_SIMPLE_TYPE_NAME.clone(), type_default(), non_empty),
        ),
        optional_key(
            KEY_REFERENCES,
            hash(TYPE_SIMPLE_TYPE_NAME.clone(), TYPE_TYPE_REFERENCE_INIT.clone(), non_empty),
        ),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::instance::assert_instance_of;
    use crate::values::Value;

    #[test]
    fn test_attribute_init() {
        let init = Value::hash_of([("type", Value::Type(integer())), ("kind", Value::from("constant"))]);
        assert!(TYPE_ATTRIBUTE_INIT.is_instance(&init));
        let bad_kind = Value::hash_of([("type", Value::Type(integer())), ("kind", Value::from("bogus"))]);
        assert!(!TYPE_ATTRIBUTE_INIT.is_instance(&bad_kind));
        assert!(!TYPE_ATTRIBUTE_INIT.is_instance(&Value::hash_of([("kind", Value::from("derived"))])));
    }

    #[test]
    fn test_typeset_init_requires_pcore_version() {
        let err = assert_instance_of(INIT_HASH_PATH, &TYPE_TYPESET_INIT, &Value::hash_of([("name", Value::from("Foo"))]))
            .unwrap_err();
        assert_eq!(err.to_string(), "initHash expects a value for key 'pcore_version'");
    }

    #[test]
    fn test_typeset_init_path_descends_into_types() {
        let init = Value::hash_of([
            ("pcore_version", Value::from("1.0.0")),
            ("types", Value::hash_of([("foo", Value::Type(integer()))])),
        ]);
        let err = assert_instance_of(INIT_HASH_PATH, &TYPE_TYPESET_INIT, &init).unwrap_err();
        assert_eq!(err.path, "initHash['types']['foo']");
    }

    #[test]
    fn test_name_patterns() {
        assert!(TYPE_QUALIFIED_REFERENCE.is_instance(&Value::from("Foo::Bar")));
        assert!(!TYPE_QUALIFIED_REFERENCE.is_instance(&Value::from("foo::Bar")));
        assert!(TYPE_MEMBER_NAME.is_instance(&Value::from("_x1")));
        assert!(!TYPE_SIMPLE_TYPE_NAME.is_instance(&Value::from("Foo::Bar")));
    }
}
