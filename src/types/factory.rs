//! Type constructors
//!
//! Parameterless kinds are shared statics so that the identity fast path in assignability and
//! equality applies to them. Constructors that can fail return a [`TypeAssertionError`].

use once_cell::sync::Lazy;

use crate::error::TypeAssertionError;
use crate::frontend::Expr;
use crate::semver::VersionRange;

use super::normalize::normalize_variant;
use super::{
    ArrayType, CallableType, EnumType, FloatType, HashType, IntegerType, ObjectType, RegexpType, ResourceType,
    RuntimeType, StringType, StructElement, StructType, TimespanType, TimestampType, TupleType, Type, TypeAlias,
    TypeKind, TypeReference, TypeSetType,
};

macro_rules! shared_types {
    ($($fn_name:ident => $kind:expr;)*) => {
        $(
            pub fn $fn_name() -> Type {
                static SHARED: Lazy<Type> = Lazy::new(|| Type::new($kind));
                SHARED.clone()
            }
        )*
    };
}

shared_types! {
    any => TypeKind::Any;
    unit => TypeKind::Unit;
    undef => TypeKind::Undef;
    default_type => TypeKind::Default;
    boolean => TypeKind::Boolean;
    scalar => TypeKind::Scalar;
    scalar_data => TypeKind::ScalarData;
    numeric => TypeKind::Numeric;
    integer => TypeKind::Integer(IntegerType::DEFAULT);
    float => TypeKind::Float(FloatType::DEFAULT);
    string => TypeKind::String(StringType { size: IntegerType::SIZE, value: None });
    enum_default => TypeKind::Enum(EnumType { values: Vec::new(), case_insensitive: false });
    pattern_default => TypeKind::Pattern(Vec::new());
    regexp => TypeKind::Regexp(None);
    collection_default => TypeKind::Collection(IntegerType::SIZE);
    array_default => TypeKind::Array(ArrayType { element: any(), size: IntegerType::SIZE });
    hash_default => TypeKind::Hash(HashType { key: any(), value: any(), size: IntegerType::SIZE });
    tuple_default => TypeKind::Tuple(TupleType { types: Vec::new(), size: IntegerType::SIZE });
    struct_default => TypeKind::Struct(StructType { elements: Vec::new() });
    optional_default => TypeKind::Optional(any());
    not_undef_default => TypeKind::NotUndef(any());
    variant_default => TypeKind::Variant(Vec::new());
    callable_default => TypeKind::Callable(CallableType::default());
    iterable_default => TypeKind::Iterable(any());
    iterator_default => TypeKind::Iterator(any());
    type_default => TypeKind::Type(any());
    sensitive_default => TypeKind::Sensitive(any());
    sem_ver => TypeKind::SemVer(Vec::new());
    sem_ver_range => TypeKind::SemVerRange;
    timespan => TypeKind::Timespan(TimespanType::DEFAULT);
    timestamp => TypeKind::Timestamp(TimestampType::DEFAULT);
    resource_default => TypeKind::Resource(ResourceType::default());
    class_default => TypeKind::Class(None);
    runtime_default => TypeKind::Runtime(RuntimeType::default());
    object_default => TypeKind::Object(ObjectType::default());
}

/// `Data`, the recursive alias
/// `Variant[ScalarData, Undef, Hash[String, Data], Array[Data]]`
pub fn data() -> Type {
    static DATA: Lazy<Type> = Lazy::new(|| {
        let alias = Type::new(TypeKind::Alias(TypeAlias::pending("Data")));
        let self_ref = Type::new(TypeKind::Reference(TypeReference::to("Data", &alias)));
        let body = variant(vec![
            scalar_data(),
            undef(),
            hash_of(string(), self_ref.clone()),
            array_of(self_ref),
        ]);
        if let TypeKind::Alias(data) = alias.kind() {
            data.set_body(body);
        }
        alias
    });
    DATA.clone()
}

pub fn integer_range(
    min: i64,
    max: i64,
) -> Result<Type, TypeAssertionError> {
    let range = IntegerType::new(min, max)?;
    Ok(integer_of(range))
}

pub fn integer_of(range: IntegerType) -> Type {
    if range.is_default() {
        integer()
    } else {
        Type::new(TypeKind::Integer(range))
    }
}

pub fn float_range(
    min: f64,
    max: f64,
) -> Result<Type, TypeAssertionError> {
    let range = FloatType::new(min, max)?;
    Ok(float_of(range))
}

pub fn float_of(range: FloatType) -> Type {
    if range.is_default() {
        float()
    } else {
        Type::new(TypeKind::Float(range))
    }
}

/// String with a length range
pub fn string_sized(size: IntegerType) -> Type {
    if size == IntegerType::SIZE {
        string()
    } else {
        Type::new(TypeKind::String(StringType { size, value: None }))
    }
}

/// String accepting exactly `value`
pub fn string_value(value: &str) -> Type {
    let length = value.chars().count() as i64;
    Type::new(TypeKind::String(StringType {
        size: IntegerType::exact(length),
        value: Some(value.to_string()),
    }))
}

/// Enum of distinct values in first-seen order
pub fn enumeration(
    values: Vec<String>,
    case_insensitive: bool,
) -> Type {
    let mut distinct: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !distinct.contains(&value) {
            distinct.push(value);
        }
    }
    Type::new(TypeKind::Enum(EnumType {
        values: distinct,
        case_insensitive,
    }))
}

/// Pattern of distinct regexps in first-seen order
pub fn pattern(regexps: Vec<RegexpType>) -> Type {
    let mut distinct: Vec<RegexpType> = Vec::with_capacity(regexps.len());
    for regexp in regexps {
        if !distinct.contains(&regexp) {
            distinct.push(regexp);
        }
    }
    Type::new(TypeKind::Pattern(distinct))
}

pub fn regexp_of(source: &str) -> Result<Type, TypeAssertionError> {
    Ok(Type::new(TypeKind::Regexp(Some(RegexpType::new(source)?))))
}

pub fn collection(size: IntegerType) -> Type {
    if size == IntegerType::SIZE {
        collection_default()
    } else {
        Type::new(TypeKind::Collection(size))
    }
}

pub fn array(
    element: Type,
    size: IntegerType,
) -> Type {
    Type::new(TypeKind::Array(ArrayType { element, size }))
}

pub fn array_of(element: Type) -> Type {
    array(element, IntegerType::SIZE)
}

pub fn hash(
    key: Type,
    value: Type,
    size: IntegerType,
) -> Type {
    Type::new(TypeKind::Hash(HashType { key, value, size }))
}

pub fn hash_of(
    key: Type,
    value: Type,
) -> Type {
    hash(key, value, IntegerType::SIZE)
}

/// Tuple of positional types. Without a size the tuple takes exactly one value per type.
pub fn tuple(
    types: Vec<Type>,
    size: Option<IntegerType>,
) -> Type {
    let size = size.unwrap_or_else(|| IntegerType::exact(types.len() as i64));
    Type::new(TypeKind::Tuple(TupleType { types, size }))
}

/// Member with a plain name. The key becomes optional when the value accepts undef.
pub fn struct_member(
    name: &str,
    value: Type,
) -> StructElement {
    let mut key = string_value(name);
    if value.is_assignable(&undef()) {
        key = optional(key);
    }
    StructElement {
        name: name.to_string(),
        key,
        value,
    }
}

/// Member with an explicit key type, `String['name']` or `Optional[String['name']]`
pub fn struct_element(
    key: Type,
    value: Type,
) -> Result<StructElement, TypeAssertionError> {
    let key_value = |t: &Type| match t.kind() {
        TypeKind::String(StringType { value: Some(v), .. }) => Some(v.clone()),
        TypeKind::Enum(EnumType { values, .. }) if values.len() == 1 => Some(values[0].clone()),
        _ => None,
    };
    let name = match key.kind() {
        TypeKind::Optional(inner) => key_value(inner),
        _ => key_value(&key),
    };
    match name {
        Some(name) if !name.is_empty() => Ok(StructElement { name, key, value }),
        _ => Err(TypeAssertionError::new(
            "",
            format!("Struct element key must be a non empty String or Optional String, got {}", key),
        )),
    }
}

pub fn struct_type(elements: Vec<StructElement>) -> Type {
    if elements.is_empty() {
        struct_default()
    } else {
        Type::new(TypeKind::Struct(StructType { elements }))
    }
}

pub fn optional(t: Type) -> Type {
    Type::new(TypeKind::Optional(t))
}

pub fn not_undef(t: Type) -> Type {
    Type::new(TypeKind::NotUndef(t))
}

/// Normalized union of `types`
pub fn variant(types: Vec<Type>) -> Type {
    normalize_variant(types)
}

pub fn callable(
    params: Option<Type>,
    block: Option<Type>,
    return_type: Option<Type>,
) -> Type {
    if params.is_none() && block.is_none() && return_type.is_none() {
        return callable_default();
    }
    Type::new(TypeKind::Callable(CallableType {
        params,
        block,
        return_type,
    }))
}

pub fn iterable(t: Type) -> Type {
    Type::new(TypeKind::Iterable(t))
}

pub fn iterator(t: Type) -> Type {
    Type::new(TypeKind::Iterator(t))
}

/// `Type[t]`
pub fn type_type(t: Type) -> Type {
    Type::new(TypeKind::Type(t))
}

pub fn sensitive(t: Type) -> Type {
    Type::new(TypeKind::Sensitive(t))
}

pub fn sem_ver_of(ranges: Vec<VersionRange>) -> Type {
    if ranges.is_empty() {
        sem_ver()
    } else {
        Type::new(TypeKind::SemVer(ranges))
    }
}

pub fn timespan_of(range: TimespanType) -> Type {
    if range == TimespanType::DEFAULT {
        timespan()
    } else {
        Type::new(TypeKind::Timespan(range))
    }
}

pub fn timestamp_of(range: TimestampType) -> Type {
    if range == TimestampType::DEFAULT {
        timestamp()
    } else {
        Type::new(TypeKind::Timestamp(range))
    }
}

pub fn resource(
    type_name: Option<String>,
    title: Option<String>,
) -> Type {
    if type_name.is_none() && title.is_none() {
        return resource_default();
    }
    Type::new(TypeKind::Resource(ResourceType { type_name, title }))
}

pub fn class(name: Option<String>) -> Type {
    match name {
        None => class_default(),
        name => Type::new(TypeKind::Class(name)),
    }
}

pub fn runtime(
    runtime: Option<String>,
    name: Option<String>,
) -> Type {
    if runtime.is_none() && name.is_none() {
        return runtime_default();
    }
    Type::new(TypeKind::Runtime(RuntimeType { runtime, name }))
}

pub fn object(object: ObjectType) -> Type {
    Type::new(TypeKind::Object(object))
}

pub fn type_set(set: TypeSetType) -> Type {
    Type::new(TypeKind::TypeSet(set))
}

/// An unresolved reference to `name`
pub fn type_reference(name: &str) -> Type {
    Type::new(TypeKind::Reference(TypeReference::new(name)))
}

/// A reference bound to `target`
pub fn type_reference_to(
    name: &str,
    target: &Type,
) -> Type {
    Type::new(TypeKind::Reference(TypeReference::to(name, target)))
}

/// An alias whose body is the evaluation of `expr`
pub fn type_alias(
    name: &str,
    expr: Expr,
) -> Type {
    Type::new(TypeKind::Alias(TypeAlias::declared(name, expr)))
}

pub fn type_alias_with_body(
    name: &str,
    body: Type,
) -> Type {
    Type::new(TypeKind::Alias(TypeAlias::with_body(name, body)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_shared() {
        assert!(integer().ptr_eq(&integer()));
        assert!(integer_range(i64::MIN, i64::MAX).unwrap().ptr_eq(&integer()));
        assert!(string_sized(IntegerType::SIZE).ptr_eq(&string()));
    }

    #[test]
    fn test_integer_range_order() {
        let err = integer_range(2, 1).unwrap_err();
        assert_eq!(err.message, "'from' must be less or equal to 'to'. Got (2, 1)");
    }

    #[test]
    fn test_struct_member_optional_when_value_accepts_undef() {
        let member = struct_member("a", optional(integer()));
        assert!(member.is_optional());
        let member = struct_member("b", integer());
        assert!(!member.is_optional());
    }

    #[test]
    fn test_struct_element_requires_named_key() {
        assert!(struct_element(string(), integer()).is_err());
        let element = struct_element(optional(string_value("x")), integer()).unwrap();
        assert_eq!(element.name, "x");
        assert!(element.is_optional());
    }

    #[test]
    fn test_enumeration_dedupes() {
        let t = enumeration(vec!["a".into(), "b".into(), "a".into()], false);
        match t.kind() {
            TypeKind::Enum(e) => assert_eq!(e.values, vec!["a", "b"]),
            _ => panic!("expected enum"),
        }
    }

    #[test]
    fn test_data_is_recursive() {
        let data = data();
        assert_eq!(data.name(), Some("Data"));
        assert!(data.is_resolved());
        assert!(data.is_assignable(&array_of(hash_of(string(), integer()))));
        assert!(!data.is_assignable(&array_of(sem_ver())));
    }
}
