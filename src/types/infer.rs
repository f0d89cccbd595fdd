//! Type inference for values

use super::{factory, FloatType, IntegerType, StructElement, TimespanType, TimestampType, Type, TypeKind as K};
use crate::semver::VersionRange;
use crate::values::Value;

/// The most specific type of `value`. Arrays and hashes get the common type of their elements.
pub fn infer(value: &Value) -> Type {
    match value {
        Value::Undef => factory::undef(),
        Value::Default => factory::default_type(),
        Value::Boolean(_) => factory::boolean(),
        Value::Integer(n) => factory::integer_of(IntegerType::exact(*n)),
        Value::Float(x) => factory::float_of(FloatType { min: *x, max: *x }),
        Value::String(s) => factory::string_value(s),
        Value::Regexp(source) => factory::regexp_of(source).unwrap_or_else(|_| factory::regexp()),
        Value::Array(values) => {
            if values.is_empty() {
                return empty_array();
            }
            let element = common_of(values.iter().map(infer));
            factory::array(element, IntegerType::exact(values.len() as i64))
        }
        Value::Hash(map) => {
            if map.is_empty() {
                return empty_hash();
            }
            let key = common_of(map.keys().map(infer));
            let value = common_of(map.values().map(infer));
            factory::hash(key, value, IntegerType::exact(map.len() as i64))
        }
        Value::Type(t) => factory::type_type(t.clone()),
        Value::Version(v) => factory::sem_ver_of(vec![VersionRange::exact(v)]),
        Value::VersionRange(_) => factory::sem_ver_range(),
        Value::Timespan(t) => factory::timespan_of(TimespanType { min: *t, max: *t }),
        Value::Timestamp(t) => factory::timestamp_of(TimestampType { min: *t, max: *t }),
        Value::Sensitive(v) => factory::sensitive(infer(v)),
        Value::Object(o) => o.ptype().clone(),
    }
}

/// Like [`infer`], keeping positional detail: arrays become tuples and hashes with string keys
/// become structs
pub fn infer_set(value: &Value) -> Type {
    match value {
        Value::Array(values) if values.is_empty() => empty_array(),
        Value::Array(values) => factory::tuple(values.iter().map(infer_set).collect(), None),
        Value::Hash(map) if map.is_empty() => empty_hash(),
        Value::Hash(map) if map.keys().all(|k| k.as_str().is_some_and(|s| !s.is_empty())) => {
            let elements = map
                .iter()
                .filter_map(|(k, v)| {
                    let name = k.as_str()?;
                    Some(StructElement {
                        name: name.to_string(),
                        key: factory::string_value(name),
                        value: infer_set(v),
                    })
                })
                .collect();
            factory::struct_type(elements)
        }
        Value::Hash(map) => {
            let key = common_of(map.keys().map(infer_set));
            let value = common_of(map.values().map(infer_set));
            factory::hash(key, value, IntegerType::exact(map.len() as i64))
        }
        Value::Sensitive(v) => factory::sensitive(infer_set(v)),
        _ => infer(value),
    }
}

fn empty_array() -> Type {
    factory::array(factory::unit(), IntegerType::exact(0))
}

fn empty_hash() -> Type {
    factory::hash(factory::unit(), factory::unit(), IntegerType::exact(0))
}

fn common_of(types: impl Iterator<Item = Type>) -> Type {
    types
        .reduce(|a, b| common_type(&a, &b))
        .unwrap_or_else(factory::unit)
}

/// The narrowest type, from a fixed set of candidates, that both types are assignable to
pub fn common_type(
    t1: &Type,
    t2: &Type,
) -> Type {
    if t1.is_assignable(t2) {
        return t1.clone();
    }
    if t2.is_assignable(t1) {
        return t2.clone();
    }

    match (t1.resolved().kind(), t2.resolved().kind()) {
        (K::Array(a), K::Array(b)) => return factory::array_of(common_type(&a.element, &b.element)),
        (K::Hash(a), K::Hash(b)) => {
            return factory::hash_of(common_type(&a.key, &b.key), common_type(&a.value, &b.value));
        }
        (K::Type(a), K::Type(b)) => return factory::type_type(common_type(a, b)),
        (K::Enum(a), K::Enum(b)) if a.case_insensitive == b.case_insensitive => {
            let values = a.values.iter().chain(&b.values).cloned().collect();
            return factory::enumeration(values, a.case_insensitive);
        }
        (K::Pattern(a), K::Pattern(b)) => return factory::pattern(a.iter().chain(b).cloned().collect()),
        (K::String(_), K::String(_)) => return factory::string(),
        (K::Integer(a), K::Integer(b)) => return factory::integer_of(a.merge(b)),
        (K::Float(a), K::Float(b)) => return factory::float_of(a.merge(b)),
        (K::Timespan(a), K::Timespan(b)) => return factory::timespan_of(a.merge(b)),
        (K::Timestamp(a), K::Timestamp(b)) => return factory::timestamp_of(a.merge(b)),
        (K::Regexp(_), K::Regexp(_)) => return factory::regexp(),
        (K::Callable(_), K::Callable(_)) => return factory::callable_default(),
        (K::Runtime(_), K::Runtime(_)) => return factory::runtime_default(),
        _ => {}
    }

    for candidate in [factory::numeric(), factory::scalar_data(), factory::scalar(), factory::data()] {
        if candidate.is_assignable(t1) && candidate.is_assignable(t2) {
            return candidate;
        }
    }
    factory::any()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_scalars() {
        assert_eq!(infer(&Value::Integer(3)).to_string(), "Integer[3, 3]");
        assert_eq!(infer(&Value::from("a")).to_string(), "String['a']");
        assert!(infer(&Value::Undef).ptr_eq(&factory::undef()));
    }

    #[test]
    fn test_infer_containers() {
        let value = Value::Array(vec![Value::Integer(1), Value::Integer(5)]);
        assert_eq!(infer(&value).to_string(), "Array[Integer[1, 5], 2, 2]");
        assert_eq!(infer(&Value::Array(Vec::new())).to_string(), "Array[Unit, 0, 0]");
        let mixed = Value::Array(vec![Value::Integer(1), Value::Float(2.0)]);
        assert_eq!(infer(&mixed).to_string(), "Array[Numeric, 2, 2]");
        let strings = Value::Array(vec![Value::from("a"), Value::Boolean(true)]);
        assert_eq!(infer(&strings).to_string(), "Array[ScalarData, 2, 2]");
    }

    #[test]
    fn test_infer_set() {
        let value = Value::hash_of([("a", Value::Integer(1)), ("b", Value::Array(vec![Value::from("x")]))]);
        assert_eq!(
            infer_set(&value).to_string(),
            "Struct[{'a' => Integer[1, 1], 'b' => Tuple[String['x']]}]"
        );
    }

    #[test]
    fn test_inferred_type_accepts_value() {
        let value = Value::hash_of([("k", Value::Array(vec![Value::Integer(1), Value::Undef]))]);
        assert!(infer(&value).is_instance(&value));
        assert!(infer_set(&value).is_instance(&value));
    }
}
