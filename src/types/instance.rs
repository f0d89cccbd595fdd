//! Membership of runtime values

use super::infer::infer;
use super::{Type, TypeKind as K};
use crate::error::TypeAssertionError;
use crate::meta;
use crate::values::Value;

impl Type {
    /// Whether `value` is an instance of this type
    pub fn is_instance(
        &self,
        value: &Value,
    ) -> bool {
        let resolved = self.resolved();
        match (resolved.kind(), value) {
            (K::Any | K::Unit, _) => true,
            (K::Undef, Value::Undef) | (K::Default, Value::Default) | (K::Boolean, Value::Boolean(_)) => true,
            (K::Scalar, v) => matches!(
                v,
                Value::Integer(_)
                    | Value::Float(_)
                    | Value::String(_)
                    | Value::Boolean(_)
                    | Value::Regexp(_)
                    | Value::Version(_)
                    | Value::Timespan(_)
                    | Value::Timestamp(_)
            ),
            (K::ScalarData, v) => {
                matches!(v, Value::Integer(_) | Value::Float(_) | Value::String(_) | Value::Boolean(_))
            }
            (K::Numeric, v) => matches!(v, Value::Integer(_) | Value::Float(_)),
            (K::Integer(range), Value::Integer(n)) => range.contains(*n),
            (K::Float(range), Value::Float(x)) => range.contains(*x),
            (K::String(s), Value::String(v)) => {
                s.size.contains(v.chars().count() as i64) && s.value.as_ref().map_or(true, |expected| expected == v)
            }
            (K::Enum(e), Value::String(v)) => e.contains(v),
            (K::Pattern(regexps), Value::String(v)) => regexps.is_empty() || regexps.iter().any(|r| r.is_match(v)),
            (K::Regexp(r), Value::Regexp(source)) => r.as_ref().map_or(true, |r| r.source() == source),
            (K::Collection(size), Value::Array(values)) => size.contains(values.len() as i64),
            (K::Collection(size), Value::Hash(map)) => size.contains(map.len() as i64),
            (K::Array(a), Value::Array(values)) => {
                a.size.contains(values.len() as i64) && values.iter().all(|v| a.element.is_instance(v))
            }
            (K::Hash(h), Value::Hash(map)) => {
                h.size.contains(map.len() as i64)
                    && map.iter().all(|(k, v)| h.key.is_instance(k) && h.value.is_instance(v))
            }
            (K::Tuple(t), Value::Array(values)) => {
                t.size.contains(values.len() as i64)
                    && values
                        .iter()
                        .enumerate()
                        .all(|(index, v)| t.type_at(index).map_or(true, |element| element.is_instance(v)))
            }
            (K::Struct(s), Value::Hash(map)) => {
                let mut matched = 0;
                for element in &s.elements {
                    match map.get(&Value::String(element.name.clone())) {
                        None => {
                            if !element.is_optional() {
                                return false;
                            }
                        }
                        Some(v) => {
                            matched += 1;
                            if !element.value.is_instance(v) {
                                return false;
                            }
                        }
                    }
                }
                matched == map.len()
            }
            (K::Optional(t), v) => v.is_undef() || t.is_instance(v),
            (K::NotUndef(t), v) => !v.is_undef() && t.is_instance(v),
            (K::Variant(members), v) => members.iter().any(|m| m.is_instance(v)),
            (K::Iterable(t), Value::Array(values)) => values.iter().all(|v| t.is_instance(v)),
            (K::Iterable(t), Value::Hash(map)) => map
                .iter()
                .all(|(k, v)| t.is_instance(&Value::Array(vec![k.clone(), v.clone()]))),
            (K::Type(t), Value::Type(x)) => t.is_assignable(x),
            (K::Sensitive(t), Value::Sensitive(v)) => t.is_instance(v),
            (K::SemVer(ranges), Value::Version(version)) => {
                ranges.is_empty() || ranges.iter().any(|r| r.includes(version))
            }
            (K::SemVerRange, Value::VersionRange(_)) => true,
            (K::Timespan(range), Value::Timespan(t)) => range.contains(*t),
            (K::Timestamp(range), Value::Timestamp(t)) => range.contains(*t),
            (K::Object(object), Value::Object(instance)) => {
                if object.is_default() {
                    return true;
                }
                if !resolved.is_assignable(instance.ptype()) {
                    return false;
                }
                let instance_type = instance.ptype().resolved();
                let K::Object(actual) = instance_type.kind() else {
                    return false;
                };
                actual
                    .all_attributes()
                    .iter()
                    .all(|attribute| match instance.get(&attribute.name) {
                        Ok(v) => attribute.value_type.is_instance(&v),
                        Err(_) => false,
                    })
            }
            // Types are the instances of the meta object types
            (K::Object(object), Value::Type(t)) => match object.name.as_deref() {
                Some(meta::ANY_TYPE_NAME) => true,
                Some(name) => meta::meta_type_name(t) == name,
                None => false,
            },
            (K::TypeSet(set), Value::Type(t)) => {
                matches!(t.resolved().kind(), K::TypeSet(_)) && (set.is_default() || resolved.is_assignable(t))
            }
            _ => false,
        }
    }
}

/// Assert that `value` is an instance of `expected`.
///
/// The error path descends into the struct member, hash key or array index where the mismatch
/// was found, such as `initHash['types']['Foo']`.
pub fn assert_instance_of(
    path: &str,
    expected: &Type,
    value: &Value,
) -> Result<(), TypeAssertionError> {
    if expected.is_instance(value) {
        return Ok(());
    }

    let resolved = expected.resolved();
    match (resolved.kind(), value) {
        (K::Struct(s), Value::Hash(map)) => {
            for element in &s.elements {
                match map.get(&Value::String(element.name.clone())) {
                    None if !element.is_optional() => {
                        return Err(TypeAssertionError::new(
                            path,
                            format!("expects a value for key '{}'", element.name),
                        ));
                    }
                    None => {}
                    Some(v) => assert_instance_of(&format!("{}['{}']", path, element.name), &element.value, v)?,
                }
            }
            for key in map.keys() {
                let declared = key.as_str().is_some_and(|name| s.element(name).is_some());
                if !declared {
                    return Err(TypeAssertionError::new(path, format!("unrecognized key {}", key)));
                }
            }
        }
        (K::Hash(h), Value::Hash(map)) if h.size.contains(map.len() as i64) => {
            for (k, v) in map {
                if !h.key.is_instance(k) {
                    return Err(mismatch(&format!("{}[{}]", path, k), &h.key, k));
                }
                assert_instance_of(&format!("{}[{}]", path, k), &h.value, v)?;
            }
        }
        (K::Array(a), Value::Array(values)) if a.size.contains(values.len() as i64) => {
            for (index, v) in values.iter().enumerate() {
                assert_instance_of(&format!("{}[{}]", path, index), &a.element, v)?;
            }
        }
        (K::Tuple(t), Value::Array(values)) if t.size.contains(values.len() as i64) => {
            for (index, v) in values.iter().enumerate() {
                if let Some(element) = t.type_at(index) {
                    assert_instance_of(&format!("{}[{}]", path, index), element, v)?;
                }
            }
        }
        (K::Optional(t), v) if !v.is_undef() => return assert_instance_of(path, t, v),
        (K::NotUndef(t), v) if !v.is_undef() => return assert_instance_of(path, t, v),
        _ => {}
    }
    Err(mismatch(path, expected, value))
}

fn mismatch(
    path: &str,
    expected: &Type,
    value: &Value,
) -> TypeAssertionError {
    let actual = infer(value).generalize();
    TypeAssertionError::new(
        path,
        format!("expects {} value, got {}", with_article(&expected.to_string()), actual),
    )
}

/// `Integer` → `an Integer`
fn with_article(name: &str) -> String {
    match name.chars().next() {
        Some(c) if "AEIOUaeiou".contains(c) => format!("an {}", name),
        _ => format!("a {}", name),
    }
}
