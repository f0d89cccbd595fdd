//! Runtime values
//!
//! [`Value`] is what membership tests run against and what the evaluator produces for
//! expressions that are not types (literals, arrays and hashes of parameters).

pub mod dynamic_object;

use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

pub use dynamic_object::DynamicObject;

use crate::semver::{Version, VersionRange};
use crate::time::{Timespan, Timestamp};
use crate::types::Type;
use crate::util::names::{quote_string, regexp_literal};

/// Ordered associative container
pub type ValueMap = IndexMap<Value, Value>;

/// A runtime value
#[derive(Debug, Clone)]
pub enum Value {
    Undef,
    Default,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Regular expression source
    Regexp(String),
    Array(Vec<Value>),
    Hash(ValueMap),
    Type(Type),
    Version(Version),
    VersionRange(VersionRange),
    Timespan(Timespan),
    Timestamp(Timestamp),
    Sensitive(Box<Value>),
    Object(DynamicObject),
}

impl Value {
    /// Build a hash from string keys
    pub fn hash_of<K, I>(entries: I) -> Value
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Hash(
            entries
                .into_iter()
                .map(|(k, v)| (Value::String(k.into()), v))
                .collect(),
        )
    }

    pub fn is_undef(&self) -> bool {
        matches!(self, Value::Undef)
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Value::Default)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&Type> {
        match self {
            Value::Type(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_hash(&self) -> Option<&ValueMap> {
        match self {
            Value::Hash(map) => Some(map),
            _ => None,
        }
    }

    /// Entry of a hash value under a string key
    pub fn get(
        &self,
        key: &str,
    ) -> Option<&Value> {
        self.as_hash()
            .and_then(|map| map.get(&Value::String(key.to_string())))
    }

    /// Short kind label used in messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Undef => "Undef",
            Value::Default => "Default",
            Value::Boolean(_) => "Boolean",
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Regexp(_) => "Regexp",
            Value::Array(_) => "Array",
            Value::Hash(_) => "Hash",
            Value::Type(_) => "Type",
            Value::Version(_) => "SemVer",
            Value::VersionRange(_) => "SemVerRange",
            Value::Timespan(_) => "Timespan",
            Value::Timestamp(_) => "Timestamp",
            Value::Sensitive(_) => "Sensitive",
            Value::Object(_) => "Object",
        }
    }
}

impl PartialEq for Value {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        use Value::*;
        match (self, other) {
            (Undef, Undef) | (Default, Default) => true,
            (Boolean(a), Boolean(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits() || a == b,
            (String(a), String(b)) | (Regexp(a), Regexp(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            // Hash equality ignores entry order
            (Hash(a), Hash(b)) => a.len() == b.len() && a.iter().all(|(k, v)| b.get(k) == Some(v)),
            (Type(a), Type(b)) => a == b,
            (Version(a), Version(b)) => a == b,
            (VersionRange(a), VersionRange(b)) => a == b,
            (Timespan(a), Timespan(b)) => a == b,
            (Timestamp(a), Timestamp(b)) => a == b,
            (Sensitive(a), Sensitive(b)) => a == b,
            (Object(a), Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Undef | Value::Default => {}
            Value::Boolean(b) => b.hash(state),
            Value::Integer(n) => n.hash(state),
            Value::Float(x) => {
                // 0.0 and -0.0 compare equal
                let x = if *x == 0.0 { 0.0f64 } else { *x };
                x.to_bits().hash(state)
            }
            Value::String(s) | Value::Regexp(s) => s.hash(state),
            Value::Array(values) => values.hash(state),
            Value::Hash(map) => map.len().hash(state),
            Value::Type(t) => t.hash(state),
            Value::Version(v) => v.hash(state),
            Value::VersionRange(r) => r.hash(state),
            Value::Timespan(t) => t.hash(state),
            Value::Timestamp(t) => t.hash(state),
            Value::Sensitive(v) => v.hash(state),
            Value::Object(o) => o.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Value::Undef => write!(f, "undef"),
            Value::Default => write!(f, "default"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::String(s) => write!(f, "{}", quote_string(s)),
            Value::Regexp(source) => write!(f, "{}", regexp_literal(source)),
            Value::Array(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
            Value::Hash(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Type(t) => write!(f, "{}", t),
            Value::Version(v) => write!(f, "{}", quote_string(&v.to_string())),
            Value::VersionRange(r) => write!(f, "{}", quote_string(r.as_str())),
            Value::Timespan(t) => write!(f, "{}", quote_string(&t.to_string())),
            Value::Timestamp(t) => write!(f, "{}", quote_string(&t.to_string())),
            Value::Sensitive(_) => write!(f, "Sensitive [value redacted]"),
            Value::Object(o) => write!(f, "{}", o),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Type> for Value {
    fn from(t: Type) -> Self {
        Value::Type(t)
    }
}

impl From<Version> for Value {
    fn from(v: Version) -> Self {
        Value::Version(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(values)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::Hash(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Undef, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::factory;

    #[test]
    fn test_hash_equality_ignores_order() {
        let a = Value::hash_of([("a", Value::Integer(1)), ("b", Value::Integer(2))]);
        let b = Value::hash_of([("b", Value::Integer(2)), ("a", Value::Integer(1))]);
        assert_eq!(a, b);
        assert_eq!(a.get("b"), Some(&Value::Integer(2)));
        assert_eq!(a.get("c"), None);
    }

    #[test]
    fn test_display() {
        let value = Value::Array(vec![
            Value::from("it's"),
            Value::from(1.0),
            Value::Undef,
            Value::Type(factory::integer()),
        ]);
        assert_eq!(value.to_string(), "['it\\'s', 1.0, undef, Integer]");
        let hash = Value::hash_of([("k", Value::Regexp("a/b".into()))]);
        assert_eq!(hash.to_string(), "{'k' => /a\\/b/}");
    }

    #[test]
    fn test_types_as_keys() {
        let mut map = ValueMap::new();
        map.insert(Value::Type(factory::string()), Value::Integer(1));
        assert_eq!(map.get(&Value::Type(factory::string())), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Undef);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }
}
