//! Source form of types
//!
//! Every type prints as an expression that evaluates to an equal type. Parameters that hold
//! their default are left out, and a range bound that is open prints as `default`.

use std::fmt::{self, Write};

use super::{CallableType, IntegerType, Type, TypeKind as K};
use crate::util::names::{quote_string, regexp_literal};

impl fmt::Display for Type {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self.kind() {
            K::Any => f.write_str("Any"),
            K::Unit => f.write_str("Unit"),
            K::Undef => f.write_str("Undef"),
            K::Default => f.write_str("Default"),
            K::Boolean => f.write_str("Boolean"),
            K::Scalar => f.write_str("Scalar"),
            K::ScalarData => f.write_str("ScalarData"),
            K::Numeric => f.write_str("Numeric"),
            K::SemVerRange => f.write_str("SemVerRange"),
            K::Integer(r) if r.is_default() => f.write_str("Integer"),
            K::Integer(r) => write!(f, "Integer[{}]", IntRange(r)),
            K::Float(r) if r.is_default() => f.write_str("Float"),
            K::Float(r) => {
                f.write_str("Float[")?;
                if r.max == f64::INFINITY {
                    write!(f, "{:?}", r.min)?;
                } else if r.min == f64::NEG_INFINITY {
                    write!(f, "default, {:?}", r.max)?;
                } else {
                    write!(f, "{:?}, {:?}", r.min, r.max)?;
                }
                f.write_str("]")
            }
            K::String(s) => match &s.value {
                Some(v) => write!(f, "String[{}]", quote_string(v)),
                None if s.size == IntegerType::SIZE => f.write_str("String"),
                None => write!(f, "String[{}]", IntRange(&s.size)),
            },
            K::Enum(e) if e.values.is_empty() => f.write_str("Enum"),
            K::Enum(e) => {
                let values: Vec<String> = e.values.iter().map(|v| quote_string(v)).collect();
                write!(f, "Enum[{}", values.join(", "))?;
                if e.case_insensitive {
                    f.write_str(", true")?;
                }
                f.write_str("]")
            }
            K::Pattern(regexps) if regexps.is_empty() => f.write_str("Pattern"),
            K::Pattern(regexps) => {
                let sources: Vec<String> = regexps.iter().map(|r| regexp_literal(r.source())).collect();
                write!(f, "Pattern[{}]", sources.join(", "))
            }
            K::Regexp(None) => f.write_str("Regexp"),
            K::Regexp(Some(r)) => write!(f, "Regexp[{}]", regexp_literal(r.source())),
            K::Collection(size) if *size == IntegerType::SIZE => f.write_str("Collection"),
            K::Collection(size) => write!(f, "Collection[{}]", IntRange(size)),
            K::Array(a) => {
                let default_element = matches!(a.element.kind(), K::Any);
                match (default_element, a.size == IntegerType::SIZE) {
                    (true, true) => f.write_str("Array"),
                    (_, true) => write!(f, "Array[{}]", a.element),
                    _ => write!(f, "Array[{}, {}]", a.element, IntRange(&a.size)),
                }
            }
            K::Hash(h) => {
                let default_types = matches!(h.key.kind(), K::Any) && matches!(h.value.kind(), K::Any);
                match (default_types, h.size == IntegerType::SIZE) {
                    (true, true) => f.write_str("Hash"),
                    (_, true) => write!(f, "Hash[{}, {}]", h.key, h.value),
                    _ => write!(f, "Hash[{}, {}, {}]", h.key, h.value, IntRange(&h.size)),
                }
            }
            K::Tuple(t) if t.types.is_empty() && t.size == IntegerType::SIZE => f.write_str("Tuple"),
            K::Tuple(_) => write!(f, "Tuple[{}]", tuple_params(self)),
            K::Struct(s) if s.elements.is_empty() => f.write_str("Struct"),
            K::Struct(s) => {
                f.write_str("Struct[{")?;
                for (i, element) in s.elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if matches!(element.key.kind(), K::Optional(_)) {
                        write!(f, "Optional[{}]", quote_string(&element.name))?;
                    } else {
                        f.write_str(&quote_string(&element.name))?;
                    }
                    write!(f, " => {}", element.value)?;
                }
                f.write_str("}]")
            }
            K::Optional(t) => wrapper(f, "Optional", t),
            K::NotUndef(t) => wrapper(f, "NotUndef", t),
            K::Iterable(t) => wrapper(f, "Iterable", t),
            K::Iterator(t) => wrapper(f, "Iterator", t),
            K::Type(t) => wrapper(f, "Type", t),
            K::Sensitive(t) => wrapper(f, "Sensitive", t),
            K::Variant(members) if members.is_empty() => f.write_str("Variant"),
            K::Variant(members) => write!(f, "Variant[{}]", join(members)),
            K::Callable(c) => write_callable(f, c),
            K::SemVer(ranges) if ranges.is_empty() => f.write_str("SemVer"),
            K::SemVer(ranges) => {
                let ranges: Vec<String> = ranges.iter().map(|r| quote_string(r.as_str())).collect();
                write!(f, "SemVer[{}]", ranges.join(", "))
            }
            K::Timespan(r) => time_range(
                f,
                "Timespan",
                (r.min != crate::time::Timespan::MIN).then(|| r.min.to_string()),
                (r.max != crate::time::Timespan::MAX).then(|| r.max.to_string()),
            ),
            K::Timestamp(r) => time_range(
                f,
                "Timestamp",
                (r.min != crate::time::Timestamp::MIN).then(|| r.min.to_string()),
                (r.max != crate::time::Timestamp::MAX).then(|| r.max.to_string()),
            ),
            K::Resource(r) => match (&r.type_name, &r.title) {
                (None, _) => f.write_str("Resource"),
                (Some(name), None) => write!(f, "Resource[{}]", quote_string(name)),
                (Some(name), Some(title)) => {
                    write!(f, "Resource[{}, {}]", quote_string(name), quote_string(title))
                }
            },
            K::Class(None) => f.write_str("Class"),
            K::Class(Some(name)) => write!(f, "Class[{}]", quote_string(name)),
            K::Runtime(r) => match (&r.runtime, &r.name) {
                (None, _) => f.write_str("Runtime"),
                (Some(runtime), None) => write!(f, "Runtime[{}]", quote_string(runtime)),
                (Some(runtime), Some(name)) => {
                    write!(f, "Runtime[{}, {}]", quote_string(runtime), quote_string(name))
                }
            },
            K::Object(object) => match &object.name {
                Some(name) => f.write_str(name),
                None if object.is_default() => f.write_str("Object"),
                None => write!(f, "Object[{}]", object.init_hash_source()),
            },
            K::TypeSet(set) => match &set.name {
                Some(name) => f.write_str(name),
                None => write!(f, "TypeSet[{}]", set.init_hash_source()),
            },
            K::Alias(alias) => f.write_str(&alias.name),
            K::Reference(reference) => f.write_str(&reference.name),
        }
    }
}

/// An integer range as access parameters: `lo`, `default, hi` or `lo, hi`
struct IntRange<'a>(&'a IntegerType);

impl fmt::Display for IntRange<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let IntegerType { min, max } = *self.0;
        if max == i64::MAX {
            if min == i64::MIN {
                f.write_str("default")
            } else {
                write!(f, "{}", min)
            }
        } else if min == i64::MIN {
            write!(f, "default, {}", max)
        } else {
            write!(f, "{}, {}", min, max)
        }
    }
}

fn wrapper(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    inner: &Type,
) -> fmt::Result {
    if matches!(inner.kind(), K::Any) {
        f.write_str(name)
    } else {
        write!(f, "{}[{}]", name, inner)
    }
}

fn join(types: &[Type]) -> String {
    types.iter().map(Type::to_string).collect::<Vec<_>>().join(", ")
}

fn time_range(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    min: Option<String>,
    max: Option<String>,
) -> fmt::Result {
    match (min, max) {
        (None, None) => f.write_str(name),
        (Some(min), None) => write!(f, "{}[{}]", name, quote_string(&min)),
        (None, Some(max)) => write!(f, "{}[default, {}]", name, quote_string(&max)),
        (Some(min), Some(max)) => write!(f, "{}[{}, {}]", name, quote_string(&min), quote_string(&max)),
    }
}

/// Positional types followed by the size when it differs from the type count
fn tuple_params(tuple: &Type) -> String {
    let K::Tuple(t) = tuple.kind() else {
        return String::new();
    };
    let mut out = join(&t.types);
    let exact = IntegerType::exact(t.types.len() as i64);
    if t.types.is_empty() || t.size != exact {
        if !out.is_empty() {
            out.push_str(", ");
        }
        let _ = write!(out, "{}", IntRange(&t.size));
    }
    out
}

fn write_callable(
    f: &mut fmt::Formatter<'_>,
    c: &CallableType,
) -> fmt::Result {
    let mut flat = match &c.params {
        Some(params) => tuple_params(params),
        None => String::new(),
    };
    if let Some(block) = &c.block {
        if !flat.is_empty() {
            flat.push_str(", ");
        }
        let _ = write!(flat, "{}", block);
    }
    match &c.return_type {
        Some(ret) => write!(f, "Callable[[{}], {}]", flat, ret),
        None if flat.is_empty() => f.write_str("Callable"),
        None => write!(f, "Callable[{}]", flat),
    }
}
