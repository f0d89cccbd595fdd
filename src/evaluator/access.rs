//! Parameterization of types
//!
//! `Kind[args]` is built from the kind of the accessed type and the evaluated arguments. A
//! single integer bound is the lower bound; `default` leaves a bound open.

use crate::error::{Result, TypeAssertionError};
use crate::semver::VersionRange;
use crate::time::{Timespan, Timestamp};
use crate::types::factory::*;
use crate::types::{
    FloatType, IntegerType, ObjectType, RegexpType, StructElement, TimespanType, TimestampType, Type, TypeKind as K,
};
use crate::util::names::capitalize_segments;
use crate::values::Value;

fn error(message: impl Into<String>) -> crate::error::PcoreError {
    TypeAssertionError::new("", message).into()
}

fn arity(
    base: &Type,
    args: &[Value],
    expected: &str,
) -> crate::error::PcoreError {
    error(format!(
        "{}[] expects {} arguments, got {}",
        base,
        expected,
        args.len()
    ))
}

fn unexpected(
    base: &Type,
    what: &str,
    got: &Value,
) -> crate::error::PcoreError {
    error(format!("{}[] expects {}, got {}", base, what, got.kind_name()))
}

/// Integer bound; `default` is `open`
fn integer_bound(
    base: &Type,
    value: &Value,
    open: i64,
) -> Result<i64> {
    match value {
        Value::Integer(n) => Ok(*n),
        Value::Default => Ok(open),
        other => Err(unexpected(base, "an Integer or default", other)),
    }
}

fn is_bound(value: &Value) -> bool {
    matches!(value, Value::Integer(_) | Value::Default)
}

/// Range from `[Integer[..]]`, `[n]` or `[lo, hi]`
fn range_of(
    base: &Type,
    args: &[Value],
    open_min: i64,
) -> Result<IntegerType> {
    match args {
        [] => Ok(IntegerType {
            min: open_min,
            max: i64::MAX,
        }),
        [Value::Type(t)] => match t.resolved().kind() {
            K::Integer(range) => Ok(*range),
            _ => Err(unexpected(base, "an Integer type", &Value::Type(t.clone()))),
        },
        [lo] => Ok(IntegerType {
            min: integer_bound(base, lo, open_min)?,
            max: i64::MAX,
        }),
        [lo, hi] => Ok(IntegerType::new(
            integer_bound(base, lo, open_min)?,
            integer_bound(base, hi, i64::MAX)?,
        )?),
        _ => Err(arity(base, args, "1 to 2")),
    }
}

fn size_of(
    base: &Type,
    args: &[Value],
) -> Result<IntegerType> {
    range_of(base, args, 0)
}

fn float_bound(
    base: &Type,
    value: &Value,
    open: f64,
) -> Result<f64> {
    match value {
        Value::Float(x) => Ok(*x),
        Value::Integer(n) => Ok(*n as f64),
        Value::Default => Ok(open),
        other => Err(unexpected(base, "a Numeric or default", other)),
    }
}

/// A type argument. Strings stand for the type that accepts exactly that string.
fn type_arg(
    base: &Type,
    value: &Value,
) -> Result<Type> {
    match value {
        Value::Type(t) => Ok(t.clone()),
        Value::String(s) => Ok(string_value(s)),
        other => Err(unexpected(base, "a Type", other)),
    }
}

fn single_type(
    base: &Type,
    args: &[Value],
) -> Result<Type> {
    match args {
        [value] => type_arg(base, value),
        _ => Err(arity(base, args, "1")),
    }
}

fn string_arg(
    base: &Type,
    value: &Value,
) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(unexpected(base, "a String", other)),
    }
}

/// Name of a resource type given as a string, a type reference or a type name
fn resource_name(
    base: &Type,
    value: &Value,
) -> Result<String> {
    match value {
        Value::String(s) => Ok(capitalize_segments(s)),
        Value::Type(t) => t
            .name()
            .map(capitalize_segments)
            .ok_or_else(|| unexpected(base, "a resource type name", value)),
        other => Err(unexpected(base, "a resource type name", other)),
    }
}

/// `Timespan` and `Timestamp` bounds given as strings or numbers of seconds
fn timespan_bound(
    base: &Type,
    value: &Value,
    open: Timespan,
) -> Result<Timespan> {
    match value {
        Value::Default | Value::Undef => Ok(open),
        Value::String(s) => Ok(Timespan::parse(s)?),
        Value::Timespan(t) => Ok(*t),
        Value::Integer(n) => Ok(Timespan::from_seconds(*n)),
        Value::Float(x) => Ok(Timespan::from_nanos((x * 1e9) as i64)),
        other => Err(unexpected(base, "a Timespan string or default", other)),
    }
}

fn timestamp_bound(
    base: &Type,
    value: &Value,
    open: Timestamp,
) -> Result<Timestamp> {
    match value {
        Value::Default | Value::Undef => Ok(open),
        Value::String(s) => Ok(Timestamp::parse(s)?),
        Value::Timestamp(t) => Ok(*t),
        other => Err(unexpected(base, "a Timestamp string or default", other)),
    }
}

/// `Tuple` and `Callable` argument lists: leading types, then up to two trailing bounds
fn split_types_and_size(
    base: &Type,
    args: &[Value],
) -> Result<(Vec<Type>, Option<IntegerType>)> {
    let bounds = args.iter().rev().take(2).take_while(|v| is_bound(v)).count();
    let (types, bounds) = args.split_at(args.len() - bounds);
    let types = types.iter().map(|v| type_arg(base, v)).collect::<Result<Vec<_>>>()?;
    let size = if bounds.is_empty() {
        None
    } else {
        Some(size_of(base, bounds)?)
    };
    Ok((types, size))
}

fn params_tuple(
    base: &Type,
    args: &[Value],
) -> Result<Type> {
    let (types, size) = split_types_and_size(base, args)?;
    Ok(tuple(types, size))
}

fn is_block_type(t: &Type) -> bool {
    match t.kind() {
        K::Callable(_) => true,
        K::Optional(inner) => matches!(inner.kind(), K::Callable(_)),
        _ => false,
    }
}

fn callable_of(
    base: &Type,
    args: &[Value],
) -> Result<Type> {
    if let Some(Value::Array(params)) = args.first() {
        // Callable[[params], return]
        let return_type = match &args[1..] {
            [] => None,
            [r] => Some(type_arg(base, r)?),
            _ => return Err(arity(base, args, "1 to 2")),
        };
        let params = if params.is_empty() {
            None
        } else {
            Some(params_tuple(base, params)?)
        };
        return Ok(callable(params, None, return_type));
    }

    let mut flat = args;
    let mut block = None;
    if let Some(Value::Type(last)) = flat.last() {
        if is_block_type(last) {
            block = Some(last.clone());
            flat = &flat[..flat.len() - 1];
        }
    }
    let params = if flat.is_empty() {
        None
    } else {
        Some(params_tuple(base, flat)?)
    };
    Ok(callable(params, block, None))
}

fn struct_of(
    base: &Type,
    args: &[Value],
) -> Result<Type> {
    let [Value::Hash(members)] = args else {
        return Err(arity(base, args, "1 Hash"));
    };
    let elements = members
        .iter()
        .map(|(key, value)| {
            let value = type_arg(base, value)?;
            match key {
                Value::String(name) => Ok(struct_member(name, value)),
                Value::Type(key) => Ok(struct_element(key.clone(), value)?),
                other => Err(unexpected(base, "a String or Optional String key", other)),
            }
        })
        .collect::<Result<Vec<StructElement>>>()?;
    Ok(struct_type(elements))
}

fn enum_of(
    base: &Type,
    args: &[Value],
) -> Result<Type> {
    let (flag, values) = match args.split_last() {
        Some((Value::Boolean(b), rest)) => (*b, rest),
        _ => (false, args),
    };
    let mut strings = Vec::new();
    for value in values {
        match value {
            Value::String(s) => strings.push(s.clone()),
            Value::Array(items) => {
                for item in items {
                    strings.push(string_arg(base, item)?);
                }
            }
            other => return Err(unexpected(base, "a String", other)),
        }
    }
    Ok(enumeration(strings, flag))
}

fn pattern_of(
    base: &Type,
    args: &[Value],
) -> Result<Type> {
    let mut regexps = Vec::new();
    for value in args {
        match value {
            Value::String(s) | Value::Regexp(s) => regexps.push(RegexpType::new(s)?),
            Value::Type(t) => match t.resolved().kind() {
                K::Regexp(Some(r)) => regexps.push(r.clone()),
                K::Pattern(rs) => regexps.extend(rs.iter().cloned()),
                _ => return Err(unexpected(base, "a String, Regexp or Pattern", value)),
            },
            other => return Err(unexpected(base, "a String, Regexp or Pattern", other)),
        }
    }
    Ok(pattern(regexps))
}

fn resource_of(
    base: &Type,
    args: &[Value],
) -> Result<Type> {
    match args {
        [Value::Type(t)] if matches!(t.kind(), K::Resource(_)) => Ok(t.clone()),
        [name] => Ok(resource(Some(resource_name(base, name)?), None)),
        [name, title] => Ok(resource(Some(resource_name(base, name)?), Some(string_arg(base, title)?))),
        _ => Err(arity(base, args, "1 to 2")),
    }
}

/// `base[args]`. `base` must be the unparameterized type of its kind; an unresolved name
/// accessed with a title is a resource type.
pub(crate) fn parameterize(
    base: &Type,
    args: &[Value],
) -> Result<Type> {
    if args.is_empty() {
        return Err(arity(base, args, "at least 1"));
    }
    let resolved = base.resolved();
    match resolved.kind() {
        K::Reference(reference) => match args {
            [title] => Ok(resource(
                Some(capitalize_segments(&reference.name)),
                Some(string_arg(base, title)?),
            )),
            _ => Err(arity(base, args, "1")),
        },
        K::Integer(_) => Ok(integer_of(range_of(base, args, i64::MIN)?)),
        K::Float(_) => {
            let (min, max) = match args {
                [lo] => (float_bound(base, lo, f64::NEG_INFINITY)?, f64::INFINITY),
                [lo, hi] => (
                    float_bound(base, lo, f64::NEG_INFINITY)?,
                    float_bound(base, hi, f64::INFINITY)?,
                ),
                _ => return Err(arity(base, args, "1 to 2")),
            };
            Ok(float_of(FloatType::new(min, max)?))
        }
        K::String(_) => Ok(string_sized(size_of(base, args)?)),
        K::Enum(_) => enum_of(base, args),
        K::Pattern(_) => pattern_of(base, args),
        K::Regexp(_) => match args {
            [Value::String(s) | Value::Regexp(s)] => Ok(regexp_of(s)?),
            [other] => Err(unexpected(base, "a String or Regexp", other)),
            _ => Err(arity(base, args, "1")),
        },
        K::Collection(_) => Ok(collection(size_of(base, args)?)),
        K::Array(_) => match args {
            [Value::Type(element), size @ ..] => Ok(array(element.clone(), size_of(base, size)?)),
            size => Ok(array(any(), size_of(base, size)?)),
        },
        K::Hash(_) => match args {
            [Value::Type(key), value, size @ ..] => {
                Ok(hash(key.clone(), type_arg(base, value)?, size_of(base, size)?))
            }
            [Value::Type(_)] => Err(arity(base, args, "2 to 4")),
            size => Ok(hash(unit(), unit(), size_of(base, size)?)),
        },
        K::Tuple(_) => params_tuple(base, args),
        K::Struct(_) => struct_of(base, args),
        K::Optional(_) => Ok(optional(single_type(base, args)?)),
        K::NotUndef(_) => Ok(not_undef(single_type(base, args)?)),
        K::Type(_) => Ok(type_type(single_type(base, args)?)),
        K::Iterable(_) => Ok(iterable(single_type(base, args)?)),
        K::Iterator(_) => Ok(iterator(single_type(base, args)?)),
        K::Sensitive(_) => Ok(sensitive(single_type(base, args)?)),
        K::Variant(_) => Ok(variant(
            args.iter().map(|v| type_arg(base, v)).collect::<Result<Vec<_>>>()?,
        )),
        K::Callable(_) => callable_of(base, args),
        K::SemVer(_) => {
            let ranges = args
                .iter()
                .map(|v| match v {
                    Value::String(s) => Ok(VersionRange::parse(s)?),
                    Value::VersionRange(r) => Ok(r.clone()),
                    other => Err(unexpected(base, "a version range String", other)),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(sem_ver_of(ranges))
        }
        K::Timespan(_) => {
            let (min, max) = match args {
                [lo] => (timespan_bound(base, lo, Timespan::MIN)?, Timespan::MAX),
                [lo, hi] => (
                    timespan_bound(base, lo, Timespan::MIN)?,
                    timespan_bound(base, hi, Timespan::MAX)?,
                ),
                _ => return Err(arity(base, args, "1 to 2")),
            };
            Ok(timespan_of(TimespanType::new(min, max)?))
        }
        K::Timestamp(_) => {
            let (min, max) = match args {
                [lo] => (timestamp_bound(base, lo, Timestamp::MIN)?, Timestamp::MAX),
                [lo, hi] => (
                    timestamp_bound(base, lo, Timestamp::MIN)?,
                    timestamp_bound(base, hi, Timestamp::MAX)?,
                ),
                _ => return Err(arity(base, args, "1 to 2")),
            };
            Ok(timestamp_of(TimestampType::new(min, max)?))
        }
        K::Resource(r) if r.type_name.is_none() => resource_of(base, args),
        K::Resource(r) => match args {
            [title] => Ok(resource(r.type_name.clone(), Some(string_arg(base, title)?))),
            _ => Err(arity(base, args, "1")),
        },
        K::Class(None) => match args {
            [name] => Ok(class(Some(string_arg(base, name)?))),
            _ => Err(arity(base, args, "1")),
        },
        K::Runtime(_) => match args {
            [runtime_name] => Ok(runtime(Some(string_arg(base, runtime_name)?), None)),
            [runtime_name, name] => Ok(runtime(
                Some(string_arg(base, runtime_name)?),
                Some(string_arg(base, name)?),
            )),
            _ => Err(arity(base, args, "1 to 2")),
        },
        K::Object(o) if o.is_default() => match args {
            [init] => Ok(object(ObjectType::from_init_hash(None, init)?)),
            _ => Err(arity(base, args, "1")),
        },
        _ => Err(error(format!("{} is not a parameterized type", base))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().map(|n| Value::Integer(*n)).collect()
    }

    #[test]
    fn test_integer_bounds() {
        assert_eq!(parameterize(&integer(), &ints(&[1])).unwrap(), integer_range(1, i64::MAX).unwrap());
        assert_eq!(parameterize(&integer(), &ints(&[1, 2])).unwrap(), integer_range(1, 2).unwrap());
        assert_eq!(
            parameterize(&integer(), &[Value::Default, Value::Integer(5)]).unwrap(),
            integer_range(i64::MIN, 5).unwrap()
        );
        let err = parameterize(&integer(), &ints(&[2, 1])).unwrap_err();
        assert!(matches!(err, crate::error::PcoreError::TypeAssertion(_)));
    }

    #[test]
    fn test_array_and_hash_forms() {
        assert_eq!(
            parameterize(&array_default(), &ints(&[2, 8])).unwrap(),
            array(any(), IntegerType { min: 2, max: 8 })
        );
        let with_element = [Value::Type(integer()), Value::Integer(2), Value::Integer(8)];
        assert_eq!(
            parameterize(&array_default(), &with_element).unwrap(),
            array(integer(), IntegerType { min: 2, max: 8 })
        );
        assert_eq!(
            parameterize(&hash_default(), &ints(&[0, 10])).unwrap(),
            hash(unit(), unit(), IntegerType { min: 0, max: 10 })
        );
        let key_value = [Value::Type(string()), Value::Type(float()), Value::Integer(3)];
        assert_eq!(
            parameterize(&hash_default(), &key_value).unwrap(),
            hash(string(), float(), IntegerType { min: 3, max: i64::MAX })
        );
    }

    #[test]
    fn test_tuple_trailing_sizes() {
        let args = [Value::Type(integer()), Value::Type(float()), Value::Integer(4), Value::Integer(8)];
        assert_eq!(
            parameterize(&tuple_default(), &args).unwrap(),
            tuple(vec![integer(), float()], Some(IntegerType { min: 4, max: 8 }))
        );
    }

    #[test]
    fn test_callable_forms() {
        let params = [Value::Type(string()), Value::Type(integer())];
        assert_eq!(
            parameterize(&callable_default(), &params).unwrap(),
            callable(Some(tuple(vec![string(), integer()], None)), None, None)
        );
        let empty = [Value::Array(ints(&[0, 0])), Value::Type(string())];
        let block = parameterize(&callable_default(), &empty).unwrap();
        assert_eq!(block, callable(Some(tuple(vec![], None)), None, Some(string())));
        let with_block = [Value::Type(string()), Value::Type(block.clone())];
        assert_eq!(
            parameterize(&callable_default(), &with_block).unwrap(),
            callable(Some(tuple(vec![string()], None)), Some(block), None)
        );
    }

    #[test]
    fn test_resource_names() {
        assert_eq!(
            parameterize(&resource_default(), &[Value::from("file")]).unwrap(),
            resource(Some("File".into()), None)
        );
        let reference = type_reference("TypeName");
        assert_eq!(
            parameterize(&reference, &[Value::from("title")]).unwrap(),
            resource(Some("TypeName".into()), Some("title".into()))
        );
        assert_eq!(
            parameterize(&resource_default(), &[Value::from("typeName"), Value::from("title")]).unwrap(),
            resource(Some("TypeName".into()), Some("title".into()))
        );
    }

    #[test]
    fn test_not_parameterized() {
        let err = parameterize(&boolean(), &ints(&[1])).unwrap_err();
        assert_eq!(err.to_string(), "Boolean is not a parameterized type");
    }
}
