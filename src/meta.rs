//! Meta types
//!
//! Every kind of type is itself described by an object type named `Pcore::<Kind>Type`, so a
//! type can travel through the same codecs as any other object: the projection of a type is the
//! list of its parameters, and the factory builds the type back from that list.
//!
//! | Meta type | Attributes |
//! |---|---|
//! | `Pcore::IntegerType` | `from`, `to` |
//! | `Pcore::StringType` | `size_type`, `value` |
//! | `Pcore::ArrayType` | `element_type`, `size_type` |
//! | `Pcore::HashType` | `key_type`, `value_type`, `size_type` |
//! | `Pcore::StructType` | `elements` |
//! | ... | one attribute per parameter of the kind |

use std::sync::Arc;

use crate::context::Pcore;
use crate::error::{PcoreError, Result, TypeAssertionError};
use crate::registry::{ArgumentsAccessor, FactoryFn, ProjectionFn};
use crate::semver::VersionRange;
use crate::time::{Timespan, Timestamp};
use crate::types::factory::*;
use crate::types::{
    Attribute, FloatType, IntegerType, ObjectType, RegexpType, StructElement, TimespanType, TimestampType, Type,
    TypeAlias, TypeKind as K, TypeSetType,
};
use crate::util::config::RUNTIME_NAME_AUTHORITY;
use crate::values::Value;

/// Parent of all meta types; every type is an instance of it
pub const ANY_TYPE_NAME: &str = "Pcore::AnyType";

const META_PREFIX: &str = "Pcore::";

/// Name of the meta type that `t` is an instance of
pub fn meta_type_name(t: &Type) -> &'static str {
    match t.kind() {
        K::Any => "Pcore::AnyType",
        K::Unit => "Pcore::UnitType",
        K::Undef => "Pcore::UndefType",
        K::Default => "Pcore::DefaultType",
        K::Boolean => "Pcore::BooleanType",
        K::Scalar => "Pcore::ScalarType",
        K::ScalarData => "Pcore::ScalarDataType",
        K::Numeric => "Pcore::NumericType",
        K::Integer(_) => "Pcore::IntegerType",
        K::Float(_) => "Pcore::FloatType",
        K::String(_) => "Pcore::StringType",
        K::Enum(_) => "Pcore::EnumType",
        K::Pattern(_) => "Pcore::PatternType",
        K::Regexp(_) => "Pcore::RegexpType",
        K::Collection(_) => "Pcore::CollectionType",
        K::Array(_) => "Pcore::ArrayType",
        K::Hash(_) => "Pcore::HashType",
        K::Tuple(_) => "Pcore::TupleType",
        K::Struct(_) => "Pcore::StructType",
        K::Optional(_) => "Pcore::OptionalType",
        K::NotUndef(_) => "Pcore::NotUndefType",
        K::Variant(_) => "Pcore::VariantType",
        K::Callable(_) => "Pcore::CallableType",
        K::Iterable(_) => "Pcore::IterableType",
        K::Iterator(_) => "Pcore::IteratorType",
        K::Type(_) => "Pcore::TypeType",
        K::Sensitive(_) => "Pcore::SensitiveType",
        K::SemVer(_) => "Pcore::SemVerType",
        K::SemVerRange => "Pcore::SemVerRangeType",
        K::Timespan(_) => "Pcore::TimespanType",
        K::Timestamp(_) => "Pcore::TimestampType",
        K::Resource(_) => "Pcore::ResourceType",
        K::Class(_) => "Pcore::ClassType",
        K::Runtime(_) => "Pcore::RuntimeType",
        K::Object(_) => "Pcore::ObjectType",
        K::TypeSet(_) => "Pcore::TypeSetType",
        K::Alias(_) => "Pcore::TypeAliasType",
        K::Reference(_) => "Pcore::TypeReferenceType",
    }
}

/// Meta type name without the `Pcore::` prefix, such as `IntegerType`
pub fn kind_label(t: &Type) -> &'static str {
    let name = meta_type_name(t);
    name.strip_prefix(META_PREFIX).unwrap_or(name)
}

fn attr(
    name: &str,
    value_type: Type,
) -> Attribute {
    Attribute::new(name, value_type)
}

/// An attribute that defaults to undef
fn opt(
    name: &str,
    value_type: Type,
) -> Attribute {
    Attribute::new(name, optional(value_type)).with_value(Value::Undef)
}

fn size_type() -> Type {
    type_type(integer())
}

/// Attributes of each meta type, keyed by the name without prefix
fn meta_attributes() -> Vec<(&'static str, Vec<Attribute>)> {
    let wrapped = || vec![opt("type", type_default())];
    vec![
        ("UnitType", vec![]),
        ("UndefType", vec![]),
        ("DefaultType", vec![]),
        ("BooleanType", vec![]),
        ("ScalarType", vec![]),
        ("ScalarDataType", vec![]),
        ("NumericType", vec![]),
        ("SemVerRangeType", vec![]),
        ("IntegerType", vec![opt("from", integer()), opt("to", integer())]),
        ("FloatType", vec![opt("from", float()), opt("to", float())]),
        ("StringType", vec![opt("size_type", size_type()), opt("value", string())]),
        (
            "EnumType",
            vec![
                attr("values", array_of(string())),
                attr("case_insensitive", boolean()).with_value(Value::Boolean(false)),
            ],
        ),
        ("PatternType", vec![attr("patterns", array_of(string()))]),
        ("RegexpType", vec![opt("pattern", string())]),
        ("CollectionType", vec![opt("size_type", size_type())]),
        (
            "ArrayType",
            vec![opt("element_type", type_default()), opt("size_type", size_type())],
        ),
        (
            "HashType",
            vec![
                opt("key_type", type_default()),
                opt("value_type", type_default()),
                opt("size_type", size_type()),
            ],
        ),
        (
            "TupleType",
            vec![attr("types", array_of(type_default())), opt("size_type", size_type())],
        ),
        (
            "StructType",
            vec![attr(
                "elements",
                array_of(struct_type(vec![
                    struct_member("key_type", type_default()),
                    struct_member("value_type", type_default()),
                ])),
            )],
        ),
        ("OptionalType", wrapped()),
        ("NotUndefType", wrapped()),
        ("IterableType", wrapped()),
        ("IteratorType", wrapped()),
        ("TypeType", wrapped()),
        ("SensitiveType", wrapped()),
        ("VariantType", vec![attr("types", array_of(type_default()))]),
        (
            "CallableType",
            vec![
                opt("param_types", type_type(tuple_default())),
                opt("block_type", type_type(callable_default())),
                opt("return_type", type_default()),
            ],
        ),
        ("SemVerType", vec![attr("ranges", array_of(string()))]),
        ("TimespanType", vec![opt("from", timespan()), opt("to", timespan())]),
        ("TimestampType", vec![opt("from", timestamp()), opt("to", timestamp())]),
        ("ResourceType", vec![opt("type_name", string()), opt("title", string())]),
        ("ClassType", vec![opt("name", string())]),
        ("RuntimeType", vec![opt("runtime", string()), opt("name_or_pattern", string())]),
        ("ObjectType", vec![opt("init_hash", hash_of(string(), any()))]),
        ("TypeSetType", vec![attr("init_hash", hash_of(string(), any()))]),
        ("TypeAliasType", vec![attr("name", string()), opt("resolved_type", type_default())]),
        ("TypeReferenceType", vec![attr("type_string", string())]),
    ]
}

/// Bind `Pcore::AnyType` and one meta type per kind, and register their implementations
pub(crate) fn register_pcore_types(pcore: &Pcore) -> Result<()> {
    pcore.create_object_type(
        ANY_TYPE_NAME,
        None,
        Vec::new(),
        meta_factory("AnyType"),
        meta_projection(),
    )?;
    for (label, attributes) in meta_attributes() {
        let name = format!("{}{}", META_PREFIX, label);
        pcore.create_object_type(
            &name,
            Some(ANY_TYPE_NAME),
            attributes,
            meta_factory(label),
            meta_projection(),
        )?;
    }
    tracing::debug!("registered pcore meta types");
    Ok(())
}

fn meta_factory(label: &'static str) -> FactoryFn {
    Arc::new(move |args: &mut dyn ArgumentsAccessor| build_type(label, args.get_all()).map(Value::Type))
}

fn meta_projection() -> ProjectionFn {
    Arc::new(|value: &Value| match value {
        Value::Type(t) => Ok(project_type(t)),
        other => Err(TypeAssertionError::new("", format!("expects a Type value, got {}", other.kind_name())).into()),
    })
}

/// Positional attribute values, undef past the end
struct Args<'a>(&'a [Value]);

impl<'a> Args<'a> {
    fn at(
        &self,
        index: usize,
    ) -> &'a Value {
        self.0.get(index).unwrap_or(&Value::Undef)
    }

    fn type_or(
        &self,
        index: usize,
        fallback: Type,
    ) -> Result<Type> {
        match self.at(index) {
            Value::Undef => Ok(fallback),
            Value::Type(t) => Ok(t.clone()),
            other => Err(mismatch(index, "a Type", other)),
        }
    }

    fn opt_type(
        &self,
        index: usize,
    ) -> Result<Option<Type>> {
        match self.at(index) {
            Value::Undef => Ok(None),
            Value::Type(t) => Ok(Some(t.clone())),
            other => Err(mismatch(index, "a Type", other)),
        }
    }

    fn opt_string(
        &self,
        index: usize,
    ) -> Result<Option<String>> {
        match self.at(index) {
            Value::Undef => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            other => Err(mismatch(index, "a String", other)),
        }
    }

    fn strings(
        &self,
        index: usize,
    ) -> Result<Vec<String>> {
        match self.at(index) {
            Value::Undef => Ok(Vec::new()),
            Value::Array(values) => values
                .iter()
                .map(|v| match v {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(mismatch(index, "an Array of String", other)),
                })
                .collect(),
            other => Err(mismatch(index, "an Array", other)),
        }
    }

    fn types(
        &self,
        index: usize,
    ) -> Result<Vec<Type>> {
        match self.at(index) {
            Value::Undef => Ok(Vec::new()),
            Value::Array(values) => values
                .iter()
                .map(|v| match v {
                    Value::Type(t) => Ok(t.clone()),
                    other => Err(mismatch(index, "an Array of Type", other)),
                })
                .collect(),
            other => Err(mismatch(index, "an Array", other)),
        }
    }

    fn size(
        &self,
        index: usize,
    ) -> Result<IntegerType> {
        match self.at(index) {
            Value::Undef => Ok(IntegerType::SIZE),
            Value::Type(t) => match t.resolved().kind() {
                K::Integer(range) => Ok(*range),
                _ => Err(mismatch(index, "an Integer type", &Value::Type(t.clone()))),
            },
            other => Err(mismatch(index, "an Integer type", other)),
        }
    }
}

fn mismatch(
    index: usize,
    expected: &str,
    got: &Value,
) -> PcoreError {
    TypeAssertionError::new(
        format!("argument {}", index + 1),
        format!("expects {}, got {}", expected, got.kind_name()),
    )
    .into()
}

/// Build a type of the kind named by `label` from its attribute values
fn build_type(
    label: &str,
    values: &[Value],
) -> Result<Type> {
    let args = Args(values);
    let t = match label {
        "AnyType" => any(),
        "UnitType" => unit(),
        "UndefType" => undef(),
        "DefaultType" => default_type(),
        "BooleanType" => boolean(),
        "ScalarType" => scalar(),
        "ScalarDataType" => scalar_data(),
        "NumericType" => numeric(),
        "SemVerRangeType" => sem_ver_range(),
        "IntegerType" => {
            let from = args.at(0).as_integer().unwrap_or(i64::MIN);
            let to = args.at(1).as_integer().unwrap_or(i64::MAX);
            integer_range(from, to)?
        }
        "FloatType" => {
            let from = args.at(0).as_float().unwrap_or(f64::NEG_INFINITY);
            let to = args.at(1).as_float().unwrap_or(f64::INFINITY);
            float_range(from, to)?
        }
        "StringType" => match args.opt_string(1)? {
            Some(value) => string_value(&value),
            None => string_sized(args.size(0)?),
        },
        "EnumType" => enumeration(args.strings(0)?, args.at(1).as_bool().unwrap_or(false)),
        "PatternType" => pattern(
            args.strings(0)?
                .iter()
                .map(|source| RegexpType::new(source))
                .collect::<std::result::Result<Vec<_>, _>>()?,
        ),
        "RegexpType" => match args.opt_string(0)? {
            Some(source) => regexp_of(&source)?,
            None => regexp(),
        },
        "CollectionType" => collection(args.size(0)?),
        "ArrayType" => array(args.type_or(0, any())?, args.size(1)?),
        "HashType" => hash(args.type_or(0, any())?, args.type_or(1, any())?, args.size(2)?),
        "TupleType" => {
            let size = match args.at(1) {
                Value::Undef => None,
                _ => Some(args.size(1)?),
            };
            tuple(args.types(0)?, size)
        }
        "StructType" => {
            let elements = match args.at(0) {
                Value::Array(values) => values
                    .iter()
                    .map(|element| {
                        let key = element.get("key_type").and_then(Value::as_type).cloned();
                        let value = element.get("value_type").and_then(Value::as_type).cloned();
                        match (key, value) {
                            (Some(key), Some(value)) => Ok(struct_element(key, value)?),
                            _ => Err(mismatch(0, "a struct element", element)),
                        }
                    })
                    .collect::<Result<Vec<StructElement>>>()?,
                _ => Vec::new(),
            };
            struct_type(elements)
        }
        "OptionalType" => optional(args.type_or(0, any())?),
        "NotUndefType" => not_undef(args.type_or(0, any())?),
        "IterableType" => iterable(args.type_or(0, any())?),
        "IteratorType" => iterator(args.type_or(0, any())?),
        "TypeType" => type_type(args.type_or(0, any())?),
        "SensitiveType" => sensitive(args.type_or(0, any())?),
        "VariantType" => variant(args.types(0)?),
        "CallableType" => callable(args.opt_type(0)?, args.opt_type(1)?, args.opt_type(2)?),
        "SemVerType" => sem_ver_of(
            args.strings(0)?
                .iter()
                .map(|range| VersionRange::parse(range))
                .collect::<std::result::Result<Vec<_>, _>>()?,
        ),
        "TimespanType" => {
            let bound = |index: usize, open: Timespan| match args.at(index) {
                Value::Timespan(t) => *t,
                _ => open,
            };
            timespan_of(TimespanType::new(bound(0, Timespan::MIN), bound(1, Timespan::MAX))?)
        }
        "TimestampType" => {
            let bound = |index: usize, open: Timestamp| match args.at(index) {
                Value::Timestamp(t) => *t,
                _ => open,
            };
            timestamp_of(TimestampType::new(bound(0, Timestamp::MIN), bound(1, Timestamp::MAX))?)
        }
        "ResourceType" => resource(args.opt_string(0)?, args.opt_string(1)?),
        "ClassType" => class(args.opt_string(0)?),
        "RuntimeType" => runtime(args.opt_string(0)?, args.opt_string(1)?),
        "ObjectType" => match args.at(0) {
            Value::Undef => object_default(),
            init => object(ObjectType::from_init_hash(None, init)?),
        },
        "TypeSetType" => type_set(TypeSetType::from_init_hash(None, RUNTIME_NAME_AUTHORITY, args.at(0))?),
        "TypeAliasType" => {
            let name = args.opt_string(0)?.unwrap_or_default();
            match args.opt_type(1)? {
                Some(body) => type_alias_with_body(&name, body),
                None => Type::new(K::Alias(TypeAlias::pending(name))),
            }
        }
        "TypeReferenceType" => type_reference(&args.opt_string(0)?.unwrap_or_default()),
        other => {
            return Err(TypeAssertionError::new("", format!("No meta type named '{}{}'", META_PREFIX, other)).into());
        }
    };
    Ok(t)
}

fn size_value(size: &IntegerType) -> Value {
    if *size == IntegerType::SIZE {
        Value::Undef
    } else {
        Value::Type(integer_of(*size))
    }
}

fn opt_value<T>(
    value: &Option<T>,
    f: impl Fn(&T) -> Value,
) -> Value {
    value.as_ref().map_or(Value::Undef, f)
}

/// Attribute values of `t`, in the order of its meta type attributes
pub fn project_type(t: &Type) -> Vec<Value> {
    let string_of = |s: &String| Value::String(s.clone());
    let type_of = |t: &Type| Value::Type(t.clone());
    match t.kind() {
        K::Any
        | K::Unit
        | K::Undef
        | K::Default
        | K::Boolean
        | K::Scalar
        | K::ScalarData
        | K::Numeric
        | K::SemVerRange => Vec::new(),
        K::Integer(IntegerType { min, max }) => vec![
            if *min == i64::MIN { Value::Undef } else { Value::Integer(*min) },
            if *max == i64::MAX { Value::Undef } else { Value::Integer(*max) },
        ],
        K::Float(FloatType { min, max }) => vec![
            if min.is_infinite() { Value::Undef } else { Value::Float(*min) },
            if max.is_infinite() { Value::Undef } else { Value::Float(*max) },
        ],
        K::String(s) => match &s.value {
            Some(value) => vec![Value::Undef, Value::String(value.clone())],
            None => vec![size_value(&s.size), Value::Undef],
        },
        K::Enum(e) => vec![
            Value::Array(e.values.iter().map(string_of).collect()),
            Value::Boolean(e.case_insensitive),
        ],
        K::Pattern(regexps) => vec![Value::Array(
            regexps.iter().map(|r| Value::String(r.source().to_string())).collect(),
        )],
        K::Regexp(r) => vec![opt_value(r, |r| Value::String(r.source().to_string()))],
        K::Collection(size) => vec![size_value(size)],
        K::Array(a) => vec![type_of(&a.element), size_value(&a.size)],
        K::Hash(h) => vec![type_of(&h.key), type_of(&h.value), size_value(&h.size)],
        K::Tuple(t) => {
            let exact = IntegerType::exact(t.types.len() as i64);
            let size = if t.size == exact { Value::Undef } else { Value::Type(integer_of(t.size)) };
            vec![Value::Array(t.types.iter().map(type_of).collect()), size]
        }
        K::Struct(s) => vec![Value::Array(
            s.elements
                .iter()
                .map(|e| Value::hash_of([("key_type", type_of(&e.key)), ("value_type", type_of(&e.value))]))
                .collect(),
        )],
        K::Optional(t) | K::NotUndef(t) | K::Iterable(t) | K::Iterator(t) | K::Type(t) | K::Sensitive(t) => {
            vec![type_of(t)]
        }
        K::Variant(types) => vec![Value::Array(types.iter().map(type_of).collect())],
        K::Callable(c) => vec![
            opt_value(&c.params, type_of),
            opt_value(&c.block, type_of),
            opt_value(&c.return_type, type_of),
        ],
        K::SemVer(ranges) => vec![Value::Array(
            ranges.iter().map(|r| Value::String(r.as_str().to_string())).collect(),
        )],
        K::Timespan(TimespanType { min, max }) => vec![
            if *min == Timespan::MIN { Value::Undef } else { Value::Timespan(*min) },
            if *max == Timespan::MAX { Value::Undef } else { Value::Timespan(*max) },
        ],
        K::Timestamp(TimestampType { min, max }) => vec![
            if *min == Timestamp::MIN { Value::Undef } else { Value::Timestamp(*min) },
            if *max == Timestamp::MAX { Value::Undef } else { Value::Timestamp(*max) },
        ],
        K::Resource(r) => vec![opt_value(&r.type_name, string_of), opt_value(&r.title, string_of)],
        K::Class(name) => vec![opt_value(name, string_of)],
        K::Runtime(r) => vec![opt_value(&r.runtime, string_of), opt_value(&r.name, string_of)],
        K::Object(o) => {
            if o.is_default() {
                vec![Value::Undef]
            } else {
                let mut init = o.init_hash();
                if let (Value::Hash(map), Some(name)) = (&mut init, &o.name) {
                    map.insert(Value::from("name"), Value::String(name.clone()));
                }
                vec![init]
            }
        }
        K::TypeSet(set) => {
            let mut init = set.init_hash();
            if let (Value::Hash(map), Some(name)) = (&mut init, &set.name) {
                map.insert(Value::from("name"), Value::String(name.clone()));
            }
            vec![init]
        }
        K::Alias(alias) => vec![Value::String(alias.name.clone()), opt_value(&alias.body().cloned(), type_of)],
        K::Reference(reference) => vec![Value::String(reference.name.clone())],
    }
}
