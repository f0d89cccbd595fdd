//! Type lattice
//!
//! A [`Type`] is a cheap, shared handle to an immutable [`TypeKind`]. Structural operations live
//! in sibling modules as `impl Type` blocks:
//!
//! - `assignable`: the subtype relation
//! - `instance`: membership of runtime values
//! - `equality`: guarded structural equality
//! - `generalize` and `normalize`: projections and union simplification
//! - `display`: source form of every type
//! - `infer`: the type of a value
//!
//! The address of the shared kind is the identity used by the [`guard::RecursionGuard`], so a
//! cyclic graph of aliases is walked without looping.

pub mod alias;
pub mod assignable;
pub mod display;
pub mod equality;
pub mod factory;
pub mod generalize;
pub mod guard;
pub mod infer;
pub mod init;
pub mod instance;
pub mod normalize;
pub mod object;
pub mod type_set;

#[cfg(test)]
mod tests;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use regex::Regex;

pub use alias::{TypeAlias, TypeReference};
pub use guard::RecursionGuard;
pub use object::{Attribute, AttributeKind, ObjectType};
pub use type_set::{TypeSetReference, TypeSetType};

use crate::error::TypeAssertionError;
use crate::semver::VersionRange;
use crate::time::{Timespan, Timestamp};

/// Shared handle to an immutable type
#[derive(Clone)]
pub struct Type(Arc<TypeKind>);

/// Integer range, also used for the sizes of strings and collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegerType {
    pub min: i64,
    pub max: i64,
}

impl IntegerType {
    /// `(-∞, +∞)`
    pub const DEFAULT: IntegerType = IntegerType {
        min: i64::MIN,
        max: i64::MAX,
    };

    /// Default size of strings and collections, `[0, +∞)`
    pub const SIZE: IntegerType = IntegerType {
        min: 0,
        max: i64::MAX,
    };

    pub fn new(
        min: i64,
        max: i64,
    ) -> Result<Self, TypeAssertionError> {
        if min > max {
            return Err(TypeAssertionError::new(
                "",
                format!("'from' must be less or equal to 'to'. Got ({}, {})", min, max),
            ));
        }
        Ok(Self { min, max })
    }

    /// `[n, n]`
    pub const fn exact(n: i64) -> Self {
        Self { min: n, max: n }
    }

    #[inline]
    pub fn contains(
        &self,
        n: i64,
    ) -> bool {
        self.min <= n && n <= self.max
    }

    /// Every integer of `other` is in `self`
    #[inline]
    pub fn includes(
        &self,
        other: &IntegerType,
    ) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    pub fn is_overlap(
        &self,
        other: &IntegerType,
    ) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    /// Ranges that touch without overlapping, such as `[1,3]` and `[4,9]`
    pub fn is_adjacent(
        &self,
        other: &IntegerType,
    ) -> bool {
        (self.max != i64::MAX && self.max + 1 == other.min) || (other.max != i64::MAX && other.max + 1 == self.min)
    }

    pub fn merge(
        &self,
        other: &IntegerType,
    ) -> IntegerType {
        IntegerType {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

/// Float range; the bounds may be infinite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatType {
    pub min: f64,
    pub max: f64,
}

impl FloatType {
    pub const DEFAULT: FloatType = FloatType {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    pub fn new(
        min: f64,
        max: f64,
    ) -> Result<Self, TypeAssertionError> {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(TypeAssertionError::new(
                "",
                format!("'from' must be less or equal to 'to'. Got ({:?}, {:?})", min, max),
            ));
        }
        Ok(Self { min, max })
    }

    pub fn contains(
        &self,
        x: f64,
    ) -> bool {
        self.min <= x && x <= self.max
    }

    pub fn includes(
        &self,
        other: &FloatType,
    ) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    pub fn is_overlap(
        &self,
        other: &FloatType,
    ) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    pub fn merge(
        &self,
        other: &FloatType,
    ) -> FloatType {
        FloatType {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

/// Timespan range; `Timespan::MIN` and `Timespan::MAX` are open bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimespanType {
    pub min: Timespan,
    pub max: Timespan,
}

impl TimespanType {
    pub const DEFAULT: TimespanType = TimespanType {
        min: Timespan::MIN,
        max: Timespan::MAX,
    };

    pub fn new(
        min: Timespan,
        max: Timespan,
    ) -> Result<Self, TypeAssertionError> {
        if min > max {
            return Err(TypeAssertionError::new(
                "",
                format!("'from' must be less or equal to 'to'. Got ('{}', '{}')", min, max),
            ));
        }
        Ok(Self { min, max })
    }

    pub fn contains(
        &self,
        t: Timespan,
    ) -> bool {
        self.min <= t && t <= self.max
    }

    pub fn includes(
        &self,
        other: &TimespanType,
    ) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    /// Overlapping, or sharing an end point
    pub fn is_overlap(
        &self,
        other: &TimespanType,
    ) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    pub fn merge(
        &self,
        other: &TimespanType,
    ) -> TimespanType {
        TimespanType {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Timestamp range; `Timestamp::MIN` and `Timestamp::MAX` are open bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimestampType {
    pub min: Timestamp,
    pub max: Timestamp,
}

impl TimestampType {
    pub const DEFAULT: TimestampType = TimestampType {
        min: Timestamp::MIN,
        max: Timestamp::MAX,
    };

    pub fn new(
        min: Timestamp,
        max: Timestamp,
    ) -> Result<Self, TypeAssertionError> {
        if min > max {
            return Err(TypeAssertionError::new(
                "",
                format!("'from' must be less or equal to 'to'. Got ('{}', '{}')", min, max),
            ));
        }
        Ok(Self { min, max })
    }

    pub fn contains(
        &self,
        t: Timestamp,
    ) -> bool {
        self.min <= t && t <= self.max
    }

    pub fn includes(
        &self,
        other: &TimestampType,
    ) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    pub fn is_overlap(
        &self,
        other: &TimestampType,
    ) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    pub fn merge(
        &self,
        other: &TimestampType,
    ) -> TimestampType {
        TimestampType {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// String constrained by length, or a single string value
#[derive(Debug, Clone, PartialEq)]
pub struct StringType {
    pub size: IntegerType,
    pub value: Option<String>,
}

/// A compiled regular expression with its source
#[derive(Clone)]
pub struct RegexpType {
    source: String,
    regex: Regex,
}

impl RegexpType {
    pub fn new(source: &str) -> Result<Self, TypeAssertionError> {
        let regex = Regex::new(source).map_err(|e| {
            TypeAssertionError::new("", format!("Invalid regular expression /{}/: {}", source, e))
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match(
        &self,
        text: &str,
    ) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for RegexpType {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.source == other.source
    }
}

impl fmt::Debug for RegexpType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "/{}/", self.source)
    }
}

/// Set of strings
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub values: Vec<String>,
    pub case_insensitive: bool,
}

impl EnumType {
    pub fn contains(
        &self,
        s: &str,
    ) -> bool {
        if self.case_insensitive {
            let lower = s.to_lowercase();
            self.values.iter().any(|v| v.to_lowercase() == lower)
        } else {
            self.values.iter().any(|v| v == s)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArrayType {
    pub element: Type,
    pub size: IntegerType,
}

#[derive(Debug, Clone)]
pub struct HashType {
    pub key: Type,
    pub value: Type,
    pub size: IntegerType,
}

/// Positional types. When `size.max` exceeds the number of types, the last type repeats.
#[derive(Debug, Clone)]
pub struct TupleType {
    pub types: Vec<Type>,
    pub size: IntegerType,
}

impl TupleType {
    /// Type at a position, the last type for the variadic tail
    pub fn type_at(
        &self,
        index: usize,
    ) -> Option<&Type> {
        self.types.get(index).or_else(|| self.types.last())
    }
}

/// Struct member. `key` is `String['name']`, or `Optional[String['name']]` for an optional
/// member.
#[derive(Debug, Clone)]
pub struct StructElement {
    pub name: String,
    pub key: Type,
    pub value: Type,
}

impl StructElement {
    /// A member that may be absent
    pub fn is_optional(&self) -> bool {
        self.key.is_assignable(&factory::undef())
    }
}

#[derive(Debug, Clone)]
pub struct StructType {
    pub elements: Vec<StructElement>,
}

impl StructType {
    /// `[required members, all members]`
    pub fn size(&self) -> IntegerType {
        let required = self.elements.iter().filter(|e| !e.is_optional()).count();
        IntegerType {
            min: required as i64,
            max: self.elements.len() as i64,
        }
    }

    pub fn element(
        &self,
        name: &str,
    ) -> Option<&StructElement> {
        self.elements.iter().find(|e| e.name == name)
    }
}

/// Callable signature. `params` is a Tuple type; absent parts are unconstrained.
#[derive(Debug, Clone, Default)]
pub struct CallableType {
    pub params: Option<Type>,
    pub block: Option<Type>,
    pub return_type: Option<Type>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceType {
    pub type_name: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeType {
    pub runtime: Option<String>,
    pub name: Option<String>,
}

/// The kinds of type
#[derive(Debug)]
pub enum TypeKind {
    /// Top of the lattice
    Any,
    /// Assignable to and from everything
    Unit,
    Undef,
    Default,
    Boolean,
    Scalar,
    ScalarData,
    Numeric,
    Integer(IntegerType),
    Float(FloatType),
    String(StringType),
    Enum(EnumType),
    /// Matches strings matching any of the regexps; empty matches all strings
    Pattern(Vec<RegexpType>),
    Regexp(Option<RegexpType>),
    /// Array or hash constrained by size
    Collection(IntegerType),
    Array(ArrayType),
    Hash(HashType),
    Tuple(TupleType),
    Struct(StructType),
    Optional(Type),
    NotUndef(Type),
    /// Union, kept normalized
    Variant(Vec<Type>),
    Callable(CallableType),
    Iterable(Type),
    Iterator(Type),
    /// Type of types
    Type(Type),
    Sensitive(Type),
    /// Versions within any of the ranges; no ranges accepts all versions
    SemVer(Vec<VersionRange>),
    SemVerRange,
    Timespan(TimespanType),
    Timestamp(TimestampType),
    Resource(ResourceType),
    Class(Option<String>),
    Runtime(RuntimeType),
    Object(ObjectType),
    TypeSet(TypeSetType),
    /// Named type whose body is resolved once
    Alias(TypeAlias),
    /// Name placeholder, resolved once to the type it names
    Reference(TypeReference),
}

impl Type {
    pub fn new(kind: TypeKind) -> Self {
        Type(Arc::new(kind))
    }

    pub(crate) fn from_arc(arc: Arc<TypeKind>) -> Self {
        Type(arc)
    }

    #[inline]
    pub fn kind(&self) -> &TypeKind {
        &self.0
    }

    /// Identity of the shared kind
    #[inline]
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    #[inline]
    pub fn ptr_eq(
        &self,
        other: &Type,
    ) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn downgrade(&self) -> Weak<TypeKind> {
        Arc::downgrade(&self.0)
    }

    /// Name of a named type: alias, reference, named object or type set
    pub fn name(&self) -> Option<&str> {
        match self.kind() {
            TypeKind::Alias(alias) => Some(&alias.name),
            TypeKind::Reference(reference) => Some(&reference.name),
            TypeKind::Object(object) => object.name.as_deref(),
            TypeKind::TypeSet(set) => set.name.as_deref(),
            _ => None,
        }
    }

    /// Follow resolved references to the type they name
    pub fn deref(&self) -> Type {
        let mut current = self.clone();
        let mut seen = Vec::new();
        while let TypeKind::Reference(reference) = current.kind() {
            if seen.contains(&current.id()) {
                break;
            }
            seen.push(current.id());
            match reference.target() {
                Some(target) => current = target,
                None => break,
            }
        }
        current
    }

    /// Follow references and alias bodies to the first concrete type. Unresolved names and
    /// cycles without a concrete type stop the walk.
    pub fn resolved(&self) -> Type {
        let mut current = self.clone();
        let mut seen = Vec::new();
        loop {
            if seen.contains(&current.id()) {
                return current;
            }
            seen.push(current.id());
            let next = match current.kind() {
                TypeKind::Reference(reference) => reference.target(),
                TypeKind::Alias(alias) => alias.body().cloned(),
                _ => None,
            };
            match next {
                Some(next) => current = next,
                None => return current,
            }
        }
    }

    /// True when a chain of aliases and references loops back without reaching a concrete
    /// type
    pub fn is_unresolvable_cycle(&self) -> bool {
        let end = self.resolved();
        match end.kind() {
            TypeKind::Alias(alias) => alias.body().is_some(),
            TypeKind::Reference(reference) => reference.target().is_some(),
            _ => false,
        }
    }

    /// True when no unresolved reference or alias is reachable through the alias chain
    pub fn is_resolved(&self) -> bool {
        match self.resolved().kind() {
            TypeKind::Alias(alias) => alias.body().is_some(),
            TypeKind::Reference(reference) => reference.target().is_some(),
            _ => true,
        }
    }
}

impl PartialEq for Type {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.guarded_equals(other, &mut RecursionGuard::new())
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        // Coarse on purpose: equal types share a kind, and named kinds share a name
        let target = self.deref();
        std::mem::discriminant(target.kind()).hash(state);
        if let Some(name) = target.name() {
            name.hash(state);
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self)
    }
}
