//! Type sets
//!
//! A type set is a named, versioned collection of types. It can reference other type sets by
//! name and version range under a local alias, so `Alias::Foo` finds `Foo` in the referenced set.
//!
//! A set is built from its init hash in two steps. [`TypeSetType::from_init_hash`] validates the
//! hash and records the declared types, which are still unresolved aliases at that point. The
//! evaluator then binds each reference to the set it names and resolves the declared types in
//! the scope of the set.

use std::collections::HashMap;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use super::guard::{RecursionGuard, SELF_RECURSION_IN_BOTH};
use super::init::*;
use super::instance::assert_instance_of;
use super::{Type, TypeKind, TypeReference};
use crate::error::{PcoreError, TypeAssertionError, TypeResolverError};
use crate::meta;
use crate::semver::{Version, VersionRange};
use crate::util::config::RUNTIME_NAME_AUTHORITY;
use crate::util::names::{join_name, split_name};
use crate::values::{Value, ValueMap};

/// URI of the pcore type format that type sets declare
pub const PCORE_URI: &str = "http://puppet.com/2016.1/pcore";

/// Version of the pcore type format written by this crate
pub const PCORE_VERSION: Version = Version::new(1, 0, 0);

/// Versions of the pcore type format this crate understands
pub static PCORE_PARSABLE_VERSIONS: Lazy<VersionRange> =
    Lazy::new(|| VersionRange::parse("1.x").expect("pcore version range"));

/// Reference from a type set to another type set
#[derive(Debug)]
pub struct TypeSetReference {
    pub name: String,
    pub name_authority: String,
    pub version_range: VersionRange,
    target: TypeReference,
}

impl TypeSetReference {
    pub fn new(
        name: impl Into<String>,
        name_authority: impl Into<String>,
        version_range: VersionRange,
    ) -> Self {
        let name = name.into();
        Self {
            target: TypeReference::new(name.clone()),
            name,
            name_authority: name_authority.into(),
            version_range,
        }
    }

    /// The referenced type set, once bound
    pub fn type_set(&self) -> Option<Type> {
        self.target.target()
    }

    pub fn is_resolved(&self) -> bool {
        self.target.is_resolved()
    }

    /// Check that `target` is a type set whose version is in range, then bind to it
    pub fn bind(
        &self,
        target: &Type,
    ) -> Result<(), TypeResolverError> {
        let resolved = target.resolved();
        let TypeKind::TypeSet(set) = resolved.kind() else {
            return Err(TypeResolverError::new(format!(
                "{} resolves to a {}",
                self.name,
                meta::kind_label(&resolved)
            )));
        };
        if !self.version_range.includes(&set.version) {
            return Err(TypeResolverError::new(format!(
                "{} resolves to an incompatible version. Expected {}, got {}",
                self.name,
                self.version_range.as_str(),
                set.version
            )));
        }
        self.target.bind(&resolved);
        Ok(())
    }

    fn init_value(
        &self,
        owner_authority: &str,
    ) -> Value {
        let mut hash = ValueMap::new();
        if self.name_authority != owner_authority {
            hash.insert(KEY_NAME_AUTHORITY.into(), Value::String(self.name_authority.clone()));
        }
        hash.insert(KEY_NAME.into(), Value::String(self.name.clone()));
        hash.insert(KEY_VERSION_RANGE.into(), Value::String(self.version_range.as_str().to_string()));
        Value::Hash(hash)
    }
}

/// A versioned collection of named types
#[derive(Debug)]
pub struct TypeSetType {
    pub name: Option<String>,
    pub name_authority: String,
    pub pcore_uri: Option<String>,
    pub pcore_version: Version,
    pub version: Version,
    /// Declared types by simple name
    pub types: IndexMap<String, Type>,
    /// Referenced type sets by alias
    pub references: IndexMap<String, TypeSetReference>,
    /// Lower case name to declared name, over types and reference aliases
    lower_names: HashMap<String, String>,
}

/// The type set that is assignable from every type set
pub fn default_type_set() -> Type {
    static DEFAULT: Lazy<Type> = Lazy::new(|| {
        Type::new(TypeKind::TypeSet(TypeSetType {
            name: Some("DefaultTypeSet".to_string()),
            name_authority: RUNTIME_NAME_AUTHORITY.to_string(),
            pcore_uri: Some(PCORE_URI.to_string()),
            pcore_version: PCORE_VERSION,
            version: Version::new(0, 0, 0),
            types: IndexMap::new(),
            references: IndexMap::new(),
            lower_names: HashMap::new(),
        }))
    });
    DEFAULT.clone()
}

fn lookup<'a>(
    hash: &'a ValueMap,
    key: &str,
) -> Option<&'a Value> {
    hash.get(&Value::String(key.to_string()))
}

fn version_of(
    value: &Value,
    key: &str,
) -> Result<Version, TypeAssertionError> {
    match value {
        Value::Version(v) => Ok(v.clone()),
        Value::String(s) => Version::parse(s)
            .map_err(|e| TypeAssertionError::new(format!("{}['{}']", INIT_HASH_PATH, key), e.message)),
        other => Err(TypeAssertionError::new(
            format!("{}['{}']", INIT_HASH_PATH, key),
            format!("expects a version, got {}", other),
        )),
    }
}

impl TypeSetType {
    /// Build a type set from its init hash. `name` wins over the name in the hash, and
    /// `name_authority` is used when the hash declares none. The values of `types` must be
    /// types; the evaluator passes the declared aliases.
    pub fn from_init_hash(
        name: Option<&str>,
        name_authority: &str,
        init: &Value,
    ) -> Result<TypeSetType, PcoreError> {
        assert_instance_of(INIT_HASH_PATH, &TYPE_TYPESET_INIT, init)?;
        let Value::Hash(hash) = init else {
            return Err(TypeAssertionError::new(INIT_HASH_PATH, "expects a Hash").into());
        };

        let name = name
            .map(str::to_string)
            .or_else(|| lookup(hash, KEY_NAME).and_then(Value::as_str).map(str::to_string));
        let label = name.clone().unwrap_or_default();
        let name_authority = lookup(hash, KEY_NAME_AUTHORITY)
            .and_then(Value::as_str)
            .unwrap_or(name_authority)
            .to_string();

        let pcore_version = match lookup(hash, KEY_PCORE_VERSION) {
            Some(v) => version_of(v, KEY_PCORE_VERSION)?,
            None => PCORE_VERSION,
        };
        if !PCORE_PARSABLE_VERSIONS.includes(&pcore_version) {
            return Err(TypeResolverError::new(format!(
                "The pcore version for TypeSet '{}' is not understood by this runtime. Expected range {}, got {}",
                label,
                PCORE_PARSABLE_VERSIONS.as_str(),
                pcore_version
            ))
            .into());
        }

        let version = match lookup(hash, KEY_VERSION) {
            Some(v) => version_of(v, KEY_VERSION)?,
            None if name.is_some() => {
                return Err(TypeAssertionError::new(INIT_HASH_PATH, format!("expects a value for key '{}'", KEY_VERSION)).into())
            }
            None => Version::new(0, 0, 0),
        };

        let mut set = TypeSetType {
            name,
            name_authority,
            pcore_uri: lookup(hash, KEY_PCORE_URI).and_then(Value::as_str).map(str::to_string),
            pcore_version,
            version,
            types: IndexMap::new(),
            references: IndexMap::new(),
            lower_names: HashMap::new(),
        };

        if let Some(Value::Hash(types)) = lookup(hash, KEY_TYPES) {
            for (key, value) in types {
                let (Some(type_name), Some(t)) = (key.as_str(), value.as_type()) else {
                    continue;
                };
                if let Some(previous) = set.lower_names.get(&type_name.to_lowercase()) {
                    return Err(TypeResolverError::new(format!(
                        "TypeSet '{}' declares types '{}' and '{}' that differ only in case",
                        label, previous, type_name
                    ))
                    .into());
                }
                set.lower_names.insert(type_name.to_lowercase(), type_name.to_string());
                set.types.insert(type_name.to_string(), t.clone());
            }
        }

        if let Some(Value::Hash(references)) = lookup(hash, KEY_REFERENCES) {
            let mut seen: HashMap<(String, String), Vec<VersionRange>> = HashMap::new();
            let mut aliases: HashMap<String, String> = HashMap::new();
            for (key, value) in references {
                let (Some(alias), Value::Hash(init)) = (key.as_str(), value) else {
                    continue;
                };
                let reference = set.reference_from_init(init)?;

                let ranges = seen
                    .entry((reference.name_authority.clone(), reference.name.clone()))
                    .or_default();
                if ranges.iter().any(|r| r.is_overlap(&reference.version_range)) {
                    return Err(TypeResolverError::new(format!(
                        "TypeSet '{}' references TypeSet '{}/{}' more than once using overlapping version ranges",
                        label, reference.name_authority, reference.name
                    ))
                    .into());
                }
                ranges.push(reference.version_range.clone());

                if aliases.insert(alias.to_lowercase(), alias.to_string()).is_some() {
                    return Err(TypeResolverError::new(format!(
                        "TypeSet '{}' references a TypeSet using alias '{}' more than once",
                        label, alias
                    ))
                    .into());
                }
                if set.lower_names.contains_key(&alias.to_lowercase()) {
                    return Err(TypeResolverError::new(format!(
                        "TypeSet '{}' references a TypeSet using alias '{}'. The alias collides with the name of a declared type",
                        label, alias
                    ))
                    .into());
                }
                set.references.insert(alias.to_string(), reference);
            }
            for (lower, alias) in aliases {
                set.lower_names.insert(lower, alias);
            }
        }

        tracing::debug!(
            type_set = %label,
            types = set.types.len(),
            references = set.references.len(),
            "type set initialized"
        );
        Ok(set)
    }

    fn reference_from_init(
        &self,
        init: &ValueMap,
    ) -> Result<TypeSetReference, PcoreError> {
        let name = lookup(init, KEY_NAME).and_then(Value::as_str).unwrap_or_default();
        let authority = lookup(init, KEY_NAME_AUTHORITY)
            .and_then(Value::as_str)
            .unwrap_or(&self.name_authority);
        let range = match lookup(init, KEY_VERSION_RANGE) {
            Some(Value::VersionRange(r)) => r.clone(),
            Some(Value::String(s)) => VersionRange::parse(s)?,
            _ => VersionRange::parse("*")?,
        };
        Ok(TypeSetReference::new(name, authority, range))
    }

    /// The unconstrained type set
    pub fn is_default(&self) -> bool {
        self.name.as_deref() == Some("DefaultTypeSet")
            && self.name_authority == RUNTIME_NAME_AUTHORITY
            && self.types.is_empty()
            && self.references.is_empty()
    }

    /// True when every reference is bound and every declared type is resolved
    pub fn is_resolved(&self) -> bool {
        self.references.values().all(TypeSetReference::is_resolved) && self.types.values().all(Type::is_resolved)
    }

    fn canonical_name(
        &self,
        name: &str,
    ) -> Option<&str> {
        self.lower_names.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Find a type by a name relative to this set. A first segment that is a reference alias
    /// continues the lookup in the referenced set. Names that differ only in case match when
    /// no exact match exists.
    pub fn get(
        &self,
        qname: &str,
    ) -> Option<Type> {
        self.lookup(qname, true)
    }

    /// Like [`TypeSetType::get`], optionally without the case-insensitive fallback
    pub fn lookup(
        &self,
        qname: &str,
        case_insensitive: bool,
    ) -> Option<Type> {
        let fallback = |name: &str| {
            if case_insensitive {
                self.canonical_name(name).map(str::to_string)
            } else {
                None
            }
        };

        if let Some(t) = self.types.get(qname) {
            return Some(t.clone());
        }
        if let Some(t) = fallback(qname).and_then(|n| self.types.get(&n)) {
            return Some(t.clone());
        }
        if self.references.is_empty() {
            return None;
        }

        let segments = split_name(qname);
        let first = *segments.first()?;
        let reference = self
            .references
            .get(first)
            .or_else(|| fallback(first).and_then(|n| self.references.get(&n)))?;
        let target = reference.type_set()?;
        if segments.len() == 1 {
            return Some(target);
        }
        match target.kind() {
            TypeKind::TypeSet(set) => set.lookup(&join_name(&segments, 1), case_insensitive),
            _ => None,
        }
    }

    /// Whether `t` is one of the declared types
    pub fn defines_type(
        &self,
        t: &Type,
    ) -> bool {
        self.types.values().any(|declared| declared.ptr_eq(t) || declared == t)
    }

    /// The name under which `t` is known inside this set
    pub fn name_for(
        &self,
        t: &Type,
    ) -> Option<String> {
        if let Some((name, _)) = self.types.iter().find(|(_, declared)| declared.ptr_eq(t) || *declared == t) {
            return Some(name.clone());
        }
        let qname = t.name()?;
        let segments = split_name(qname);
        if segments.len() < 2 {
            return Some(qname.to_string());
        }
        for (alias, reference) in &self.references {
            let Some(target) = reference.type_set() else { continue };
            let TypeKind::TypeSet(set) = target.kind() else { continue };
            if let Some(sub) = set.name_for(t) {
                if sub != qname {
                    return Some(format!("{}::{}", alias, sub));
                }
            }
        }
        Some(qname.to_string())
    }

    /// The init hash that declares this set, without the name
    pub fn init_hash(&self) -> Value {
        let mut hash = ValueMap::new();
        if let Some(uri) = &self.pcore_uri {
            hash.insert(KEY_PCORE_URI.into(), Value::String(uri.clone()));
        }
        hash.insert(KEY_PCORE_VERSION.into(), Value::String(self.pcore_version.to_string()));
        hash.insert(KEY_NAME_AUTHORITY.into(), Value::String(self.name_authority.clone()));
        hash.insert(KEY_VERSION.into(), Value::String(self.version.to_string()));
        if !self.types.is_empty() {
            let types = self
                .types
                .iter()
                .map(|(name, t)| {
                    // Anonymous sets show the declared bodies
                    let shown = match (&self.name, t.kind()) {
                        (None, TypeKind::Alias(alias)) => alias.body().cloned().unwrap_or_else(|| t.clone()),
                        _ => t.clone(),
                    };
                    (Value::String(name.clone()), Value::Type(shown))
                })
                .collect();
            hash.insert(KEY_TYPES.into(), Value::Hash(types));
        }
        if !self.references.is_empty() {
            let references = self
                .references
                .iter()
                .map(|(alias, r)| (Value::String(alias.clone()), r.init_value(&self.name_authority)))
                .collect();
            hash.insert(KEY_REFERENCES.into(), Value::Hash(references));
        }
        Value::Hash(hash)
    }

    pub fn init_hash_source(&self) -> String {
        self.init_hash().to_string()
    }

    pub(crate) fn guarded_equals(
        &self,
        other: &TypeSetType,
        guard: &mut RecursionGuard,
    ) -> bool {
        if self.name != other.name
            || self.name_authority != other.name_authority
            || self.version != other.version
            || self.pcore_version != other.pcore_version
            || self.types.len() != other.types.len()
            || self.references.len() != other.references.len()
        {
            return false;
        }
        let references_equal = self.references.iter().all(|(alias, r)| {
            other.references.get(alias).is_some_and(|o| {
                r.name == o.name && r.name_authority == o.name_authority && r.version_range == o.version_range
            })
        });
        if !references_equal {
            return false;
        }
        let this_id = self as *const TypeSetType as usize;
        let that_id = other as *const TypeSetType as usize;
        guard.with_this(this_id, |guard, _| {
            guard.with_that(that_id, |guard, state| {
                state == SELF_RECURSION_IN_BOTH
                    || self.types.iter().all(|(name, t)| {
                        other
                            .types
                            .get(name)
                            .is_some_and(|o| t.guarded_equals(o, guard))
                    })
            })
        })
    }
}
