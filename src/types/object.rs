//! User defined object types
//!
//! An object type is declared with an init hash:
//!
//! ```text
//! Object[{
//!   parent => Animal,
//!   attributes => { name => String, legs => { type => Integer, value => 4 } },
//!   constants => { kingdom => 'animalia' },
//!   equality => [name],
//! }]
//! ```
//!
//! Attributes of the parent come first in [`ObjectType::all_attributes`]; an attribute that is
//! declared again replaces the inherited one at its position.

use std::fmt;

use indexmap::IndexMap;

use super::equality::option_equals;
use super::guard::{RecursionGuard, SELF_RECURSION_IN_BOTH};
use super::infer::infer;
use super::init::*;
use super::instance::assert_instance_of;
use super::{Type, TypeKind};
use crate::error::{PcoreError, TypeAssertionError, TypeResolverError};
use crate::values::{Value, ValueMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// Fixed value, never given to the constructor
    Constant,
    /// Computed from other attributes
    Derived,
    /// Computed unless given
    GivenOrDerived,
    /// Refers to an object kept elsewhere
    Reference,
}

impl AttributeKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "constant" => Some(AttributeKind::Constant),
            "derived" => Some(AttributeKind::Derived),
            "given_or_derived" => Some(AttributeKind::GivenOrDerived),
            "reference" => Some(AttributeKind::Reference),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Constant => "constant",
            AttributeKind::Derived => "derived",
            AttributeKind::GivenOrDerived => "given_or_derived",
            AttributeKind::Reference => "reference",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed attribute with an optional default value
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub value_type: Type,
    pub value: Option<Value>,
    pub kind: Option<AttributeKind>,
    pub is_final: bool,
    pub is_override: bool,
}

impl Attribute {
    pub fn new(
        name: impl Into<String>,
        value_type: Type,
    ) -> Self {
        Self {
            name: name.into(),
            value_type,
            value: None,
            kind: None,
            is_final: false,
            is_override: false,
        }
    }

    pub fn with_value(
        mut self,
        value: Value,
    ) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_kind(
        mut self,
        kind: AttributeKind,
    ) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn is_constant(&self) -> bool {
        self.kind == Some(AttributeKind::Constant)
    }

    /// Attribute from its entry in the `attributes` hash, either a type or an attribute init
    /// hash
    fn from_init(
        name: &str,
        init: &Value,
        path: &str,
    ) -> Result<Self, PcoreError> {
        let hash = match init {
            Value::Type(t) => return Ok(Attribute::new(name, t.clone())),
            Value::Hash(hash) => hash,
            other => {
                return Err(TypeAssertionError::new(path, format!("expects a Type or a Hash, got {}", other)).into())
            }
        };

        let value_type = lookup(hash, KEY_TYPE)
            .and_then(Value::as_type)
            .cloned()
            .ok_or_else(|| TypeAssertionError::new(path, format!("expects a value for key '{}'", KEY_TYPE)))?;
        let mut attribute = Attribute::new(name, value_type);
        attribute.kind = lookup(hash, KEY_KIND)
            .and_then(Value::as_str)
            .and_then(AttributeKind::parse);
        attribute.value = lookup(hash, KEY_VALUE).cloned();
        attribute.is_final = lookup(hash, KEY_FINAL).and_then(Value::as_bool).unwrap_or(false);
        attribute.is_override = lookup(hash, KEY_OVERRIDE).and_then(Value::as_bool).unwrap_or(false);

        if attribute.is_constant() && attribute.value.is_none() {
            return Err(TypeAssertionError::new(path, "constant attribute must have a value").into());
        }
        if let Some(value) = &attribute.value {
            // Types declared later in the same scope cannot check values yet
            if attribute.value_type.is_resolved() {
                assert_instance_of(&format!("{}['{}']", path, KEY_VALUE), &attribute.value_type, value)?;
            }
        }
        Ok(attribute)
    }

    fn init_value(&self) -> Value {
        if self.value.is_none() && self.kind.is_none() && !self.is_final && !self.is_override {
            return Value::Type(self.value_type.clone());
        }
        let mut hash = ValueMap::new();
        hash.insert(KEY_TYPE.into(), Value::Type(self.value_type.clone()));
        if let Some(kind) = self.kind {
            hash.insert(KEY_KIND.into(), kind.as_str().into());
        }
        if let Some(value) = &self.value {
            hash.insert(KEY_VALUE.into(), value.clone());
        }
        if self.is_final {
            hash.insert(KEY_FINAL.into(), Value::Boolean(true));
        }
        if self.is_override {
            hash.insert(KEY_OVERRIDE.into(), Value::Boolean(true));
        }
        Value::Hash(hash)
    }

    fn guarded_equals(
        &self,
        other: &Attribute,
        guard: &mut RecursionGuard,
    ) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.is_final == other.is_final
            && self.is_override == other.is_override
            && self.value == other.value
            && self.value_type.guarded_equals(&other.value_type, guard)
    }
}

/// A function member; `callable` is a Callable type
#[derive(Debug, Clone)]
pub struct ObjectFunction {
    pub name: String,
    pub callable: Type,
    pub is_final: bool,
    pub is_override: bool,
}

impl ObjectFunction {
    fn from_init(
        name: &str,
        init: &Value,
        path: &str,
    ) -> Result<Self, PcoreError> {
        let (callable, hash) = match init {
            Value::Type(t) => (t.clone(), None),
            Value::Hash(hash) => {
                let callable = lookup(hash, KEY_TYPE)
                    .and_then(Value::as_type)
                    .cloned()
                    .ok_or_else(|| TypeAssertionError::new(path, format!("expects a value for key '{}'", KEY_TYPE)))?;
                (callable, Some(hash))
            }
            other => {
                return Err(TypeAssertionError::new(path, format!("expects a Callable or a Hash, got {}", other)).into())
            }
        };
        let flag = |key: &str| {
            hash.and_then(|h| lookup(h, key))
                .and_then(Value::as_bool)
                .unwrap_or(false)
        };
        Ok(Self {
            name: name.to_string(),
            callable,
            is_final: flag(KEY_FINAL),
            is_override: flag(KEY_OVERRIDE),
        })
    }

    fn init_value(&self) -> Value {
        if !self.is_final && !self.is_override {
            return Value::Type(self.callable.clone());
        }
        let mut hash = ValueMap::new();
        hash.insert(KEY_TYPE.into(), Value::Type(self.callable.clone()));
        if self.is_final {
            hash.insert(KEY_FINAL.into(), Value::Boolean(true));
        }
        if self.is_override {
            hash.insert(KEY_OVERRIDE.into(), Value::Boolean(true));
        }
        Value::Hash(hash)
    }
}

/// An object type. The unnamed type without members is `Object`, the type of all objects.
#[derive(Debug, Clone)]
pub struct ObjectType {
    pub name: Option<String>,
    pub parent: Option<Type>,
    pub attributes: IndexMap<String, Attribute>,
    pub functions: IndexMap<String, ObjectFunction>,
    /// Attributes compared by object equality; all non-constant attributes when absent
    pub equality: Option<Vec<String>>,
    /// Whether equal objects must also have equal types
    pub equality_include_type: bool,
    pub serialization: Option<Vec<String>>,
}

impl Default for ObjectType {
    fn default() -> Self {
        Self {
            name: None,
            parent: None,
            attributes: IndexMap::new(),
            functions: IndexMap::new(),
            equality: None,
            equality_include_type: true,
            serialization: None,
        }
    }
}

fn lookup<'a>(
    hash: &'a ValueMap,
    key: &str,
) -> Option<&'a Value> {
    hash.get(&Value::String(key.to_string()))
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(values) => values.iter().filter_map(Value::as_str).map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

impl ObjectType {
    /// Named object type without members
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Build an object type from its init hash. A `name` given here wins over the one in the
    /// hash.
    pub fn from_init_hash(
        name: Option<&str>,
        init: &Value,
    ) -> Result<ObjectType, PcoreError> {
        assert_instance_of(INIT_HASH_PATH, &TYPE_OBJECT_INIT, init)?;
        let Value::Hash(hash) = init else {
            return Err(TypeAssertionError::new(INIT_HASH_PATH, "expects a Hash").into());
        };

        let mut object = ObjectType {
            name: name
                .map(str::to_string)
                .or_else(|| lookup(hash, KEY_NAME).and_then(Value::as_str).map(str::to_string)),
            parent: lookup(hash, KEY_PARENT).and_then(Value::as_type).cloned(),
            ..ObjectType::default()
        };

        if let Some(Value::Hash(attributes)) = lookup(hash, KEY_ATTRIBUTES) {
            for (key, init) in attributes {
                let Some(attr_name) = key.as_str() else { continue };
                let path = format!("{}['{}']['{}']", INIT_HASH_PATH, KEY_ATTRIBUTES, attr_name);
                let attribute = Attribute::from_init(attr_name, init, &path)?;
                object.attributes.insert(attr_name.to_string(), attribute);
            }
        }

        if let Some(Value::Hash(constants)) = lookup(hash, KEY_CONSTANTS) {
            for (key, value) in constants {
                let Some(const_name) = key.as_str() else { continue };
                if object.attributes.contains_key(const_name) {
                    return Err(TypeResolverError::new(format!(
                        "{} attribute '{}' is defined as both a constant and an attribute",
                        object.label(),
                        const_name
                    ))
                    .into());
                }
                let attribute = Attribute::new(const_name, infer(value).generalize())
                    .with_value(value.clone())
                    .with_kind(AttributeKind::Constant);
                object.attributes.insert(const_name.to_string(), attribute);
            }
        }

        if let Some(Value::Hash(functions)) = lookup(hash, KEY_FUNCTIONS) {
            for (key, init) in functions {
                let Some(function_name) = key.as_str() else { continue };
                if object.attributes.contains_key(function_name) {
                    return Err(TypeResolverError::new(format!(
                        "{} function '{}' conflicts with attribute with the same name",
                        object.label(),
                        function_name
                    ))
                    .into());
                }
                let path = format!("{}['{}']['{}']", INIT_HASH_PATH, KEY_FUNCTIONS, function_name);
                let function = ObjectFunction::from_init(function_name, init, &path)?;
                object.functions.insert(function_name.to_string(), function);
            }
        }

        if let Some(equality) = lookup(hash, KEY_EQUALITY) {
            let names = string_list(equality);
            object.check_equality(&names)?;
            object.equality = Some(names);
        }
        if let Some(include_type) = lookup(hash, KEY_EQUALITY_INCLUDE_TYPE).and_then(Value::as_bool) {
            object.equality_include_type = include_type;
        }
        if let Some(serialization) = lookup(hash, KEY_SERIALIZATION) {
            object.serialization = Some(string_list(serialization));
        }
        Ok(object)
    }

    fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("Object '{}'", name),
            None => "Object".to_string(),
        }
    }

    /// Equality names must be attributes, own or inherited. Inherited names are only checked
    /// once the parent is known.
    fn check_equality(
        &self,
        names: &[String],
    ) -> Result<(), TypeResolverError> {
        let parent_known = self.parent.as_ref().map_or(true, Type::is_resolved);
        let all = self.all_attributes();
        for name in names {
            match all.iter().find(|a| &a.name == name) {
                Some(attribute) if attribute.is_constant() => {
                    return Err(TypeResolverError::new(format!(
                        "{} equality is referencing constant attribute '{}'",
                        self.label(),
                        name
                    )));
                }
                Some(_) => {}
                None if parent_known => {
                    return Err(TypeResolverError::new(format!(
                        "{} equality is referencing unknown attribute '{}'",
                        self.label(),
                        name
                    )));
                }
                None => {}
            }
        }
        Ok(())
    }

    /// `Object` itself
    pub fn is_default(&self) -> bool {
        self.name.is_none() && self.parent.is_none() && self.attributes.is_empty() && self.functions.is_empty()
    }

    /// The same type under another name
    pub fn renamed(
        &self,
        name: impl Into<String>,
    ) -> ObjectType {
        ObjectType {
            name: Some(name.into()),
            ..self.clone()
        }
    }

    /// The parent chain, nearest first. Stops at a parent that is not a resolved object.
    pub fn ancestors(&self) -> Vec<Type> {
        let mut chain: Vec<Type> = Vec::new();
        let mut next = self.parent.clone();
        while let Some(parent) = next {
            let resolved = parent.resolved();
            if chain.iter().any(|t| t.ptr_eq(&resolved)) {
                break;
            }
            next = match resolved.kind() {
                TypeKind::Object(object) => object.parent.clone(),
                _ => break,
            };
            chain.push(resolved);
        }
        chain
    }

    /// Inherited attributes first, then the own attributes
    pub fn all_attributes(&self) -> Vec<Attribute> {
        let mut all: IndexMap<String, Attribute> = IndexMap::new();
        for ancestor in self.ancestors().iter().rev() {
            if let TypeKind::Object(object) = ancestor.kind() {
                for (name, attribute) in &object.attributes {
                    all.insert(name.clone(), attribute.clone());
                }
            }
        }
        for (name, attribute) in &self.attributes {
            all.insert(name.clone(), attribute.clone());
        }
        all.into_values().collect()
    }

    pub fn attribute(
        &self,
        name: &str,
    ) -> Option<Attribute> {
        self.all_attributes().into_iter().find(|a| a.name == name)
    }

    /// Names of the attributes compared by object equality. Declared names extend the
    /// equality of the parent.
    pub fn equality_attributes(&self) -> Vec<String> {
        let Some(own) = &self.equality else {
            return self
                .all_attributes()
                .into_iter()
                .filter(|a| !a.is_constant())
                .map(|a| a.name)
                .collect();
        };
        let mut names = match self.ancestors().first().map(Type::kind) {
            Some(TypeKind::Object(parent)) if parent.equality.is_some() => parent.equality_attributes(),
            _ => Vec::new(),
        };
        for name in own {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }

    /// The init hash that declares this type, without the name
    pub fn init_hash(&self) -> Value {
        let mut hash = ValueMap::new();
        if let Some(parent) = &self.parent {
            hash.insert(KEY_PARENT.into(), Value::Type(parent.clone()));
        }
        let (constants, attributes): (Vec<_>, Vec<_>) = self
            .attributes
            .values()
            .partition(|a| a.is_constant() && a.value_type == infer_generalized(a.value.as_ref()));
        if !attributes.is_empty() {
            let attributes = attributes
                .into_iter()
                .map(|a| (Value::String(a.name.clone()), a.init_value()))
                .collect();
            hash.insert(KEY_ATTRIBUTES.into(), Value::Hash(attributes));
        }
        if !constants.is_empty() {
            let constants = constants
                .into_iter()
                .map(|a| (Value::String(a.name.clone()), a.value.clone().unwrap_or(Value::Undef)))
                .collect();
            hash.insert(KEY_CONSTANTS.into(), Value::Hash(constants));
        }
        if !self.functions.is_empty() {
            let functions = self
                .functions
                .values()
                .map(|f| (Value::String(f.name.clone()), f.init_value()))
                .collect();
            hash.insert(KEY_FUNCTIONS.into(), Value::Hash(functions));
        }
        if let Some(equality) = &self.equality {
            let names = equality.iter().map(|n| Value::String(n.clone())).collect();
            hash.insert(KEY_EQUALITY.into(), Value::Array(names));
        }
        if !self.equality_include_type {
            hash.insert(KEY_EQUALITY_INCLUDE_TYPE.into(), Value::Boolean(false));
        }
        if let Some(serialization) = &self.serialization {
            let names = serialization.iter().map(|n| Value::String(n.clone())).collect();
            hash.insert(KEY_SERIALIZATION.into(), Value::Array(names));
        }
        Value::Hash(hash)
    }

    /// Source of the init hash, as printed inside `Object[...]`
    pub fn init_hash_source(&self) -> String {
        self.init_hash().to_string()
    }

    pub(crate) fn guarded_equals(
        &self,
        other: &ObjectType,
        guard: &mut RecursionGuard,
    ) -> bool {
        if self.name != other.name {
            return false;
        }
        let this_id = self as *const ObjectType as usize;
        let that_id = other as *const ObjectType as usize;
        guard.with_this(this_id, |guard, _| {
            guard.with_that(that_id, |guard, state| {
                if state == SELF_RECURSION_IN_BOTH {
                    return true;
                }
                self.equality == other.equality
                    && self.equality_include_type == other.equality_include_type
                    && self.serialization == other.serialization
                    && option_equals(&self.parent, &other.parent, guard)
                    && self.attributes.len() == other.attributes.len()
                    && self
                        .attributes
                        .values()
                        .zip(other.attributes.values())
                        .all(|(a, b)| a.guarded_equals(b, guard))
                    && self.functions.len() == other.functions.len()
                    && self.functions.values().zip(other.functions.values()).all(|(a, b)| {
                        a.name == b.name
                            && a.is_final == b.is_final
                            && a.is_override == b.is_override
                            && a.callable.guarded_equals(&b.callable, guard)
                    })
            })
        })
    }
}

fn infer_generalized(value: Option<&Value>) -> Type {
    value.map_or_else(super::factory::undef, |v| infer(v).generalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::factory::*;

    fn init(entries: Vec<(&str, Value)>) -> Value {
        Value::hash_of(entries)
    }

    #[test]
    fn test_from_init_hash() {
        let hash = init(vec![
            (
                "attributes",
                Value::hash_of([
                    ("name", Value::Type(string())),
                    (
                        "legs",
                        Value::hash_of([("type", Value::Type(integer())), ("value", Value::Integer(4))]),
                    ),
                ]),
            ),
            ("constants", Value::hash_of([("kingdom", Value::from("animalia"))])),
        ]);
        let object = ObjectType::from_init_hash(Some("Animal"), &hash).unwrap();
        assert_eq!(object.name.as_deref(), Some("Animal"));
        let names: Vec<String> = object.all_attributes().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["name", "legs", "kingdom"]);
        assert_eq!(object.equality_attributes(), vec!["name", "legs"]);
        assert_eq!(object.attribute("legs").and_then(|a| a.value), Some(Value::Integer(4)));
    }

    #[test]
    fn test_inherited_attributes_come_first() {
        let animal = object(
            ObjectType::from_init_hash(
                Some("Animal"),
                &init(vec![("attributes", Value::hash_of([("name", Value::Type(string()))]))]),
            )
            .unwrap(),
        );
        let dog = ObjectType::from_init_hash(
            Some("Dog"),
            &init(vec![
                ("parent", Value::Type(animal.clone())),
                ("attributes", Value::hash_of([("breed", Value::Type(string()))])),
                ("equality", Value::from("breed")),
            ]),
        )
        .unwrap();
        let names: Vec<String> = dog.all_attributes().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["name", "breed"]);
        assert_eq!(dog.equality_attributes(), vec!["breed"]);
        assert!(animal.is_assignable(&object(dog)));
    }

    #[test]
    fn test_init_errors() {
        let bad_value = init(vec![(
            "attributes",
            Value::hash_of([(
                "legs",
                Value::hash_of([("type", Value::Type(integer())), ("value", Value::from("four"))]),
            )]),
        )]);
        let err = ObjectType::from_init_hash(None, &bad_value).unwrap_err();
        assert_eq!(
            err.to_string(),
            "initHash['attributes']['legs']['value'] expects an Integer value, got String"
        );

        let unknown = init(vec![("equality", Value::from("nope"))]);
        let err = ObjectType::from_init_hash(Some("Foo"), &unknown).unwrap_err();
        assert_eq!(err.to_string(), "Object 'Foo' equality is referencing unknown attribute 'nope'");

        let constant = init(vec![(
            "attributes",
            Value::hash_of([("c", Value::hash_of([("type", Value::Type(integer())), ("kind", Value::from("constant"))]))]),
        )]);
        assert!(ObjectType::from_init_hash(None, &constant).is_err());
    }

    #[test]
    fn test_anonymous_object_prints_init_hash() {
        let hash = init(vec![("attributes", Value::hash_of([("a", Value::Type(integer()))]))]);
        let t = object(ObjectType::from_init_hash(None, &hash).unwrap());
        assert_eq!(t.to_string(), "Object[{'attributes' => {'a' => Integer}}]");
        assert_eq!(object_default().to_string(), "Object");
    }
}
