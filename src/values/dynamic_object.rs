//! Instances of user defined object types

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::TypeResolverError;
use crate::types::{Type, TypeKind};

use super::Value;

/// An object created from an [`crate::types::object::ObjectType`] and its positional
/// attribute values.
///
/// Trailing attributes may be omitted; reading one yields the declared default.
#[derive(Debug, Clone)]
pub struct DynamicObject {
    ptype: Type,
    attributes: Arc<Vec<Value>>,
}

impl DynamicObject {
    pub fn new(
        ptype: Type,
        attributes: Vec<Value>,
    ) -> Self {
        Self {
            ptype,
            attributes: Arc::new(attributes),
        }
    }

    /// The object type
    pub fn ptype(&self) -> &Type {
        &self.ptype
    }

    /// Attribute values in declaration order, inherited attributes first
    pub fn attributes(&self) -> &[Value] {
        &self.attributes
    }

    /// Value of the named attribute, or its default when the value was not given
    pub fn get(
        &self,
        name: &str,
    ) -> Result<Value, TypeResolverError> {
        let resolved = self.ptype.resolved();
        let TypeKind::Object(object) = resolved.kind() else {
            return Err(TypeResolverError::new(format!("{} is not an Object type", self.ptype)));
        };
        let attributes = object.all_attributes();
        let index = attributes
            .iter()
            .position(|a| a.name == name)
            .ok_or_else(|| {
                TypeResolverError::new(format!("{} has no attribute named '{}'", self.ptype, name))
            })?;
        Ok(match self.attributes.get(index) {
            Some(value) => value.clone(),
            None => attributes[index].value.clone().unwrap_or(Value::Undef),
        })
    }

    fn equality_values(&self) -> Vec<Value> {
        let resolved = self.ptype.resolved();
        let TypeKind::Object(object) = resolved.kind() else {
            return self.attributes.to_vec();
        };
        let attributes = object.all_attributes();
        object
            .equality_attributes()
            .iter()
            .filter_map(|name| attributes.iter().position(|a| &a.name == name))
            .map(|index| match self.attributes.get(index) {
                Some(value) => value.clone(),
                None => attributes[index].value.clone().unwrap_or(Value::Undef),
            })
            .collect()
    }
}

impl PartialEq for DynamicObject {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        let include_type = match self.ptype.resolved().kind() {
            TypeKind::Object(object) => object.equality_include_type,
            _ => true,
        };
        let types_match = if include_type {
            self.ptype == other.ptype
        } else {
            self.ptype.is_assignable(&other.ptype)
        };
        types_match && self.equality_values() == other.equality_values()
    }
}

impl Eq for DynamicObject {}

impl Hash for DynamicObject {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        self.equality_values().hash(state);
    }
}

impl fmt::Display for DynamicObject {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}(", self.ptype)?;
        if let TypeKind::Object(object) = self.ptype.resolved().kind() {
            for (i, (attribute, value)) in object.all_attributes().iter().zip(self.attributes.iter()).enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "'{}' => {}", attribute.name, value)?;
            }
        }
        write!(f, ")")
    }
}
