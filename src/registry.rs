//! Implementation registry
//!
//! Binds a type name to the functions that build its instances and project them back to
//! positional attribute values. A codec asks the registry for the factory of a type name, hands
//! it an [`ArgumentsAccessor`] and gets a value back; for serialization it asks for the
//! projection of a value.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, TypeResolverError};
use crate::types::Type;
use crate::values::Value;

/// Builds an instance from its arguments
pub type FactoryFn = Arc<dyn Fn(&mut dyn ArgumentsAccessor) -> Result<Value> + Send + Sync>;

/// Projects an instance to its attribute values, in declaration order
pub type ProjectionFn = Arc<dyn Fn(&Value) -> Result<Vec<Value>> + Send + Sync>;

/// Arguments presented to a [`FactoryFn`]
pub trait ArgumentsAccessor {
    /// The type being instantiated
    fn get_type(&self) -> &Type;

    /// Positional attribute values
    fn get_all(&self) -> &[Value];

    fn get(
        &self,
        index: usize,
    ) -> Option<&Value> {
        self.get_all().get(index)
    }

    fn len(&self) -> usize {
        self.get_all().len()
    }

    fn is_empty(&self) -> bool {
        self.get_all().is_empty()
    }

    /// Record the value under construction so that later arguments can refer back to it
    fn remember(
        &mut self,
        value: Value,
    );
}

/// [`ArgumentsAccessor`] over a vector of values
#[derive(Debug, Clone)]
pub struct ArgumentList {
    ptype: Type,
    values: Vec<Value>,
    remembered: Option<Value>,
}

impl ArgumentList {
    pub fn new(
        ptype: Type,
        values: Vec<Value>,
    ) -> Self {
        Self {
            ptype,
            values,
            remembered: None,
        }
    }

    /// The value passed to [`ArgumentsAccessor::remember`], if any
    pub fn remembered(&self) -> Option<&Value> {
        self.remembered.as_ref()
    }
}

impl ArgumentsAccessor for ArgumentList {
    fn get_type(&self) -> &Type {
        &self.ptype
    }

    fn get_all(&self) -> &[Value] {
        &self.values
    }

    fn remember(
        &mut self,
        value: Value,
    ) {
        self.remembered = Some(value);
    }
}

/// A registered implementation
#[derive(Clone)]
pub struct Implementation {
    pub type_name: String,
    pub native_name: String,
    factory: FactoryFn,
    projection: ProjectionFn,
}

impl Implementation {
    /// Build an instance
    pub fn create(
        &self,
        args: &mut dyn ArgumentsAccessor,
    ) -> Result<Value> {
        (self.factory)(args)
    }

    /// Attribute values of an instance
    pub fn project(
        &self,
        value: &Value,
    ) -> Result<Vec<Value>> {
        (self.projection)(value)
    }
}

impl fmt::Debug for Implementation {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Implementation")
            .field("type_name", &self.type_name)
            .field("native_name", &self.native_name)
            .finish()
    }
}

/// Implementations by type name and by native name
#[derive(Debug, Default)]
pub struct ImplementationRegistry {
    by_type: HashMap<String, Implementation>,
    by_native: HashMap<String, String>,
}

impl ImplementationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the implementation of `type_name`. A type name is registered once.
    pub fn register(
        &mut self,
        type_name: impl Into<String>,
        native_name: impl Into<String>,
        factory: FactoryFn,
        projection: ProjectionFn,
    ) -> std::result::Result<(), TypeResolverError> {
        let type_name = type_name.into();
        let native_name = native_name.into();
        if self.by_type.contains_key(&type_name) {
            return Err(TypeResolverError::new(format!(
                "An implementation for type '{}' is already registered",
                type_name
            )));
        }
        tracing::trace!(type_name = %type_name, native_name = %native_name, "register implementation");
        self.by_native.insert(native_name.clone(), type_name.clone());
        self.by_type.insert(
            type_name.clone(),
            Implementation {
                type_name,
                native_name,
                factory,
                projection,
            },
        );
        Ok(())
    }

    pub fn lookup_by_type_name(
        &self,
        type_name: &str,
    ) -> Option<&Implementation> {
        self.by_type.get(type_name)
    }

    pub fn lookup_by_native_name(
        &self,
        native_name: &str,
    ) -> Option<&Implementation> {
        self.by_native
            .get(native_name)
            .and_then(|type_name| self.by_type.get(type_name))
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::factory;

    fn echo_factory() -> FactoryFn {
        Arc::new(|args: &mut dyn ArgumentsAccessor| {
            let value = Value::Array(args.get_all().to_vec());
            args.remember(value.clone());
            Ok(value)
        })
    }

    fn echo_projection() -> ProjectionFn {
        Arc::new(|value: &Value| Ok(value.as_array().map(<[Value]>::to_vec).unwrap_or_default()))
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ImplementationRegistry::new();
        registry
            .register("My::Point", "point::Point", echo_factory(), echo_projection())
            .unwrap();
        let by_type = registry.lookup_by_type_name("My::Point").unwrap();
        assert_eq!(by_type.native_name, "point::Point");
        let by_native = registry.lookup_by_native_name("point::Point").unwrap();
        assert_eq!(by_native.type_name, "My::Point");
        assert!(registry.lookup_by_type_name("Other").is_none());
    }

    #[test]
    fn test_create_and_project() {
        let mut registry = ImplementationRegistry::new();
        registry
            .register("My::Point", "point::Point", echo_factory(), echo_projection())
            .unwrap();
        let implementation = registry.lookup_by_type_name("My::Point").unwrap();
        let mut args = ArgumentList::new(factory::any(), vec![Value::Integer(1), Value::Integer(2)]);
        let value = implementation.create(&mut args).unwrap();
        assert_eq!(args.remembered(), Some(&value));
        assert_eq!(implementation.project(&value).unwrap(), vec![Value::Integer(1), Value::Integer(2)]);
    }

    #[test]
    fn test_register_twice() {
        let mut registry = ImplementationRegistry::new();
        registry
            .register("My::Point", "a", echo_factory(), echo_projection())
            .unwrap();
        let err = registry
            .register("My::Point", "b", echo_factory(), echo_projection())
            .unwrap_err();
        assert!(err.message.contains("already registered"));
    }
}
