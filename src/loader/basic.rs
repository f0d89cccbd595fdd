//! Root loader

use std::collections::HashMap;

use parking_lot::RwLock;

use super::{Loader, TypedName};
use crate::error::TypeResolverError;
use crate::types::Type;
use crate::util::config::RUNTIME_NAME_AUTHORITY;

/// Holds its bindings in a map. Rebinding a name to a different type is an error.
#[derive(Debug)]
pub struct BasicLoader {
    types: RwLock<HashMap<TypedName, Type>>,
    name_authority: String,
}

impl BasicLoader {
    pub fn new() -> Self {
        Self::with_authority(RUNTIME_NAME_AUTHORITY)
    }

    pub fn with_authority(name_authority: impl Into<String>) -> Self {
        Self {
            types: RwLock::new(HashMap::new()),
            name_authority: name_authority.into(),
        }
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}

impl Default for BasicLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader for BasicLoader {
    fn load(
        &self,
        name: &TypedName,
    ) -> Option<Type> {
        self.types.read().get(name).cloned()
    }

    fn bind(
        &self,
        name: TypedName,
        t: Type,
    ) -> Result<(), TypeResolverError> {
        let mut types = self.types.write();
        if let Some(existing) = types.get(&name) {
            if existing.ptr_eq(&t) {
                return Ok(());
            }
            return Err(TypeResolverError::new(format!(
                "Attempt to redefine type '{}'",
                name.name
            )));
        }
        tracing::trace!(name = %name, "bind");
        types.insert(name, t);
        Ok(())
    }

    fn name_authority(&self) -> &str {
        &self.name_authority
    }
}
