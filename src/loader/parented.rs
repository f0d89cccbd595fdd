//! Child loader of a local scope

use super::{BasicLoader, Loader, LoaderRef, TypedName};
use crate::error::TypeResolverError;
use crate::types::Type;

/// Looks in the parent first, then in its own bindings. Bindings made here are dropped with
/// the scope.
#[derive(Debug)]
pub struct ParentedLoader {
    parent: LoaderRef,
    local: BasicLoader,
}

impl ParentedLoader {
    pub fn new(parent: LoaderRef) -> Self {
        let local = BasicLoader::with_authority(parent.name_authority());
        Self { parent, local }
    }

    pub fn parent(&self) -> &LoaderRef {
        &self.parent
    }
}

impl Loader for ParentedLoader {
    fn load(
        &self,
        name: &TypedName,
    ) -> Option<Type> {
        self.parent.load(name).or_else(|| self.local.load(name))
    }

    fn bind(
        &self,
        name: TypedName,
        t: Type,
    ) -> Result<(), TypeResolverError> {
        self.local.bind(name, t)
    }

    fn name_authority(&self) -> &str {
        self.local.name_authority()
    }

    fn type_set(&self) -> Option<&Type> {
        self.parent.type_set()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::types::factory::*;

    #[test]
    fn test_parent_then_local() {
        let root: LoaderRef = Arc::new(BasicLoader::new());
        root.bind(TypedName::type_name("Foo"), integer()).unwrap();
        let child = ParentedLoader::new(root.clone());
        child.bind(TypedName::type_name("Bar"), string()).unwrap();
        assert!(child.load(&TypedName::type_name("Foo")).unwrap().ptr_eq(&integer()));
        assert!(child.load(&TypedName::type_name("Bar")).unwrap().ptr_eq(&string()));
        assert!(root.load(&TypedName::type_name("Bar")).is_none());
    }
}
