//! Name to type resolution
//!
//! A [`Loader`] finds types by [`TypedName`] and accepts new bindings. Loaders nest: the
//! context keeps a stack of them, and a scope pushes a child that falls back to its parent.
//!
//! | Loader | Finds |
//! |---|---|
//! | [`BasicLoader`] | the boot types and everything bound at the root |
//! | [`ParentedLoader`] | the parent's types, then its own |
//! | [`TypeSetLoader`] | the types of one type set, then the parent's |

pub mod basic;
pub mod parented;
pub mod type_set;

use std::fmt;
use std::sync::Arc;

pub use basic::BasicLoader;
pub use parented::ParentedLoader;
pub use type_set::TypeSetLoader;

use crate::error::TypeResolverError;
use crate::types::Type;
use crate::util::config::RUNTIME_NAME_AUTHORITY;
use crate::util::names::split_name;

/// Namespace of type bindings
pub const TYPE_NAMESPACE: &str = "type";

/// A name qualified by namespace and name authority
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedName {
    pub namespace: String,
    pub name: String,
    pub name_authority: String,
}

impl TypedName {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        name_authority: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            name_authority: name_authority.into(),
        }
    }

    /// A type name under the runtime authority
    pub fn type_name(name: impl Into<String>) -> Self {
        Self::new(TYPE_NAMESPACE, name, RUNTIME_NAME_AUTHORITY)
    }

    /// A type name under `name_authority`
    pub fn type_name_in(
        name: impl Into<String>,
        name_authority: impl Into<String>,
    ) -> Self {
        Self::new(TYPE_NAMESPACE, name, name_authority)
    }

    pub fn segments(&self) -> Vec<&str> {
        split_name(&self.name)
    }

    pub fn is_qualified(&self) -> bool {
        self.name.contains("::")
    }

    /// The same name in another authority
    pub fn with_authority(
        &self,
        name_authority: &str,
    ) -> TypedName {
        TypedName::new(self.namespace.clone(), self.name.clone(), name_authority)
    }
}

impl fmt::Display for TypedName {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}/{}/{}", self.name_authority, self.namespace, self.name)
    }
}

/// Scoped name-to-type resolver
pub trait Loader: Send + Sync + fmt::Debug {
    /// The type bound to `name`, if any
    fn load(
        &self,
        name: &TypedName,
    ) -> Option<Type>;

    /// Bind `t` to `name` in this loader
    fn bind(
        &self,
        name: TypedName,
        t: Type,
    ) -> Result<(), TypeResolverError>;

    /// Authority used for names that do not state one
    fn name_authority(&self) -> &str;

    /// The type set this loader fronts, if any
    fn type_set(&self) -> Option<&Type> {
        None
    }
}

/// Shared loader handle
pub type LoaderRef = Arc<dyn Loader>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_name() {
        let name = TypedName::type_name("Foo::Bar");
        assert_eq!(name.segments(), vec!["Foo", "Bar"]);
        assert!(name.is_qualified());
        assert_eq!(name.to_string(), format!("{}/type/Foo::Bar", RUNTIME_NAME_AUTHORITY));
        let other = name.with_authority("http://example.com/a");
        assert_ne!(name, other);
        assert_eq!(other.name, "Foo::Bar");
    }
}
