//! Named types with a late body
//!
//! Both kinds move once from unresolved to resolved. The body of an alias is installed after its
//! expression is evaluated; a reference is bound to the type its name denotes. A reference only
//! holds a weak pointer, so an alias whose body refers back to the alias does not keep itself
//! alive.

use std::fmt;
use std::sync::{OnceLock, Weak};

use crate::error::TypeResolverError;
use crate::frontend::Expr;

use super::{Type, TypeKind};

/// `type Name = <expr>`
pub struct TypeAlias {
    pub name: String,
    expr: Option<Expr>,
    body: OnceLock<Type>,
}

impl TypeAlias {
    /// An alias waiting for its expression to be evaluated
    pub fn declared(
        name: impl Into<String>,
        expr: Expr,
    ) -> Self {
        Self {
            name: name.into(),
            expr: Some(expr),
            body: OnceLock::new(),
        }
    }

    /// An alias whose body is installed later by its creator
    pub(crate) fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expr: None,
            body: OnceLock::new(),
        }
    }

    /// An alias with a known body
    pub fn with_body(
        name: impl Into<String>,
        body: Type,
    ) -> Self {
        let alias = Self {
            name: name.into(),
            expr: None,
            body: OnceLock::new(),
        };
        let _ = alias.body.set(body);
        alias
    }

    pub fn expr(&self) -> Option<&Expr> {
        self.expr.as_ref()
    }

    pub fn body(&self) -> Option<&Type> {
        self.body.get()
    }

    pub fn is_resolved(&self) -> bool {
        self.body.get().is_some()
    }

    /// The body, or an error naming the alias when it was never resolved
    pub fn resolved_body(&self) -> Result<&Type, TypeResolverError> {
        self.body
            .get()
            .ok_or_else(|| TypeResolverError::new(format!("Type alias '{}' is not resolved", self.name)))
    }

    /// Install the body. Only the first call has an effect.
    pub(crate) fn set_body(
        &self,
        body: Type,
    ) -> bool {
        self.body.set(body).is_ok()
    }
}

impl fmt::Debug for TypeAlias {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("TypeAlias")
            .field("name", &self.name)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// A name standing for a type
pub struct TypeReference {
    pub name: String,
    target: OnceLock<Weak<TypeKind>>,
}

impl TypeReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: OnceLock::new(),
        }
    }

    /// A reference already bound to its target
    pub fn to(
        name: impl Into<String>,
        target: &Type,
    ) -> Self {
        let reference = Self::new(name);
        reference.bind(target);
        reference
    }

    /// Bind to a target. Only the first call has an effect.
    pub fn bind(
        &self,
        target: &Type,
    ) -> bool {
        self.target.set(target.downgrade()).is_ok()
    }

    /// The target, while it is alive
    pub fn target(&self) -> Option<Type> {
        self.target.get().and_then(Weak::upgrade).map(Type::from_arc)
    }

    pub fn is_resolved(&self) -> bool {
        self.target().is_some()
    }

    pub fn resolved_target(&self) -> Result<Type, TypeResolverError> {
        self.target()
            .ok_or_else(|| TypeResolverError::new(format!("Reference to unresolved type '{}'", self.name)))
    }
}

impl fmt::Debug for TypeReference {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("TypeReference")
            .field("name", &self.name)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::factory;

    #[test]
    fn test_reference_binds_once() {
        let first = factory::integer();
        let second = factory::string();
        let reference = TypeReference::new("Foo");
        assert!(reference.resolved_target().is_err());
        assert!(reference.bind(&first));
        assert!(!reference.bind(&second));
        assert!(reference.target().unwrap().ptr_eq(&first));
    }

    #[test]
    fn test_reference_is_weak() {
        let reference = {
            let target = factory::type_alias_with_body("Foo", factory::integer());
            TypeReference::to("Foo", &target)
        };
        assert!(reference.target().is_none());
    }

    #[test]
    fn test_alias_body_set_once() {
        let alias = TypeAlias::with_body("Foo", factory::integer());
        assert!(!alias.set_body(factory::string()));
        assert_eq!(alias.resolved_body().unwrap(), &factory::integer());
    }
}
