//! Loader fronting a type set

use super::{BasicLoader, Loader, LoaderRef, TypedName};
use crate::error::TypeResolverError;
use crate::types::{Type, TypeKind};

/// Finds the types of a type set by their names relative to the set, by names prefixed with
/// the set name, and through the reference aliases of the set. Other names go to the parent.
#[derive(Debug)]
pub struct TypeSetLoader {
    parent: LoaderRef,
    type_set: Type,
    case_insensitive: bool,
    local: BasicLoader,
}

impl TypeSetLoader {
    pub fn new(
        parent: LoaderRef,
        type_set: Type,
        case_insensitive: bool,
    ) -> Self {
        let authority = match type_set.resolved().kind() {
            TypeKind::TypeSet(set) => set.name_authority.clone(),
            _ => parent.name_authority().to_string(),
        };
        Self {
            parent,
            type_set,
            case_insensitive,
            local: BasicLoader::with_authority(authority),
        }
    }

    fn find_in_set(
        &self,
        name: &TypedName,
    ) -> Option<Type> {
        let resolved = self.type_set.resolved();
        let TypeKind::TypeSet(set) = resolved.kind() else {
            return None;
        };
        if name.name_authority != set.name_authority {
            return None;
        }
        let relative = match &set.name {
            Some(set_name) => name
                .name
                .strip_prefix(set_name.as_str())
                .and_then(|rest| rest.strip_prefix("::"))
                .unwrap_or(&name.name),
            None => &name.name,
        };
        set.lookup(relative, self.case_insensitive)
    }
}

impl Loader for TypeSetLoader {
    fn load(
        &self,
        name: &TypedName,
    ) -> Option<Type> {
        self.find_in_set(name)
            .or_else(|| self.local.load(name))
            .or_else(|| self.parent.load(name))
            .or_else(|| {
                let authority = self.parent.name_authority();
                if name.name_authority == authority {
                    None
                } else {
                    self.parent.load(&name.with_authority(authority))
                }
            })
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
        Some(&self.type_set)
    }
}
