//! Guarded structural equality
//!
//! Two types are equal when they have the same kind and equal parameters. Aliases compare by
//! name and body; walking the bodies of two self-referencing aliases ends when both sides have
//! looped back, and the pair is then taken as equal.

use super::guard::{RecursionGuard, SELF_RECURSION_IN_BOTH};
use super::{Type, TypeKind as K};

impl Type {
    pub fn guarded_equals(
        &self,
        other: &Type,
        guard: &mut RecursionGuard,
    ) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let a = self.deref();
        let b = other.deref();
        if a.ptr_eq(&b) {
            return true;
        }

        match (a.kind(), b.kind()) {
            (K::Any, K::Any)
            | (K::Unit, K::Unit)
            | (K::Undef, K::Undef)
            | (K::Default, K::Default)
            | (K::Boolean, K::Boolean)
            | (K::Scalar, K::Scalar)
            | (K::ScalarData, K::ScalarData)
            | (K::Numeric, K::Numeric)
            | (K::SemVerRange, K::SemVerRange) => true,
            (K::Integer(x), K::Integer(y)) | (K::Collection(x), K::Collection(y)) => x == y,
            (K::Float(x), K::Float(y)) => x == y,
            (K::String(x), K::String(y)) => x == y,
            (K::Enum(x), K::Enum(y)) => {
                x.case_insensitive == y.case_insensitive
                    && x.values.len() == y.values.len()
                    && x.values.iter().all(|v| y.values.contains(v))
            }
            (K::Pattern(x), K::Pattern(y)) => x.len() == y.len() && x.iter().all(|r| y.contains(r)),
            (K::Regexp(x), K::Regexp(y)) => x == y,
            (K::Array(x), K::Array(y)) => x.size == y.size && x.element.guarded_equals(&y.element, guard),
            (K::Hash(x), K::Hash(y)) => {
                x.size == y.size && x.key.guarded_equals(&y.key, guard) && x.value.guarded_equals(&y.value, guard)
            }
            (K::Tuple(x), K::Tuple(y)) => x.size == y.size && list_equals(&x.types, &y.types, guard),
            (K::Struct(x), K::Struct(y)) => {
                x.elements.len() == y.elements.len()
                    && x.elements.iter().zip(&y.elements).all(|(e1, e2)| {
                        e1.name == e2.name && e1.key.guarded_equals(&e2.key, guard) && e1.value.guarded_equals(&e2.value, guard)
                    })
            }
            (K::Optional(x), K::Optional(y))
            | (K::NotUndef(x), K::NotUndef(y))
            | (K::Iterable(x), K::Iterable(y))
            | (K::Iterator(x), K::Iterator(y))
            | (K::Type(x), K::Type(y))
            | (K::Sensitive(x), K::Sensitive(y)) => x.guarded_equals(y, guard),
            (K::Variant(x), K::Variant(y)) => {
                x.len() == y.len() && x.iter().all(|m| y.iter().any(|n| m.guarded_equals(n, guard)))
            }
            (K::Callable(x), K::Callable(y)) => {
                option_equals(&x.params, &y.params, guard)
                    && option_equals(&x.block, &y.block, guard)
                    && option_equals(&x.return_type, &y.return_type, guard)
            }
            (K::SemVer(x), K::SemVer(y)) => x.len() == y.len() && x.iter().all(|r| y.contains(r)),
            (K::Timespan(x), K::Timespan(y)) => x == y,
            (K::Timestamp(x), K::Timestamp(y)) => x == y,
            (K::Resource(x), K::Resource(y)) => x == y,
            (K::Class(x), K::Class(y)) => x == y,
            (K::Runtime(x), K::Runtime(y)) => x == y,
            (K::Object(x), K::Object(y)) => x.guarded_equals(y, guard),
            (K::TypeSet(x), K::TypeSet(y)) => x.guarded_equals(y, guard),
            (K::Alias(x), K::Alias(y)) => {
                if x.name != y.name {
                    return false;
                }
                let (a_id, b_id) = (a.id(), b.id());
                guard.with_this(a_id, |guard, _| {
                    guard.with_that(b_id, |guard, state| {
                        if state == SELF_RECURSION_IN_BOTH {
                            return true;
                        }
                        match (x.body(), y.body()) {
                            (Some(bx), Some(by)) => bx.guarded_equals(by, guard),
                            (None, None) => true,
                            _ => false,
                        }
                    })
                })
            }
            // Only unresolved references remain after deref
            (K::Reference(x), K::Reference(y)) => x.name == y.name,
            _ => false,
        }
    }
}

/// Positional equality of two type lists
pub(crate) fn list_equals(
    a: &[Type],
    b: &[Type],
    guard: &mut RecursionGuard,
) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.guarded_equals(y, guard))
}

pub(crate) fn option_equals(
    a: &Option<Type>,
    b: &Option<Type>,
    guard: &mut RecursionGuard,
) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => x.guarded_equals(y, guard),
        (None, None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::types::factory::*;
    use crate::types::{Type, TypeAlias, TypeKind, TypeReference};

    /// `type <name> = Variant[Integer, Array[<name>]]`
    fn recursive_alias(name: &str) -> Type {
        let alias = Type::new(TypeKind::Alias(TypeAlias::pending(name)));
        let self_ref = Type::new(TypeKind::Reference(TypeReference::to(name, &alias)));
        if let TypeKind::Alias(a) = alias.kind() {
            a.set_body(variant(vec![integer(), array_of(self_ref)]));
        }
        alias
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(array(integer_range(1, 2).unwrap(), crate::types::IntegerType::SIZE), array_of(integer_range(1, 2).unwrap()));
        assert_ne!(array_of(integer()), array_of(string()));
        assert_ne!(optional(integer()), not_undef(integer()));
    }

    #[test]
    fn test_variant_order_is_ignored() {
        let a = Type::new(TypeKind::Variant(vec![integer(), string()]));
        let b = Type::new(TypeKind::Variant(vec![string(), integer()]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_recursive_aliases_with_same_name_are_equal() {
        assert_eq!(recursive_alias("Tree"), recursive_alias("Tree"));
        assert_ne!(recursive_alias("Tree"), recursive_alias("Other"));
    }

    #[test]
    fn test_unresolved_references_compare_by_name() {
        assert_eq!(type_reference("Foo"), type_reference("Foo"));
        assert_ne!(type_reference("Foo"), type_reference("Bar"));
    }
}
