//! Projection of a type to the widest type of its kind

use super::type_set::default_type_set;
use super::{factory, Type, TypeKind as K};

impl Type {
    /// The widest type of the same kind: `Integer[1, 10]` → `Integer`, `Array[String[1]]` →
    /// `Array[String]`. Named types stay as they are.
    pub fn generalize(&self) -> Type {
        match self.kind() {
            K::Integer(_) => factory::integer(),
            K::Float(_) => factory::float(),
            // An enum accepts strings only, and the empty enum accepts none
            K::String(_) | K::Enum(_) => factory::string(),
            K::Pattern(_) => factory::pattern_default(),
            K::Regexp(_) => factory::regexp(),
            K::Collection(_) => factory::collection_default(),
            K::Struct(_) => factory::struct_default(),
            K::Callable(_) => factory::callable_default(),
            K::SemVer(_) => factory::sem_ver(),
            K::Timespan(_) => factory::timespan(),
            K::Timestamp(_) => factory::timestamp(),
            K::TypeSet(_) => default_type_set(),
            K::Array(a) => factory::array_of(a.element.generalize()),
            K::Hash(h) => factory::hash_of(h.key.generalize(), h.value.generalize()),
            K::Tuple(t) => factory::tuple(t.types.iter().map(Type::generalize).collect(), None),
            K::Optional(t) => factory::optional(t.generalize()),
            K::NotUndef(t) => factory::not_undef(t.generalize()),
            K::Variant(members) => factory::variant(members.iter().map(Type::generalize).collect()),
            K::Type(t) => factory::type_type(t.generalize()),
            K::Sensitive(t) => factory::sensitive(t.generalize()),
            K::Iterable(t) => factory::iterable(t.generalize()),
            K::Iterator(t) => factory::iterator(t.generalize()),
            _ => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::types::factory::*;
    use crate::types::IntegerType;

    #[test]
    fn test_parameters_dropped() {
        assert!(integer_range(1, 10).unwrap().generalize().ptr_eq(&integer()));
        assert!(string_value("x").generalize().ptr_eq(&string()));
        assert!(enumeration(vec!["a".into()], false).generalize().ptr_eq(&string()));
        assert!(struct_type(vec![struct_member("a", integer())]).generalize().ptr_eq(&struct_default()));
    }

    #[test]
    fn test_containers_generalize_inner_types() {
        let t = array(integer_range(1, 2).unwrap(), IntegerType::exact(3));
        assert_eq!(t.generalize(), array_of(integer()));
        let h = hash(string_value("a"), float_range(0.0, 1.0).unwrap(), IntegerType::exact(1));
        assert_eq!(h.generalize(), hash_of(string(), float()));
        let v = variant(vec![integer_range(1, 2).unwrap(), integer_range(5, 6).unwrap()]);
        assert!(v.generalize().ptr_eq(&integer()));
    }

    #[test]
    fn test_named_types_kept() {
        let alias = type_alias_with_body("Foo", integer_range(1, 2).unwrap());
        assert!(alias.generalize().ptr_eq(&alias));
    }
}
