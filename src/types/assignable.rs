//! The subtype relation
//!
//! `a.is_assignable(b)` holds when every instance of `b` is an instance of `a`. The walk has two
//! parts. [`Type::guarded_assignable`] handles what is common to every kind: references,
//! aliases on either side, and unit, variant, optional and not-undef types on the right. It
//! then hands over to the per-kind rule of the left side.

use super::guard::{RecursionGuard, SELF_RECURSION_IN_BOTH, SELF_RECURSION_IN_THIS};
use super::{factory, IntegerType, Type, TypeKind as K};
use crate::values::Value;

impl Type {
    /// Every instance of `other` is an instance of `self`
    pub fn is_assignable(
        &self,
        other: &Type,
    ) -> bool {
        self.guarded_assignable(other, &mut RecursionGuard::new())
    }

    pub fn guarded_assignable(
        &self,
        other: &Type,
        guard: &mut RecursionGuard,
    ) -> bool {
        let a = self.deref();
        let b = other.deref();
        if a.ptr_eq(&b) {
            return true;
        }

        if let K::Alias(alias) = a.kind() {
            // looped back to the same comparison with only this side recursing
            if guard.state() == SELF_RECURSION_IN_THIS && guard.is_comparing(a.id(), b.id()) {
                return false;
            }
            return guard.with_pair(a.id(), b.id(), |guard| {
                guard.with_this(a.id(), |guard, state| {
                    if state == SELF_RECURSION_IN_BOTH {
                        return true;
                    }
                    match alias.body() {
                        Some(body) => body.guarded_assignable(&b, guard),
                        None => matches!(b.kind(), K::Alias(other) if other.name == alias.name),
                    }
                })
            });
        }

        if matches!(a.kind(), K::Any) {
            return true;
        }

        match b.kind() {
            K::Unit => true,
            K::Alias(alias) => guard.with_that(b.id(), |guard, state| {
                if state == SELF_RECURSION_IN_BOTH {
                    return true;
                }
                match alias.body() {
                    Some(body) => a.guarded_assignable(body, guard),
                    None => false,
                }
            }),
            K::Variant(members) => {
                matches!(a.kind(), K::Any)
                    || (!members.is_empty() && members.iter().all(|m| a.guarded_assignable(m, guard)))
            }
            K::Optional(inner) => {
                a.guarded_assignable(&factory::undef(), guard) && a.guarded_assignable(inner, guard)
            }
            K::NotUndef(inner) if !inner.guarded_assignable(&factory::undef(), guard) => {
                a.guarded_assignable(inner, guard)
            }
            _ => a.unsafe_assignable(&b, guard),
        }
    }

    /// The rule of the left kind, with `other` already dereferenced
    fn unsafe_assignable(
        &self,
        other: &Type,
        guard: &mut RecursionGuard,
    ) -> bool {
        match (self.kind(), other.kind()) {
            (K::Any | K::Unit, _) => true,
            (K::Undef, K::Undef)
            | (K::Default, K::Default)
            | (K::Boolean, K::Boolean)
            | (K::SemVerRange, K::SemVerRange) => true,
            (K::Scalar, o) => matches!(
                o,
                K::Scalar
                    | K::ScalarData
                    | K::Numeric
                    | K::Integer(_)
                    | K::Float(_)
                    | K::String(_)
                    | K::Enum(_)
                    | K::Pattern(_)
                    | K::Boolean
                    | K::Regexp(_)
                    | K::SemVer(_)
                    | K::Timespan(_)
                    | K::Timestamp(_)
            ),
            (K::ScalarData, o) => matches!(
                o,
                K::ScalarData
                    | K::Numeric
                    | K::Integer(_)
                    | K::Float(_)
                    | K::String(_)
                    | K::Enum(_)
                    | K::Pattern(_)
                    | K::Boolean
            ),
            (K::Numeric, o) => matches!(o, K::Numeric | K::Integer(_) | K::Float(_)),
            (K::Integer(r), K::Integer(o)) => r.includes(o),
            (K::Float(r), K::Float(o)) => r.includes(o),
            (K::Timespan(r), K::Timespan(o)) => r.includes(o),
            (K::Timestamp(r), K::Timestamp(o)) => r.includes(o),

            (K::String(s), o) => match (&s.value, o) {
                (Some(v), K::String(o)) => o.value.as_ref() == Some(v),
                (Some(v), K::Enum(e)) => e.values.is_empty() || (e.values.len() == 1 && &e.values[0] == v),
                (Some(_), _) => false,
                (None, K::String(o)) => s.size.includes(&o.size),
                (None, K::Enum(e)) => {
                    let lengths = e.values.iter().map(|v| v.chars().count() as i64);
                    match (lengths.clone().min(), lengths.max()) {
                        (Some(min), Some(max)) => s.size.min <= min && max <= s.size.max,
                        _ => true,
                    }
                }
                (None, K::Pattern(_)) => s.size == IntegerType::SIZE,
                _ => false,
            },
            (K::Enum(e), o) => match o {
                _ if e.values.is_empty() => matches!(o, K::Enum(x) if x.values.is_empty()),
                K::String(x) => x.value.as_deref().is_some_and(|v| e.contains(v)),
                K::Enum(x) => (e.case_insensitive || !x.case_insensitive) && x.values.iter().all(|v| e.contains(v)),
                _ => false,
            },
            (K::Pattern(regexps), o) => {
                if regexps.is_empty() {
                    return matches!(o, K::String(_) | K::Enum(_) | K::Pattern(_));
                }
                let matched = |v: &str| regexps.iter().any(|r| r.is_match(v));
                match o {
                    K::String(x) => x.value.as_deref().is_some_and(matched),
                    K::Enum(x) => x.values.iter().all(|v| matched(v)),
                    K::Pattern(x) => !x.is_empty() && x.iter().all(|r| regexps.contains(r)),
                    _ => false,
                }
            }
            (K::Regexp(r), K::Regexp(o)) => r.is_none() || r == o,

            (K::Collection(size), o) => match o {
                K::Collection(s) => size.includes(s),
                K::Array(x) => size.includes(&x.size),
                K::Hash(x) => size.includes(&x.size),
                K::Tuple(x) => size.includes(&x.size),
                K::Struct(x) => size.includes(&x.size()),
                _ => false,
            },
            (K::Array(arr), K::Array(o)) => arr.size.includes(&o.size) && arr.element.guarded_assignable(&o.element, guard),
            (K::Array(arr), K::Tuple(o)) => {
                arr.size.includes(&o.size) && o.types.iter().all(|t| arr.element.guarded_assignable(t, guard))
            }
            (K::Hash(h), K::Hash(o)) => {
                if o.size == IntegerType::exact(0) {
                    h.size.includes(&o.size)
                } else {
                    h.size.includes(&o.size)
                        && h.key.guarded_assignable(&o.key, guard)
                        && h.value.guarded_assignable(&o.value, guard)
                }
            }
            (K::Hash(h), K::Struct(o)) => {
                h.size.contains(o.elements.len() as i64)
                    && o.elements.iter().all(|e| {
                        h.key.is_instance(&Value::String(e.name.clone())) && h.value.guarded_assignable(&e.value, guard)
                    })
            }
            (K::Tuple(t), K::Tuple(o)) => {
                if !t.size.includes(&o.size) {
                    return false;
                }
                if t.types.is_empty() {
                    return true;
                }
                let positions = t.types.len().max(o.types.len());
                let positions = positions.min(usize::try_from(o.size.max).unwrap_or(usize::MAX));
                (0..positions).all(|index| {
                    let mine = t.type_at(index).cloned().unwrap_or_else(factory::any);
                    let theirs = o.type_at(index).cloned().unwrap_or_else(factory::any);
                    mine.guarded_assignable(&theirs, guard)
                })
            }
            (K::Tuple(t), K::Array(o)) => {
                if !t.size.includes(&o.size) {
                    return false;
                }
                let positions = t.types.len().min(usize::try_from(o.size.max).unwrap_or(usize::MAX));
                (0..positions).all(|index| t.types[index].guarded_assignable(&o.element, guard))
            }
            (K::Struct(s), K::Struct(o)) => {
                let mut matched = 0;
                let all = s.elements.iter().all(|e1| match o.element(&e1.name) {
                    None => e1.key.guarded_assignable(&factory::undef(), guard),
                    Some(e2) => {
                        matched += 1;
                        e1.key.guarded_assignable(&e2.key, guard) && e1.value.guarded_assignable(&e2.value, guard)
                    }
                });
                all && matched == o.elements.len()
            }
            (K::Struct(s), K::Hash(o)) => {
                let mut required = 0;
                let all = s.elements.iter().all(|e| {
                    if e.key.guarded_assignable(&factory::undef(), guard) {
                        // An optional member does not need to be provided by the hash
                        return true;
                    }
                    required += 1;
                    e.value.guarded_assignable(&o.value, guard) && e.key.generalize().guarded_assignable(&o.key, guard)
                });
                all && IntegerType {
                    min: required,
                    max: s.elements.len() as i64,
                }
                .includes(&o.size)
            }

            (K::Optional(t), _) => {
                other.guarded_assignable(&factory::undef(), guard) || t.guarded_assignable(other, guard)
            }
            (K::NotUndef(t), _) => {
                !other.guarded_assignable(&factory::undef(), guard) && t.guarded_assignable(other, guard)
            }
            (K::Variant(members), _) => members.iter().any(|m| m.guarded_assignable(other, guard)),
            (K::Callable(c), K::Callable(o)) => {
                if let Some(ret) = &c.return_type {
                    let theirs = o.return_type.clone().unwrap_or_else(factory::any);
                    if !ret.guarded_assignable(&theirs, guard) {
                        return false;
                    }
                }
                let Some(params) = &c.params else {
                    return true;
                };
                // Calls are made with this signature, so the other side must accept our
                // parameters
                match &o.params {
                    Some(theirs) if theirs.guarded_assignable(params, guard) => {}
                    _ => return false,
                }
                let mine = c.block.clone().unwrap_or_else(factory::undef);
                let theirs = o.block.clone().unwrap_or_else(factory::undef);
                theirs.guarded_assignable(&mine, guard)
            }
            (K::Iterable(t), _) => {
                if t.guarded_assignable(&factory::any(), guard) {
                    return other.is_iterable();
                }
                match other.iterable_element() {
                    Some(element) => t.guarded_assignable(&element, guard),
                    None => false,
                }
            }
            (K::Iterator(t), K::Iterator(o))
            | (K::Type(t), K::Type(o))
            | (K::Sensitive(t), K::Sensitive(o)) => t.guarded_assignable(o, guard),
            (K::SemVer(ranges), K::SemVer(o)) => {
                ranges.is_empty() || (!o.is_empty() && o.iter().all(|r| ranges.iter().any(|mine| mine.contains(r))))
            }
            (K::Resource(r), K::Resource(o)) => {
                let name_ok = match (&r.type_name, &o.type_name) {
                    (None, _) => true,
                    (Some(mine), Some(theirs)) => mine.eq_ignore_ascii_case(theirs),
                    _ => false,
                };
                name_ok
                    && match (&r.title, &o.title) {
                        (None, _) => true,
                        (Some(mine), Some(theirs)) => mine == theirs,
                        _ => false,
                    }
            }
            (K::Class(c), K::Class(o)) => c.is_none() || c == o,
            (K::Runtime(r), K::Runtime(o)) => {
                r.runtime.is_none() || (r.runtime == o.runtime && (r.name.is_none() || r.name == o.name))
            }
            (K::Object(object), K::Object(_)) => {
                if object.is_default() {
                    return true;
                }
                let mut current = Some(other.clone());
                let mut seen = Vec::new();
                while let Some(declared) = current {
                    let candidate = declared.resolved();
                    if seen.contains(&candidate.id()) {
                        break;
                    }
                    seen.push(candidate.id());
                    if self.guarded_equals(&candidate, guard) {
                        return true;
                    }
                    current = match candidate.kind() {
                        K::Object(o) => o.parent.clone(),
                        _ => None,
                    };
                }
                false
            }
            (K::TypeSet(set), K::TypeSet(_)) => set.is_default() || self.guarded_equals(other, guard),
            (K::Reference(r), K::Reference(o)) => r.name == o.name,
            _ => false,
        }
    }

    /// Whether instances of this type can be iterated
    pub fn is_iterable(&self) -> bool {
        let resolved = self.resolved();
        match resolved.kind() {
            K::Array(_)
            | K::Hash(_)
            | K::Tuple(_)
            | K::Struct(_)
            | K::Collection(_)
            | K::String(_)
            | K::Enum(_)
            | K::Iterable(_)
            | K::Iterator(_) => true,
            K::Integer(r) => r.min != i64::MIN && r.max != i64::MAX,
            K::Type(t) => matches!(t.resolved().kind(), K::Enum(_) | K::Integer(_)) && t.is_iterable(),
            _ => false,
        }
    }

    /// Type of the elements produced by iterating an instance
    pub fn iterable_element(&self) -> Option<Type> {
        let resolved = self.resolved();
        match resolved.kind() {
            K::Array(a) => Some(a.element.clone()),
            K::Hash(h) => Some(factory::tuple(vec![h.key.clone(), h.value.clone()], None)),
            K::Tuple(t) => Some(factory::variant(t.types.clone())),
            K::Struct(s) if s.elements.is_empty() => Some(factory::tuple(vec![factory::string(), factory::any()], None)),
            K::Struct(s) => Some(factory::tuple(
                vec![
                    factory::variant(s.elements.iter().map(|e| e.key.clone()).collect()),
                    factory::variant(s.elements.iter().map(|e| e.value.clone()).collect()),
                ],
                None,
            )),
            K::Collection(_) => Some(factory::any()),
            K::String(_) | K::Enum(_) => Some(factory::string()),
            K::Iterable(t) | K::Iterator(t) => Some(t.clone()),
            K::Integer(r) if r.min != i64::MIN && r.max != i64::MAX => Some(resolved.clone()),
            K::Type(t) => match t.resolved().kind() {
                K::Enum(_) => Some(factory::string()),
                K::Integer(r) if r.min != i64::MIN && r.max != i64::MAX => Some(t.clone()),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::factory::*;
    use crate::types::{TypeAlias, TypeReference};

    fn int(min: i64, max: i64) -> Type {
        integer_range(min, max).unwrap()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_integer_ranges() {
        assert!(integer().is_assignable(&int(1, 10)));
        assert!(int(0, 10).is_assignable(&int(1, 10)));
        assert!(!int(2, 10).is_assignable(&int(1, 10)));
        assert!(!int(1, 10).is_assignable(&integer()));
        assert!(numeric().is_assignable(&int(1, 10)));
        assert!(!integer().is_assignable(&float()));
    }

    #[test]
    fn test_unit_and_any() {
        assert!(any().is_assignable(&sem_ver()));
        assert!(integer().is_assignable(&unit()));
        assert!(unit().is_assignable(&string()));
        assert!(!undef().is_assignable(&integer()));
    }

    #[test]
    fn test_strings_enums_patterns() {
        let abc = enumeration(strings(&["a", "b", "c"]), false);
        let ab = enumeration(strings(&["a", "b"]), false);
        assert!(abc.is_assignable(&ab));
        assert!(!ab.is_assignable(&abc));
        assert!(abc.is_assignable(&string_value("c")));
        assert!(string().is_assignable(&abc));
        assert!(!string_sized(IntegerType::exact(2)).is_assignable(&abc));
        assert!(string_sized(IntegerType::exact(1)).is_assignable(&abc));

        let pattern_a = pattern(vec![crate::types::RegexpType::new("^a").unwrap()]);
        assert!(pattern_a.is_assignable(&string_value("abc")));
        assert!(!pattern_a.is_assignable(&string_value("bc")));
        assert!(!pattern_a.is_assignable(&string()));
        assert!(pattern_default().is_assignable(&string()));
        assert!(string().is_assignable(&pattern_a));
    }

    #[test]
    fn test_empty_enum_accepts_nothing() {
        let empty = enum_default();
        assert!(!empty.is_assignable(&string_value("a")));
        assert!(empty.is_assignable(&enum_default()));
        assert!(string_value("a").is_assignable(&empty));
    }

    #[test]
    fn test_arrays_and_tuples() {
        let arr = array(integer(), IntegerType::new(2, 8).unwrap());
        assert!(arr.is_assignable(&tuple(vec![int(1, 2), int(3, 4)], None)));
        assert!(!arr.is_assignable(&tuple(vec![int(1, 2)], None)));
        assert!(!arr.is_assignable(&tuple(vec![int(1, 2), string()], None)));

        let variadic = tuple(vec![string(), integer()], Some(IntegerType::new(1, 3).unwrap()));
        assert!(variadic.is_assignable(&tuple(vec![string(), int(1, 1), int(2, 2)], None)));
        assert!(!variadic.is_assignable(&tuple(vec![string(), string()], None)));
        assert!(tuple(vec![integer(), integer()], None).is_assignable(&array(int(0, 1), IntegerType::exact(2))));
        assert!(!tuple(vec![integer(), integer()], None).is_assignable(&array_of(integer())));
    }

    #[test]
    fn test_hash_and_struct() {
        let s = struct_type(vec![struct_member("a", integer())]);
        assert!(s.is_assignable(&hash(string(), integer(), IntegerType::exact(1))));
        assert!(!s.is_assignable(&hash(string(), integer(), IntegerType::new(0, 1).unwrap())));
        assert!(!s.is_assignable(&hash(integer(), integer(), IntegerType::exact(1))));

        let h = hash_of(string(), integer());
        assert!(h.is_assignable(&s));
        assert!(!hash_of(integer(), integer()).is_assignable(&s));
        assert!(h.is_assignable(&hash(unit(), unit(), IntegerType::exact(0))));
    }

    #[test]
    fn test_struct_members() {
        let opt = struct_type(vec![struct_member("a", integer()), struct_member("b", optional(string()))]);
        let only_a = struct_type(vec![struct_member("a", int(1, 2))]);
        let extra = struct_type(vec![struct_member("a", integer()), struct_member("c", integer())]);
        assert!(opt.is_assignable(&only_a));
        assert!(!only_a.is_assignable(&opt));
        assert!(!opt.is_assignable(&extra));
    }

    #[test]
    fn test_optional_and_not_undef() {
        let opt = optional(integer());
        assert!(opt.is_assignable(&undef()));
        assert!(opt.is_assignable(&int(1, 2)));
        assert!(opt.is_assignable(&optional(int(1, 2))));
        assert!(!integer().is_assignable(&opt));
        assert!(!opt.is_assignable(&string()));

        let nu = not_undef(optional(integer()));
        assert!(nu.is_assignable(&integer()));
        assert!(!nu.is_assignable(&undef()));
        assert!(integer().is_assignable(&not_undef(integer())));
    }

    #[test]
    fn test_variants() {
        let v = variant(vec![integer(), string()]);
        assert!(v.is_assignable(&int(1, 2)));
        assert!(v.is_assignable(&variant(vec![string(), int(1, 2)])));
        assert!(!v.is_assignable(&variant(vec![string(), float()])));
        assert!(scalar().is_assignable(&v));
        assert!(!variant_default().is_assignable(&integer()));
    }

    #[test]
    fn test_callables() {
        let params = tuple(vec![integer()], None);
        let c = callable(Some(params.clone()), None, Some(integer()));
        let wider = callable(Some(tuple(vec![numeric()], None)), None, Some(int(1, 2)));
        assert!(c.is_assignable(&wider));
        assert!(!wider.is_assignable(&c));
        assert!(callable_default().is_assignable(&c));
        let with_block = callable(Some(params), Some(callable_default()), Some(integer()));
        assert!(!c.is_assignable(&with_block));
    }

    #[test]
    fn test_iterables() {
        assert!(iterable_default().is_assignable(&array_of(integer())));
        assert!(iterable(integer()).is_assignable(&array_of(int(1, 2))));
        assert!(!iterable(string()).is_assignable(&array_of(integer())));
        assert!(iterable(integer()).is_assignable(&int(1, 10)));
        assert!(!iterable_default().is_assignable(&integer()));
    }

    #[test]
    fn test_mutually_recursive_aliases_terminate() {
        let a = Type::new(K::Alias(TypeAlias::pending("A")));
        let b = Type::new(K::Alias(TypeAlias::pending("B")));
        let ref_a = Type::new(K::Reference(TypeReference::to("A", &a)));
        let ref_b = Type::new(K::Reference(TypeReference::to("B", &b)));
        if let K::Alias(alias) = a.kind() {
            alias.set_body(variant(vec![integer(), array_of(ref_b)]));
        }
        if let K::Alias(alias) = b.kind() {
            alias.set_body(variant(vec![integer(), array_of(ref_a)]));
        }
        assert!(a.is_assignable(&b));
        assert!(b.is_assignable(&a));
        assert!(a.is_assignable(&array_of(array_of(int(1, 2)))));
        assert!(!a.is_assignable(&array_of(string())));
    }

    #[test]
    fn test_any_accepts_pending_aliases() {
        let pending = Type::new(K::Alias(TypeAlias::pending("Later")));
        assert!(any().is_assignable(&pending));
        assert!(type_default().is_instance(&Value::Type(pending.clone())));
        assert!(!type_type(integer()).is_instance(&Value::Type(pending)));
    }

    #[test]
    fn test_alias_in_its_own_variant_terminates() {
        let a = Type::new(K::Alias(TypeAlias::pending("A")));
        let ref_a = Type::new(K::Reference(TypeReference::to("A", &a)));
        if let K::Alias(alias) = a.kind() {
            alias.set_body(variant(vec![ref_a, integer()]));
        }
        assert!(!a.is_assignable(&string()));
        assert!(a.is_assignable(&int(1, 2)));
        assert!(!a.is_assignable(&optional(integer())));
    }

    #[test]
    fn test_object_parent_declared_through_alias() {
        let animal = object(crate::types::ObjectType::named("Animal"));
        let mut dog = crate::types::ObjectType::named("Dog");
        dog.parent = Some(type_alias_with_body("Animal", animal.clone()));
        let dog = object(dog);
        let mut puppy = crate::types::ObjectType::named("Puppy");
        puppy.parent = Some(type_alias_with_body("Dog", dog.clone()));
        let puppy = object(puppy);

        assert!(animal.is_assignable(&dog));
        assert!(animal.is_assignable(&puppy));
        assert!(dog.is_assignable(&puppy));
        assert!(!dog.is_assignable(&animal));
    }

    #[test]
    fn test_time_and_versions() {
        let range = crate::semver::VersionRange::parse(">=1.0.0 <2.0.0").unwrap();
        let narrow = crate::semver::VersionRange::parse("1.2.x").unwrap();
        assert!(sem_ver_of(vec![range.clone()]).is_assignable(&sem_ver_of(vec![narrow.clone()])));
        assert!(!sem_ver_of(vec![narrow]).is_assignable(&sem_ver_of(vec![range])));
        assert!(sem_ver().is_assignable(&sem_ver()));
        assert!(timespan().is_assignable(&timespan()));
    }
}
