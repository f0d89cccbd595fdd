//! Lattice properties over generated types

use proptest::prelude::*;

use super::factory::*;
use super::infer::infer;
use super::Type;
use crate::values::Value;

fn arb_integer() -> impl Strategy<Value = Type> {
    (-100i64..100, 0i64..50).prop_map(|(lo, width)| integer_range(lo, lo + width).unwrap())
}

fn arb_type() -> impl Strategy<Value = Type> {
    let leaf = prop_oneof![
        arb_integer(),
        Just(integer()),
        Just(float()),
        Just(string()),
        Just(boolean()),
        Just(undef()),
        "[a-c]{1,2}".prop_map(|s| string_value(&s)),
        prop::collection::vec("[a-c]", 1..3).prop_map(|values| enumeration(values, false)),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(array_of),
            (inner.clone(), inner.clone()).prop_map(|(k, v)| hash_of(k, v)),
            inner.clone().prop_map(optional),
            prop::collection::vec(inner.clone(), 1..4).prop_map(variant),
            prop::collection::vec(inner, 0..3).prop_map(|types| tuple(types, None)),
        ]
    })
}

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        proptest::prelude::any::<i64>().prop_map(Value::Integer),
        proptest::prelude::any::<bool>().prop_map(Value::Boolean),
        "[a-z]{0,3}".prop_map(Value::String),
        Just(Value::Undef),
    ];
    leaf.prop_recursive(2, 12, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(Value::Array),
            prop::collection::vec(("[a-c]", inner), 0..3).prop_map(Value::hash_of),
        ]
    })
}

proptest! {
    #[test]
    fn test_assignable_is_reflexive(t in arb_type()) {
        prop_assert!(t.is_assignable(&t));
        prop_assert_eq!(&t, &t.clone());
    }

    #[test]
    fn test_integer_assignable_is_transitive(a in arb_integer(), b in arb_integer(), c in arb_integer()) {
        if a.is_assignable(&b) && b.is_assignable(&c) {
            prop_assert!(a.is_assignable(&c));
        }
    }

    #[test]
    fn test_variant_normalization_is_idempotent(members in prop::collection::vec(arb_type(), 1..4)) {
        let once = variant(members);
        let twice = variant(vec![once.clone()]);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn test_generalization_widens(t in arb_type()) {
        prop_assert!(t.generalize().is_assignable(&t));
    }

    #[test]
    fn test_variant_accepts_members(members in prop::collection::vec(arb_type(), 1..4)) {
        let v = variant(members.clone());
        for m in &members {
            prop_assert!(v.is_assignable(m));
        }
    }

    #[test]
    fn test_inferred_type_accepts_value(value in arb_value()) {
        prop_assert!(infer(&value).is_instance(&value));
        prop_assert!(data().is_instance(&value));
    }
}

#[test]
fn test_integer_merge_scenarios() {
    let merged = variant(vec![integer_range(10, 20).unwrap(), integer_range(18, 28).unwrap()]);
    assert_eq!(merged, integer_range(10, 28).unwrap());
    let adjacent = variant(vec![integer_range(10, 20).unwrap(), integer_range(8, 9).unwrap()]);
    assert_eq!(adjacent, integer_range(8, 20).unwrap());
}

#[test]
fn test_struct_hash_duality() {
    let s = struct_type(vec![struct_member("a", integer())]);
    let h = hash(string(), integer(), super::IntegerType::exact(1));
    assert!(s.is_assignable(&h));
}
