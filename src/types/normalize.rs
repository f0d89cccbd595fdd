//! Variant normalization
//!
//! A union is flattened and deduplicated, then members of the same kind are merged where the
//! union of their instances can be expressed by one type:
//!
//! - enums and single-value strings merge into one enum
//! - patterns merge into one pattern
//! - integer ranges merge when they overlap or touch
//! - float, timespan and timestamp ranges merge when they overlap
//!
//! A merged type takes the position of the first member it replaces. A single remaining member
//! stands for the whole union.

use super::factory;
use super::{EnumType, FloatType, IntegerType, RegexpType, StringType, TimespanType, TimestampType, Type, TypeKind};

/// Normalize the union of `types`
pub fn normalize_variant(types: Vec<Type>) -> Type {
    let mut members = Vec::with_capacity(types.len());
    flatten_into(types, &mut members);

    if members.iter().any(|t| matches!(t.kind(), TypeKind::Any)) {
        return factory::any();
    }

    let mut distinct: Vec<Type> = Vec::with_capacity(members.len());
    for member in members {
        if !distinct.contains(&member) {
            distinct.push(member);
        }
    }

    let members = merge_enums(distinct);
    let members = merge_patterns(members);
    let members = merge_integers(members);
    let members = merge_floats(members);
    let members = merge_timespans(members);
    let members = merge_timestamps(members);

    match members.len() {
        0 => factory::variant_default(),
        1 => members.into_iter().next().unwrap_or_else(factory::variant_default),
        _ => Type::new(TypeKind::Variant(members)),
    }
}

fn flatten_into(
    types: Vec<Type>,
    out: &mut Vec<Type>,
) {
    for t in types {
        match t.kind() {
            TypeKind::Variant(members) => flatten_into(members.clone(), out),
            _ => out.push(t),
        }
    }
}

/// Replace the members selected by `selected` with `merged`, placed where the first selected
/// member was
fn replace_group(
    members: Vec<Type>,
    selected: impl Fn(&Type) -> bool,
    merged: Vec<Type>,
) -> Vec<Type> {
    let mut out = Vec::with_capacity(members.len());
    let mut merged = Some(merged);
    for member in members {
        if selected(&member) {
            if let Some(merged) = merged.take() {
                out.extend(merged);
            }
        } else {
            out.push(member);
        }
    }
    out
}

/// Merge ranges until no two results can be merged
fn merge_all<R: Copy>(
    ranges: Vec<R>,
    mergeable: impl Fn(&R, &R) -> bool,
    merge: impl Fn(&R, &R) -> R,
) -> Vec<R> {
    let mut result: Vec<R> = Vec::with_capacity(ranges.len());
    for range in ranges {
        let mut current = range;
        while let Some(index) = result.iter().position(|r| mergeable(r, &current)) {
            let other = result.remove(index);
            current = merge(&other, &current);
        }
        result.push(current);
    }
    result
}

fn is_string_value(t: &Type) -> bool {
    match t.kind() {
        TypeKind::Enum(EnumType {
            case_insensitive: false,
            ..
        }) => true,
        TypeKind::String(StringType { value: Some(_), .. }) => true,
        _ => false,
    }
}

fn merge_enums(members: Vec<Type>) -> Vec<Type> {
    let count = members.iter().filter(|t| is_string_value(t)).count();
    if count < 2 {
        return members;
    }
    let mut values = Vec::new();
    for member in &members {
        match member.kind() {
            TypeKind::Enum(EnumType {
                values: enum_values,
                case_insensitive: false,
            }) => values.extend(enum_values.iter().cloned()),
            TypeKind::String(StringType { value: Some(v), .. }) => values.push(v.clone()),
            _ => {}
        }
    }
    let merged = factory::enumeration(values, false);
    replace_group(members, is_string_value, vec![merged])
}

fn merge_patterns(members: Vec<Type>) -> Vec<Type> {
    let is_pattern = |t: &Type| matches!(t.kind(), TypeKind::Pattern(_));
    if members.iter().filter(|t| is_pattern(t)).count() < 2 {
        return members;
    }
    let mut regexps: Vec<RegexpType> = Vec::new();
    let mut matches_all = false;
    for member in &members {
        if let TypeKind::Pattern(pattern) = member.kind() {
            // An empty pattern matches every string and absorbs the others
            matches_all |= pattern.is_empty();
            regexps.extend(pattern.iter().cloned());
        }
    }
    let merged = if matches_all {
        factory::pattern_default()
    } else {
        factory::pattern(regexps)
    };
    replace_group(members, is_pattern, vec![merged])
}

fn merge_integers(members: Vec<Type>) -> Vec<Type> {
    let ranges: Vec<IntegerType> = members
        .iter()
        .filter_map(|t| match t.kind() {
            TypeKind::Integer(range) => Some(*range),
            _ => None,
        })
        .collect();
    if ranges.len() < 2 {
        return members;
    }
    let merged = merge_all(ranges, |a, b| a.is_overlap(b) || a.is_adjacent(b), IntegerType::merge);
    let merged = merged.into_iter().map(factory::integer_of).collect();
    replace_group(members, |t| matches!(t.kind(), TypeKind::Integer(_)), merged)
}

fn merge_floats(members: Vec<Type>) -> Vec<Type> {
    let ranges: Vec<FloatType> = members
        .iter()
        .filter_map(|t| match t.kind() {
            TypeKind::Float(range) => Some(*range),
            _ => None,
        })
        .collect();
    if ranges.len() < 2 {
        return members;
    }
    let merged = merge_all(ranges, FloatType::is_overlap, FloatType::merge);
    let merged = merged.into_iter().map(factory::float_of).collect();
    replace_group(members, |t| matches!(t.kind(), TypeKind::Float(_)), merged)
}

fn merge_timespans(members: Vec<Type>) -> Vec<Type> {
    let ranges: Vec<TimespanType> = members
        .iter()
        .filter_map(|t| match t.kind() {
            TypeKind::Timespan(range) => Some(*range),
            _ => None,
        })
        .collect();
    if ranges.len() < 2 {
        return members;
    }
    let merged = merge_all(ranges, TimespanType::is_overlap, TimespanType::merge);
    let merged = merged.into_iter().map(factory::timespan_of).collect();
    replace_group(members, |t| matches!(t.kind(), TypeKind::Timespan(_)), merged)
}

fn merge_timestamps(members: Vec<Type>) -> Vec<Type> {
    let ranges: Vec<TimestampType> = members
        .iter()
        .filter_map(|t| match t.kind() {
            TypeKind::Timestamp(range) => Some(*range),
            _ => None,
        })
        .collect();
    if ranges.len() < 2 {
        return members;
    }
    let merged = merge_all(ranges, TimestampType::is_overlap, TimestampType::merge);
    let merged = merged.into_iter().map(factory::timestamp_of).collect();
    replace_group(members, |t| matches!(t.kind(), TypeKind::Timestamp(_)), merged)
}
