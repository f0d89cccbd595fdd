//! Name and text helpers shared by the lexer, the printers and the loaders

use once_cell::sync::Lazy;
use regex::Regex;

static TYPE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]\w*(?:::[A-Z]\w*)*$").expect("type name pattern"));

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]\w*(?:::[a-z]\w*)*$").expect("identifier pattern"));

/// True for a qualified type name such as `Foo::Bar`
pub fn is_type_name(name: &str) -> bool {
    TYPE_NAME.is_match(name)
}

/// True for a qualified identifier such as `foo::bar`
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Split a qualified name on `::`
pub fn split_name(qname: &str) -> Vec<&str> {
    qname.split("::").collect()
}

/// Join name segments with `::`, starting at `start_at`
pub fn join_name(
    segments: &[&str],
    start_at: usize,
) -> String {
    segments.get(start_at..).unwrap_or_default().join("::")
}

/// Uppercase the first char and keep the rest: `foo` → `Foo`, `typeName` → `TypeName`
pub fn capitalize_segment(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Capitalize every segment of a qualified name: `foo::bar` → `Foo::Bar`
pub fn capitalize_segments(qname: &str) -> String {
    split_name(qname)
        .into_iter()
        .map(capitalize_segment)
        .collect::<Vec<_>>()
        .join("::")
}

/// Remove the heredoc margin.
///
/// On every line, whitespace is dropped while the column is below `indent_strip`. Columns count
/// chars, so a tab counts as one column.
pub fn unindent(
    text: &str,
    indent_strip: usize,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    let mut in_margin = true;
    for c in text.chars() {
        if c == '\n' {
            out.push(c);
            column = 0;
            in_margin = true;
            continue;
        }
        if in_margin && column < indent_strip && c.is_whitespace() {
            column += 1;
            continue;
        }
        in_margin = false;
        out.push(c);
        column += 1;
    }
    out
}

/// Format a regexp source as a `/…/` literal
pub fn regexp_literal(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + 2);
    out.push('/');
    for c in source.chars() {
        match c {
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '/' => out.push_str("\\/"),
            c => out.push(c),
        }
    }
    out.push('/');
    out
}

/// Format a string as a single-quoted literal
pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_patterns() {
        assert!(is_type_name("Foo::Bar_2"));
        assert!(!is_type_name("Foo::bar"));
        assert!(is_identifier("foo::bar"));
        assert!(!is_identifier("foo::Bar"));
        assert!(!is_identifier("Foo"));
    }

    #[test]
    fn test_split_and_join() {
        let segments = split_name("A::B::C");
        assert_eq!(segments, vec!["A", "B", "C"]);
        assert_eq!(join_name(&segments, 1), "B::C");
        assert_eq!(join_name(&segments, 3), "");
        assert_eq!(join_name(&segments, 7), "");
    }

    #[test]
    fn test_capitalize_segments() {
        assert_eq!(capitalize_segments("foo::bAR::x"), "Foo::BAR::X");
        assert_eq!(capitalize_segments("TypeName"), "TypeName");
        assert_eq!(capitalize_segment("typeName"), "TypeName");
        assert_eq!(capitalize_segment(""), "");
    }

    #[test]
    fn test_unindent() {
        assert_eq!(unindent("    a\n    b\n", 4), "a\nb\n");
        assert_eq!(unindent("      a\n  b\n", 4), "  a\nb\n");
        assert_eq!(unindent("\t\ta\n", 1), "\ta\n");
        assert_eq!(unindent("abc", 0), "abc");
    }

    #[test]
    fn test_regexp_literal() {
        assert_eq!(regexp_literal("a/b\\c"), "/a\\/b\\c/");
        assert_eq!(regexp_literal("\t\u{e9}"), "/\\t\u{e9}/");
    }

    #[test]
    fn test_quote_string() {
        assert_eq!(quote_string("it's"), "'it\\'s'");
        assert_eq!(quote_string("a\\b"), "'a\\\\b'");
    }
}
