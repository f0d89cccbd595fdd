//! Abstract Syntax Tree
//!
//! Equality ignores source locations, so a tree parsed from printed source compares equal to
//! the tree it was printed from.

use std::fmt;

use crate::util::names::{quote_string, regexp_literal};
use crate::util::span::Span;

/// Constant values
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Undef,
    Default,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// Function parameter: `[Type] $name [= value]`
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub type_expr: Option<Expr>,
    pub value: Option<Expr>,
    pub span: Span,
}

impl PartialEq for Parameter {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.name == other.name && self.type_expr == other.type_expr && self.value == other.value
    }
}

/// Expressions
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Literal, Span),
    /// Lowercase bare word
    Identifier(String, Span),
    /// Capitalized qualified name
    TypeName(String, Span),
    /// `type Name`
    TypeDeclaration(String, Span),
    Array(Vec<Expr>, Span),
    Hash(Vec<(Expr, Expr)>, Span),
    /// `target[params]`
    Access {
        target: Box<Expr>,
        params: Vec<Expr>,
        span: Span,
    },
    /// `lhs = rhs`
    Assignment {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
    /// `-expr` where `expr` is not a number
    Negate(Box<Expr>, Span),
    Regexp(String, Span),
    Heredoc {
        text: String,
        syntax: Option<String>,
        span: Span,
    },
    FunctionDefinition {
        name: String,
        parameters: Vec<Parameter>,
        return_type: Option<Box<Expr>>,
        body: Option<Box<Expr>>,
        span: Span,
    },
    NodeDefinition {
        host_matches: Vec<Expr>,
        parent: Option<Box<Expr>>,
        body: Option<Box<Expr>>,
        span: Span,
    },
}

impl Expr {
    /// Source location
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(_, span)
            | Expr::Identifier(_, span)
            | Expr::TypeName(_, span)
            | Expr::TypeDeclaration(_, span)
            | Expr::Array(_, span)
            | Expr::Hash(_, span)
            | Expr::Negate(_, span)
            | Expr::Regexp(_, span) => *span,
            Expr::Access { span, .. }
            | Expr::Assignment { span, .. }
            | Expr::Heredoc { span, .. }
            | Expr::FunctionDefinition { span, .. }
            | Expr::NodeDefinition { span, .. } => *span,
        }
    }

    /// Short name of the node kind, used in validation messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Literal(Literal::Integer(_) | Literal::Float(_), _) => "Number",
            Expr::Literal(Literal::String(_), _) => "String",
            Expr::Literal(Literal::Boolean(_), _) => "Boolean",
            Expr::Literal(Literal::Undef, _) => "Undef",
            Expr::Literal(Literal::Default, _) => "Default",
            Expr::Identifier(..) => "Identifier",
            Expr::TypeName(..) => "Type Name",
            Expr::TypeDeclaration(..) => "Type Declaration",
            Expr::Array(..) => "Array",
            Expr::Hash(..) => "Hash",
            Expr::Access { .. } => "Access Expression",
            Expr::Assignment { .. } => "Assignment",
            Expr::Negate(..) => "Unary Minus",
            Expr::Regexp(..) => "Regular Expression",
            Expr::Heredoc { .. } => "Heredoc",
            Expr::FunctionDefinition { .. } => "Function Definition",
            Expr::NodeDefinition { .. } => "Node Definition",
        }
    }

    pub(crate) fn constant(
        literal: Literal,
        span: Span,
    ) -> Expr {
        Expr::Literal(literal, span)
    }
}

impl PartialEq for Expr {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        use Expr::*;
        match (self, other) {
            (Literal(a, _), Literal(b, _)) => a == b,
            (Identifier(a, _), Identifier(b, _))
            | (TypeName(a, _), TypeName(b, _))
            | (TypeDeclaration(a, _), TypeDeclaration(b, _))
            | (Regexp(a, _), Regexp(b, _)) => a == b,
            (Array(a, _), Array(b, _)) => a == b,
            (Hash(a, _), Hash(b, _)) => a == b,
            (
                Access {
                    target: ta,
                    params: pa,
                    ..
                },
                Access {
                    target: tb,
                    params: pb,
                    ..
                },
            ) => ta == tb && pa == pb,
            (Assignment { lhs: la, rhs: ra, .. }, Assignment { lhs: lb, rhs: rb, .. }) => {
                la == lb && ra == rb
            }
            (Negate(a, _), Negate(b, _)) => a == b,
            (
                Heredoc {
                    text: ta,
                    syntax: sa,
                    ..
                },
                Heredoc {
                    text: tb,
                    syntax: sb,
                    ..
                },
            ) => ta == tb && sa == sb,
            (
                FunctionDefinition {
                    name: na,
                    parameters: pa,
                    return_type: ra,
                    body: ba,
                    ..
                },
                FunctionDefinition {
                    name: nb,
                    parameters: pb,
                    return_type: rb,
                    body: bb,
                    ..
                },
            ) => na == nb && pa == pb && ra == rb && ba == bb,
            (
                NodeDefinition {
                    host_matches: ha,
                    parent: pa,
                    body: ba,
                    ..
                },
                NodeDefinition {
                    host_matches: hb,
                    parent: pb,
                    body: bb,
                    ..
                },
            ) => ha == hb && pa == pb && ba == bb,
            _ => false,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Literal::Undef => write!(f, "undef"),
            Literal::Default => write!(f, "default"),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Integer(n) => write!(f, "{}", n),
            // Debug keeps a fraction or exponent, so the text lexes back as a float
            Literal::Float(x) => write!(f, "{:?}", x),
            Literal::String(s) => write!(f, "{}", quote_string(s)),
        }
    }
}

fn write_list<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn write_body(
    f: &mut fmt::Formatter<'_>,
    body: &Option<Box<Expr>>,
) -> fmt::Result {
    match body {
        Some(body) => write!(f, " {{ {} }}", body),
        None => write!(f, " {{ }}"),
    }
}

/// Heredoc end tag that does not occur in the text
fn heredoc_tag(text: &str) -> String {
    let mut tag = "END".to_string();
    let mut n = 0;
    while text.contains(&tag) {
        n += 1;
        tag = format!("END{}", n);
    }
    tag
}

impl fmt::Display for Parameter {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if let Some(type_expr) = &self.type_expr {
            write!(f, "{} ", type_expr)?;
        }
        write!(f, "${}", self.name)?;
        if let Some(value) = &self.value {
            write!(f, " = {}", value)?;
        }
        Ok(())
    }
}

impl fmt::Display for Expr {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Expr::Literal(literal, _) => write!(f, "{}", literal),
            Expr::Identifier(name, _) | Expr::TypeName(name, _) => write!(f, "{}", name),
            Expr::TypeDeclaration(name, _) => write!(f, "type {}", name),
            Expr::Array(elements, _) => {
                write!(f, "[")?;
                write_list(f, elements)?;
                write!(f, "]")
            }
            Expr::Hash(entries, _) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", key, value)?;
                }
                write!(f, "}}")
            }
            Expr::Access { target, params, .. } => {
                write!(f, "{}[", target)?;
                write_list(f, params)?;
                write!(f, "]")
            }
            Expr::Assignment { lhs, rhs, .. } => write!(f, "{} = {}", lhs, rhs),
            Expr::Negate(operand, _) => write!(f, "-{}", operand),
            Expr::Regexp(source, _) => write!(f, "{}", regexp_literal(source)),
            Expr::Heredoc { text, syntax, .. } => {
                // The body goes on the following lines; the lexer resumes on the line after the
                // end tag
                let tag = heredoc_tag(text);
                match syntax {
                    Some(syntax) => write!(f, "@({}:{})", tag, syntax)?,
                    None => write!(f, "@({})", tag)?,
                }
                write!(f, "\n{}\n|-{}\n", text, tag)
            }
            Expr::FunctionDefinition {
                name,
                parameters,
                return_type,
                body,
                ..
            } => {
                write!(f, "function {}(", name)?;
                write_list(f, parameters)?;
                write!(f, ")")?;
                if let Some(return_type) = return_type {
                    write!(f, " >> {}", return_type)?;
                }
                write_body(f, body)
            }
            Expr::NodeDefinition {
                host_matches,
                parent,
                body,
                ..
            } => {
                write!(f, "node ")?;
                write_list(f, host_matches)?;
                if let Some(parent) = parent {
                    write!(f, " inherits {}", parent)?;
                }
                write_body(f, body)
            }
        }
    }
}
