//! Token types

use std::fmt;

use crate::util::span::Span;

/// Token kind
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords
    KwType,
    KwUndef,
    KwTrue,
    KwFalse,
    KwDefault,
    KwFunction,
    KwNode,
    KwClass,
    KwUnless,
    KwElsif,
    KwInherits,

    // Names
    /// Lowercase qualified name, `foo::bar`
    Identifier(String),
    /// Capitalized qualified name, `Foo::Bar`
    TypeName(String),
    /// `$name`, stored without the sigil
    Variable(String),

    // Literals
    Integer(i64),
    Float(f64),
    /// Single or double quoted string with escapes applied
    String(String),
    /// Regexp source between the slashes
    Regexp(String),
    Heredoc {
        text: String,
        syntax: Option<String>,
    },

    // Punctuation
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Colon,
    Dot,
    At,
    Minus,
    /// `=`
    Assign,
    /// `=>`
    FatArrow,
    /// `>>`
    RShift,

    Eof,
}

impl TokenKind {
    /// Keyword for a bare word
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "type" => TokenKind::KwType,
            "undef" => TokenKind::KwUndef,
            "true" => TokenKind::KwTrue,
            "false" => TokenKind::KwFalse,
            "default" => TokenKind::KwDefault,
            "function" => TokenKind::KwFunction,
            "node" => TokenKind::KwNode,
            "class" => TokenKind::KwClass,
            "unless" => TokenKind::KwUnless,
            "elsif" => TokenKind::KwElsif,
            "inherits" => TokenKind::KwInherits,
            _ => return None,
        };
        Some(kind)
    }

    /// Short description used in error messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Identifier(name) | TokenKind::TypeName(name) => name.clone(),
            TokenKind::Variable(name) => format!("${}", name),
            TokenKind::Integer(n) => n.to_string(),
            TokenKind::Float(f) => f.to_string(),
            TokenKind::String(_) => "string".to_string(),
            TokenKind::Regexp(_) => "regexp".to_string(),
            TokenKind::Heredoc { .. } => "heredoc".to_string(),
            TokenKind::Eof => "end of input".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let text = match self {
            TokenKind::KwType => "type",
            TokenKind::KwUndef => "undef",
            TokenKind::KwTrue => "true",
            TokenKind::KwFalse => "false",
            TokenKind::KwDefault => "default",
            TokenKind::KwFunction => "function",
            TokenKind::KwNode => "node",
            TokenKind::KwClass => "class",
            TokenKind::KwUnless => "unless",
            TokenKind::KwElsif => "elsif",
            TokenKind::KwInherits => "inherits",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::At => "@",
            TokenKind::Minus => "-",
            TokenKind::Assign => "=",
            TokenKind::FatArrow => "=>",
            TokenKind::RShift => ">>",
            other => return write!(f, "{}", other.describe()),
        };
        write!(f, "{}", text)
    }
}

/// A token with its location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        span: Span,
    ) -> Self {
        Self { kind, span }
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}
