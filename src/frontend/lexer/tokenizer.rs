//! Tokenizer implementation
//!
//! The lexer walks a `Vec<char>` so that offsets, spans and heredoc jumps all work in char
//! units. Heredoc bodies are read as soon as their tag is seen; the lexer remembers where the
//! body ended and skips there when it reaches the end of the tag line.

use super::literals::{is_name_char, is_name_start};
use super::tokens::{Token, TokenKind};
use crate::error::ParseError;
use crate::util::diagnostic::codes::{self, DiagnosticBuilder};
use crate::util::span::{SourceFile, Span};

/// Main lexer structure
pub struct Lexer<'a> {
    source: &'a SourceFile,
    pub(super) chars: Vec<char>,
    pub(super) pos: usize,
    /// Where scanning continues once the current line ends, when a heredoc on this line already
    /// consumed the following lines
    pub(super) heredoc_resume: Option<usize>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer for a source file
    pub fn new(source: &'a SourceFile) -> Self {
        Self {
            source,
            chars: source.content.chars().collect(),
            pos: 0,
            heredoc_resume: None,
        }
    }

    #[inline]
    pub(super) fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    #[inline]
    pub(super) fn peek_at(
        &self,
        ahead: usize,
    ) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    #[inline]
    pub(super) fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    pub(super) fn starts_with_at(
        &self,
        at: usize,
        text: &str,
    ) -> bool {
        let mut i = at;
        for c in text.chars() {
            if self.chars.get(i) != Some(&c) {
                return false;
            }
            i += 1;
        }
        true
    }

    pub(super) fn span(
        &self,
        start: usize,
        end: usize,
    ) -> Span {
        self.source.span_from_range(start, end)
    }

    /// Error covering `start..end`
    pub(super) fn error(
        &self,
        builder: DiagnosticBuilder,
        start: usize,
        end: usize,
    ) -> ParseError {
        ParseError::new(builder, &self.source.name, self.span(start, end))
    }

    fn token(
        &self,
        kind: TokenKind,
        start: usize,
    ) -> Token {
        Token::new(kind, self.span(start, self.pos))
    }

    /// Produce the next token. Returns an `Eof` token at the end of input.
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace_and_comments()?;
        let start = self.pos;
        let c = match self.advance() {
            Some(c) => c,
            None => return Ok(self.token(TokenKind::Eof, start)),
        };

        let kind = match c {
            '0'..='9' => {
                self.pos = start;
                self.scan_number(start)?
            }
            '-' if self.peek().is_some_and(|c| c.is_ascii_digit()) => self.scan_number(start)?,
            '\'' => self.scan_single_quoted(start)?,
            '"' => self.scan_double_quoted(start)?,
            '/' => self.scan_regexp(start)?,
            '$' => self.scan_variable(start)?,
            '@' if self.peek() == Some('(') => {
                self.advance();
                self.scan_heredoc(start)?
            }
            '@' => TokenKind::At,
            ':' if self.peek() == Some(':') => {
                self.advance();
                if !self.peek().is_some_and(is_name_start) {
                    return Err(self.error(
                        codes::issue(codes::LEX_DOUBLE_COLON_NOT_FOLLOWED_BY_NAME),
                        start,
                        self.pos,
                    ));
                }
                // Leading `::` marks the top scope and is not part of the name
                self.scan_name(self.pos)?
            }
            c if is_name_start(c) => {
                self.pos = start;
                self.scan_name(start)?
            }
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '.' => TokenKind::Dot,
            '-' => TokenKind::Minus,
            '=' if self.peek() == Some('>') => {
                self.advance();
                TokenKind::FatArrow
            }
            '=' => TokenKind::Assign,
            '>' if self.peek() == Some('>') => {
                self.advance();
                TokenKind::RShift
            }
            '>' | '<' | '!' | '|' | '&' | '+' | '*' | '%' | '~' | '^' | '?' => {
                return Err(self.error(
                    codes::issue(codes::LEX_INVALID_OPERATOR).param("operator", c.to_string()),
                    start,
                    self.pos,
                ))
            }
            other => {
                return Err(self.error(
                    codes::issue(codes::LEX_UNEXPECTED_TOKEN).param("token", other.to_string()),
                    start,
                    self.pos,
                ))
            }
        };
        Ok(self.token(kind, start))
    }

    /// Skip whitespace and comments. Crossing the end of a line that carried a heredoc tag jumps
    /// past that heredoc's body.
    fn skip_whitespace_and_comments(&mut self) -> Result<(), ParseError> {
        while let Some(c) = self.peek() {
            match c {
                '\n' => {
                    self.pos += 1;
                    if let Some(resume) = self.heredoc_resume.take() {
                        self.pos = resume;
                    }
                }
                ' ' | '\t' | '\r' => self.pos += 1,
                '#' => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.pos += 1;
                    }
                }
                '/' if self.peek_at(1) == Some('*') => {
                    let start = self.pos;
                    self.pos = self.block_comment_end(start).ok_or_else(|| {
                        self.error(
                            codes::issue(codes::LEX_UNTERMINATED_COMMENT),
                            start,
                            self.chars.len(),
                        )
                    })?;
                }
                '<' if self.starts_with_at(self.pos, "<%#") => {
                    let start = self.pos;
                    let mut i = start + 3;
                    loop {
                        if i >= self.chars.len() {
                            return Err(self.error(
                                codes::issue(codes::LEX_UNBALANCED_EPP_COMMENT),
                                start,
                                self.chars.len(),
                            ));
                        }
                        if self.starts_with_at(i, "%>") {
                            break;
                        }
                        i += 1;
                    }
                    self.pos = i + 2;
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Offset just past the `*/` closing the comment opened at `start`
    pub(super) fn block_comment_end(
        &self,
        start: usize,
    ) -> Option<usize> {
        let mut i = start + 2;
        while i + 1 < self.chars.len() {
            if self.chars[i] == '*' && self.chars[i + 1] == '/' {
                return Some(i + 2);
            }
            i += 1;
        }
        None
    }

    /// Scan a qualified name starting at `start`
    fn scan_name(
        &mut self,
        start: usize,
    ) -> Result<TokenKind, ParseError> {
        let mut segments: Vec<String> = Vec::new();
        loop {
            let mut segment = String::new();
            while let Some(c) = self.peek().filter(|&c| is_name_char(c)) {
                segment.push(c);
                self.pos += 1;
            }
            segments.push(segment);
            if self.starts_with_at(self.pos, "::") {
                self.pos += 2;
                if !self.peek().is_some_and(is_name_start) {
                    return Err(self.error(
                        codes::issue(codes::LEX_DOUBLE_COLON_NOT_FOLLOWED_BY_NAME),
                        self.pos - 2,
                        self.pos,
                    ));
                }
                continue;
            }
            break;
        }

        let name = segments.join("::");
        let capitalized = |s: &String| s.starts_with(|c: char| c.is_ascii_uppercase());
        if capitalized(&segments[0]) {
            if !segments.iter().all(capitalized) {
                return Err(self.error(
                    codes::issue(codes::LEX_INVALID_TYPE_NAME).param("name", name),
                    start,
                    self.pos,
                ));
            }
            return Ok(TokenKind::TypeName(name));
        }
        if !segments
            .iter()
            .all(|s| s.starts_with(|c: char| c.is_ascii_lowercase()))
        {
            return Err(self.error(
                codes::issue(codes::LEX_INVALID_NAME).param("name", name),
                start,
                self.pos,
            ));
        }
        if segments.len() == 1 {
            if let Some(keyword) = TokenKind::keyword(&name) {
                return Ok(keyword);
            }
        }
        Ok(TokenKind::Identifier(name))
    }

    /// Scan `$name` after the sigil
    fn scan_variable(
        &mut self,
        start: usize,
    ) -> Result<TokenKind, ParseError> {
        let mut name = String::new();
        if self.starts_with_at(self.pos, "::") {
            self.pos += 2;
        }
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_lowercase() || c == '_' || (!name.is_empty() && is_name_char(c)) => {
                    name.push(c);
                    self.pos += 1;
                }
                Some(':')
                    if !name.is_empty()
                        && self.peek_at(1) == Some(':')
                        && self.peek_at(2).is_some_and(|c| c.is_ascii_lowercase()) =>
                {
                    name.push_str("::");
                    self.pos += 2;
                }
                _ => break,
            }
        }
        if name.is_empty() {
            let end = (self.pos + 1).min(self.chars.len());
            return Err(self.error(codes::issue(codes::LEX_INVALID_VARIABLE_NAME), start, end));
        }
        Ok(TokenKind::Variable(name))
    }
}
