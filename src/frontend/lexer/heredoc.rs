//! Heredoc scanning
//!
//! `@(TAG[:syntax][/flags])` opens a heredoc whose body starts on the line after the tag (or
//! after the body of a previous heredoc on the same line). The body ends at a line holding
//! `[|][-]TAG`, where `|` sets the margin and `-` trims the final line break.

use super::tokenizer::Lexer;
use super::tokens::TokenKind;
use crate::error::ParseError;
use crate::util::diagnostic::codes;
use crate::util::names::unindent;

/// Escape flags accepted after `/`
const ESCAPE_FLAGS: &str = "tnrs$L";

/// Parsed `@(...)` declaration
#[derive(Debug, Default)]
struct HeredocSpec {
    tag: Option<String>,
    syntax: Option<String>,
    flags: Option<String>,
}

/// Terminator line match
struct Terminator {
    /// Offset of the first char of the terminator line
    line_start: usize,
    /// Margin width when `|` is present
    margin: usize,
    trim: bool,
    /// Offset of the line after the terminator
    next_line: usize,
}

impl<'a> Lexer<'a> {
    /// Positioned just after `@(`
    pub(super) fn scan_heredoc(
        &mut self,
        start: usize,
    ) -> Result<TokenKind, ParseError> {
        let spec = self.scan_heredoc_spec(start)?;
        let tag = spec.tag.clone().unwrap_or_default();
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(self.error(codes::issue(codes::LEX_HEREDOC_EMPTY_TAG), start, self.pos));
        }

        let body_start = match self.heredoc_resume {
            Some(resume) => resume,
            None => match self.chars[self.pos..].iter().position(|&c| c == '\n') {
                Some(nl) => self.pos + nl + 1,
                None => {
                    return Err(self.error(
                        codes::issue(codes::LEX_HEREDOC_UNTERMINATED),
                        start,
                        self.pos,
                    ))
                }
            },
        };

        let terminator = self.find_terminator(body_start, tag).ok_or_else(|| {
            self.error(codes::issue(codes::LEX_HEREDOC_UNTERMINATED), start, self.pos)
        })?;
        self.heredoc_resume = Some(terminator.next_line);

        let raw: String = self.chars[body_start..terminator.line_start].iter().collect();
        let mut text = if terminator.margin > 0 {
            unindent(&raw, terminator.margin)
        } else {
            raw
        };
        if terminator.trim {
            if text.ends_with('\n') {
                text.pop();
            }
            if text.ends_with('\r') {
                text.pop();
            }
        }
        if let Some(flags) = &spec.flags {
            text = apply_escapes(&text, flags);
        }

        tracing::trace!(tag, chars = text.chars().count(), "heredoc");
        Ok(TokenKind::Heredoc {
            text,
            syntax: spec.syntax,
        })
    }

    fn scan_heredoc_spec(
        &mut self,
        start: usize,
    ) -> Result<HeredocSpec, ParseError> {
        let mut spec = HeredocSpec::default();
        let mut unquoted = String::new();
        let unterminated =
            |lexer: &Self| lexer.error(codes::issue(codes::LEX_HEREDOC_DECL_UNTERMINATED), start, lexer.pos);

        loop {
            let c = match self.peek() {
                None | Some('\n') => return Err(unterminated(self)),
                Some(c) => c,
            };
            match c {
                ')' => {
                    self.pos += 1;
                    break;
                }
                '"' => {
                    if spec.tag.is_some() || !unquoted.trim().is_empty() {
                        return Err(self.error(
                            codes::issue(codes::LEX_HEREDOC_MULTIPLE_TAG),
                            start,
                            self.pos + 1,
                        ));
                    }
                    self.pos += 1;
                    let mut tag = String::new();
                    loop {
                        match self.advance() {
                            None | Some('\n') => return Err(unterminated(self)),
                            Some('"') => break,
                            Some(c) => tag.push(c),
                        }
                    }
                    spec.tag = Some(tag);
                }
                ':' => {
                    if spec.syntax.is_some() {
                        return Err(self.error(
                            codes::issue(codes::LEX_HEREDOC_MULTIPLE_SYNTAX),
                            start,
                            self.pos + 1,
                        ));
                    }
                    self.pos += 1;
                    let mut syntax = String::new();
                    while let Some(c) = self.peek().filter(|c| !matches!(c, ')' | '/' | ':' | '"' | '\n')) {
                        syntax.push(c);
                        self.pos += 1;
                    }
                    spec.syntax = Some(syntax.trim().to_string());
                }
                '/' => {
                    if spec.flags.is_some() {
                        return Err(self.error(
                            codes::issue(codes::LEX_HEREDOC_MULTIPLE_ESCAPE),
                            start,
                            self.pos + 1,
                        ));
                    }
                    self.pos += 1;
                    let mut flags = String::new();
                    while let Some(c) = self.peek().filter(|c| !matches!(c, ')' | '/' | ':' | '"' | '\n')) {
                        if c.is_whitespace() {
                            self.pos += 1;
                            continue;
                        }
                        if !ESCAPE_FLAGS.contains(c) {
                            return Err(self.error(
                                codes::issue(codes::LEX_HEREDOC_ILLEGAL_ESCAPE).param("flag", c.to_string()),
                                self.pos,
                                self.pos + 1,
                            ));
                        }
                        if flags.contains(c) {
                            return Err(self.error(
                                codes::issue(codes::LEX_HEREDOC_MULTIPLE_ESCAPE),
                                self.pos,
                                self.pos + 1,
                            ));
                        }
                        flags.push(c);
                        self.pos += 1;
                    }
                    // A bare `/` turns on every escape
                    spec.flags = Some(if flags.is_empty() {
                        ESCAPE_FLAGS.to_string()
                    } else {
                        flags
                    });
                }
                c => {
                    if spec.tag.is_some() && !c.is_whitespace() {
                        return Err(self.error(
                            codes::issue(codes::LEX_HEREDOC_MULTIPLE_TAG),
                            start,
                            self.pos + 1,
                        ));
                    }
                    if (spec.syntax.is_some() || spec.flags.is_some()) && !c.is_whitespace() {
                        return Err(unterminated(self));
                    }
                    unquoted.push(c);
                    self.pos += 1;
                }
            }
        }

        if spec.tag.is_none() {
            spec.tag = Some(unquoted.trim().to_string());
        }
        Ok(spec)
    }

    /// First line at or after `from` that terminates the heredoc
    fn find_terminator(
        &self,
        from: usize,
        tag: &str,
    ) -> Option<Terminator> {
        let mut line_start = from;
        while line_start < self.chars.len() {
            if let Some(terminator) = self.match_terminator(line_start, tag) {
                return Some(terminator);
            }
            let nl = self.chars[line_start..].iter().position(|&c| c == '\n')?;
            line_start += nl + 1;
        }
        None
    }

    fn match_terminator(
        &self,
        line_start: usize,
        tag: &str,
    ) -> Option<Terminator> {
        let mut p = self.skip_blanks_and_comments(line_start)?;
        let mut margin = 0;
        let mut trim = false;
        if self.chars.get(p) == Some(&'|') {
            margin = p - line_start;
            p = self.skip_blanks(p + 1);
        }
        if self.chars.get(p) == Some(&'-') {
            trim = true;
            p = self.skip_blanks(p + 1);
        }
        if !self.starts_with_at(p, tag) {
            return None;
        }
        p = self.skip_blanks(p + tag.chars().count());
        while self.chars.get(p) == Some(&'\r') {
            p += 1;
        }
        match self.chars.get(p) {
            None => Some(Terminator {
                line_start,
                margin,
                trim,
                next_line: p,
            }),
            Some('\n') => Some(Terminator {
                line_start,
                margin,
                trim,
                next_line: p + 1,
            }),
            _ => None,
        }
    }

    fn skip_blanks(
        &self,
        mut p: usize,
    ) -> usize {
        while matches!(self.chars.get(p), Some(' ' | '\t')) {
            p += 1;
        }
        p
    }

    /// Skip spaces, tabs and block comments; block comments may span lines
    fn skip_blanks_and_comments(
        &self,
        mut p: usize,
    ) -> Option<usize> {
        loop {
            p = self.skip_blanks(p);
            if self.chars.get(p) == Some(&'/') && self.chars.get(p + 1) == Some(&'*') {
                p = self.block_comment_end(p)?;
                continue;
            }
            return Some(p);
        }
    }
}

/// Apply the enabled escapes. With any flag on, `\\` becomes `\`.
fn apply_escapes(
    text: &str,
    flags: &str,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let next = match chars.peek() {
            Some(&n) => n,
            None => {
                out.push('\\');
                break;
            }
        };
        let replacement = match next {
            '\\' => Some("\\"),
            't' if flags.contains('t') => Some("\t"),
            'n' if flags.contains('n') => Some("\n"),
            'r' if flags.contains('r') => Some("\r"),
            's' if flags.contains('s') => Some(" "),
            '$' if flags.contains('$') => Some("$"),
            '\n' if flags.contains('L') => Some(""),
            '\r' if flags.contains('L') => {
                chars.next();
                if chars.peek() == Some(&'\n') {
                    chars.next();
                    continue;
                }
                out.push('\\');
                out.push('\r');
                continue;
            }
            _ => None,
        };
        match replacement {
            Some(r) => {
                chars.next();
                out.push_str(r);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_escapes() {
        assert_eq!(apply_escapes("a\\tb", "t"), "a\tb");
        assert_eq!(apply_escapes("a\\tb", "n"), "a\\tb");
        assert_eq!(apply_escapes("a\\\\b", "n"), "a\\b");
        assert_eq!(apply_escapes("one\\\ntwo", "L"), "onetwo");
        assert_eq!(apply_escapes("x\\$y\\s", "$s"), "x$y ");
    }
}
