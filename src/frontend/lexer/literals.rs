//! Literal scanning: numbers, quoted strings and regexps

use super::tokenizer::Lexer;
use super::tokens::TokenKind;
use crate::error::ParseError;
use crate::util::diagnostic::codes;

/// First char of a name segment
#[inline]
pub fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Char inside a name segment
#[inline]
pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<'a> Lexer<'a> {
    /// Scan an integer or float. Positioned on the first digit; `start` is on the `-` of a
    /// negative literal, which is part of the number so that `i64::MIN` can be written.
    pub(super) fn scan_number(
        &mut self,
        start: usize,
    ) -> Result<TokenKind, ParseError> {
        let sign = if self.chars.get(start) == Some(&'-') { "-" } else { "" };
        let first = self.pos;

        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('x' | 'X')) {
            self.pos += 2;
            let digits_start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            if self.pos == digits_start || self.peek().is_some_and(is_name_char) {
                return Err(self.error(
                    codes::issue(codes::LEX_HEXDIGIT_EXPECTED),
                    start,
                    self.pos + 1,
                ));
            }
            let digits: String = self.chars[digits_start..self.pos].iter().collect();
            return self.integer(&format!("{}{}", sign, digits), 16, start);
        }

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let mut is_float = false;
        if self.peek() == Some('.') {
            self.pos += 1;
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.error(codes::issue(codes::LEX_DIGIT_EXPECTED), start, self.pos));
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
            is_float = true;
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some('+' | '-')) {
                self.pos += 1;
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.error(codes::issue(codes::LEX_DIGIT_EXPECTED), start, self.pos));
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
            is_float = true;
        }
        if self.peek().is_some_and(|c| is_name_char(c) || c == '.') {
            return Err(self.error(
                codes::issue(codes::LEX_DIGIT_EXPECTED),
                start,
                self.pos + 1,
            ));
        }

        let text: String = self.chars[first..self.pos].iter().collect();
        if is_float {
            return format!("{}{}", sign, text)
                .parse::<f64>()
                .ok()
                .filter(|x| x.is_finite())
                .map(TokenKind::Float)
                .ok_or_else(|| self.error(codes::issue(codes::LEX_DIGIT_EXPECTED), start, self.pos));
        }
        if text.len() > 1 && text.starts_with('0') {
            if let Some(bad) = text.chars().position(|c| !('0'..='7').contains(&c)) {
                return Err(self.error(
                    codes::issue(codes::LEX_OCTALDIGIT_EXPECTED),
                    first + bad,
                    first + bad + 1,
                ));
            }
            return self.integer(&format!("{}{}", sign, &text[1..]), 8, start);
        }
        self.integer(&format!("{}{}", sign, text), 10, start)
    }

    /// Signed digits in `radix`. Anything that does not fit an `i64` is out of range.
    fn integer(
        &self,
        digits: &str,
        radix: u32,
        start: usize,
    ) -> Result<TokenKind, ParseError> {
        i64::from_str_radix(digits, radix).map(TokenKind::Integer).map_err(|_| {
            let literal: String = self.chars[start..self.pos].iter().collect();
            self.error(
                codes::issue(codes::LEX_INTEGER_OUT_OF_RANGE).param("value", literal),
                start,
                self.pos,
            )
        })
    }

    /// Single-quoted string. Only `\'` and `\\` are escapes.
    pub(super) fn scan_single_quoted(
        &mut self,
        start: usize,
    ) -> Result<TokenKind, ParseError> {
        let mut value = String::new();
        loop {
            match self.advance() {
                None => {
                    return Err(self.error(
                        codes::issue(codes::LEX_UNTERMINATED_STRING).param("kind", "single quoted"),
                        start,
                        self.pos,
                    ))
                }
                Some('\'') => break,
                Some('\\') => match self.peek() {
                    Some(c @ ('\'' | '\\')) => {
                        self.pos += 1;
                        value.push(c);
                    }
                    _ => value.push('\\'),
                },
                Some(c) => value.push(c),
            }
        }
        Ok(TokenKind::String(value))
    }

    /// Double-quoted string with escapes. Interpolations are kept verbatim.
    pub(super) fn scan_double_quoted(
        &mut self,
        start: usize,
    ) -> Result<TokenKind, ParseError> {
        let mut value = String::new();
        loop {
            let c = match self.advance() {
                Some(c) => c,
                None => {
                    return Err(self.error(
                        codes::issue(codes::LEX_UNTERMINATED_STRING).param("kind", "double quoted"),
                        start,
                        self.pos,
                    ))
                }
            };
            match c {
                '"' => break,
                '\\' => self.scan_escape(&mut value)?,
                '$' if self.peek() == Some('{') => {
                    let open = self.pos - 1;
                    let mut depth = 0usize;
                    value.push('$');
                    loop {
                        match self.advance() {
                            None | Some('"') => {
                                return Err(self.error(
                                    codes::issue(codes::LEX_MALFORMED_INTERPOLATION),
                                    open,
                                    self.pos,
                                ))
                            }
                            Some(c) => {
                                value.push(c);
                                match c {
                                    '{' => depth += 1,
                                    '}' => {
                                        depth -= 1;
                                        if depth == 0 {
                                            break;
                                        }
                                    }
                                    _ => {}
                                }
                            }
                        }
                    }
                }
                c => value.push(c),
            }
        }
        Ok(TokenKind::String(value))
    }

    /// Escape inside a double-quoted string; the backslash is consumed
    fn scan_escape(
        &mut self,
        value: &mut String,
    ) -> Result<(), ParseError> {
        let escape_start = self.pos - 1;
        match self.peek() {
            Some('n') => value.push('\n'),
            Some('r') => value.push('\r'),
            Some('t') => value.push('\t'),
            Some('s') => value.push(' '),
            Some(c @ ('\\' | '\'' | '"' | '$')) => value.push(c),
            Some('u') => {
                self.pos += 1;
                let c = self.scan_unicode_escape(escape_start)?;
                value.push(c);
                return Ok(());
            }
            // Unknown escapes are kept as written
            Some(c) => {
                value.push('\\');
                value.push(c);
            }
            None => {
                value.push('\\');
                return Ok(());
            }
        }
        self.pos += 1;
        Ok(())
    }

    /// `\uXXXX` or `\u{X..XXXXXX}`, positioned after the `u`
    fn scan_unicode_escape(
        &mut self,
        escape_start: usize,
    ) -> Result<char, ParseError> {
        let malformed =
            |lexer: &Self| lexer.error(codes::issue(codes::LEX_MALFORMED_UNICODE_ESCAPE), escape_start, lexer.pos);

        if self.peek() == Some('{') {
            self.pos += 1;
            let digits_start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            let count = self.pos - digits_start;
            if count == 0 || count > 6 || self.peek() != Some('}') {
                return Err(malformed(self));
            }
            let digits: String = self.chars[digits_start..self.pos].iter().collect();
            self.pos += 1;
            return u32::from_str_radix(&digits, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| malformed(self));
        }

        let first = self.scan_four_hex().ok_or_else(|| malformed(self))?;
        if (0xD800..0xDC00).contains(&first) {
            // High surrogate; a low surrogate escape must follow
            if self.peek() == Some('\\') && self.peek_at(1) == Some('u') {
                self.pos += 2;
                let second = self.scan_four_hex().ok_or_else(|| malformed(self))?;
                if (0xDC00..0xE000).contains(&second) {
                    let combined = 0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00);
                    return char::from_u32(combined).ok_or_else(|| malformed(self));
                }
            }
            return Err(malformed(self));
        }
        char::from_u32(first).ok_or_else(|| malformed(self))
    }

    fn scan_four_hex(&mut self) -> Option<u32> {
        let end = self.pos + 4;
        if end > self.chars.len() || !self.chars[self.pos..end].iter().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let digits: String = self.chars[self.pos..end].iter().collect();
        self.pos = end;
        u32::from_str_radix(&digits, 16).ok()
    }

    /// Regexp literal after the opening slash. `\/` becomes `/`, other escapes are kept.
    pub(super) fn scan_regexp(
        &mut self,
        start: usize,
    ) -> Result<TokenKind, ParseError> {
        let mut value = String::new();
        loop {
            match self.advance() {
                None | Some('\n') => {
                    return Err(self.error(
                        codes::issue(codes::LEX_UNTERMINATED_STRING).param("kind", "regexp"),
                        start,
                        self.pos,
                    ))
                }
                Some('/') => break,
                Some('\\') => match self.peek() {
                    Some('/') => {
                        self.pos += 1;
                        value.push('/');
                    }
                    Some(c) if c != '\n' => {
                        self.pos += 1;
                        value.push('\\');
                        value.push(c);
                    }
                    _ => value.push('\\'),
                },
                Some(c) => value.push(c),
            }
        }
        Ok(TokenKind::Regexp(value))
    }
}
