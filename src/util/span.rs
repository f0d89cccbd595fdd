//! Source location tracking
//!
//! Offsets count `char`s from the start of the source, so a span taken from the lexer can be
//! mapped back to the text without worrying about UTF-8 boundaries.

use std::fmt;

/// Source position (line, column, and char offset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    /// Char offset from start of file
    pub offset: usize,
}

impl Position {
    /// Create a new position with offset
    #[inline]
    pub fn with_offset(
        line: usize,
        column: usize,
        offset: usize,
    ) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Create a dummy position
    #[inline]
    pub fn dummy() -> Self {
        Self {
            line: 0,
            column: 0,
            offset: 0,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Source span (start position to end position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    /// Create a new span
    #[inline]
    pub fn new(
        start: Position,
        end: Position,
    ) -> Self {
        Self { start, end }
    }

    /// Create a dummy span
    #[inline]
    pub fn dummy() -> Self {
        Self {
            start: Position::dummy(),
            end: Position::dummy(),
        }
    }

    /// Check if this is a dummy span
    #[inline]
    pub fn is_dummy(&self) -> bool {
        self.start.line == 0
    }

    /// Number of chars covered by the span
    #[inline]
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    /// Check if span is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Span covering both `self` and `other`
    pub fn to(
        self,
        other: Span,
    ) -> Span {
        let start = if other.start.offset < self.start.offset {
            other.start
        } else {
            self.start
        };
        let end = if other.end.offset > self.end.offset {
            other.end
        } else {
            self.end
        };
        Span { start, end }
    }

    /// True when `other` starts exactly where this span ends
    #[inline]
    pub fn is_adjacent_to(
        &self,
        other: &Span,
    ) -> bool {
        self.end.offset == other.start.offset
    }
}

impl fmt::Display for Span {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "[{} - {}]", self.start, self.end)
    }
}

/// Source file information
///
/// Maps char offsets to line/column pairs and back to text.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File name
    pub name: String,
    /// File content
    pub content: String,
    /// Char offset of the first char of every line
    line_offsets: Vec<usize>,
    /// Total number of chars
    char_count: usize,
}

impl SourceFile {
    /// Create a new source file
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let content = content.into();
        let mut line_offsets = vec![0];
        let mut char_count = 0;
        for c in content.chars() {
            char_count += 1;
            if c == '\n' {
                line_offsets.push(char_count);
            }
        }
        Self {
            name: name.into(),
            content,
            line_offsets,
            char_count,
        }
    }

    /// Number of lines in the file
    pub fn line_count(&self) -> usize {
        self.line_offsets.len()
    }

    /// Get position from char offset
    pub fn position_from_offset(
        &self,
        offset: usize,
    ) -> Position {
        let offset = offset.min(self.char_count);
        let line = self.line_offsets.partition_point(|&o| o <= offset);
        let column = offset - self.line_offsets[line.saturating_sub(1)];
        Position::with_offset(line, column + 1, offset)
    }

    /// Get span from char range
    pub fn span_from_range(
        &self,
        start: usize,
        end: usize,
    ) -> Span {
        Span {
            start: self.position_from_offset(start),
            end: self.position_from_offset(end),
        }
    }

    /// Text of a (1-indexed) line without its line terminator
    pub fn line_text(
        &self,
        line: usize,
    ) -> Option<String> {
        let start = *self.line_offsets.get(line.checked_sub(1)?)?;
        let end = self
            .line_offsets
            .get(line)
            .copied()
            .unwrap_or(self.char_count);
        let text: String = self.content.chars().skip(start).take(end - start).collect();
        Some(text.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Get source text for a span
    pub fn source_text(
        &self,
        span: Span,
    ) -> String {
        self.content
            .chars()
            .skip(span.start.offset)
            .take(span.len())
            .collect()
    }
}

impl fmt::Display for SourceFile {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_from_offset() {
        let file = SourceFile::new("t.pp", "ab\ncd\n\nx");
        assert_eq!(file.position_from_offset(0), Position::with_offset(1, 1, 0));
        assert_eq!(file.position_from_offset(3), Position::with_offset(2, 1, 3));
        assert_eq!(file.position_from_offset(4), Position::with_offset(2, 2, 4));
        assert_eq!(file.position_from_offset(7), Position::with_offset(4, 1, 7));
    }

    #[test]
    fn test_offsets_count_chars() {
        let file = SourceFile::new("t.pp", "\u{1f452}x\ny");
        assert_eq!(file.position_from_offset(1).column, 2);
        assert_eq!(file.position_from_offset(3), Position::with_offset(2, 1, 3));
    }

    #[test]
    fn test_line_text_and_source_text() {
        let file = SourceFile::new("t.pp", "first\r\nsecond");
        assert_eq!(file.line_text(1).as_deref(), Some("first"));
        assert_eq!(file.line_text(2).as_deref(), Some("second"));
        assert_eq!(file.line_text(3), None);
        let span = file.span_from_range(7, 10);
        assert_eq!(file.source_text(span), "sec");
        assert_eq!(span.len(), 3);
    }

    #[test]
    fn test_span_to_and_adjacency() {
        let file = SourceFile::new("t.pp", "-12 x");
        let minus = file.span_from_range(0, 1);
        let num = file.span_from_range(1, 3);
        let x = file.span_from_range(4, 5);
        assert!(minus.is_adjacent_to(&num));
        assert!(!num.is_adjacent_to(&x));
        assert_eq!(minus.to(x).len(), 5);
    }
}
