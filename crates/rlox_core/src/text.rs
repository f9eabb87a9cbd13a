//! Source positions.
//!
//! Tokens and AST nodes remember where they came from as byte offsets.
//! Diagnostics turn those offsets into lines and columns through a
//! [`LineMap`] built from the source text.

use std::fmt;

/// A byte offset into source text.
pub type TextPos = u32;

/// A half-open `[pos, end)` byte range. Stored on every AST node.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct TextRange {
    pub pos: TextPos,
    pub end: TextPos,
}

impl TextRange {
    #[inline]
    pub fn new(pos: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= pos);
        Self { pos, end }
    }

    /// A zero-width range at `pos`, used for synthesized nodes.
    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self { pos, end: pos }
    }

    #[inline]
    pub fn len(&self) -> TextPos {
        self.end - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    /// The smallest range covering both `self` and `other`.
    pub fn cover(&self, other: TextRange) -> TextRange {
        TextRange::new(self.pos.min(other.pos), self.end.max(other.end))
    }

    #[inline]
    pub fn to_span(&self) -> TextSpan {
        TextSpan::new(self.pos, self.len())
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.pos, self.end)
    }
}

/// A start offset plus a length. This is the form diagnostics carry.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct TextSpan {
    pub start: TextPos,
    pub length: TextPos,
}

impl TextSpan {
    #[inline]
    pub fn new(start: TextPos, length: TextPos) -> Self {
        Self { start, length }
    }

    /// The end position of this span (exclusive).
    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }

    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.start && pos < self.end()
    }
}

impl From<TextRange> for TextSpan {
    fn from(range: TextRange) -> Self {
        range.to_span()
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.start, self.length)
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

/// 0-based line and column. The column counts chars, not bytes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LineAndColumn {
    pub line: u32,
    pub column: u32,
}

impl LineAndColumn {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Maps byte offsets in `text` to line/column positions.
#[derive(Debug, Clone)]
pub struct LineMap<'a> {
    text: &'a str,
    /// Byte offset at which each line begins. Always starts with 0.
    line_starts: Vec<TextPos>,
}

impl<'a> LineMap<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| (i + 1) as TextPos),
        );
        Self { text, line_starts }
    }

    /// 0-based line containing `pos`. Offsets past the end land on the last line.
    pub fn line_of(&self, pos: TextPos) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line as u32,
            Err(next) => (next - 1) as u32,
        }
    }

    /// An offset inside a multi-byte char maps to that char's column.
    pub fn line_and_column_of(&self, pos: TextPos) -> LineAndColumn {
        let line = self.line_of(pos);
        let start = self.line_starts[line as usize];
        let column = self.text[start as usize..]
            .char_indices()
            .take_while(|&(offset, c)| start + ((offset + c.len_utf8()) as TextPos) <= pos)
            .count();
        LineAndColumn::new(line, column as u32)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_to_span() {
        let range = TextRange::new(4, 9);
        let span = range.to_span();
        assert_eq!(span.start, 4);
        assert_eq!(span.length, 5);
        assert_eq!(span.end(), 9);
        assert!(span.contains(4));
        assert!(!span.contains(9));
    }

    #[test]
    fn test_range_cover() {
        let a = TextRange::new(10, 12);
        let b = TextRange::new(3, 5);
        assert_eq!(a.cover(b), TextRange::new(3, 12));
        assert!(TextRange::empty(7).is_empty());
    }

    #[test]
    fn test_line_map() {
        let map = LineMap::new("var a;\n{\n  print a;\n}");
        assert_eq!(map.line_count(), 4);
        assert_eq!(map.line_of(0), 0);
        assert_eq!(map.line_of(6), 0); // the newline itself
        assert_eq!(map.line_of(7), 1);

        let lc = map.line_and_column_of(16);
        assert_eq!(lc, LineAndColumn::new(2, 7));
    }

    #[test]
    fn test_line_map_counts_chars() {
        // `é` is two bytes
        let map = LineMap::new("x;\nvar s = \"h\u{e9}llo\"; y");
        assert_eq!(map.line_and_column_of(21), LineAndColumn::new(1, 17));
        assert_eq!(map.line_and_column_of(13), LineAndColumn::new(1, 10));
        // second byte of `é`
        assert_eq!(map.line_and_column_of(14), LineAndColumn::new(1, 10));
    }

    #[test]
    fn test_line_map_empty_text() {
        let map = LineMap::new("");
        assert_eq!(map.line_count(), 1);
        assert_eq!(map.line_and_column_of(0), LineAndColumn::new(0, 0));
    }
}
