use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location span.
///
/// All line/column values are 1-based for human-readable error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Create a zero-width span at a single position.
    pub fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, line, col)
    }

    /// Merge two spans into one that covers both.
    ///
    /// Positions order lexicographically by (line, col), so the merged
    /// span runs from the earlier start to the later end regardless of
    /// argument order.
    pub fn merge(self, other: Span) -> Span {
        let (start_line, start_col) =
            (self.start_line, self.start_col).min((other.start_line, other.start_col));
        let (end_line, end_col) =
            (self.end_line, self.end_col).max((other.end_line, other.end_col));
        Span::new(start_line, start_col, end_line, end_col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// Holds the source text of one code fragment for error reporting.
///
/// A "file" here is usually a single notebook cell; the name is a
/// synthetic label such as `<cell>`.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub source: String,
    /// Cached line start byte offsets for fast line lookup.
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Create a new source file.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            name: name.into(),
            source,
            line_starts,
        }
    }

    /// Extract a source line by 1-based line number.
    ///
    /// Returns `None` if the line number is out of range.
    pub fn line(&self, line_number: u32) -> Option<&str> {
        let idx = line_number.checked_sub(1)? as usize;
        if idx >= self.line_starts.len() {
            return None;
        }
        let start = self.line_starts[idx];
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| s.saturating_sub(1)) // strip the \n
            .unwrap_or(self.source.len());
        let line = &self.source[start..end];
        // Also strip trailing \r for CRLF
        Some(line.trim_end_matches('\r'))
    }

    /// Get the total number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_span_is_zero_width() {
        let s = Span::point(2, 7);
        assert_eq!((s.start_line, s.start_col), (2, 7));
        assert_eq!((s.end_line, s.end_col), (2, 7));
    }

    #[test]
    fn test_merge_across_lines() {
        // A list literal opened on line 1 and closed on line 2:
        // `xs = [1,` / `2]` — the merged span covers the whole literal.
        let open = Span::new(1, 6, 1, 9);
        let close = Span::new(2, 1, 2, 2);
        assert_eq!(open.merge(close), Span::new(1, 6, 2, 2));
        // Order independence.
        assert_eq!(close.merge(open), Span::new(1, 6, 2, 2));
    }

    #[test]
    fn test_merge_overlapping_on_one_line() {
        // Callee span and full-call span of `print(x)`.
        let callee = Span::new(1, 1, 1, 5);
        let call = Span::new(1, 1, 1, 8);
        assert_eq!(callee.merge(call), Span::new(1, 1, 1, 8));
    }

    #[test]
    fn test_display_is_line_colon_col() {
        assert_eq!(Span::new(3, 7, 3, 15).to_string(), "3:7");
    }

    #[test]
    fn test_cell_line_lookup() {
        let cell = SourceFile::new("cell", "x = 1\ny = x + 2\nprint(y)");
        assert_eq!(cell.line(1), Some("x = 1"));
        assert_eq!(cell.line(2), Some("y = x + 2"));
        assert_eq!(cell.line(3), Some("print(y)"));
        assert_eq!(cell.line(0), None);
        assert_eq!(cell.line(4), None);
        assert_eq!(cell.line_count(), 3);
    }

    #[test]
    fn test_cell_with_crlf_endings() {
        let cell = SourceFile::new("cell", "x = 1\r\nprint(x)\r\n");
        assert_eq!(cell.line(1), Some("x = 1"));
        assert_eq!(cell.line(2), Some("print(x)"));
    }

    #[test]
    fn test_empty_cell_is_one_blank_line() {
        let cell = SourceFile::new("cell", "");
        assert_eq!(cell.line_count(), 1);
        assert_eq!(cell.line(1), Some(""));
    }

    #[test]
    fn test_trailing_newline_adds_a_blank_line() {
        let cell = SourceFile::new("cell", "x = 1\n");
        assert_eq!(cell.line_count(), 2);
        assert_eq!(cell.line(2), Some(""));
    }
}
