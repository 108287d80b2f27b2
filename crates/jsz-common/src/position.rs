//! Line/column positions computed from byte offsets.
//!
//! Structural errors and elimination warnings are reported as `file:line:col`.
//! A `LineMap` is built once per source text and answers offset lookups with a
//! binary search over line start offsets.

use memchr::memchr_iter;
use serde::Serialize;

/// A zero-based line/column position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Position {
        Position { line, column }
    }
}

/// Line start table for a source text.
#[derive(Clone, Debug, Default)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    pub fn build(text: &str) -> LineMap {
        let bytes = text.as_bytes();
        let mut line_starts = Vec::with_capacity(bytes.len() / 32 + 1);
        line_starts.push(0);
        for nl in memchr_iter(b'\n', bytes) {
            line_starts.push(nl as u32 + 1);
        }
        LineMap { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset to a zero-based line/column.
    pub fn offset_to_position(&self, offset: u32) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        };
        let start = self.line_starts.get(line).copied().unwrap_or(0);
        Position {
            line: line as u32,
            column: offset.saturating_sub(start),
        }
    }

    /// Byte offset of the start of `line`, if the line exists.
    pub fn line_start(&self, line: u32) -> Option<u32> {
        self.line_starts.get(line as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_to_position() {
        let map = LineMap::build("ab\ncd\n\nef");
        assert_eq!(map.line_count(), 4);
        assert_eq!(map.offset_to_position(0), Position::new(0, 0));
        assert_eq!(map.offset_to_position(1), Position::new(0, 1));
        assert_eq!(map.offset_to_position(3), Position::new(1, 0));
        assert_eq!(map.offset_to_position(6), Position::new(2, 0));
        assert_eq!(map.offset_to_position(8), Position::new(3, 1));
    }

    #[test]
    fn test_line_start() {
        let map = LineMap::build("x\ny");
        assert_eq!(map.line_start(1), Some(2));
        assert_eq!(map.line_start(5), None);
    }
}
