use std::fmt;

use crate::span::Span;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl fmt::Display for Range {
    // Human-facing output is 1-based.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start.line + 1, self.start.character + 1)
    }
}

/// Maps byte offsets to line/character positions.
#[derive(Clone, Debug)]
pub struct SourceMap {
    source_len: usize,
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: &str) -> Self {
        let bytes = source.as_bytes();
        let line_starts = std::iter::once(0)
            .chain(
                bytes
                    .iter()
                    .enumerate()
                    .filter(|&(idx, &byte)| {
                        byte == b'\n' || (byte == b'\r' && bytes.get(idx + 1) != Some(&b'\n'))
                    })
                    .map(|(idx, _)| idx + 1),
            )
            .collect();
        Self {
            source_len: source.len(),
            line_starts,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source_len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        };
        Position {
            line,
            character: offset - self.line_starts[line],
        }
    }

    pub fn range(&self, span: Span) -> Range {
        Range {
            start: self.position(span.start),
            end: self.position(span.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Position, SourceMap};
    use crate::span::Span;

    #[test]
    fn offsets_map_to_lines() {
        let map = SourceMap::new("# Title\n\n- a\n");

        assert_eq!(map.line_count(), 4);
        assert_eq!(
            map.position(0),
            Position {
                line: 0,
                character: 0
            }
        );
        assert_eq!(
            map.position(11),
            Position {
                line: 2,
                character: 2
            }
        );
        assert_eq!(map.position(999).line, 3);

        let range = map.range(Span::new(9, 12));
        assert_eq!(range.start.line, 2);
        assert_eq!(range.to_string(), "3:1");
    }

    #[test]
    fn lone_carriage_returns_start_lines() {
        let map = SourceMap::new("a\rb\r\nc");

        assert_eq!(map.line_count(), 3);
        assert_eq!(map.position(2).line, 1);
        assert_eq!(map.position(5).line, 2);
    }
}
