//! Forward-only source position used to capture space between elements

use crate::tree::Space;

/// Paired byte and code-point offset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub byte: usize,
    pub char: usize,
}

/// Per-parse cursor over the source text
///
/// The cursor only moves forward. Requests that would move it backward, or
/// that name an inverted or out-of-bounds range, produce empty results and
/// leave the position unchanged.
#[derive(Debug)]
pub struct Cursor<'a> {
    source: &'a str,
    position: Position,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: Position::default(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Space covering `[cursor, start)`; moves the cursor to `start`
    pub fn prefix_before(&mut self, start: usize) -> Space {
        if start <= self.position.byte {
            if start < self.position.byte {
                tracing::trace!(
                    start,
                    cursor = self.position.byte,
                    "span already consumed, returning empty space"
                );
            }
            return Space::EMPTY;
        }

        match self.source.get(self.position.byte..start) {
            Some(text) => {
                let space = Space::format(text);
                self.advance_to(start);
                space
            }
            None => Space::EMPTY,
        }
    }

    /// Move to `end` without producing a space
    pub fn skip_to(&mut self, end: usize) {
        if end > self.position.byte && self.source.is_char_boundary(end) {
            self.advance_to(end);
        }
    }

    /// Raw text of `[cursor, end)`; moves the cursor to `end`
    pub fn consume_to(&mut self, end: usize) -> &'a str {
        if end <= self.position.byte {
            return "";
        }
        match self.source.get(self.position.byte..end) {
            Some(text) => {
                self.advance_to(end);
                text
            }
            None => "",
        }
    }

    /// Raw text of `[start, end)` without moving; empty for inverted ranges
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        if end <= start {
            return "";
        }
        self.source.get(start..end).unwrap_or("")
    }

    fn advance_to(&mut self, byte: usize) {
        let skipped = &self.source[self.position.byte..byte];
        self.position.char += skipped.chars().count();
        self.position.byte = byte;
    }
}
