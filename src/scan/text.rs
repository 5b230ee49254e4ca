//! In-memory cursor over a string slice.

use super::{clip, Cursor, Mark};

/// Cursor over a `&str`; marks are byte offsets.
#[derive(Debug, Clone)]
pub struct TextCursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> TextCursor<'a> {
    /// Create a cursor at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// The unconsumed remainder.
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }
}

impl Cursor for TextCursor<'_> {
    fn peek(&mut self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    fn reset(&mut self, mark: Mark) {
        debug_assert!(mark.0 <= self.input.len());
        self.pos = mark.0;
    }

    fn snippet(&mut self, from: Mark) -> String {
        clip(&self.input[from.0..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_and_bump() {
        let mut cur = TextCursor::new("ab");
        assert_eq!(cur.peek(), Some('a'));
        assert_eq!(cur.bump(), Some('a'));
        assert_eq!(cur.bump(), Some('b'));
        assert_eq!(cur.bump(), None);
        assert!(cur.is_exhausted());
    }

    #[test]
    fn test_multibyte_chars() {
        let mut cur = TextCursor::new("\\µx y");
        cur.bump();
        assert_eq!(cur.bump(), Some('µ'));
        assert_eq!(cur.rest(), "x y");
    }

    #[test]
    fn test_mark_and_reset() {
        let mut cur = TextCursor::new("abc");
        cur.bump();
        let m = cur.mark();
        cur.bump();
        cur.bump();
        cur.reset(m);
        assert_eq!(cur.rest(), "bc");
        assert_eq!(cur.snippet(m), "bc");
    }
}
