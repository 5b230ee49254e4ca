//! Streaming cursor over a buffered reader.
//!
//! The cursor never materializes the whole input: it holds the bytes read
//! since the last [`StreamCursor::commit`], which is enough to rewind a
//! failed rule. [`TokenStream`] commits after every top-level rule.

use std::io::{self, BufRead};

use super::{clip, Cursor, Mark, Rule};
use crate::error::{NetlexError, Result};

/// Cursor over a [`BufRead`]; marks are absolute byte offsets.
pub struct StreamCursor<R> {
    reader: R,
    /// Bytes read since the last commit.
    window: Vec<u8>,
    /// Read position within `window`.
    pos: usize,
    /// Absolute offset of `window[0]`.
    base: usize,
    done: bool,
    error: Option<io::Error>,
}

impl<R: BufRead> StreamCursor<R> {
    /// Create a cursor at the current position of `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            window: Vec::new(),
            pos: 0,
            base: 0,
            done: false,
            error: None,
        }
    }

    /// Drop buffered bytes before the read position; older marks become invalid.
    pub fn commit(&mut self) {
        self.window.drain(..self.pos);
        self.base += self.pos;
        self.pos = 0;
    }

    /// Take the I/O error that ended the stream early, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Ensure at least `len` bytes are buffered; false at end of stream.
    fn fill_to(&mut self, len: usize) -> bool {
        while self.window.len() < len {
            if self.done {
                return false;
            }
            match self.reader.fill_buf() {
                Ok(buf) if buf.is_empty() => {
                    self.done = true;
                    return false;
                }
                Ok(buf) => {
                    let n = buf.len();
                    self.window.extend_from_slice(buf);
                    self.reader.consume(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.error = Some(e);
                    self.done = true;
                    return false;
                }
            }
        }
        true
    }

    /// Decode the UTF-8 character at window offset `at` and its byte width.
    fn decode_at(&mut self, at: usize) -> Option<(char, usize)> {
        if !self.fill_to(at + 1) {
            return None;
        }
        let width = utf8_width(self.window[at]);
        if width > 1 {
            self.fill_to(at + width);
        }
        let end = (at + width).min(self.window.len());
        match std::str::from_utf8(&self.window[at..end]) {
            Ok(s) => s.chars().next().map(|c| (c, end - at)),
            Err(_) => Some((char::REPLACEMENT_CHARACTER, 1)),
        }
    }
}

fn utf8_width(first: u8) -> usize {
    match first {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

impl<R: BufRead> Cursor for StreamCursor<R> {
    fn peek(&mut self) -> Option<char> {
        self.decode_at(self.pos).map(|(c, _)| c)
    }

    fn bump(&mut self) -> Option<char> {
        let (c, width) = self.decode_at(self.pos)?;
        self.pos += width;
        Some(c)
    }

    fn mark(&self) -> Mark {
        Mark(self.base + self.pos)
    }

    fn reset(&mut self, mark: Mark) {
        debug_assert!(mark.0 >= self.base, "mark precedes the committed window");
        self.pos = mark.0 - self.base;
    }

    fn snippet(&mut self, from: Mark) -> String {
        let start = from.0.saturating_sub(self.base).min(self.window.len());
        // Read ahead far enough to show the rest of the line.
        self.fill_to(start + crate::DIAGNOSTIC_SNIPPET_LIMIT);
        clip(&String::from_utf8_lossy(&self.window[start..]))
    }
}

/// Stream-mode driver: runs rules against a live stream.
///
/// Each `consume` advances the stream only on success. On failure the
/// stream is left where the attempt started and `None` is returned.
pub struct TokenStream<R> {
    cursor: StreamCursor<R>,
}

impl<R: BufRead> TokenStream<R> {
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            cursor: StreamCursor::new(reader),
        }
    }

    /// Run `rule`; `Some(token)` on success, `None` (stream unmoved) on failure.
    pub fn consume<U: Rule>(&mut self, rule: U) -> Option<String> {
        match self.try_consume(rule) {
            Ok(token) => Some(token),
            Err(err) => {
                log::trace!("stream rule failed: {}", err.root_cause());
                None
            }
        }
    }

    /// Run `rule`, keeping the chained diagnostic on failure.
    pub fn try_consume<U: Rule>(&mut self, rule: U) -> Result<String> {
        self.run(rule.name(), |cur| rule.apply(cur))
    }

    /// Run an ad-hoc rule with the same rewind-and-commit discipline.
    pub(crate) fn run<T>(
        &mut self,
        name: &'static str,
        body: impl FnOnce(&mut StreamCursor<R>) -> Result<T>,
    ) -> Result<T> {
        let start = self.cursor.mark();
        let result = body(&mut self.cursor);
        if result.is_err() {
            log::trace!("{}: rewinding stream to offset {}", name, start.0);
            self.cursor.reset(start);
        }
        self.cursor.commit();
        result
    }

    /// Skip whitespace; true if any was present.
    pub fn consume_whitespace(&mut self) -> bool {
        let skipped = !crate::netlist::grammar::skip_whitespace(&mut self.cursor).is_empty();
        self.cursor.commit();
        skipped
    }

    /// True when the stream has no more input.
    pub fn is_exhausted(&mut self) -> bool {
        self.cursor.is_exhausted()
    }

    /// Absolute byte offset of the read position.
    pub fn offset(&self) -> usize {
        self.cursor.mark().0
    }

    /// Convert a read error that ended the stream into a [`NetlexError`].
    pub fn check_error(&mut self) -> Result<()> {
        match self.cursor.take_error() {
            Some(e) => Err(NetlexError::Io(e)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor as IoCursor, Read};

    #[test]
    fn test_stream_peek_bump() {
        let mut cur = StreamCursor::new(IoCursor::new(b"ab".as_slice()));
        assert_eq!(cur.peek(), Some('a'));
        assert_eq!(cur.bump(), Some('a'));
        assert_eq!(cur.bump(), Some('b'));
        assert_eq!(cur.bump(), None);
    }

    #[test]
    fn test_stream_rewind_across_buffer_refills() {
        // A capacity-1 BufReader forces a refill for every byte.
        let reader = BufReader::with_capacity(1, "hello world".as_bytes());
        let mut cur = StreamCursor::new(reader);
        let start = cur.mark();
        for _ in 0..5 {
            cur.bump();
        }
        cur.reset(start);
        assert_eq!(cur.bump(), Some('h'));
    }

    #[test]
    fn test_stream_commit_discards_window() {
        let mut cur = StreamCursor::new(IoCursor::new(b"abcdef".as_slice()));
        cur.bump();
        cur.bump();
        cur.commit();
        assert_eq!(cur.mark(), Mark(2));
        assert_eq!(cur.peek(), Some('c'));
        assert_eq!(cur.window.len(), 4);
    }

    #[test]
    fn test_stream_utf8() {
        let reader = BufReader::with_capacity(1, "µ".as_bytes());
        let mut cur = StreamCursor::new(reader);
        assert_eq!(cur.bump(), Some('µ'));
        assert_eq!(cur.mark(), Mark(2));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn test_stream_read_error_is_reported() {
        let mut stream = TokenStream::new(BufReader::new(FailingReader));
        assert!(stream.is_exhausted());
        assert!(matches!(stream.check_error(), Err(NetlexError::Io(_))));
    }
}
