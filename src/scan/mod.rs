//! Cursor abstraction shared by the netlist and VCD grammars.
//!
//! Every grammar rule is written once, generic over [`Cursor`]. Two cursors
//! exist:
//!
//! - [`TextCursor`] walks an in-memory `&str`. Text-mode entry points return
//!   the unconsumed remainder together with the matched token, or a chained
//!   [`NetlexError`](crate::error::NetlexError).
//! - [`StreamCursor`] reads from any [`BufRead`](std::io::BufRead), keeping
//!   only a rewind window of the bytes read since the last completed rule.
//!   [`TokenStream`] drives it and reports success as `Option<String>`.
//!
//! A rule that fails always rewinds the cursor to where it started, so the
//! caller can try an alternative from the same position.

mod stream;
mod text;

pub use stream::{StreamCursor, TokenStream};
pub use text::TextCursor;

use std::fmt::Display;

use crate::error::{NetlexError, Result};
use crate::DIAGNOSTIC_SNIPPET_LIMIT;

/// An opaque read position that a cursor can rewind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mark(pub(crate) usize);

/// Character-level access to an input, with rewind.
pub trait Cursor {
    /// Look at the next character without consuming it.
    fn peek(&mut self) -> Option<char>;

    /// Consume and return the next character.
    fn bump(&mut self) -> Option<char>;

    /// The current read position.
    fn mark(&self) -> Mark;

    /// Rewind (or fast-forward) to a position previously returned by `mark`.
    fn reset(&mut self, mark: Mark);

    /// Input text available from `from` onwards, clipped for diagnostics.
    fn snippet(&mut self, from: Mark) -> String;

    /// Input text from the current position, clipped for diagnostics.
    fn snippet_here(&mut self) -> String {
        let here = self.mark();
        self.snippet(here)
    }

    /// True when no input remains.
    fn is_exhausted(&mut self) -> bool {
        self.peek().is_none()
    }
}

/// A grammar rule that renders its match as a normalized token.
///
/// This is the consumer contract shared by both modes: [`consume`] runs a
/// rule over text, [`TokenStream::consume`] runs it over a stream.
pub trait Rule {
    /// Production name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Match the rule at the cursor, returning the normalized token.
    fn apply<C: Cursor>(&self, cur: &mut C) -> Result<String>;
}

/// Run `rule` over `input`, returning `(remainder, token)`.
pub fn consume<R: Rule>(input: &str, rule: R) -> Result<(&str, String)> {
    consume_with(input, |cur| rule.apply(cur))
}

/// Run an ad-hoc rule over `input`, rendering its value as the token.
pub(crate) fn consume_with<'a, T: Display>(
    input: &'a str,
    rule: impl FnOnce(&mut TextCursor<'a>) -> Result<T>,
) -> Result<(&'a str, String)> {
    let mut cur = TextCursor::new(input);
    let value = rule(&mut cur)?;
    Ok((cur.rest(), value.to_string()))
}

/// Parse all of `token` with `rule`, for extraction from an already-matched token.
///
/// # Panics
///
/// Panics if `rule` fails or leaves anything but whitespace unconsumed.
pub(crate) fn parse_complete<'a, T>(
    token: &'a str,
    production: &'static str,
    rule: impl FnOnce(&mut TextCursor<'a>) -> Result<T>,
) -> T {
    let mut cur = TextCursor::new(token);
    let value = match rule(&mut cur) {
        Ok(value) => value,
        Err(err) => panic!("{:?} is not a valid {}: {}", token, production, err),
    };
    crate::netlist::grammar::skip_whitespace(&mut cur);
    assert!(
        cur.is_exhausted(),
        "{:?} is not a complete {}: trailing {:?}",
        token,
        production,
        cur.rest()
    );
    value
}

/// Run `body` as the named production: on failure rewind and chain context.
pub(crate) fn production<C: Cursor, T>(
    cur: &mut C,
    name: &'static str,
    body: impl FnOnce(&mut C) -> Result<T>,
) -> Result<T> {
    let start = cur.mark();
    match body(cur) {
        Ok(value) => Ok(value),
        Err(err) => {
            let input = cur.snippet(start);
            cur.reset(start);
            Err(err.context(name, input))
        }
    }
}

/// Run `body`; on failure rewind without adding context.
pub(crate) fn attempt<C: Cursor, T>(
    cur: &mut C,
    body: impl FnOnce(&mut C) -> Result<T>,
) -> Result<T> {
    let start = cur.mark();
    let result = body(cur);
    if result.is_err() {
        cur.reset(start);
    }
    result
}

/// Run an optional sub-rule: a failure means "absent".
pub(crate) fn optional<C: Cursor, T>(
    cur: &mut C,
    body: impl FnOnce(&mut C) -> Result<T>,
) -> Option<T> {
    attempt(cur, body).ok()
}

/// Consume characters while `pred` holds.
pub(crate) fn take_while<C: Cursor>(cur: &mut C, pred: impl Fn(char) -> bool) -> String {
    let mut text = String::new();
    while let Some(c) = cur.peek() {
        if !pred(c) {
            break;
        }
        text.push(c);
        cur.bump();
    }
    text
}

/// Clip text to its first line and the diagnostic length limit.
pub(crate) fn clip(text: &str) -> String {
    let text = text.trim_start();
    let line = text.lines().next().unwrap_or("");
    let mut clipped: String = line.chars().take(DIAGNOSTIC_SNIPPET_LIMIT).collect();
    if clipped.len() < text.len() {
        clipped.push_str("...");
    }
    clipped
}

/// Build the error for a rule that found no input at all.
pub(crate) fn eof(expected: &'static str) -> NetlexError {
    NetlexError::UnexpectedEof { expected }
}
