//! Recursive-descent rules for the structural netlist grammar.
//!
//! Every rule skips leading whitespace, matches its production and returns a
//! typed value; on failure the cursor is back where the rule started and the
//! error names the production. Trailing whitespace is left for the caller.

use super::types::{
    Binding, Element, Immediate, ModuleParameters, ParameterValue, Radix, Wrapped, WrittenRange,
};
use crate::error::{describe, NetlexError, Result};
use crate::scan::{attempt, eof, optional, production, take_while, Cursor};

pub(crate) fn is_whitespace(c: char) -> bool {
    c.is_ascii_whitespace()
}

/// Skip a run of whitespace, returning what was skipped. Never fails.
pub(crate) fn skip_whitespace<C: Cursor>(cur: &mut C) -> String {
    take_while(cur, is_whitespace)
}

/// Match exactly `expected` after optional whitespace.
pub(crate) fn char_token<C: Cursor>(cur: &mut C, expected: char) -> Result<char> {
    attempt(cur, |cur| {
        skip_whitespace(cur);
        match cur.peek() {
            Some(c) if c == expected => {
                cur.bump();
                Ok(c)
            }
            found => Err(NetlexError::unexpected_char(
                expected,
                found,
                cur.snippet_here(),
            )),
        }
    })
}

/// True if the next non-whitespace character is `c`; consumes only the whitespace.
fn next_is<C: Cursor>(cur: &mut C, c: char) -> bool {
    skip_whitespace(cur);
    cur.peek() == Some(c)
}

/// `item (',' item)*`. A comma commits to another item.
fn separated<C: Cursor, T>(
    cur: &mut C,
    mut item: impl FnMut(&mut C) -> Result<T>,
) -> Result<Vec<T>> {
    let mut items = vec![item(cur)?];
    while next_is(cur, ',') {
        cur.bump();
        items.push(item(cur)?);
    }
    Ok(items)
}

// ============ Identifiers ============

pub(crate) fn simple_identifier<C: Cursor>(cur: &mut C) -> Result<String> {
    production(cur, "SimpleIdentifier", |cur| {
        skip_whitespace(cur);
        match cur.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            Some(_) => {
                return Err(NetlexError::expected(
                    "a letter or '_'",
                    cur.snippet_here(),
                ))
            }
            None => return Err(eof("identifier")),
        }
        Ok(take_while(cur, |c| {
            c.is_ascii_alphanumeric() || c == '_' || c == '$'
        }))
    })
}

/// `\` through the next whitespace character, which stays in the token.
pub(crate) fn escaped_identifier<C: Cursor>(cur: &mut C) -> Result<String> {
    production(cur, "EscapedIdentifier", |cur| {
        skip_whitespace(cur);
        let start = cur.mark();
        if cur.peek() != Some('\\') {
            return Err(NetlexError::unexpected_char(
                '\\',
                cur.peek(),
                cur.snippet_here(),
            ));
        }
        let mut name = take_while(cur, |c| !is_whitespace(c));
        match cur.bump() {
            Some(terminator) => {
                name.push(terminator);
                Ok(name)
            }
            None => Err(NetlexError::UnterminatedEscapedIdentifier {
                input: cur.snippet(start),
            }),
        }
    })
}

pub(crate) fn identifier<C: Cursor>(cur: &mut C) -> Result<String> {
    production(cur, "Identifier", |cur| {
        if next_is(cur, '\\') {
            escaped_identifier(cur)
        } else {
            simple_identifier(cur)
        }
    })
}

pub(crate) fn identifier_list<C: Cursor>(cur: &mut C) -> Result<Vec<String>> {
    production(cur, "IdentifierList", |cur| separated(cur, identifier))
}

// ============ Literals ============

pub(crate) fn unbased_immediate<C: Cursor>(cur: &mut C) -> Result<String> {
    production(cur, "UnbasedImmediate", |cur| {
        skip_whitespace(cur);
        let digits = take_while(cur, |c| c.is_ascii_digit());
        if digits.is_empty() {
            return match cur.peek() {
                Some(_) => Err(NetlexError::expected("a decimal digit", cur.snippet_here())),
                None => Err(eof("a decimal digit")),
            };
        }
        Ok(digits)
    })
}

/// `width '<marker> digit+` in the given radix.
pub(crate) fn based_immediate<C: Cursor>(cur: &mut C, radix: Radix) -> Result<Immediate> {
    production(cur, radix.production_name(), |cur| {
        let start = cur.mark();
        let width = unbased_immediate(cur)?;
        char_token(cur, '\'')?;
        match cur.peek() {
            Some(c) if c == radix.marker() => {
                cur.bump();
            }
            found => {
                return Err(NetlexError::unexpected_char(
                    radix.marker(),
                    found,
                    cur.snippet_here(),
                ))
            }
        }
        let digits = take_while(cur, |c| radix.is_digit(c));
        if digits.is_empty() {
            return Err(NetlexError::EmptyLiteralBody {
                radix,
                input: cur.snippet(start),
            });
        }
        Ok(Immediate::Based {
            width,
            radix,
            digits,
        })
    })
}

/// `"..."` with no escape processing.
pub(crate) fn string_literal<C: Cursor>(cur: &mut C) -> Result<Immediate> {
    production(cur, "StringLiteral", |cur| {
        skip_whitespace(cur);
        let start = cur.mark();
        if cur.peek() != Some('"') {
            return Err(NetlexError::unexpected_char(
                '"',
                cur.peek(),
                cur.snippet_here(),
            ));
        }
        cur.bump();
        let text = take_while(cur, |c| c != '"');
        if cur.bump().is_none() {
            return Err(NetlexError::UnterminatedString {
                input: cur.snippet(start),
            });
        }
        Ok(Immediate::Str(text))
    })
}

/// String literal, or a digit run optionally promoted to a based literal.
pub(crate) fn immediate<C: Cursor>(cur: &mut C) -> Result<Immediate> {
    production(cur, "Immediate", |cur| {
        skip_whitespace(cur);
        match cur.peek() {
            Some('"') => return string_literal(cur),
            Some(c) if c.is_ascii_digit() => {}
            Some(_) => return Err(NetlexError::expected("a digit or '\"'", cur.snippet_here())),
            None => return Err(eof("immediate")),
        }
        let start = cur.mark();
        let digits = unbased_immediate(cur)?;
        if !next_is(cur, '\'') {
            return Ok(Immediate::Unbased(digits));
        }
        let tick = cur.mark();
        cur.bump();
        let marker = cur.peek();
        match marker.and_then(Radix::from_marker) {
            Some(radix) => {
                cur.reset(start);
                based_immediate(cur, radix)
            }
            None => Err(NetlexError::UnknownRadix {
                found: describe(marker),
                input: cur.snippet(tick),
            }),
        }
    })
}

/// `'[' digit+ [':' digit+] ']'`, bounds in written order.
pub(crate) fn bit_range<C: Cursor>(cur: &mut C) -> Result<WrittenRange> {
    production(cur, "BitRange", |cur| {
        skip_whitespace(cur);
        let start = cur.mark();
        let malformed = |cur: &mut C, reason| NetlexError::bit_range(reason, cur.snippet(start));

        if char_token(cur, '[').is_err() {
            return Err(malformed(cur, "missing '['"));
        }
        let first = bound(cur).map_err(|reason| malformed(cur, reason))?;
        let second = if next_is(cur, ':') {
            cur.bump();
            bound(cur).map_err(|reason| malformed(cur, reason))?
        } else {
            first
        };
        if char_token(cur, ']').is_err() {
            return Err(malformed(cur, "missing ']'"));
        }
        Ok(WrittenRange { first, second })
    })
}

fn bound<C: Cursor>(cur: &mut C) -> std::result::Result<u32, &'static str> {
    let digits = unbased_immediate(cur).map_err(|_| "non-numeric bound")?;
    digits.parse().map_err(|_| "bound out of range")
}

// ============ Wrapped elements ============

/// One or more `open`, the `inner` rule, then the same number of `close`.
///
/// All leading opens are taken first. If `inner` fails there, the rule fails.
/// If only the closing run falls short, one retry at depth 1 lets the
/// remaining opens belong to the inner rule.
pub(crate) fn wrapped<C: Cursor, T>(
    cur: &mut C,
    open: char,
    close: char,
    inner: impl Fn(&mut C) -> Result<T>,
) -> Result<Wrapped<T>> {
    production(cur, "WrappedElement", |cur| {
        skip_whitespace(cur);
        let first = cur.mark();
        let mut depth = 0;
        while cur.peek() == Some(open) {
            cur.bump();
            depth += 1;
            skip_whitespace(cur);
        }
        if depth == 0 {
            return Err(NetlexError::UnbalancedDelimiters {
                open,
                close,
                reason: format!("expected '{}' but found {}", open, describe(cur.peek())),
                input: cur.snippet_here(),
            });
        }

        let content = inner(cur)?;
        let closing_err = match attempt(cur, |cur| close_run(cur, open, close, depth)) {
            Ok(()) => return Ok(Wrapped { depth, inner: content }),
            Err(err) if depth == 1 => return Err(err),
            Err(err) => err,
        };

        cur.reset(first);
        cur.bump();
        attempt(cur, |cur| {
            let content = inner(cur)?;
            close_run(cur, open, close, 1)?;
            Ok(Wrapped { depth: 1, inner: content })
        })
        .map_err(|_| closing_err)
    })
}

/// `'{' ConnectedElementList '}'`; nested braces are inner concatenations.
fn concatenation<C: Cursor>(cur: &mut C) -> Result<Wrapped<Vec<Element>>> {
    production(cur, "Concatenation", |cur| {
        char_token(cur, '{')?;
        let items = connected_element_list(cur)?;
        close_run(cur, '{', '}', 1)?;
        Ok(Wrapped {
            depth: 1,
            inner: items,
        })
    })
}

fn close_run<C: Cursor>(cur: &mut C, open: char, close: char, depth: usize) -> Result<()> {
    for matched in 0..depth {
        skip_whitespace(cur);
        match cur.peek() {
            Some(c) if c == close => {
                cur.bump();
            }
            found => {
                return Err(NetlexError::UnbalancedDelimiters {
                    open,
                    close,
                    reason: format!(
                        "{} opened, {} closed, then found {}",
                        depth,
                        matched,
                        describe(found)
                    ),
                    input: cur.snippet_here(),
                })
            }
        }
    }
    Ok(())
}

// ============ Connections ============

/// Literal, `name[range]`, or `{ ... }` concatenation.
pub(crate) fn connected_element<C: Cursor>(cur: &mut C) -> Result<Element> {
    production(cur, "ConnectedElement", |cur| {
        skip_whitespace(cur);
        match cur.peek() {
            None => Err(eof("connected element")),
            Some('{') => Ok(Element::Concat(concatenation(cur)?)),
            Some(c) if c.is_ascii_digit() || c == '"' => Ok(Element::Literal(immediate(cur)?)),
            Some(_) => {
                let name = identifier(cur)?;
                let range = optional(cur, bit_range);
                Ok(Element::Net { name, range })
            }
        }
    })
}

pub(crate) fn connected_element_list<C: Cursor>(cur: &mut C) -> Result<Vec<Element>> {
    production(cur, "ConnectedElementList", |cur| {
        separated(cur, connected_element)
    })
}

/// Positional `value`, or named `.port(value)` with any parenthesis depth.
fn binding<C: Cursor, T>(
    cur: &mut C,
    value: impl Fn(&mut C) -> Result<T>,
) -> Result<Binding<T>> {
    if next_is(cur, '.') {
        cur.bump();
        let port = identifier(cur)?;
        let target = wrapped(cur, '(', ')', value)?;
        Ok(Binding {
            port: Some(port),
            target,
        })
    } else {
        Ok(Binding {
            port: None,
            target: Wrapped {
                depth: 0,
                inner: value(cur)?,
            },
        })
    }
}

pub(crate) fn connection<C: Cursor>(cur: &mut C) -> Result<Binding<Element>> {
    production(cur, "Connection", |cur| binding(cur, connected_element))
}

pub(crate) fn connection_list<C: Cursor>(cur: &mut C) -> Result<Vec<Binding<Element>>> {
    production(cur, "ConnectionList", |cur| separated(cur, connection))
}

// ============ Parameters ============

pub(crate) fn parameter_connected_element<C: Cursor>(cur: &mut C) -> Result<ParameterValue> {
    production(cur, "ParameterConnectedElement", |cur| {
        skip_whitespace(cur);
        match cur.peek() {
            None => Err(eof("parameter value")),
            Some(c) if c.is_ascii_digit() || c == '"' => Ok(ParameterValue::Literal(immediate(cur)?)),
            Some(_) => Ok(ParameterValue::Name(identifier(cur)?)),
        }
    })
}

pub(crate) fn parameter_connection<C: Cursor>(cur: &mut C) -> Result<Binding<ParameterValue>> {
    production(cur, "ParameterConnection", |cur| {
        binding(cur, parameter_connected_element)
    })
}

pub(crate) fn parameter_list<C: Cursor>(cur: &mut C) -> Result<Vec<Binding<ParameterValue>>> {
    production(cur, "ParameterList", |cur| separated(cur, parameter_connection))
}

/// `'#' '(' ParameterList ')'`.
pub(crate) fn module_parameters<C: Cursor>(cur: &mut C) -> Result<ModuleParameters> {
    production(cur, "ModuleParameters", |cur| {
        char_token(cur, '#')?;
        Ok(ModuleParameters(wrapped(cur, '(', ')', parameter_list)?))
    })
}
