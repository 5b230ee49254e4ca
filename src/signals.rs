//! Composite signal keys: an identifier followed by an optional bit range.
//!
//! This is the contract for tools that match per-signal data by name: a key
//! is read from the start of a line, or scanned from a whitespace-separated
//! whitelist stream.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{NetlexError, Result};
use crate::netlist::grammar::{bit_range, identifier, skip_whitespace};
use crate::scan::{consume, optional, Cursor, Rule, TokenStream};

/// `Identifier [BitRange]`, rendered without a separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalKey;

impl Rule for SignalKey {
    fn name(&self) -> &'static str {
        "SignalKey"
    }

    fn apply<C: Cursor>(&self, cur: &mut C) -> Result<String> {
        let mut key = identifier(cur)?;
        if let Some(range) = optional(cur, bit_range) {
            key.push_str(&range.to_string());
        }
        skip_whitespace(cur);
        Ok(key)
    }
}

/// Read the signal key at the start of `line`; returns `(remainder, key)`.
pub fn consume_signal_key(line: &str) -> Result<(&str, String)> {
    consume(line, SignalKey)
}

/// Scan every signal key from a whitespace-separated stream, in order.
///
/// # Errors
///
/// Fails on the first text that is not a signal key, or on a read error.
pub fn scan_signal_keys<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut stream = TokenStream::new(reader);
    let mut keys = Vec::new();
    stream.consume_whitespace();
    while !stream.is_exhausted() {
        match stream.try_consume(SignalKey) {
            Ok(key) => keys.push(key),
            Err(err) => {
                stream.check_error()?;
                return Err(err);
            }
        }
    }
    stream.check_error()?;
    log::debug!("scanned {} signal keys", keys.len());
    Ok(keys)
}

/// Load a whitelist file into a set of signal keys.
pub fn read_whitelist(path: &Path) -> Result<HashSet<String>> {
    let file = File::open(path).map_err(|e| NetlexError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut whitelist = HashSet::new();
    for key in scan_signal_keys(BufReader::new(file))? {
        if !whitelist.insert(key) {
            log::warn!("duplicate whitelist entry in {}", path.display());
        }
    }
    Ok(whitelist)
}

/// Convert a simple signal name to its escaped form.
///
/// `a.b[3]` becomes `\a.b [3]` and `a.b` becomes `\a.b `; names that are
/// already escaped are returned unchanged.
pub fn escape_signal_name(name: &str) -> String {
    if name.starts_with('\\') {
        return name.to_string();
    }
    match name.rfind('[') {
        Some(pos) if name.ends_with(']') => format!("\\{} {}", &name[..pos], &name[pos..]),
        _ => format!("\\{} ", name),
    }
}
