//! Error types for the netlist and VCD lexers.
//!
//! Every failure is a [`NetlexError`]. Grammar productions that call a lower
//! production wrap its failure in [`NetlexError::Context`], so the rendered
//! message reads from the innermost cause outwards, one line per production.

use thiserror::Error;

use crate::netlist::Radix;

/// Result type alias using [`NetlexError`].
pub type Result<T> = std::result::Result<T, NetlexError>;

/// Unified error type for all lexing operations.
#[derive(Error, Debug)]
pub enum NetlexError {
    // ============ Lexing Failures ============
    /// A specific literal character was required
    #[error("Expected '{expected}' but found {found} in: {input}")]
    UnexpectedCharacter {
        expected: char,
        found: String,
        input: String,
    },

    /// Input ran out before a production could start
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },

    /// Escaped identifier without its whitespace terminator
    #[error("Escaped identifier has no trailing whitespace: {input}")]
    UnterminatedEscapedIdentifier { input: String },

    /// Based literal with no digits after the radix marker
    #[error("No {radix} digits after radix marker in: {input}")]
    EmptyLiteralBody { radix: Radix, input: String },

    /// Radix marker that is not one of b, o, d, h
    #[error("Unknown radix {found} in: {input}")]
    UnknownRadix { found: String, input: String },

    /// String literal without a closing quote
    #[error("Unterminated string literal: {input}")]
    UnterminatedString { input: String },

    /// Bit range with missing brackets or a non-numeric bound
    #[error("Malformed bit range ({reason}): {input}")]
    MalformedBitRange { reason: &'static str, input: String },

    /// Open and close delimiter counts or characters differ
    #[error("Unbalanced '{open}{close}' delimiters ({reason}): {input}")]
    UnbalancedDelimiters {
        open: char,
        close: char,
        reason: String,
        input: String,
    },

    /// A fixed keyword or tag was required
    #[error("Expected keyword '{expected}' in: {input}")]
    ExpectedKeyword { expected: String, input: String },

    /// A character class was required (digit, value, non-whitespace, ...)
    #[error("Expected {expected} in: {input}")]
    Expected { expected: &'static str, input: String },

    /// Numeric literal or width too large for its integer type
    #[error("Literal does not fit in {bits} bits: {literal}")]
    LiteralOverflow { literal: String, bits: u32 },

    /// A lower production failed while parsing `production`
    #[error("{source}\nFailed to parse {production} from: {input}")]
    Context {
        production: &'static str,
        input: String,
        #[source]
        source: Box<NetlexError>,
    },

    // ============ I/O Errors ============
    /// Error opening or reading an input file
    #[error("Failed to read '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error reading from a stream
    #[error("Stream read error: {0}")]
    Io(#[from] std::io::Error),
}

impl NetlexError {
    /// Wrap this failure as the cause of a failure in `production`.
    pub fn context(self, production: &'static str, input: impl Into<String>) -> Self {
        Self::Context {
            production,
            input: input.into(),
            source: Box::new(self),
        }
    }

    /// Create an unexpected character error
    pub fn unexpected_char(expected: char, found: Option<char>, input: impl Into<String>) -> Self {
        Self::UnexpectedCharacter {
            expected,
            found: describe(found),
            input: input.into(),
        }
    }

    /// Create a character-class error
    pub fn expected(expected: &'static str, input: impl Into<String>) -> Self {
        Self::Expected {
            expected,
            input: input.into(),
        }
    }

    /// Create a malformed bit range error
    pub fn bit_range(reason: &'static str, input: impl Into<String>) -> Self {
        Self::MalformedBitRange {
            reason,
            input: input.into(),
        }
    }

    /// The innermost failure of a context chain.
    pub fn root_cause(&self) -> &NetlexError {
        let mut err = self;
        while let NetlexError::Context { source, .. } = err {
            err = source.as_ref();
        }
        err
    }

    /// Names of the productions in the chain, outermost first.
    pub fn trail(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut err = self;
        while let NetlexError::Context {
            production, source, ..
        } = err
        {
            names.push(*production);
            err = source.as_ref();
        }
        names
    }
}

/// Render an optional character for diagnostics.
pub(crate) fn describe(c: Option<char>) -> String {
    match c {
        Some(c) if c.is_whitespace() => format!("{:?}", c),
        Some(c) => format!("'{}'", c),
        None => "end of input".to_string(),
    }
}
