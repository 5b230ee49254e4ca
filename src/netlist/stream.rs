//! Stream-mode netlist rules.
//!
//! Each method advances the stream past its token on success. On failure it
//! returns `None` and leaves the stream where the attempt started.

use std::io::BufRead;

use super::{CharRule, Production, Radix, WrappedRule};
use crate::scan::TokenStream;

impl<R: BufRead> TokenStream<R> {
    /// Exactly the character `c`.
    pub fn consume_char(&mut self, c: char) -> Option<String> {
        self.consume(CharRule(c))
    }

    /// A simple or escaped identifier.
    pub fn consume_identifier(&mut self) -> Option<String> {
        self.consume(Production::Identifier)
    }

    /// `[A-Za-z_][A-Za-z0-9_$]*`.
    pub fn consume_simple_identifier(&mut self) -> Option<String> {
        self.consume(Production::SimpleIdentifier)
    }

    /// `\\` up to and including the terminating whitespace.
    pub fn consume_escaped_identifier(&mut self) -> Option<String> {
        self.consume(Production::EscapedIdentifier)
    }

    /// Comma-separated identifiers.
    pub fn consume_identifier_list(&mut self) -> Option<String> {
        self.consume(Production::IdentifierList)
    }

    /// Any numeric or string literal.
    pub fn consume_immediate(&mut self) -> Option<String> {
        self.consume(Production::Immediate)
    }

    /// A decimal number with no size or radix.
    pub fn consume_unbased_immediate(&mut self) -> Option<String> {
        self.consume(Production::UnbasedImmediate)
    }

    /// A sized or unsized literal in `radix`, e.g. `8'hFF`.
    pub fn consume_based_immediate(&mut self, radix: Radix) -> Option<String> {
        self.consume(Production::BasedImmediate(radix))
    }

    /// A double-quoted string.
    pub fn consume_string_literal(&mut self) -> Option<String> {
        self.consume(Production::StringLiteral)
    }

    /// `[n]` or `[msb:lsb]`.
    pub fn consume_bit_range(&mut self) -> Option<String> {
        self.consume(Production::BitRange)
    }

    /// `inner` enclosed in matching runs of `open` and `close`.
    pub fn consume_wrapped_element(
        &mut self,
        inner: Production,
        open: char,
        close: char,
    ) -> Option<String> {
        self.consume(WrappedRule { inner, open, close })
    }

    /// A literal, a net with optional bit range, or a concatenation.
    pub fn consume_connected_element(&mut self) -> Option<String> {
        self.consume(Production::ConnectedElement)
    }

    /// Comma-separated connected elements.
    pub fn consume_connected_element_list(&mut self) -> Option<String> {
        self.consume(Production::ConnectedElementList)
    }

    /// A positional element or `.port(element)`.
    pub fn consume_connection(&mut self) -> Option<String> {
        self.consume(Production::Connection)
    }

    /// Comma-separated connections.
    pub fn consume_connection_list(&mut self) -> Option<String> {
        self.consume(Production::ConnectionList)
    }

    /// A literal or identifier parameter value.
    pub fn consume_parameter_connected_element(&mut self) -> Option<String> {
        self.consume(Production::ParameterConnectedElement)
    }

    /// A positional value or `.name(value)`.
    pub fn consume_parameter_connection(&mut self) -> Option<String> {
        self.consume(Production::ParameterConnection)
    }

    /// Comma-separated parameter connections.
    pub fn consume_parameter_list(&mut self) -> Option<String> {
        self.consume(Production::ParameterList)
    }

    /// `#(` parameter list `)`.
    pub fn consume_module_parameters(&mut self) -> Option<String> {
        self.consume(Production::ModuleParameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    fn stream(text: &str) -> TokenStream<Cursor<&[u8]>> {
        TokenStream::new(Cursor::new(text.as_bytes()))
    }

    #[test]
    fn test_stream_identifiers_in_sequence() {
        let mut s = stream("  alpha \\beta[1] gamma");
        assert_eq!(s.consume_identifier().as_deref(), Some("alpha"));
        assert_eq!(s.consume_identifier().as_deref(), Some("\\beta[1] "));
        assert_eq!(s.consume_identifier().as_deref(), Some("gamma"));
        assert!(s.is_exhausted());
    }

    #[test]
    fn test_stream_failure_leaves_position() {
        let mut s = stream("8'zF tail");
        let before = s.offset();
        assert_eq!(s.consume_immediate(), None);
        assert_eq!(s.offset(), before);
        assert_eq!(s.consume_unbased_immediate().as_deref(), Some("8"));
    }

    #[test]
    fn test_stream_connection_list_small_buffer() {
        // One-byte refills exercise the rewind window on every backtrack.
        let text = ".a({x, {y, z}}), .b((q[3:0])) ;";
        let mut s = TokenStream::new(BufReader::with_capacity(1, text.as_bytes()));
        assert_eq!(
            s.consume_connection_list().as_deref(),
            Some(".a({x, {y, z}}), .b((q[3:0]))")
        );
        assert_eq!(s.consume_char(';').as_deref(), Some(";"));
        assert!(s.is_exhausted());
    }

    #[test]
    fn test_stream_module_parameters() {
        let mut s = stream("#(.W(8)) u_core");
        assert_eq!(s.consume_module_parameters().as_deref(), Some("#(.W(8))"));
        assert_eq!(s.consume_identifier().as_deref(), Some("u_core"));
    }

    #[test]
    fn test_stream_wrapped_element() {
        let mut s = stream("((a, b))");
        assert_eq!(
            s.consume_wrapped_element(Production::IdentifierList, '(', ')')
                .as_deref(),
            Some("((a, b))")
        );
    }

    #[test]
    fn test_stream_whitespace() {
        let mut s = stream(" \n x");
        assert!(s.consume_whitespace());
        assert!(!s.consume_whitespace());
        assert_eq!(s.consume_simple_identifier().as_deref(), Some("x"));
    }
}
