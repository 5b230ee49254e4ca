//! Structural netlist grammar.
//!
//! Recognizes the connection subset of structural Verilog: identifiers,
//! literals, bit ranges, port connections and parameter bindings.
//!
//! ```text
//! Identifier           = SimpleIdentifier | EscapedIdentifier
//! SimpleIdentifier     = (letter|'_') (letter|digit|'_'|'$')*
//! EscapedIdentifier    = '\' non-whitespace* whitespace
//! IdentifierList       = Identifier (',' Identifier)*
//! Immediate            = StringLiteral | UnbasedImmediate ["'" radix digit+]
//! BitRange             = '[' digit+ [':' digit+] ']'
//! ConnectedElement     = Immediate | Identifier [BitRange] | '{' ConnectedElementList '}'
//! ConnectedElementList = ConnectedElement (',' ConnectedElement)*
//! Connection           = ConnectedElement | '.' Identifier '(' ConnectedElement ')'
//! ConnectionList       = Connection (',' Connection)*
//! ParameterConnectedElement = Immediate | Identifier
//! ParameterConnection  = ParameterConnectedElement | '.' Identifier '(' ParameterConnectedElement ')'
//! ParameterList        = ParameterConnection (',' ParameterConnection)*
//! ModuleParameters     = '#' '(' ParameterList ')'
//! ```
//!
//! Each production is available three ways: a `consume_*` function over
//! text returning `(remainder, token)`, a method on
//! [`TokenStream`](crate::scan::TokenStream) returning `Option<String>`, and
//! a [`Production`] value usable with either driver. Tokens are normalized:
//! list items are joined with `", "` and insignificant whitespace is dropped.
//!
//! ```
//! use netlex::netlist::{consume_connection, extract_connection};
//!
//! let (rest, token) = consume_connection(".clk ( sys_clk ), rst").unwrap();
//! assert_eq!(token, ".clk(sys_clk)");
//! assert_eq!(rest, ", rst");
//! assert_eq!(extract_connection(&token).as_pair(), ("clk", "sys_clk"));
//! ```

mod extract;
pub(crate) mod grammar;
mod stream;
mod types;

pub use extract::{
    extract_bit_range, extract_connected_elements, extract_connected_elements_from_list,
    extract_connection, extract_connections, extract_descriptor, extract_identifiers,
    extract_module_parameters, extract_parameter_connection, extract_parameter_connections,
    literal_to_value,
};
pub use types::{BitRange, Connection, Immediate, NetDescriptor, NumericLiteral, Radix};

use std::fmt;

use crate::error::Result;
use crate::scan::{consume, Cursor, Rule, TextCursor};
use grammar::skip_whitespace;

/// Every production of the netlist grammar, usable as a [`Rule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Production {
    Identifier,
    SimpleIdentifier,
    EscapedIdentifier,
    IdentifierList,
    Immediate,
    UnbasedImmediate,
    BasedImmediate(Radix),
    StringLiteral,
    BitRange,
    ConnectedElement,
    ConnectedElementList,
    Connection,
    ConnectionList,
    ParameterConnectedElement,
    ParameterConnection,
    ParameterList,
    ModuleParameters,
}

impl Production {
    /// All productions, in grammar order.
    pub const ALL: [Production; 20] = [
        Production::Identifier,
        Production::SimpleIdentifier,
        Production::EscapedIdentifier,
        Production::IdentifierList,
        Production::Immediate,
        Production::UnbasedImmediate,
        Production::BasedImmediate(Radix::Binary),
        Production::BasedImmediate(Radix::Octal),
        Production::BasedImmediate(Radix::Decimal),
        Production::BasedImmediate(Radix::Hex),
        Production::StringLiteral,
        Production::BitRange,
        Production::ConnectedElement,
        Production::ConnectedElementList,
        Production::Connection,
        Production::ConnectionList,
        Production::ParameterConnectedElement,
        Production::ParameterConnection,
        Production::ParameterList,
        Production::ModuleParameters,
    ];

    /// Look a production up by its grammar name, e.g. `"ConnectionList"`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Match the production and render its token, leaving trailing whitespace.
    fn token<C: Cursor>(&self, cur: &mut C) -> Result<String> {
        Ok(match self {
            Production::Identifier => grammar::identifier(cur)?,
            Production::SimpleIdentifier => grammar::simple_identifier(cur)?,
            Production::EscapedIdentifier => grammar::escaped_identifier(cur)?,
            Production::IdentifierList => join(&grammar::identifier_list(cur)?),
            Production::Immediate => grammar::immediate(cur)?.to_string(),
            Production::UnbasedImmediate => grammar::unbased_immediate(cur)?,
            Production::BasedImmediate(radix) => grammar::based_immediate(cur, *radix)?.to_string(),
            Production::StringLiteral => grammar::string_literal(cur)?.to_string(),
            Production::BitRange => grammar::bit_range(cur)?.to_string(),
            Production::ConnectedElement => grammar::connected_element(cur)?.to_string(),
            Production::ConnectedElementList => join(&grammar::connected_element_list(cur)?),
            Production::Connection => grammar::connection(cur)?.to_string(),
            Production::ConnectionList => join(&grammar::connection_list(cur)?),
            Production::ParameterConnectedElement => {
                grammar::parameter_connected_element(cur)?.to_string()
            }
            Production::ParameterConnection => grammar::parameter_connection(cur)?.to_string(),
            Production::ParameterList => join(&grammar::parameter_list(cur)?),
            Production::ModuleParameters => grammar::module_parameters(cur)?.to_string(),
        })
    }
}

impl Rule for Production {
    fn name(&self) -> &'static str {
        match self {
            Production::Identifier => "Identifier",
            Production::SimpleIdentifier => "SimpleIdentifier",
            Production::EscapedIdentifier => "EscapedIdentifier",
            Production::IdentifierList => "IdentifierList",
            Production::Immediate => "Immediate",
            Production::UnbasedImmediate => "UnbasedImmediate",
            Production::BasedImmediate(radix) => radix.production_name(),
            Production::StringLiteral => "StringLiteral",
            Production::BitRange => "BitRange",
            Production::ConnectedElement => "ConnectedElement",
            Production::ConnectedElementList => "ConnectedElementList",
            Production::Connection => "Connection",
            Production::ConnectionList => "ConnectionList",
            Production::ParameterConnectedElement => "ParameterConnectedElement",
            Production::ParameterConnection => "ParameterConnection",
            Production::ParameterList => "ParameterList",
            Production::ModuleParameters => "ModuleParameters",
        }
    }

    fn apply<C: Cursor>(&self, cur: &mut C) -> Result<String> {
        let token = self.token(cur)?;
        skip_whitespace(cur);
        Ok(token)
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single literal character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharRule(pub char);

impl Rule for CharRule {
    fn name(&self) -> &'static str {
        "Char"
    }

    fn apply<C: Cursor>(&self, cur: &mut C) -> Result<String> {
        let c = grammar::char_token(cur, self.0)?;
        skip_whitespace(cur);
        Ok(c.to_string())
    }
}

/// `inner` enclosed by one or more balanced `open`/`close` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrappedRule {
    pub inner: Production,
    pub open: char,
    pub close: char,
}

impl Rule for WrappedRule {
    fn name(&self) -> &'static str {
        "WrappedElement"
    }

    fn apply<C: Cursor>(&self, cur: &mut C) -> Result<String> {
        let group = grammar::wrapped(cur, self.open, self.close, |cur| self.inner.token(cur))?;
        skip_whitespace(cur);
        let mut token = String::new();
        token.extend(std::iter::repeat(self.open).take(group.depth));
        token.push_str(&group.inner);
        token.extend(std::iter::repeat(self.close).take(group.depth));
        Ok(token)
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============ Text-mode entry points ============

/// Skip leading whitespace; returns `(remainder, skipped)`. Never fails.
pub fn consume_whitespace_if_present(input: &str) -> (&str, String) {
    let mut cur = TextCursor::new(input);
    let skipped = skip_whitespace(&mut cur);
    (cur.rest(), skipped)
}

/// Match exactly `c` after optional whitespace.
pub fn consume_char(input: &str, c: char) -> Result<(&str, String)> {
    consume(input, CharRule(c))
}

/// A simple or escaped identifier.
pub fn consume_identifier(input: &str) -> Result<(&str, String)> {
    consume(input, Production::Identifier)
}

/// `[A-Za-z_][A-Za-z0-9_$]*`.
pub fn consume_simple_identifier(input: &str) -> Result<(&str, String)> {
    consume(input, Production::SimpleIdentifier)
}

/// The token keeps the terminating whitespace character.
pub fn consume_escaped_identifier(input: &str) -> Result<(&str, String)> {
    consume(input, Production::EscapedIdentifier)
}

/// Comma-separated identifiers.
pub fn consume_identifier_list(input: &str) -> Result<(&str, String)> {
    consume(input, Production::IdentifierList)
}

/// String literal, unbased literal, or based literal in any radix.
pub fn consume_immediate(input: &str) -> Result<(&str, String)> {
    consume(input, Production::Immediate)
}

/// A decimal number with no size or radix.
pub fn consume_unbased_immediate(input: &str) -> Result<(&str, String)> {
    consume(input, Production::UnbasedImmediate)
}

/// A based literal in exactly `radix`, e.g. `8'hFF` for [`Radix::Hex`].
pub fn consume_based_immediate(input: &str, radix: Radix) -> Result<(&str, String)> {
    consume(input, Production::BasedImmediate(radix))
}

/// A double-quoted string.
pub fn consume_string_literal(input: &str) -> Result<(&str, String)> {
    consume(input, Production::StringLiteral)
}

/// `[n]` or `[n:m]`; a two-bound range with equal bounds renders as `[n]`.
pub fn consume_bit_range(input: &str) -> Result<(&str, String)> {
    consume(input, Production::BitRange)
}

/// `inner` wrapped in balanced delimiters, e.g. `((a))`.
pub fn consume_wrapped_element(
    input: &str,
    inner: Production,
    open: char,
    close: char,
) -> Result<(&str, String)> {
    consume(input, WrappedRule { inner, open, close })
}

/// A literal, a net with optional bit range, or a concatenation.
pub fn consume_connected_element(input: &str) -> Result<(&str, String)> {
    consume(input, Production::ConnectedElement)
}

/// Comma-separated connected elements.
pub fn consume_connected_element_list(input: &str) -> Result<(&str, String)> {
    consume(input, Production::ConnectedElementList)
}

/// A positional element or `.port(element)`.
pub fn consume_connection(input: &str) -> Result<(&str, String)> {
    consume(input, Production::Connection)
}

/// Comma-separated connections.
pub fn consume_connection_list(input: &str) -> Result<(&str, String)> {
    consume(input, Production::ConnectionList)
}

/// A literal or identifier parameter value.
pub fn consume_parameter_connected_element(input: &str) -> Result<(&str, String)> {
    consume(input, Production::ParameterConnectedElement)
}

/// A positional value or `.name(value)`.
pub fn consume_parameter_connection(input: &str) -> Result<(&str, String)> {
    consume(input, Production::ParameterConnection)
}

/// Comma-separated parameter connections.
pub fn consume_parameter_list(input: &str) -> Result<(&str, String)> {
    consume(input, Production::ParameterList)
}

/// `#(...)` parameter block.
pub fn consume_module_parameters(input: &str) -> Result<(&str, String)> {
    consume(input, Production::ModuleParameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetlexError;
    use test_case::test_case;

    #[test_case("clk" ; "lowercase")]
    #[test_case("_tmp$1" ; "underscore and dollar")]
    #[test_case("Q" ; "single letter")]
    fn test_simple_identifier_consumes_all(s: &str) {
        assert_eq!(consume_identifier(s).unwrap(), ("", s.to_string()));
    }

    #[test]
    fn test_escaped_identifier() {
        let (rest, token) = consume_identifier("\\bus[3] , x").unwrap();
        assert_eq!(token, "\\bus[3] ");
        assert_eq!(rest, ", x");
        assert!(!token[..token.len() - 1].ends_with(char::is_whitespace));
    }

    #[test]
    fn test_unterminated_escaped_identifier() {
        let err = consume_identifier("\\abc").unwrap_err();
        assert!(matches!(
            err.root_cause(),
            NetlexError::UnterminatedEscapedIdentifier { .. }
        ));
        assert_eq!(err.trail(), vec!["Identifier", "EscapedIdentifier"]);
    }

    #[test]
    fn test_identifier_rejects_digit_start() {
        assert!(consume_identifier("9lives").is_err());
    }

    #[test_case("a , b" ; "spaced")]
    #[test_case("a,b" ; "tight")]
    #[test_case("a,\nb" ; "newline")]
    fn test_identifier_list_whitespace_insensitive(input: &str) {
        let (rest, token) = consume_identifier_list(input).unwrap();
        assert_eq!(rest, "");
        assert_eq!(extract_identifiers(&token), vec!["a", "b"]);
    }

    #[test]
    fn test_consume_whitespace_if_present() {
        assert_eq!(consume_whitespace_if_present(" \t\nx"), ("x", " \t\n".to_string()));
        assert_eq!(consume_whitespace_if_present("x"), ("x", String::new()));
        assert_eq!(consume_whitespace_if_present(""), ("", String::new()));
    }

    #[test]
    fn test_consume_char() {
        assert_eq!(consume_char("  , b", ',').unwrap(), ("b", ",".to_string()));
        let err = consume_char("b", ',').unwrap_err();
        assert!(matches!(err, NetlexError::UnexpectedCharacter { expected: ',', .. }));
        assert!(consume_char("", ',').is_err());
    }

    #[test_case("42", "42" ; "unbased")]
    #[test_case("8'hFF", "8'hFF" ; "hex")]
    #[test_case("4'b1010", "4'b1010" ; "binary")]
    #[test_case("6'o17", "6'o17" ; "octal")]
    #[test_case("16'd65535", "16'd65535" ; "decimal")]
    #[test_case("\"a b\"", "\"a b\"" ; "string")]
    fn test_immediate_tokens(input: &str, expected: &str) {
        assert_eq!(consume_immediate(input).unwrap(), ("", expected.to_string()));
    }

    #[test]
    fn test_unknown_radix_fails() {
        let err = consume_immediate("8'zFF").unwrap_err();
        assert!(matches!(err.root_cause(), NetlexError::UnknownRadix { .. }));
    }

    #[test]
    fn test_empty_literal_body() {
        let err = consume_immediate("4'b2").unwrap_err();
        assert!(matches!(
            err.root_cause(),
            NetlexError::EmptyLiteralBody {
                radix: Radix::Binary,
                ..
            }
        ));
    }

    #[test]
    fn test_based_immediate_per_radix() {
        assert_eq!(
            consume_based_immediate("4'b1010 rest", Radix::Binary).unwrap(),
            ("rest", "4'b1010".to_string())
        );
        // Hex digits stop at the first non-hex character.
        assert_eq!(
            consume_based_immediate("8'hFg", Radix::Hex).unwrap(),
            ("g", "8'hF".to_string())
        );
        assert!(consume_based_immediate("8'hFF", Radix::Binary).is_err());
    }

    #[test]
    fn test_unterminated_string() {
        let err = consume_string_literal("\"abc").unwrap_err();
        assert!(matches!(err.root_cause(), NetlexError::UnterminatedString { .. }));
    }

    #[test_case("[3:0]", "[3:0]" ; "descending")]
    #[test_case("[0:3]", "[0:3]" ; "ascending")]
    #[test_case("[5:5]", "[5]" ; "equal bounds collapse")]
    #[test_case("[ 7 ]", "[7]" ; "inner whitespace")]
    fn test_bit_range_tokens(input: &str, expected: &str) {
        assert_eq!(consume_bit_range(input).unwrap(), ("", expected.to_string()));
    }

    #[test]
    fn test_bit_range_missing_close() {
        let err = consume_bit_range("[3:").unwrap_err();
        assert!(matches!(err.root_cause(), NetlexError::MalformedBitRange { .. }));
    }

    #[test]
    fn test_connected_element_forms() {
        assert_eq!(
            consume_connected_element("data[7:0])").unwrap(),
            (")", "data[7:0]".to_string())
        );
        assert_eq!(
            consume_connected_element("{ a[1], 1'b0 ,b }").unwrap(),
            ("", "{a[1], 1'b0, b}".to_string())
        );
        assert_eq!(
            consume_connected_element("\"txt\"").unwrap(),
            ("", "\"txt\"".to_string())
        );
    }

    #[test]
    fn test_connection_named_and_positional() {
        assert_eq!(
            consume_connection(".clk(rst_n)").unwrap(),
            ("", ".clk(rst_n)".to_string())
        );
        assert_eq!(
            consume_connection(".d((q[0]))").unwrap(),
            ("", ".d((q[0]))".to_string())
        );
        assert_eq!(consume_connection("rst_n").unwrap(), ("", "rst_n".to_string()));
    }

    #[test]
    fn test_connection_error_trail() {
        let err = consume_connection(".clk(rst_n").unwrap_err();
        assert_eq!(err.trail()[..2], ["Connection", "WrappedElement"]);
        assert!(err.to_string().contains("Failed to parse Connection from: .clk(rst_n"));
    }

    #[test]
    fn test_connection_list() {
        let (rest, token) =
            consume_connection_list(".a(x), .b({y, z}) ;").unwrap();
        assert_eq!(token, ".a(x), .b({y, z})");
        assert_eq!(rest, ";");
    }

    #[test]
    fn test_parameter_connected_element_rejects_concat() {
        assert!(consume_parameter_connected_element("{a}").is_err());
        assert!(consume_parameter_connection(".W(data[3])").is_err());
    }

    #[test]
    fn test_module_parameters() {
        let (rest, token) =
            consume_module_parameters("#( .WIDTH(8), .NAME(\"core\") ) u0 (").unwrap();
        assert_eq!(token, "#(.WIDTH(8), .NAME(\"core\"))");
        assert_eq!(rest, "u0 (");
        assert_eq!(
            consume_module_parameters("#(4, 8'hFF)").unwrap().1,
            "#(4, 8'hFF)"
        );
    }

    #[test]
    fn test_wrapped_element_rule() {
        assert_eq!(
            consume_wrapped_element("(( a, b )) x", Production::IdentifierList, '(', ')').unwrap(),
            ("x", "((a, b))".to_string())
        );
        let err = consume_wrapped_element("((a)", Production::Identifier, '(', ')').unwrap_err();
        assert!(matches!(
            err.root_cause(),
            NetlexError::UnbalancedDelimiters { .. }
        ));
    }

    #[test]
    fn test_production_names_round_trip() {
        for production in Production::ALL {
            assert_eq!(Production::from_name(production.name()), Some(production));
        }
        assert_eq!(Production::from_name("Nope"), None);
    }
}
