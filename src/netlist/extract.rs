//! Decomposition of already-matched tokens into structured values.
//!
//! Extraction is a post-condition step: its input must be a complete match of
//! the production being decomposed, as returned by the matching `consume_*`
//! call. Anything else is a caller bug and panics.

use super::grammar;
use super::types::{
    Binding, BitRange, Connection, Immediate, NetDescriptor, NumericLiteral,
    ParameterValue,
};
use crate::error::{NetlexError, Result};
use crate::scan::{optional, parse_complete};
use crate::DEFAULT_LITERAL_WIDTH;

fn split_binding<T: ToString>(binding: Binding<T>) -> Connection {
    Connection {
        port: binding.port,
        element: binding.target.inner.to_string(),
    }
}

/// Split a `Connection` token into its port (if named) and connected element.
///
/// # Panics
///
/// Panics if `token` is not a complete `Connection`.
pub fn extract_connection(token: &str) -> Connection {
    split_binding(parse_complete(token, "Connection", grammar::connection))
}

/// Split a `ParameterConnection` token into its port (if named) and value.
///
/// # Panics
///
/// Panics if `token` is not a complete `ParameterConnection`.
pub fn extract_parameter_connection(token: &str) -> Connection {
    split_binding(parse_complete(
        token,
        "ParameterConnection",
        grammar::parameter_connection,
    ))
}

/// Identifiers of an `IdentifierList`, in source order.
///
/// # Panics
///
/// Panics if `token` is not a complete `IdentifierList`.
pub fn extract_identifiers(token: &str) -> Vec<String> {
    parse_complete(token, "IdentifierList", grammar::identifier_list)
}

/// Leaf elements of a `ConnectedElement`, with concatenations flattened.
///
/// A non-concatenation yields itself. Leaves keep source order at every
/// nesting level, so `{a, {b, c}}` and `{{a, b}, c}` both give `[a, b, c]`.
///
/// # Panics
///
/// Panics if `token` is not a complete `ConnectedElement`.
pub fn extract_connected_elements(token: &str) -> Vec<String> {
    parse_complete(token, "ConnectedElement", grammar::connected_element).leaves()
}

/// Leaf elements of every item of a `ConnectedElementList`, flattened.
///
/// # Panics
///
/// Panics if `token` is not a complete `ConnectedElementList`.
pub fn extract_connected_elements_from_list(token: &str) -> Vec<String> {
    let mut leaves = Vec::new();
    for element in parse_complete(token, "ConnectedElementList", grammar::connected_element_list) {
        element.flatten_into(&mut leaves);
    }
    leaves
}

/// Connections of a `ConnectionList`, one per leaf element.
///
/// A connection to a concatenation expands into one entry per leaf, each
/// carrying the connection's port name.
///
/// # Panics
///
/// Panics if `token` is not a complete `ConnectionList`.
pub fn extract_connections(token: &str) -> Vec<Connection> {
    let bindings = parse_complete(token, "ConnectionList", grammar::connection_list);
    let mut connections = Vec::new();
    for binding in bindings {
        for element in binding.target.inner.leaves() {
            connections.push(Connection {
                port: binding.port.clone(),
                element,
            });
        }
    }
    connections
}

/// Bindings of a `ParameterList`, in source order.
///
/// # Panics
///
/// Panics if `token` is not a complete `ParameterList`.
pub fn extract_parameter_connections(token: &str) -> Vec<Connection> {
    parse_complete(token, "ParameterList", grammar::parameter_list)
        .into_iter()
        .map(split_binding::<ParameterValue>)
        .collect()
}

/// Bindings of a `#(...)` block, in source order.
///
/// # Panics
///
/// Panics if `token` is not a complete `ModuleParameters`.
pub fn extract_module_parameters(token: &str) -> Vec<Connection> {
    parse_complete(token, "ModuleParameters", grammar::module_parameters)
        .0
        .inner
        .into_iter()
        .map(split_binding::<ParameterValue>)
        .collect()
}

/// Normalized `(high, low)` bounds of a `BitRange`, in either written order.
///
/// # Panics
///
/// Panics if `token` is not a complete `BitRange`.
pub fn extract_bit_range(token: &str) -> BitRange {
    parse_complete(token, "BitRange", grammar::bit_range).normalized()
}

/// Decode a numeric `Immediate` into its width and value.
///
/// Unbased literals are [`DEFAULT_LITERAL_WIDTH`] bits wide. The value is not
/// truncated to the declared width.
///
/// # Errors
///
/// Returns [`NetlexError::LiteralOverflow`] if the width does not fit in a
/// `u32` or the value does not fit in a `u64`.
///
/// # Panics
///
/// Panics if `token` is not a complete `Immediate`, or is a string literal.
pub fn literal_to_value(token: &str) -> Result<NumericLiteral> {
    let overflow = |bits| NetlexError::LiteralOverflow {
        literal: token.trim().to_string(),
        bits,
    };
    match parse_complete(token, "Immediate", grammar::immediate) {
        Immediate::Unbased(digits) => Ok(NumericLiteral {
            width: DEFAULT_LITERAL_WIDTH,
            value: digits.parse().map_err(|_| overflow(64))?,
        }),
        Immediate::Based {
            width,
            radix,
            digits,
        } => Ok(NumericLiteral {
            width: width.parse().map_err(|_| overflow(32))?,
            value: u64::from_str_radix(&digits, radix.base()).map_err(|_| overflow(64))?,
        }),
        Immediate::Str(_) => panic!("string literal {:?} has no numeric value", token),
    }
}

/// Decompose a net name with an optional trailing bracket.
///
/// `uses_index` is set whenever a bracket follows the name, with the
/// normalized bounds in `bit_high`/`bit_low`. Without a bracket both bounds
/// are 0.
///
/// # Panics
///
/// Panics if `token` is not a complete `Identifier [BitRange]`.
pub fn extract_descriptor(token: &str) -> NetDescriptor {
    let (base_name, range) = parse_complete(token, "Identifier", |cur| {
        let name = grammar::identifier(cur)?;
        Ok((name, optional(cur, grammar::bit_range)))
    });
    let bits = range.map(|r| r.normalized());
    NetDescriptor {
        raw_name: token.to_string(),
        uses_index: bits.is_some(),
        bit_high: bits.map_or(0, |b| b.high),
        bit_low: bits.map_or(0, |b| b.low),
        base_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist::consume_connection;
    use test_case::test_case;

    #[test]
    fn test_extract_connection_named() {
        let (_, token) = consume_connection(".clk(rst_n)").unwrap();
        assert_eq!(extract_connection(&token).as_pair(), ("clk", "rst_n"));
    }

    #[test]
    fn test_extract_connection_positional() {
        let (_, token) = consume_connection("rst_n").unwrap();
        let conn = extract_connection(&token);
        assert_eq!(conn.port, None);
        assert_eq!(conn.as_pair(), ("", "rst_n"));
    }

    #[test]
    fn test_extract_parameter_connection() {
        let conn = extract_parameter_connection(".WIDTH(8'd16)");
        assert_eq!(conn.as_pair(), ("WIDTH", "8'd16"));
    }

    #[test_case("{a, {b, c}}" ; "nested right")]
    #[test_case("{{a, b}, c}" ; "nested left")]
    #[test_case("{a, b, c}" ; "flat")]
    #[test_case("{{{a}, b}, {c}}" ; "deep")]
    fn test_flattening_is_associative(input: &str) {
        assert_eq!(extract_connected_elements(input), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_flatten_single_element() {
        assert_eq!(extract_connected_elements("q[3:0]"), vec!["q[3:0]"]);
        assert_eq!(extract_connected_elements("4'hA"), vec!["4'hA"]);
    }

    #[test]
    fn test_flatten_element_list() {
        assert_eq!(
            extract_connected_elements_from_list("x, {y[1], 1'b0}, z"),
            vec!["x", "y[1]", "1'b0", "z"]
        );
    }

    #[test]
    fn test_extract_connections_expands_concatenations() {
        let conns = extract_connections(".d({a, b}), q, .en(1'b1)");
        let pairs: Vec<_> = conns.iter().map(Connection::as_pair).collect();
        assert_eq!(
            pairs,
            vec![("d", "a"), ("d", "b"), ("", "q"), ("en", "1'b1")]
        );
    }

    #[test]
    fn test_extract_parameter_lists() {
        let params = extract_module_parameters("#(.W(8), .INIT(4'b0))");
        let pairs: Vec<_> = params.iter().map(Connection::as_pair).collect();
        assert_eq!(pairs, vec![("W", "8"), ("INIT", "4'b0")]);

        let params = extract_parameter_connections("3, NAME");
        assert_eq!(params[0].as_pair(), ("", "3"));
        assert_eq!(params[1].as_pair(), ("", "NAME"));
    }

    #[test_case(7, 0)]
    #[test_case(3, 3)]
    #[test_case(31, 16)]
    fn test_bit_range_round_trip(high: u32, low: u32) {
        let descending = if high == low {
            format!("[{}]", high)
        } else {
            format!("[{}:{}]", high, low)
        };
        let ascending = format!("[{}:{}]", low, high);
        let expected = BitRange { high, low };
        assert_eq!(extract_bit_range(&descending), expected);
        assert_eq!(extract_bit_range(&ascending), expected);
    }

    #[test_case("8'hFF", 8, 255)]
    #[test_case("4'b1010", 4, 10)]
    #[test_case("42", 32, 42)]
    #[test_case("6'o17", 6, 15)]
    #[test_case("16'd1234", 16, 1234)]
    #[test_case("2'hFF", 2, 255 ; "value not truncated")]
    fn test_literal_to_value(token: &str, width: u32, value: u64) {
        assert_eq!(
            literal_to_value(token).unwrap(),
            NumericLiteral { width, value }
        );
    }

    #[test]
    fn test_literal_overflow() {
        let err = literal_to_value("128'hFFFFFFFFFFFFFFFFFFFF").unwrap_err();
        assert!(matches!(err, NetlexError::LiteralOverflow { bits: 64, .. }));
        let err = literal_to_value("99999999999'b1").unwrap_err();
        assert!(matches!(err, NetlexError::LiteralOverflow { bits: 32, .. }));
    }

    #[test]
    #[should_panic(expected = "no numeric value")]
    fn test_literal_to_value_rejects_string() {
        let _ = literal_to_value("\"abc\"");
    }

    #[test]
    #[should_panic(expected = "not a complete Connection")]
    fn test_extract_partial_match_panics() {
        extract_connection("a, b");
    }

    #[test]
    #[should_panic(expected = "not a valid BitRange")]
    fn test_extract_invalid_panics() {
        extract_bit_range("[3:");
    }

    #[test]
    fn test_extract_descriptor() {
        let plain = extract_descriptor("data");
        assert_eq!(plain.base_name, "data");
        assert!(!plain.uses_index);
        assert_eq!((plain.bit_high, plain.bit_low), (0, 0));

        let ranged = extract_descriptor("data[0:7]");
        assert_eq!(ranged.raw_name, "data[0:7]");
        assert_eq!(ranged.base_name, "data");
        assert!(ranged.uses_index);
        assert_eq!((ranged.bit_high, ranged.bit_low), (7, 0));

        let single = extract_descriptor("data[3]");
        assert!(single.uses_index);
        assert_eq!((single.bit_high, single.bit_low), (3, 3));

        let indexed = extract_descriptor("\\gen_blk.u_ff [2]");
        assert_eq!(indexed.base_name, "\\gen_blk.u_ff ");
        assert!(indexed.uses_index);
        assert_eq!((indexed.bit_high, indexed.bit_low), (2, 2));
    }
}
