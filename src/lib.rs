//! # Netlex
//!
//! Recursive-descent lexer for structural Verilog netlists and VCD files.
//!
//! This library provides:
//! - Consumers for every netlist production: identifiers, immediates, bit
//!   ranges, connected elements, port and parameter connections
//! - Extraction of typed values from matched tokens (port/element pairs,
//!   flattened concatenations, decoded literals, net descriptors)
//! - A VCD token layer built on the same primitives
//! - Text mode over `&str` and stream mode over any [`std::io::BufRead`]
//!
//! ## Architecture
//!
//! - [`scan`] - Cursor and rule traits, the text and stream drivers
//! - [`netlist`] - Netlist grammar, `consume_*` and `extract_*` functions
//! - [`vcd`] - VCD grammar and typed declarations/value changes
//! - [`signals`] - Signal keys and whitelist scanning
//! - [`error`] - Chained lexing errors
//!
//! ## Usage
//!
//! ```
//! use netlex::netlist::{consume_connection_list, extract_connections};
//!
//! let (rest, token) = consume_connection_list(".a(x), .b({y, z}) );").unwrap();
//! assert_eq!(rest, ");");
//! let pairs: Vec<_> = extract_connections(&token);
//! assert_eq!(pairs.len(), 3);
//! assert_eq!(pairs[2].as_pair(), ("b", "z"));
//! ```
//!
//! Every consumer returns the remaining input and a normalized token; on
//! failure the input is untouched and the error names each production that
//! was being attempted.

pub mod error;
pub mod netlist;
pub mod scan;
pub mod signals;
pub mod vcd;

pub use error::{NetlexError, Result};
pub use scan::{Rule, TokenStream};

/// Width of an immediate written without a size prefix
pub const DEFAULT_LITERAL_WIDTH: u32 = 32;

/// Maximum characters of attempted text quoted in a diagnostic
pub const DIAGNOSTIC_SNIPPET_LIMIT: usize = 80;
