//! Value Change Dump (VCD) token layer.
//!
//! A VCD file is a header of `$keyword ... $end` declarations followed by
//! simulation commands: `#time` markers, value changes such as `1!` or
//! `b1010 "`, and `$dumpvars ... $end` blocks. The rules here reuse the
//! netlist primitives for whitespace, identifiers and digits.
//!
//! ```text
//! Tag        = '$' keyword
//! Var        = '$var' 'wire' digit+ IdentifierCode Identifier '$end'
//! ValueChange = Value IdentifierCode | ('b'|'B') Value+ IdentifierCode | ('r'|'R') real IdentifierCode
//! ```

pub(crate) mod grammar;
mod stream;
mod types;

pub use types::{ValueChange, VarDecl, VarType};

use std::io::BufRead;

use crate::error::{NetlexError, Result};
use crate::scan::{consume, parse_complete, Cursor, Rule, TextCursor, TokenStream};

/// Every rule of the VCD grammar, usable as a [`Rule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Production {
    /// A literal prefix, e.g. `ExactString("$end")`
    ExactString(&'static str),
    /// A `$name` keyword by name, e.g. `Tag("scope")`
    Tag(&'static str),
    /// Any `$name` keyword
    AnyTag,
    NonWhitespace,
    IdentifierCode,
    TextToEnd,
    DeclarationKeyword,
    DeclarationCommand,
    SimulationKeyword,
    SimulationTime,
    Value,
    ScalarValueChange,
    BinaryVectorValueChange,
    RealVectorValueChange,
    ValueChange,
    SimulationValueCommand,
    Comment,
    SimulationCommand,
    VcdDefinitions,
    Var,
}

impl Rule for Production {
    fn name(&self) -> &'static str {
        match self {
            Production::ExactString(_) => "ExactString",
            Production::Tag(_) | Production::AnyTag => "Tag",
            Production::NonWhitespace => "NonWhitespace",
            Production::IdentifierCode => "IdentifierCode",
            Production::TextToEnd => "TextToEnd",
            Production::DeclarationKeyword => "DeclarationKeyword",
            Production::DeclarationCommand => "DeclarationCommand",
            Production::SimulationKeyword => "SimulationKeyword",
            Production::SimulationTime => "SimulationTime",
            Production::Value => "Value",
            Production::ScalarValueChange => "ScalarValueChange",
            Production::BinaryVectorValueChange => "BinaryVectorValueChange",
            Production::RealVectorValueChange => "RealVectorValueChange",
            Production::ValueChange => "ValueChange",
            Production::SimulationValueCommand => "SimulationValueCommand",
            Production::Comment => "Comment",
            Production::SimulationCommand => "SimulationCommand",
            Production::VcdDefinitions => "VcdDefinitions",
            Production::Var => "Var",
        }
    }

    fn apply<C: Cursor>(&self, cur: &mut C) -> Result<String> {
        let token = match self {
            Production::ExactString(text) => grammar::exact_string(cur, text)?,
            Production::Tag(name) => grammar::tag(cur, name)?,
            Production::AnyTag => grammar::any_tag(cur)?,
            Production::NonWhitespace => grammar::non_whitespace(cur)?,
            Production::IdentifierCode => grammar::identifier_code(cur)?,
            Production::TextToEnd => grammar::text_to_end(cur)?,
            Production::DeclarationKeyword => grammar::declaration_keyword(cur)?,
            Production::DeclarationCommand => grammar::declaration_command(cur)?,
            Production::SimulationKeyword => grammar::simulation_keyword(cur)?,
            Production::SimulationTime => grammar::simulation_time(cur)?,
            Production::Value => grammar::value(cur)?.to_string(),
            Production::ScalarValueChange => grammar::scalar_value_change(cur)?.to_string(),
            Production::BinaryVectorValueChange => {
                grammar::binary_vector_value_change(cur)?.to_string()
            }
            Production::RealVectorValueChange => grammar::real_vector_value_change(cur)?.to_string(),
            Production::ValueChange => grammar::value_change(cur)?.to_string(),
            Production::SimulationValueCommand => grammar::simulation_value_command(cur)?,
            Production::Comment => grammar::comment(cur)?,
            Production::SimulationCommand => grammar::simulation_command(cur)?,
            Production::VcdDefinitions => grammar::vcd_definitions(cur)?,
            Production::Var => grammar::var(cur)?.to_string(),
        };
        crate::netlist::grammar::skip_whitespace(cur);
        Ok(token)
    }
}

// ============ Text-mode entry points ============

/// `text` as a literal prefix; no word boundary is required.
pub fn consume_exact_string<'a>(input: &'a str, text: &'static str) -> Result<(&'a str, String)> {
    consume(input, Production::ExactString(text))
}

/// `$name` followed by whitespace or end of input.
pub fn consume_tag<'a>(input: &'a str, name: &'static str) -> Result<(&'a str, String)> {
    consume(input, Production::Tag(name))
}

/// `$` followed by non-whitespace.
pub fn consume_any_tag(input: &str) -> Result<(&str, String)> {
    consume(input, Production::AnyTag)
}

/// A run of non-whitespace characters.
pub fn consume_non_whitespace(input: &str) -> Result<(&str, String)> {
    consume(input, Production::NonWhitespace)
}

/// A VCD identifier code: any run of non-whitespace.
pub fn consume_identifier_code(input: &str) -> Result<(&str, String)> {
    consume(input, Production::IdentifierCode)
}

/// Words through `$end`, rejoined with single spaces.
pub fn consume_text_to_end(input: &str) -> Result<(&str, String)> {
    consume(input, Production::TextToEnd)
}

/// One of the declaration section keywords.
pub fn consume_declaration_keyword(input: &str) -> Result<(&str, String)> {
    consume(input, Production::DeclarationKeyword)
}

/// `$keyword ... $end` from the header, e.g. `$timescale 1ns $end`.
pub fn consume_declaration_command(input: &str) -> Result<(&str, String)> {
    consume(input, Production::DeclarationCommand)
}

/// `$dumpall`, `$dumpoff`, `$dumpon` or `$dumpvars`.
pub fn consume_simulation_keyword(input: &str) -> Result<(&str, String)> {
    consume(input, Production::SimulationKeyword)
}

/// `#` followed by decimal digits.
pub fn consume_simulation_time(input: &str) -> Result<(&str, String)> {
    consume(input, Production::SimulationTime)
}

/// A scalar value: `0`, `1`, `x`, `X`, `z` or `Z`.
pub fn consume_value(input: &str) -> Result<(&str, String)> {
    consume(input, Production::Value)
}

/// A scalar value directly followed by its identifier code.
pub fn consume_scalar_value_change(input: &str) -> Result<(&str, String)> {
    consume(input, Production::ScalarValueChange)
}

/// `b` or `B` digits, then an identifier code.
pub fn consume_binary_vector_value_change(input: &str) -> Result<(&str, String)> {
    consume(input, Production::BinaryVectorValueChange)
}

/// `r` or `R` real number, then an identifier code.
pub fn consume_real_vector_value_change(input: &str) -> Result<(&str, String)> {
    consume(input, Production::RealVectorValueChange)
}

/// Any scalar, binary or real value change.
pub fn consume_value_change(input: &str) -> Result<(&str, String)> {
    consume(input, Production::ValueChange)
}

/// A simulation keyword, value changes, then `$end`.
pub fn consume_simulation_value_command(input: &str) -> Result<(&str, String)> {
    consume(input, Production::SimulationValueCommand)
}

/// `$comment` through `$end`.
pub fn consume_comment(input: &str) -> Result<(&str, String)> {
    consume(input, Production::Comment)
}

/// One simulation-section command.
pub fn consume_simulation_command(input: &str) -> Result<(&str, String)> {
    consume(input, Production::SimulationCommand)
}

/// Header declarations then simulation commands; the token has one command
/// per line. Stops at the first text that is neither.
pub fn consume_vcd_definitions(input: &str) -> Result<(&str, String)> {
    consume(input, Production::VcdDefinitions)
}

/// `$var wire <width> <code> <identifier> $end`.
pub fn consume_var(input: &str) -> Result<(&str, String)> {
    consume(input, Production::Var)
}

// ============ Extraction ============

impl VarDecl {
    /// Decode a `$var` declaration command of any variable type.
    ///
    /// A bit range written as a separate word after the reference name
    /// (`data [7:0]`) is appended to the name.
    pub fn from_declaration(token: &str) -> Result<VarDecl> {
        let mut cur = TextCursor::new(token);
        let decl = grammar::var_declaration(&mut cur)?;
        crate::netlist::grammar::skip_whitespace(&mut cur);
        if !cur.is_exhausted() {
            return Err(NetlexError::expected("end of declaration", cur.rest()));
        }
        Ok(decl)
    }
}

/// Decode a `Var` token.
///
/// # Panics
///
/// Panics if `token` is not a complete `Var`.
pub fn extract_var(token: &str) -> VarDecl {
    parse_complete(token, "Var", grammar::var)
}

/// Decode a `ValueChange` token.
///
/// # Panics
///
/// Panics if `token` is not a complete `ValueChange`.
pub fn extract_value_change(token: &str) -> ValueChange {
    parse_complete(token, "ValueChange", grammar::value_change)
}

/// Time of a `SimulationTime` token such as `#100`.
///
/// # Errors
///
/// Returns [`NetlexError::LiteralOverflow`] if the time does not fit in a `u64`.
///
/// # Panics
///
/// Panics if `token` is not a complete `SimulationTime`.
pub fn extract_simulation_time(token: &str) -> Result<u64> {
    let marker = parse_complete(token, "SimulationTime", grammar::simulation_time);
    let digits = &marker[1..];
    digits.parse().map_err(|_| NetlexError::LiteralOverflow {
        literal: marker.clone(),
        bits: 64,
    })
}

// ============ Stream scanning ============

/// Read the header of a VCD stream and collect its `$var` declarations.
///
/// Scanning stops after `$enddefinitions` or at the first text that is not a
/// declaration command.
pub fn scan_vars<R: BufRead>(reader: R) -> Result<Vec<VarDecl>> {
    let mut stream = TokenStream::new(reader);
    let mut vars = Vec::new();
    loop {
        let command = match stream.try_consume(Production::DeclarationCommand) {
            Ok(command) => command,
            Err(err) => {
                stream.check_error()?;
                if !stream.is_exhausted() {
                    log::debug!("header ends at offset {}: {}", stream.offset(), err.root_cause());
                }
                break;
            }
        };
        if command.starts_with("$var ") {
            vars.push(VarDecl::from_declaration(&command)?);
        } else if command.starts_with("$enddefinitions") {
            break;
        }
    }
    log::debug!("found {} $var declarations", vars.len());
    Ok(vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor as IoCursor;
    use test_case::test_case;

    const HEADER: &str = "$date today $end\n\
        $timescale 1ns $end\n\
        $scope module top $end\n\
        $var wire 1 ! clk $end\n\
        $var reg 8 \" data [7:0] $end\n\
        $upscope $end\n\
        $enddefinitions $end\n\
        #0\n\
        $dumpvars 0! b00000000 \" $end\n\
        #5\n\
        1!\n";

    #[test_case("$end", "$end", "" ; "exact")]
    #[test_case("$enddefinitions $end", "$end", "definitions $end" ; "prefix")]
    fn test_exact_string(input: &str, text: &'static str, rest: &str) {
        assert_eq!(
            consume_exact_string(input, text).unwrap(),
            (rest, text.to_string())
        );
    }

    #[test]
    fn test_tag() {
        assert_eq!(
            consume_tag("$scope module top $end", "scope").unwrap(),
            ("module top $end", "$scope".to_string())
        );
        assert!(consume_tag("$scopes", "scope").is_err());
        assert_eq!(consume_any_tag("$upscope $end").unwrap().1, "$upscope");
    }

    #[test]
    fn test_declaration_command() {
        assert_eq!(
            consume_declaration_command("$timescale\n  1 ns\n$end\n$scope").unwrap(),
            ("$scope", "$timescale 1 ns $end".to_string())
        );
        assert!(consume_declaration_command("$dumpvars $end").is_err());
    }

    #[test]
    fn test_keywords() {
        assert_eq!(consume_declaration_keyword("$version").unwrap().1, "$version");
        assert_eq!(consume_simulation_keyword("$dumpoff").unwrap().1, "$dumpoff");
        assert!(consume_simulation_keyword("$dump").is_err());
    }

    #[test_case("1!", "1!" ; "scalar")]
    #[test_case("Z%%", "Z%%" ; "scalar long code")]
    #[test_case("b1010 #", "b1010 #" ; "binary vector")]
    #[test_case("B1x0z  #", "b1x0z #" ; "uppercase vector")]
    #[test_case("r0.5 ^", "r0.5 ^" ; "real vector")]
    fn test_value_change(input: &str, expected: &str) {
        assert_eq!(consume_value_change(input).unwrap(), ("", expected.to_string()));
    }

    #[test]
    fn test_scalar_needs_adjacent_code() {
        assert!(consume_scalar_value_change("1 #5").is_err());
    }

    #[test]
    fn test_simulation_time() {
        assert_eq!(consume_simulation_time("#100 1!").unwrap(), ("1!", "#100".to_string()));
        assert!(consume_simulation_time("# 100").is_err());
        assert_eq!(extract_simulation_time("#100").unwrap(), 100);
    }

    #[test]
    fn test_simulation_value_command() {
        assert_eq!(
            consume_simulation_value_command("$dumpvars\n1!\nb10 \"\n$end").unwrap(),
            ("", "$dumpvars 1! b10 \" $end".to_string())
        );
    }

    #[test]
    fn test_simulation_commands() {
        assert_eq!(consume_simulation_command("#5").unwrap().1, "#5");
        assert_eq!(consume_simulation_command("0!").unwrap().1, "0!");
        assert_eq!(
            consume_comment("$comment hello  world $end").unwrap().1,
            "$comment hello world $end"
        );
        assert_eq!(
            consume_simulation_command("$comment x $end").unwrap().1,
            "$comment x $end"
        );
    }

    #[test]
    fn test_vcd_definitions() {
        let (rest, token) = consume_vcd_definitions(HEADER).unwrap();
        assert_eq!(rest, "");
        let lines: Vec<_> = token.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[3], "$var wire 1 ! clk $end");
        assert_eq!(lines[4], "$var reg 8 \" data [7:0] $end");
        assert_eq!(lines[8], "$dumpvars 0! b00000000 \" $end");
        assert_eq!(lines[10], "1!");
    }

    #[test]
    fn test_var() {
        let (rest, token) = consume_var("$var wire 4 # bus $end $upscope").unwrap();
        assert_eq!(token, "$var wire 4 # bus $end");
        assert_eq!(rest, "$upscope");
        let decl = extract_var(&token);
        assert_eq!(decl.width, 4);
        assert_eq!(decl.code, "#");
        assert_eq!(decl.name, "bus");
        assert!(consume_var("$var reg 4 # bus $end").is_err());
    }

    #[test]
    fn test_var_from_declaration() {
        let decl = VarDecl::from_declaration("$var integer 32 ( count $end").unwrap();
        assert_eq!(decl.var_type, VarType::Integer);
        assert_eq!(decl.width, 32);
        assert!(VarDecl::from_declaration("$var logic 1 ! a $end").is_err());
        assert!(VarDecl::from_declaration("$var wire 1 ! a $end extra").is_err());
    }

    #[test]
    fn test_extract_value_change() {
        assert_eq!(
            extract_value_change("b101 !"),
            ValueChange::Vector {
                bits: "101".into(),
                code: "!".into()
            }
        );
    }

    #[test]
    #[should_panic(expected = "not a valid ValueChange")]
    fn test_extract_value_change_rejects_garbage() {
        extract_value_change("$end");
    }

    #[test]
    fn test_scan_vars() {
        let vars = scan_vars(IoCursor::new(HEADER.as_bytes())).unwrap();
        let names: Vec<_> = vars.iter().map(|v| (v.code.as_str(), v.name.as_str())).collect();
        assert_eq!(names, vec![("!", "clk"), ("\"", "data[7:0]")]);
        assert_eq!(vars[1].width, 8);
    }
}
