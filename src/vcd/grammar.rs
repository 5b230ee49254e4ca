//! VCD command grammar, built on the netlist primitives.

use super::types::{ValueChange, VarDecl, VarType};
use crate::error::{NetlexError, Result};
use crate::netlist::grammar::{identifier, is_whitespace, skip_whitespace, unbased_immediate};
use crate::scan::{eof, optional, production, take_while, Cursor};

pub(crate) const DECLARATION_KEYWORDS: [&str; 8] = [
    "$comment",
    "$date",
    "$enddefinitions",
    "$scope",
    "$timescale",
    "$upscope",
    "$var",
    "$version",
];

pub(crate) const SIMULATION_KEYWORDS: [&str; 4] = ["$dumpall", "$dumpoff", "$dumpon", "$dumpvars"];

fn is_value(c: char) -> bool {
    matches!(c, '0' | '1' | 'x' | 'X' | 'z' | 'Z')
}

/// `text` as a prefix of the input.
pub(crate) fn exact_string<C: Cursor>(cur: &mut C, text: &str) -> Result<String> {
    production(cur, "ExactString", |cur| {
        skip_whitespace(cur);
        let start = cur.mark();
        for expected in text.chars() {
            if cur.bump() != Some(expected) {
                return Err(NetlexError::ExpectedKeyword {
                    expected: text.to_string(),
                    input: cur.snippet(start),
                });
            }
        }
        Ok(text.to_string())
    })
}

/// `text` followed by whitespace or end of input.
pub(crate) fn exact_word<C: Cursor>(cur: &mut C, text: &str) -> Result<String> {
    let start = cur.mark();
    let word = exact_string(cur, text)?;
    match cur.peek() {
        Some(c) if !is_whitespace(c) => {
            let input = cur.snippet(start);
            cur.reset(start);
            Err(NetlexError::ExpectedKeyword {
                expected: text.to_string(),
                input,
            })
        }
        _ => Ok(word),
    }
}

/// `$name`, e.g. `tag(cur, "end")`.
pub(crate) fn tag<C: Cursor>(cur: &mut C, name: &str) -> Result<String> {
    production(cur, "Tag", |cur| exact_word(cur, &format!("${}", name)))
}

/// Any `$word` keyword.
pub(crate) fn any_tag<C: Cursor>(cur: &mut C) -> Result<String> {
    production(cur, "Tag", |cur| {
        skip_whitespace(cur);
        if cur.peek() != Some('$') {
            return Err(NetlexError::unexpected_char('$', cur.peek(), cur.snippet_here()));
        }
        cur.bump();
        let word = take_while(cur, |c| c.is_ascii_alphanumeric() || c == '_');
        if word.is_empty() {
            return Err(NetlexError::expected("a keyword after '$'", cur.snippet_here()));
        }
        Ok(format!("${}", word))
    })
}

pub(crate) fn non_whitespace<C: Cursor>(cur: &mut C) -> Result<String> {
    production(cur, "NonWhitespace", |cur| {
        skip_whitespace(cur);
        let word = take_while(cur, |c| !is_whitespace(c));
        if word.is_empty() {
            return Err(eof("non-whitespace text"));
        }
        Ok(word)
    })
}

pub(crate) fn identifier_code<C: Cursor>(cur: &mut C) -> Result<String> {
    production(cur, "IdentifierCode", non_whitespace)
}

/// Words through `$end`, rejoined with single spaces.
pub(crate) fn text_to_end<C: Cursor>(cur: &mut C) -> Result<String> {
    production(cur, "TextToEnd", |cur| {
        let mut words = Vec::new();
        loop {
            let word = non_whitespace(cur)?;
            let done = word == "$end";
            words.push(word);
            if done {
                return Ok(words.join(" "));
            }
        }
    })
}

fn keyword_among<C: Cursor>(
    cur: &mut C,
    name: &'static str,
    keywords: &[&'static str],
) -> Result<String> {
    production(cur, name, |cur| {
        for keyword in keywords {
            if let Some(word) = optional(cur, |cur| exact_word(cur, keyword)) {
                return Ok(word);
            }
        }
        skip_whitespace(cur);
        Err(NetlexError::ExpectedKeyword {
            expected: keywords.join("|"),
            input: cur.snippet_here(),
        })
    })
}

pub(crate) fn declaration_keyword<C: Cursor>(cur: &mut C) -> Result<String> {
    keyword_among(cur, "DeclarationKeyword", &DECLARATION_KEYWORDS)
}

pub(crate) fn simulation_keyword<C: Cursor>(cur: &mut C) -> Result<String> {
    keyword_among(cur, "SimulationKeyword", &SIMULATION_KEYWORDS)
}

/// `$keyword ... $end` from the header section.
pub(crate) fn declaration_command<C: Cursor>(cur: &mut C) -> Result<String> {
    production(cur, "DeclarationCommand", |cur| {
        let keyword = declaration_keyword(cur)?;
        let text = text_to_end(cur)?;
        Ok(format!("{} {}", keyword, text))
    })
}

/// `#` immediately followed by decimal digits.
pub(crate) fn simulation_time<C: Cursor>(cur: &mut C) -> Result<String> {
    production(cur, "SimulationTime", |cur| {
        skip_whitespace(cur);
        if cur.peek() != Some('#') {
            return Err(NetlexError::unexpected_char('#', cur.peek(), cur.snippet_here()));
        }
        cur.bump();
        let digits = take_while(cur, |c| c.is_ascii_digit());
        if digits.is_empty() {
            return Err(NetlexError::expected("a decimal time", cur.snippet_here()));
        }
        Ok(format!("#{}", digits))
    })
}

fn value_here<C: Cursor>(cur: &mut C) -> Result<char> {
    match cur.peek() {
        Some(c) if is_value(c) => {
            cur.bump();
            Ok(c)
        }
        Some(_) => Err(NetlexError::expected("one of 0 1 x X z Z", cur.snippet_here())),
        None => Err(eof("a value")),
    }
}

pub(crate) fn value<C: Cursor>(cur: &mut C) -> Result<char> {
    production(cur, "Value", |cur| {
        skip_whitespace(cur);
        value_here(cur)
    })
}

/// At least one whitespace character, as required before a vector's code.
fn separator<C: Cursor>(cur: &mut C) -> Result<()> {
    if skip_whitespace(cur).is_empty() {
        return Err(NetlexError::expected(
            "whitespace before the identifier code",
            cur.snippet_here(),
        ));
    }
    Ok(())
}

pub(crate) fn scalar_value_change<C: Cursor>(cur: &mut C) -> Result<ValueChange> {
    production(cur, "ScalarValueChange", |cur| {
        skip_whitespace(cur);
        let value = value_here(cur)?;
        if cur.peek().map_or(true, is_whitespace) {
            return Err(NetlexError::expected(
                "an identifier code directly after the value",
                cur.snippet_here(),
            ));
        }
        let code = identifier_code(cur)?;
        Ok(ValueChange::Scalar { value, code })
    })
}

pub(crate) fn binary_vector_value_change<C: Cursor>(cur: &mut C) -> Result<ValueChange> {
    production(cur, "BinaryVectorValueChange", |cur| {
        skip_whitespace(cur);
        match cur.peek() {
            Some('b') | Some('B') => {
                cur.bump();
            }
            found => return Err(NetlexError::unexpected_char('b', found, cur.snippet_here())),
        }
        let bits = take_while(cur, is_value);
        if bits.is_empty() {
            return Err(NetlexError::expected("vector bits", cur.snippet_here()));
        }
        separator(cur)?;
        let code = identifier_code(cur)?;
        Ok(ValueChange::Vector { bits, code })
    })
}

pub(crate) fn real_vector_value_change<C: Cursor>(cur: &mut C) -> Result<ValueChange> {
    production(cur, "RealVectorValueChange", |cur| {
        skip_whitespace(cur);
        match cur.peek() {
            Some('r') | Some('R') => {
                cur.bump();
            }
            found => return Err(NetlexError::unexpected_char('r', found, cur.snippet_here())),
        }
        let start = cur.mark();
        let text = take_while(cur, |c| !is_whitespace(c));
        let value = text
            .parse::<f64>()
            .map_err(|_| NetlexError::expected("a real number", cur.snippet(start)))?;
        separator(cur)?;
        let code = identifier_code(cur)?;
        Ok(ValueChange::Real { value, code })
    })
}

pub(crate) fn value_change<C: Cursor>(cur: &mut C) -> Result<ValueChange> {
    production(cur, "ValueChange", |cur| {
        scalar_value_change(cur)
            .or_else(|_| binary_vector_value_change(cur))
            .or_else(|_| real_vector_value_change(cur))
    })
}

/// `$dumpvars` (or another simulation keyword), value changes, `$end`.
pub(crate) fn simulation_value_command<C: Cursor>(cur: &mut C) -> Result<String> {
    production(cur, "SimulationValueCommand", |cur| {
        let mut token = simulation_keyword(cur)?;
        while let Some(change) = optional(cur, value_change) {
            token.push(' ');
            token.push_str(&change.to_string());
        }
        tag(cur, "end")?;
        token.push_str(" $end");
        Ok(token)
    })
}

pub(crate) fn comment<C: Cursor>(cur: &mut C) -> Result<String> {
    production(cur, "Comment", |cur| {
        let keyword = tag(cur, "comment")?;
        let text = text_to_end(cur)?;
        Ok(format!("{} {}", keyword, text))
    })
}

/// One command from the simulation section.
pub(crate) fn simulation_command<C: Cursor>(cur: &mut C) -> Result<String> {
    production(cur, "SimulationCommand", |cur| {
        value_change(cur)
            .map(|change| change.to_string())
            .or_else(|_| simulation_time(cur))
            .or_else(|_| simulation_value_command(cur))
            .or_else(|_| comment(cur))
    })
}

/// Header declarations followed by simulation commands, one per line.
pub(crate) fn vcd_definitions<C: Cursor>(cur: &mut C) -> Result<String> {
    production(cur, "VcdDefinitions", |cur| {
        let mut commands = Vec::new();
        while let Some(command) = optional(cur, declaration_command) {
            commands.push(command);
        }
        while let Some(command) = optional(cur, simulation_command) {
            commands.push(command);
        }
        Ok(commands.join("\n"))
    })
}

fn parse_width(digits: &str) -> Result<u64> {
    digits.parse().map_err(|_| NetlexError::LiteralOverflow {
        literal: digits.to_string(),
        bits: 64,
    })
}

/// `$var wire <width> <code> <Identifier> $end`.
pub(crate) fn var<C: Cursor>(cur: &mut C) -> Result<VarDecl> {
    production(cur, "Var", |cur| {
        tag(cur, "var")?;
        exact_word(cur, VarType::Wire.keyword())?;
        let width = parse_width(&unbased_immediate(cur)?)?;
        let code = identifier_code(cur)?;
        let name = identifier(cur)?;
        tag(cur, "end")?;
        Ok(VarDecl {
            var_type: VarType::Wire,
            width,
            code,
            name: name.trim_end().to_string(),
        })
    })
}

/// Any `$var` declaration command: all variable types, and an optional
/// bit range written after the reference name.
pub(crate) fn var_declaration<C: Cursor>(cur: &mut C) -> Result<VarDecl> {
    production(cur, "VarDeclaration", |cur| {
        tag(cur, "var")?;
        let type_word = non_whitespace(cur)?;
        let var_type = VarType::from_keyword(&type_word)
            .ok_or_else(|| NetlexError::expected("a VCD variable type", type_word.clone()))?;
        let width = parse_width(&unbased_immediate(cur)?)?;
        let code = identifier_code(cur)?;
        let mut name = non_whitespace(cur)?;
        if optional(cur, |cur| tag(cur, "end")).is_none() {
            name.push_str(&non_whitespace(cur)?);
            tag(cur, "end")?;
        }
        Ok(VarDecl {
            var_type,
            width,
            code,
            name,
        })
    })
}
