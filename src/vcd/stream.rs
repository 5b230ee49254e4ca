//! Stream-mode VCD rules.

use std::io::BufRead;

use super::Production;
use crate::scan::TokenStream;

impl<R: BufRead> TokenStream<R> {
    /// Exactly `text`.
    pub fn consume_exact_string(&mut self, text: &'static str) -> Option<String> {
        self.consume(Production::ExactString(text))
    }

    /// `$name` followed by whitespace or end of stream.
    pub fn consume_tag(&mut self, name: &'static str) -> Option<String> {
        self.consume(Production::Tag(name))
    }

    /// `$` followed by non-whitespace.
    pub fn consume_any_tag(&mut self) -> Option<String> {
        self.consume(Production::AnyTag)
    }

    /// A run of non-whitespace characters.
    pub fn consume_non_whitespace(&mut self) -> Option<String> {
        self.consume(Production::NonWhitespace)
    }

    /// A VCD identifier code: any run of non-whitespace.
    pub fn consume_identifier_code(&mut self) -> Option<String> {
        self.consume(Production::IdentifierCode)
    }

    /// Everything up to and including `$end`.
    pub fn consume_text_to_end(&mut self) -> Option<String> {
        self.consume(Production::TextToEnd)
    }

    /// One of the declaration section keywords.
    pub fn consume_declaration_keyword(&mut self) -> Option<String> {
        self.consume(Production::DeclarationKeyword)
    }

    /// A declaration keyword through its `$end`.
    pub fn consume_declaration_command(&mut self) -> Option<String> {
        self.consume(Production::DeclarationCommand)
    }

    /// `$dumpall`, `$dumpoff`, `$dumpon` or `$dumpvars`.
    pub fn consume_simulation_keyword(&mut self) -> Option<String> {
        self.consume(Production::SimulationKeyword)
    }

    /// `#` followed by decimal digits.
    pub fn consume_simulation_time(&mut self) -> Option<String> {
        self.consume(Production::SimulationTime)
    }

    /// A scalar value: `0`, `1`, `x`, `X`, `z` or `Z`.
    pub fn consume_value(&mut self) -> Option<String> {
        self.consume(Production::Value)
    }

    /// A scalar value directly followed by its identifier code.
    pub fn consume_scalar_value_change(&mut self) -> Option<String> {
        self.consume(Production::ScalarValueChange)
    }

    /// `b` or `B` digits, then an identifier code.
    pub fn consume_binary_vector_value_change(&mut self) -> Option<String> {
        self.consume(Production::BinaryVectorValueChange)
    }

    /// `r` or `R` real number, then an identifier code.
    pub fn consume_real_vector_value_change(&mut self) -> Option<String> {
        self.consume(Production::RealVectorValueChange)
    }

    /// Any scalar, binary or real value change.
    pub fn consume_value_change(&mut self) -> Option<String> {
        self.consume(Production::ValueChange)
    }

    /// A simulation keyword, value changes, then `$end`.
    pub fn consume_simulation_value_command(&mut self) -> Option<String> {
        self.consume(Production::SimulationValueCommand)
    }

    /// `$comment` through `$end`.
    pub fn consume_comment(&mut self) -> Option<String> {
        self.consume(Production::Comment)
    }

    /// One simulation-section command.
    pub fn consume_simulation_command(&mut self) -> Option<String> {
        self.consume(Production::SimulationCommand)
    }

    /// Declaration commands up to `$enddefinitions $end`.
    pub fn consume_vcd_definitions(&mut self) -> Option<String> {
        self.consume(Production::VcdDefinitions)
    }

    /// A full `$var ... $end` declaration.
    pub fn consume_var(&mut self) -> Option<String> {
        self.consume(Production::Var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    #[test]
    fn test_stream_simulation_section() {
        let text = "#0\n$dumpvars 1! $end\n#10\nb11 \"\n$comment done $end\n";
        let mut s = TokenStream::new(BufReader::with_capacity(2, text.as_bytes()));
        let mut commands = Vec::new();
        while let Some(command) = s.consume_simulation_command() {
            commands.push(command);
        }
        assert_eq!(
            commands,
            vec!["#0", "$dumpvars 1! $end", "#10", "b11 \"", "$comment done $end"]
        );
        assert!(s.is_exhausted());
    }

    #[test]
    fn test_stream_value_change_kinds() {
        let mut s = TokenStream::new(Cursor::new(b"b01 ! r1.5 # x$".as_slice()));
        assert_eq!(s.consume_scalar_value_change(), None);
        assert_eq!(s.consume_binary_vector_value_change().as_deref(), Some("b01 !"));
        assert_eq!(s.consume_real_vector_value_change().as_deref(), Some("r1.5 #"));
        assert_eq!(s.consume_scalar_value_change().as_deref(), Some("x$"));
    }

    #[test]
    fn test_stream_var_then_tag() {
        let mut s = TokenStream::new(Cursor::new(b"$var wire 1 ! clk $end $upscope $end".as_slice()));
        assert_eq!(s.consume_var().as_deref(), Some("$var wire 1 ! clk $end"));
        assert_eq!(s.consume_tag("scope"), None);
        assert_eq!(s.consume_tag("upscope").as_deref(), Some("$upscope"));
        assert_eq!(s.consume_exact_string("$end").as_deref(), Some("$end"));
        assert!(s.is_exhausted());
    }
}
