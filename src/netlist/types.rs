//! Typed views of matched netlist tokens.
//!
//! The grammar produces these transiently; their `Display` impls render the
//! whitespace-normalized token text that the `consume_*` functions return.

use std::fmt;

/// Radix of a based numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Radix {
    /// `'b`, digits 0-1
    Binary,
    /// `'o`, digits 0-7
    Octal,
    /// `'d`, digits 0-9
    Decimal,
    /// `'h`, digits 0-9, a-f, A-F
    Hex,
}

impl Radix {
    /// All radices in marker order.
    pub const ALL: [Radix; 4] = [Radix::Binary, Radix::Octal, Radix::Decimal, Radix::Hex];

    /// Parse the character following `'` in a based literal.
    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            'b' => Some(Radix::Binary),
            'o' => Some(Radix::Octal),
            'd' => Some(Radix::Decimal),
            'h' => Some(Radix::Hex),
            _ => None,
        }
    }

    /// The marker character.
    pub fn marker(self) -> char {
        match self {
            Radix::Binary => 'b',
            Radix::Octal => 'o',
            Radix::Decimal => 'd',
            Radix::Hex => 'h',
        }
    }

    /// Numeric base.
    pub fn base(self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Octal => 8,
            Radix::Decimal => 10,
            Radix::Hex => 16,
        }
    }

    /// True if `c` is a digit in this radix.
    pub fn is_digit(self, c: char) -> bool {
        c.is_digit(self.base())
    }

    /// Name of the grammar production for literals in this radix.
    pub fn production_name(self) -> &'static str {
        match self {
            Radix::Binary => "BinaryImmediate",
            Radix::Octal => "OctalImmediate",
            Radix::Decimal => "DecimalImmediate",
            Radix::Hex => "HexImmediate",
        }
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Radix::Binary => "binary",
            Radix::Octal => "octal",
            Radix::Decimal => "decimal",
            Radix::Hex => "hex",
        };
        write!(f, "{}", name)
    }
}

/// A literal constant: `42`, `8'hFF`, `"text"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Immediate {
    /// Bare decimal digits
    Unbased(String),
    /// Width prefix, radix marker and digit run
    Based {
        width: String,
        radix: Radix,
        digits: String,
    },
    /// Quoted text, without the quotes
    Str(String),
}

impl fmt::Display for Immediate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Immediate::Unbased(digits) => write!(f, "{}", digits),
            Immediate::Based {
                width,
                radix,
                digits,
            } => write!(f, "{}'{}{}", width, radix.marker(), digits),
            Immediate::Str(text) => write!(f, "\"{}\"", text),
        }
    }
}

/// Normalized bit range, `high >= low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitRange {
    pub high: u32,
    pub low: u32,
}

impl BitRange {
    /// Build a range from bounds in either written order.
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            high: a.max(b),
            low: a.min(b),
        }
    }

    /// Number of bits selected.
    pub fn width(&self) -> u64 {
        u64::from(self.high - self.low) + 1
    }

    /// True for a single-bit select.
    pub fn is_single(&self) -> bool {
        self.high == self.low
    }
}

impl fmt::Display for BitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "[{}]", self.high)
        } else {
            write!(f, "[{}:{}]", self.high, self.low)
        }
    }
}

/// Bit range bounds in the order they were written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WrittenRange {
    pub first: u32,
    pub second: u32,
}

impl WrittenRange {
    pub fn normalized(&self) -> BitRange {
        BitRange::new(self.first, self.second)
    }
}

impl fmt::Display for WrittenRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.second {
            write!(f, "[{}]", self.first)
        } else {
            write!(f, "[{}:{}]", self.first, self.second)
        }
    }
}

/// Content enclosed by `depth` pairs of delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Wrapped<T> {
    pub depth: usize,
    pub inner: T,
}

impl<T> Wrapped<T> {
    /// Render `body` inside this wrapper's delimiters.
    pub fn write_with(
        &self,
        f: &mut fmt::Formatter<'_>,
        open: char,
        close: char,
        body: impl FnOnce(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
    ) -> fmt::Result {
        for _ in 0..self.depth {
            write!(f, "{}", open)?;
        }
        body(f, &self.inner)?;
        for _ in 0..self.depth {
            write!(f, "{}", close)?;
        }
        Ok(())
    }
}

/// Write `items` separated by `", "`.
pub(crate) fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Anything that can sit on one side of a port connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Element {
    Literal(Immediate),
    Net {
        name: String,
        range: Option<WrittenRange>,
    },
    Concat(Wrapped<Vec<Element>>),
}

impl Element {
    /// Append the leaves of this element, in source order, to `out`.
    pub fn flatten_into(&self, out: &mut Vec<String>) {
        match self {
            Element::Concat(group) => {
                for item in &group.inner {
                    item.flatten_into(out);
                }
            }
            leaf => out.push(leaf.to_string()),
        }
    }

    pub fn leaves(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Literal(imm) => write!(f, "{}", imm),
            Element::Net { name, range } => {
                write!(f, "{}", name)?;
                if let Some(range) = range {
                    write!(f, "{}", range)?;
                }
                Ok(())
            }
            Element::Concat(group) => group.write_with(f, '{', '}', |f, items| write_list(f, items)),
        }
    }
}

/// Right-hand side of a parameter binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParameterValue {
    Literal(Immediate),
    Name(String),
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Literal(imm) => write!(f, "{}", imm),
            ParameterValue::Name(name) => write!(f, "{}", name),
        }
    }
}

/// A positional or named (`.port(value)`) connection as matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Binding<T> {
    pub port: Option<String>,
    /// Parenthesis depth around a named target; 0 when positional.
    pub target: Wrapped<T>,
}

impl<T: fmt::Display> fmt::Display for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(port) = &self.port {
            write!(f, ".{}", port)?;
        }
        self.target.write_with(f, '(', ')', |f, value| write!(f, "{}", value))
    }
}

/// `#(...)` parameter block as matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ModuleParameters(pub Wrapped<Vec<Binding<ParameterValue>>>);

impl fmt::Display for ModuleParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#")?;
        self.0.write_with(f, '(', ')', |f, items| write_list(f, items))
    }
}

/// A decomposed connection: optional port name and the connected element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Port name for `.port(...)` connections; `None` when positional
    pub port: Option<String>,
    /// Connected element (or parameter value) text
    pub element: String,
}

impl Connection {
    /// Port name, or `""` for a positional connection.
    pub fn port_name(&self) -> &str {
        self.port.as_deref().unwrap_or("")
    }

    /// `(port_or_empty, element)`.
    pub fn as_pair(&self) -> (&str, &str) {
        (self.port_name(), &self.element)
    }
}

/// A decoded numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericLiteral {
    /// Declared width, or [`DEFAULT_LITERAL_WIDTH`](crate::DEFAULT_LITERAL_WIDTH)
    pub width: u32,
    /// Magnitude, aligned to the least significant digit
    pub value: u64,
}

/// Net name decomposed into base name and optional bit/index selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetDescriptor {
    pub raw_name: String,
    pub base_name: String,
    /// A trailing bracket selected bits or a generate index
    pub uses_index: bool,
    pub bit_high: u32,
    pub bit_low: u32,
}
