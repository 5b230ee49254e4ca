//! Typed views of VCD tokens.

use std::fmt;

/// Variable type keyword of a `$var` declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Event,
    Integer,
    Parameter,
    Real,
    Realtime,
    Reg,
    Supply0,
    Supply1,
    Time,
    Tri,
    Triand,
    Trior,
    Trireg,
    Tri0,
    Tri1,
    Wand,
    Wire,
    Wor,
}

impl VarType {
    pub const ALL: [VarType; 18] = [
        VarType::Event,
        VarType::Integer,
        VarType::Parameter,
        VarType::Real,
        VarType::Realtime,
        VarType::Reg,
        VarType::Supply0,
        VarType::Supply1,
        VarType::Time,
        VarType::Tri,
        VarType::Triand,
        VarType::Trior,
        VarType::Trireg,
        VarType::Tri0,
        VarType::Tri1,
        VarType::Wand,
        VarType::Wire,
        VarType::Wor,
    ];

    /// The keyword as written in a `$var` declaration.
    pub fn keyword(self) -> &'static str {
        match self {
            VarType::Event => "event",
            VarType::Integer => "integer",
            VarType::Parameter => "parameter",
            VarType::Real => "real",
            VarType::Realtime => "realtime",
            VarType::Reg => "reg",
            VarType::Supply0 => "supply0",
            VarType::Supply1 => "supply1",
            VarType::Time => "time",
            VarType::Tri => "tri",
            VarType::Triand => "triand",
            VarType::Trior => "trior",
            VarType::Trireg => "trireg",
            VarType::Tri0 => "tri0",
            VarType::Tri1 => "tri1",
            VarType::Wand => "wand",
            VarType::Wire => "wire",
            VarType::Wor => "wor",
        }
    }

    /// Look a variable type up by its declaration keyword.
    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.keyword() == word)
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// A `$var` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    pub var_type: VarType,
    /// Bit width
    pub width: u64,
    /// Short identifier code used by value changes
    pub code: String,
    /// Reference name, including any bit range written after it
    pub name: String,
}

impl fmt::Display for VarDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "$var {} {} {} {} $end",
            self.var_type, self.width, self.code, self.name
        )
    }
}

/// A value change line from the simulation section.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueChange {
    /// `1!`: one of `0 1 x X z Z` and an identifier code
    Scalar { value: char, code: String },
    /// `b1010 !`
    Vector { bits: String, code: String },
    /// `r3.25 !`
    Real { value: f64, code: String },
}

impl ValueChange {
    /// The identifier code the change applies to.
    pub fn code(&self) -> &str {
        match self {
            ValueChange::Scalar { code, .. }
            | ValueChange::Vector { code, .. }
            | ValueChange::Real { code, .. } => code,
        }
    }
}

impl fmt::Display for ValueChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueChange::Scalar { value, code } => write!(f, "{}{}", value, code),
            ValueChange::Vector { bits, code } => write!(f, "b{} {}", bits, code),
            ValueChange::Real { value, code } => write!(f, "r{} {}", value, code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_type_keywords() {
        for var_type in VarType::ALL {
            assert_eq!(VarType::from_keyword(var_type.keyword()), Some(var_type));
        }
        assert_eq!(VarType::from_keyword("logic"), None);
    }

    #[test]
    fn test_value_change_display() {
        let scalar = ValueChange::Scalar {
            value: 'x',
            code: "!".into(),
        };
        assert_eq!(scalar.to_string(), "x!");
        let vector = ValueChange::Vector {
            bits: "10z".into(),
            code: "#".into(),
        };
        assert_eq!(vector.to_string(), "b10z #");
        assert_eq!(vector.code(), "#");
    }
}
