use std::fmt;

/// Semantic types of Pika values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ty {
    Integer,
    Floating,
    Boolean,
    Character,
    /// Handle (address) of a heap-resident string record.
    String,
    /// Result of a failed check; never reaches code generation.
    Error,
    /// Absence of a type, such as the operand type of a signature with no
    /// parameters. Has no size, load, store or print format.
    NoType,
}

impl Ty {
    /// Every concrete type a value can have, in registration order.
    pub const PRIMITIVES: [Ty; 5] = [
        Ty::Integer,
        Ty::Floating,
        Ty::Boolean,
        Ty::Character,
        Ty::String,
    ];

    /// Storage size in bytes.
    pub fn size(&self) -> u32 {
        match self {
            Ty::Integer | Ty::String => 4,
            Ty::Floating => 8,
            Ty::Boolean | Ty::Character => 1,
            Ty::Error | Ty::NoType => 0,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Ty::Error)
    }

    /// Map a type keyword (`int`, `float`, ...) to its type.
    pub fn from_keyword(keyword: &str) -> Option<Ty> {
        match keyword {
            "int" => Some(Ty::Integer),
            "float" => Some(Ty::Floating),
            "bool" => Some(Ty::Boolean),
            "char" => Some(Ty::Character),
            "string" => Some(Ty::String),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Ty::Integer => "int",
            Ty::Floating => "float",
            Ty::Boolean => "bool",
            Ty::Character => "char",
            Ty::String => "string",
            Ty::Error => "<error>",
            Ty::NoType => "<none>",
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Render a list of operand types as `(int, float)`.
pub fn display_types(types: &[Ty]) -> String {
    let parts: Vec<_> = types.iter().map(|t| t.keyword()).collect();
    format!("({})", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        assert_eq!(Ty::Integer.size(), 4);
        assert_eq!(Ty::Floating.size(), 8);
        assert_eq!(Ty::Boolean.size(), 1);
        assert_eq!(Ty::Character.size(), 1);
        assert_eq!(Ty::String.size(), 4);
        assert_eq!(Ty::Error.size(), 0);
    }

    #[test]
    fn test_keyword_roundtrip_for_primitives() {
        for ty in Ty::PRIMITIVES {
            assert_eq!(Ty::from_keyword(ty.keyword()), Some(ty));
        }
        assert_eq!(Ty::from_keyword("double"), None);
    }

    #[test]
    fn test_display_types() {
        assert_eq!(display_types(&[Ty::Integer, Ty::Boolean]), "(int, bool)");
        assert_eq!(display_types(&[]), "()");
    }
}
