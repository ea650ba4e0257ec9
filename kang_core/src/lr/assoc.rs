use std::fmt;

/// The associativity of a rule, which lets the parser resolve certain
/// shift/reduce ambiguities between rules of equal precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    /// Non-associative rule.
    None,
    /// Left-associative rule.
    Left,
    /// Right-associative rule.
    Right,
}

impl Default for Associativity {
    fn default() -> Self {
        Associativity::None
    }
}

impl fmt::Display for Associativity {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Associativity::None => write!(f, "none"),
            Associativity::Left => write!(f, "left"),
            Associativity::Right => write!(f, "right"),
        }
    }
}
