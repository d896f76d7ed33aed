use std::fmt::Display;

/// The builtin types of the language.
///
/// Equality is by kind only. `Error` is the sentinel for an expression whose
/// type could not be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    Int,
    Bool,
    Error,
}

impl Type {
    pub fn name(&self) -> &'static str {
        match self {
            Type::Void => "void",
            Type::Int => "int",
            Type::Bool => "bool",
            Type::Error => "error-type",
        }
    }

    /// Whether a value of type `self` may be stored where `target` is expected.
    ///
    /// Only an exact match converts; there is no numeric widening.
    pub fn is_convertible_to(&self, target: Type) -> bool {
        *self != Type::Error && *self == target
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
