use std::fmt::Display;

/// Primitive types known to both passes.
///
/// `Unknown` and `Error` are sentinels produced by inference: `Unknown` for a
/// name that was never assigned, `Error` for an expression whose operands
/// disagree. Both absorb further checks so one defect yields one diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Type {
    Int,
    Float,
    Str,
    Bool,
    Unknown,
    Error,
}

impl Type {
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Type::Unknown | Type::Error)
    }

    /// Spelling of the type in a C declaration.
    pub fn c_name(&self) -> &'static str {
        match self {
            Type::Float => "double",
            Type::Str => "const char *",
            Type::Int | Type::Bool | Type::Unknown | Type::Error => "int",
        }
    }

    /// `int x`, `const char *s`.
    pub fn c_declaration(&self, name: &str) -> String {
        match self.c_name() {
            pointer if pointer.ends_with('*') => format!("{pointer}{name}"),
            ty => format!("{ty} {name}"),
        }
    }

    /// `printf` conversion used to print a value of this type.
    pub fn printf_format(&self) -> &'static str {
        match self {
            Type::Float => "%f",
            Type::Str => "%s",
            Type::Int | Type::Bool | Type::Unknown | Type::Error => "%d",
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Type::Int => "int",
            Type::Float => "float",
            Type::Str => "str",
            Type::Bool => "bool",
            Type::Unknown => "unknown",
            Type::Error => "error",
        };
        write!(f, "{name}")
    }
}
