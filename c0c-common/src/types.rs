//! Common type definitions used throughout the compiler

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a declaration (global, local, parameter)
pub type DeclId = u32;

/// Identifier for compiler-generated temporaries
pub type TempId = u32;

/// Identifier for generated control-flow labels
pub type LabelId = u32;

/// Size of a machine word in bytes.
pub const WORD_SIZE: u32 = 4;

/// Semantic type of a C0 value as resolved by the front end.
///
/// Scalars (including `char`) occupy one full word; arrays are laid out as
/// `length` consecutive words.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Int,
    Char,
    Void,
    Array { element: Box<Type>, length: u32 },
}

impl Type {
    pub fn array_of(element: Type, length: u32) -> Self {
        Type::Array {
            element: Box::new(element),
            length,
        }
    }

    /// Storage size in bytes. `void` takes no space.
    pub fn size_in_bytes(&self) -> u32 {
        match self {
            Type::Int | Type::Char => WORD_SIZE,
            Type::Void => 0,
            Type::Array { element, length } => element.size_in_bytes() * length,
        }
    }

    pub fn is_char(&self) -> bool {
        matches!(self, Type::Char)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array { .. })
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    /// Element type for arrays, the type itself otherwise.
    pub fn element_type(&self) -> &Type {
        match self {
            Type::Array { element, .. } => element,
            other => other,
        }
    }

    /// Number of elements (1 for scalars).
    pub fn element_count(&self) -> u32 {
        match self {
            Type::Array { length, .. } => *length,
            _ => 1,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Char => write!(f, "char"),
            Type::Void => write!(f, "void"),
            Type::Array { element, length } => write!(f, "{}[{}]", element, length),
        }
    }
}
