//! C0 MIPS Compiler - Common Types and Utilities
//!
//! Shared identifiers, the semantic type model and the umbrella error type
//! used by every phase of the compiler.

pub mod error;
pub mod types;

pub use error::CompilerError;
pub use types::{DeclId, LabelId, TempId, Type};
