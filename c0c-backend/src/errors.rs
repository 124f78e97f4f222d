//! Backend errors
//!
//! Every variant is an internal invariant violation: the generator handed
//! over IR the backend cannot lower.

use c0c_codegen::{AbiError, EmitError};
use c0c_common::CompilerError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodegenError {
    #[error("Operand '{operand}' in function '{function}' reached emission unresolved")]
    Unresolved { function: String, operand: String },

    #[error("Operand '{operand}' is not supported by '{op}'")]
    UnsupportedOperand { op: String, operand: String },

    #[error("'{op}' quadruple is missing its {slot} operand")]
    MissingOperand { op: String, slot: &'static str },

    #[error("Frame of function '{function}' has not been resolved")]
    UnresolvedFrame { function: String },

    #[error("Module has no 'main' function")]
    MissingMain,

    #[error("Invalid frame in function '{function}': {source}")]
    Abi {
        function: String,
        #[source]
        source: AbiError,
    },

    #[error(transparent)]
    Emit(#[from] EmitError),
}

impl From<CodegenError> for CompilerError {
    fn from(err: CodegenError) -> Self {
        CompilerError::Codegen {
            message: err.to_string(),
        }
    }
}
