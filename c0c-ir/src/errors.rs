//! IR generation error types
//!
//! The generator trusts the front end, so every variant here is an internal
//! invariant violation and aborts the compilation unit.

use c0c_codegen::abi::AbiError;
use c0c_common::CompilerError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum IrError {
    #[error("Identifier '{name}' reached IR generation unresolved")]
    UnresolvedIdentifier { name: String },

    #[error("Expression of type void used as a value (call to '{callee}')")]
    VoidValue { callee: String },

    #[error("Invalid assignment target")]
    InvalidLvalue,

    #[error("No branch to negate: last quadruple is '{found}'")]
    NoBranchToNegate { found: String },

    #[error("Program has no 'main' function")]
    MissingMain,

    #[error("Function '{name}' is defined more than once")]
    DuplicateFunction { name: String },

    #[error("Invalid frame for '{function}': {source}")]
    InvalidFrame {
        function: String,
        #[source]
        source: AbiError,
    },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl From<IrError> for CompilerError {
    fn from(err: IrError) -> Self {
        CompilerError::IrGeneration {
            message: err.to_string(),
        }
    }
}
