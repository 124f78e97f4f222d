//! Error handling for the C0 MIPS compiler
//!
//! Each phase owns its own error enum; this module defines the umbrella type
//! the driver reports. Every variant is fatal: the compiler never emits
//! partial output after one of these.

use std::fmt;
use thiserror::Error;

/// Main compiler error type that encompasses all phases of compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("Invalid input: {message}")]
    Input { message: String },

    #[error("IR generation error: {message}")]
    IrGeneration { message: String },

    #[error("Code generation error: {message}")]
    Codegen { message: String },

    #[error("Simulation error: {message}")]
    Simulation { message: String },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Internal compiler error: {message}")]
    InternalError { message: String },
}

impl CompilerError {
    pub fn internal(message: impl fmt::Display) -> Self {
        CompilerError::InternalError {
            message: message.to_string(),
        }
    }
}

impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<String> for CompilerError {
    fn from(message: String) -> Self {
        CompilerError::InternalError { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_messages() {
        let err = CompilerError::IrGeneration {
            message: "missing condition".to_string(),
        };
        assert_eq!(err.to_string(), "IR generation error: missing condition");

        let err: CompilerError = "boom".to_string().into();
        assert_eq!(err.to_string(), "Internal compiler error: boom");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: CompilerError = io.into();
        assert!(matches!(err, CompilerError::IoError { .. }));
    }
}
