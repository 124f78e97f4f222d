use c0c_common::CompilerError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("Unknown label '{0}'")]
    UnknownLabel(String),

    #[error("Label '{0}' is defined more than once")]
    DuplicateLabel(String),

    #[error("Unaligned word access at {0:#010x}")]
    UnalignedAccess(u32),

    #[error("Jump to invalid text address {0:#010x}")]
    InvalidJump(u32),

    #[error("Division by zero at text line {0}")]
    DivisionByZero(usize),

    #[error("Program read past the end of its input")]
    InputExhausted,

    #[error("Invalid input for read int: '{0}'")]
    InvalidInput(String),

    #[error("Unsupported syscall {0}")]
    UnsupportedSyscall(i32),

    #[error("Step limit of {0} instructions exceeded")]
    StepLimitExceeded(u64),
}

impl From<SimError> for CompilerError {
    fn from(err: SimError) -> Self {
        CompilerError::Simulation {
            message: err.to_string(),
        }
    }
}
