//! C0 MIPS Compiler - MIPS32 target model
//!
//! This crate describes the target the backend lowers to. It includes:
//!
//! - The MIPS32 register file and the instruction subset the compiler emits
//! - Data-section directives and the assembled program container
//! - ABI constants (scratch registers, callee-saved pool, syscall numbers)
//! - The fixed-size register pool used for leaf functions
//! - Rendering of a program to assembler text

pub mod abi;
pub mod asm;
pub mod emit;
pub mod regalloc;

pub use abi::{AbiError, CallingConvention, Frame, Syscall};
pub use asm::{Address, AsmInst, AsmProgram, DataDirective, DataItem, Reg};
pub use emit::{emit_program, EmitError};
pub use regalloc::{RegAllocError, RegisterPool};
