//! C0 MIPS Compiler - Backend
//!
//! This crate lowers the quadruple IR of a whole compilation unit into a
//! MIPS32 [`AsmProgram`]: the data section from the unit's data segment,
//! then `main` inline, then every other function with its own entry label,
//! prologue, body and epilogue.

pub mod data;
pub mod errors;
pub mod function;
pub mod module;
mod operands;
mod quads;

pub use errors::CodegenError;
pub use module::lower_module;

use c0c_codegen::{emit_program, AsmProgram};
use c0c_ir::IrModule;

/// Options for lowering
#[derive(Debug, Clone)]
pub struct BackendOptions {
    /// Emit the epilogue at every `return` instead of jumping to the exit label
    pub inline_epilogue: bool,
    /// Precede each quadruple's instructions with its listing as a comment
    pub annotate: bool,
    /// Pass the first four arguments in `$a0`-`$a3` instead of their stack
    /// slots
    pub reg_args: bool,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            inline_epilogue: false,
            annotate: true,
            reg_args: false,
        }
    }
}

/// Lower a module and render it as assembler text
pub fn compile_to_assembly(module: &IrModule, options: &BackendOptions) -> Result<String, CodegenError> {
    let program: AsmProgram = lower_module(module, options)?;
    Ok(emit_program(&program)?)
}

#[cfg(test)]
mod tests;
