//! C0 MIPS Compiler - Simulator
//!
//! Executes an [`AsmProgram`] directly, without assembling it to machine
//! code. Memory layout and syscall numbers follow MARS: the data section
//! starts at `0x10010000`, the stack pointer at `0x7fffeffc`, and text
//! addresses are `0x00400000 + 4 * index` over the text lines.

pub mod constants;
pub mod error;
pub mod machine;
pub mod memory;

pub use error::SimError;
pub use machine::{Machine, RunOutcome, StopReason};

use c0c_codegen::AsmProgram;

/// Run `program` to completion with `input` as standard input.
pub fn run_program(program: &AsmProgram, input: &str) -> Result<RunOutcome, SimError> {
    let mut machine = Machine::new(program, input)?;
    machine.run()
}
