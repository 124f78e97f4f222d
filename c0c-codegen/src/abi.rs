//! MIPS32 ABI as used by generated code
//!
//! This module fixes the register roles, the syscall numbers of the MARS/SPIM
//! runtime and the stack frame layout, including prologue and epilogue
//! generation.

use crate::asm::{Address, AsmInst, Reg};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AbiError {
    #[error("Frame size {0} is not word aligned")]
    UnalignedFrame(i32),

    #[error("Frame size {size} cannot hold {saved} bytes of saved registers")]
    FrameTooSmall { size: i32, saved: i32 },
}

/// Calling convention of generated code
///
/// Register Usage:
/// - $v0: return value, syscall number
/// - $a0: syscall argument
/// - $a0-$a3: first four arguments, when register arguments are enabled
/// - $t8, $t9: scratch registers for staging operands, never bound to variables
/// - $s0-$s7: register pool for variables of leaf functions (callee-saved)
/// - $sp: stack pointer; every frame slot is addressed relative to it
/// - $ra: return address, saved by every function that makes a call
///
/// Arguments are passed on the stack: the caller stores argument `i` at
/// `4*i($sp)` of its own frame, which the callee sees at `frame_size + 4*i`.
pub struct CallingConvention;

impl CallingConvention {
    pub const SCRATCH: [Reg; 2] = [Reg::T8, Reg::T9];

    /// Registers handed out to leaf-function variables, in allocation order
    pub const SAVED_POOL: [Reg; 8] = [
        Reg::S0, Reg::S1, Reg::S2, Reg::S3, Reg::S4, Reg::S5, Reg::S6, Reg::S7,
    ];

    pub const RETURN_VALUE: Reg = Reg::V0;
    pub const SYSCALL_ARG: Reg = Reg::A0;
    pub const STACK_PTR: Reg = Reg::Sp;
    pub const RETURN_ADDR: Reg = Reg::Ra;

    /// Registers that can carry the first four arguments
    pub const ARG_REGS: [Reg; 4] = [Reg::A0, Reg::A1, Reg::A2, Reg::A3];

    /// Bytes occupied by one argument slot
    pub const ARG_SLOT_SIZE: i32 = 4;

    /// Argument register matching an outgoing slot offset, for the first
    /// four slots.
    pub fn arg_register(slot_offset: i32) -> Option<Reg> {
        if slot_offset < 0 || slot_offset % Self::ARG_SLOT_SIZE != 0 {
            return None;
        }
        Self::ARG_REGS
            .get((slot_offset / Self::ARG_SLOT_SIZE) as usize)
            .copied()
    }

    /// The other scratch register
    pub fn other_scratch(reg: Reg) -> Reg {
        if reg == Reg::T8 {
            Reg::T9
        } else {
            Reg::T8
        }
    }
}

/// Runtime services reached through `syscall`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Syscall {
    PrintInt,
    PrintString,
    ReadInt,
    ReadString,
    Exit,
    PrintChar,
    ReadChar,
}

impl Syscall {
    pub fn code(self) -> i32 {
        match self {
            Syscall::PrintInt => 1,
            Syscall::PrintString => 4,
            Syscall::ReadInt => 5,
            Syscall::ReadString => 8,
            Syscall::Exit => 10,
            Syscall::PrintChar => 11,
            Syscall::ReadChar => 12,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            1 => Syscall::PrintInt,
            4 => Syscall::PrintString,
            5 => Syscall::ReadInt,
            8 => Syscall::ReadString,
            10 => Syscall::Exit,
            11 => Syscall::PrintChar,
            12 => Syscall::ReadChar,
            _ => return None,
        })
    }
}

/// Stack Frame Layout
///
/// The stack grows downward and `$sp` stays fixed for the body of the
/// function. From high to low addresses:
/// 1. Saved registers, highest register number at `size - 4`
/// 2. Local variables and temporaries
/// 3. Outgoing argument area, starting at `0($sp)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Total frame size in bytes
    pub size: i32,

    /// Bit `n` set means register number `n` is saved by the prologue
    pub saved_register_mask: u32,
}

impl Frame {
    pub fn new(size: i32, saved_register_mask: u32) -> Self {
        Self {
            size,
            saved_register_mask,
        }
    }

    /// Bytes occupied by saved registers
    pub fn save_size(&self) -> i32 {
        self.saved_register_mask.count_ones() as i32 * 4
    }

    /// Saved registers from the highest number down
    pub fn saved_registers(&self) -> Vec<Reg> {
        Reg::ALL
            .iter()
            .rev()
            .copied()
            .filter(|r| self.saved_register_mask & r.mask_bit() != 0)
            .collect()
    }

    /// Check the frame invariants: word alignment and room for the saves.
    pub fn validate(&self) -> Result<(), AbiError> {
        if self.size % 4 != 0 {
            return Err(AbiError::UnalignedFrame(self.size));
        }
        if self.size < self.save_size() {
            return Err(AbiError::FrameTooSmall {
                size: self.size,
                saved: self.save_size(),
            });
        }
        Ok(())
    }

    /// Generate function prologue
    ///
    /// Allocates the frame, then stores each saved register (highest number
    /// first) into consecutive words at the top of the frame.
    pub fn gen_prologue(&self) -> Result<Vec<AsmInst>, AbiError> {
        self.validate()?;
        let mut code = Vec::new();
        if self.size == 0 {
            return Ok(code);
        }

        code.push(AsmInst::Addiu(
            CallingConvention::STACK_PTR,
            CallingConvention::STACK_PTR,
            -self.size,
        ));
        let mut slot = self.size - 4;
        for reg in self.saved_registers() {
            code.push(AsmInst::Sw(reg, Address::Offset(slot, CallingConvention::STACK_PTR)));
            slot -= 4;
        }
        Ok(code)
    }

    /// Generate function epilogue
    ///
    /// Mirror of the prologue: reloads the saved registers lowest number
    /// first, releases the frame and returns.
    pub fn gen_epilogue(&self) -> Result<Vec<AsmInst>, AbiError> {
        self.validate()?;
        let mut code = Vec::new();
        if self.size > 0 {
            let mut slot = self.size - self.save_size();
            for reg in self.saved_registers().into_iter().rev() {
                code.push(AsmInst::Lw(reg, Address::Offset(slot, CallingConvention::STACK_PTR)));
                slot += 4;
            }
            code.push(AsmInst::Addiu(
                CallingConvention::STACK_PTR,
                CallingConvention::STACK_PTR,
                self.size,
            ));
        }
        code.push(AsmInst::Jr(CallingConvention::RETURN_ADDR));
        Ok(code)
    }
}
