//! MIPS32 Assembly Instruction Definitions
//!
//! This module defines the register file and the instruction subset emitted by
//! the compiler, including the assembler pseudo-instructions (`li`, `la`,
//! `move`, the compare-and-branch family) accepted by MARS/SPIM.

use serde::{Deserialize, Serialize};
use std::fmt;

/// MIPS32 general purpose registers, in hardware numbering order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Reg {
    Zero,
    At,
    V0, V1,
    A0, A1, A2, A3,
    T0, T1, T2, T3, T4, T5, T6, T7,
    S0, S1, S2, S3, S4, S5, S6, S7,
    T8, T9,
    K0, K1,
    Gp,
    Sp,
    Fp,
    Ra,
}

impl Reg {
    /// All registers indexed by hardware number.
    pub const ALL: [Reg; 32] = [
        Reg::Zero, Reg::At, Reg::V0, Reg::V1,
        Reg::A0, Reg::A1, Reg::A2, Reg::A3,
        Reg::T0, Reg::T1, Reg::T2, Reg::T3, Reg::T4, Reg::T5, Reg::T6, Reg::T7,
        Reg::S0, Reg::S1, Reg::S2, Reg::S3, Reg::S4, Reg::S5, Reg::S6, Reg::S7,
        Reg::T8, Reg::T9, Reg::K0, Reg::K1,
        Reg::Gp, Reg::Sp, Reg::Fp, Reg::Ra,
    ];

    /// Hardware register number (0-31)
    pub fn number(self) -> u32 {
        self as u32
    }

    /// Bit of this register in a saved-register mask
    pub fn mask_bit(self) -> u32 {
        1u32 << self.number()
    }

    pub fn name(self) -> &'static str {
        match self {
            Reg::Zero => "zero",
            Reg::At => "at",
            Reg::V0 => "v0",
            Reg::V1 => "v1",
            Reg::A0 => "a0",
            Reg::A1 => "a1",
            Reg::A2 => "a2",
            Reg::A3 => "a3",
            Reg::T0 => "t0",
            Reg::T1 => "t1",
            Reg::T2 => "t2",
            Reg::T3 => "t3",
            Reg::T4 => "t4",
            Reg::T5 => "t5",
            Reg::T6 => "t6",
            Reg::T7 => "t7",
            Reg::S0 => "s0",
            Reg::S1 => "s1",
            Reg::S2 => "s2",
            Reg::S3 => "s3",
            Reg::S4 => "s4",
            Reg::S5 => "s5",
            Reg::S6 => "s6",
            Reg::S7 => "s7",
            Reg::T8 => "t8",
            Reg::T9 => "t9",
            Reg::K0 => "k0",
            Reg::K1 => "k1",
            Reg::Gp => "gp",
            Reg::Sp => "sp",
            Reg::Fp => "fp",
            Reg::Ra => "ra",
        }
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.name())
    }
}

/// Memory operand of a load or store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    /// `label`
    Label(String),
    /// `offset($base)`
    Offset(i32, Reg),
    /// `label($index)`: label address plus a byte offset held in a register
    Indexed(String, Reg),
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Label(label) => write!(f, "{}", label),
            Address::Offset(off, base) => write!(f, "{}({})", off, base),
            Address::Indexed(label, index) => write!(f, "{}({})", label, index),
        }
    }
}

/// MIPS32 instructions emitted by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmInst {
    // Constants and addresses
    Li(Reg, i32),                 // rd = imm
    La(Reg, String),              // rd = &label

    // Memory
    Lw(Reg, Address),             // rt = mem[addr]
    Sw(Reg, Address),             // mem[addr] = rt

    // Arithmetic
    Move(Reg, Reg),               // rd = rs
    Addu(Reg, Reg, Reg),          // rd = rs + rt
    Subu(Reg, Reg, Reg),          // rd = rs - rt
    Mul(Reg, Reg, Reg),           // rd = rs * rt
    Div(Reg, Reg),                // lo = rs / rt, hi = rs % rt
    Mflo(Reg),                    // rd = lo
    Addiu(Reg, Reg, i32),         // rt = rs + imm
    Sll(Reg, Reg, u8),            // rd = rt << shamt

    // Control flow
    J(String),
    Jal(String),
    Jr(Reg),
    Beq(Reg, Reg, String),
    Bne(Reg, Reg, String),
    Blt(Reg, Reg, String),
    Bge(Reg, Reg, String),
    Bgt(Reg, Reg, String),
    Ble(Reg, Reg, String),
    Beqz(Reg, String),
    Bnez(Reg, String),

    Syscall,

    // Assembly pseudo-instructions
    Label(String),
    Comment(String),
}

impl AsmInst {
    /// Target label of a jump or branch.
    pub fn target(&self) -> Option<&str> {
        match self {
            AsmInst::J(l)
            | AsmInst::Jal(l)
            | AsmInst::Beq(_, _, l)
            | AsmInst::Bne(_, _, l)
            | AsmInst::Blt(_, _, l)
            | AsmInst::Bge(_, _, l)
            | AsmInst::Bgt(_, _, l)
            | AsmInst::Ble(_, _, l)
            | AsmInst::Beqz(_, l)
            | AsmInst::Bnez(_, l) => Some(l),
            _ => None,
        }
    }
}

impl fmt::Display for AsmInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmInst::Li(rd, imm) => write!(f, "li {}, {}", rd, imm),
            AsmInst::La(rd, label) => write!(f, "la {}, {}", rd, label),

            AsmInst::Lw(rt, addr) => write!(f, "lw {}, {}", rt, addr),
            AsmInst::Sw(rt, addr) => write!(f, "sw {}, {}", rt, addr),

            AsmInst::Move(rd, rs) => write!(f, "move {}, {}", rd, rs),
            AsmInst::Addu(rd, rs, rt) => write!(f, "addu {}, {}, {}", rd, rs, rt),
            AsmInst::Subu(rd, rs, rt) => write!(f, "subu {}, {}, {}", rd, rs, rt),
            AsmInst::Mul(rd, rs, rt) => write!(f, "mul {}, {}, {}", rd, rs, rt),
            AsmInst::Div(rs, rt) => write!(f, "div {}, {}", rs, rt),
            AsmInst::Mflo(rd) => write!(f, "mflo {}", rd),
            AsmInst::Addiu(rt, rs, imm) => write!(f, "addiu {}, {}, {}", rt, rs, imm),
            AsmInst::Sll(rd, rt, shamt) => write!(f, "sll {}, {}, {}", rd, rt, shamt),

            AsmInst::J(label) => write!(f, "j {}", label),
            AsmInst::Jal(label) => write!(f, "jal {}", label),
            AsmInst::Jr(rs) => write!(f, "jr {}", rs),
            AsmInst::Beq(rs, rt, label) => write!(f, "beq {}, {}, {}", rs, rt, label),
            AsmInst::Bne(rs, rt, label) => write!(f, "bne {}, {}, {}", rs, rt, label),
            AsmInst::Blt(rs, rt, label) => write!(f, "blt {}, {}, {}", rs, rt, label),
            AsmInst::Bge(rs, rt, label) => write!(f, "bge {}, {}, {}", rs, rt, label),
            AsmInst::Bgt(rs, rt, label) => write!(f, "bgt {}, {}, {}", rs, rt, label),
            AsmInst::Ble(rs, rt, label) => write!(f, "ble {}, {}, {}", rs, rt, label),
            AsmInst::Beqz(rs, label) => write!(f, "beqz {}, {}", rs, label),
            AsmInst::Bnez(rs, label) => write!(f, "bnez {}, {}", rs, label),

            AsmInst::Syscall => write!(f, "syscall"),

            AsmInst::Label(name) => write!(f, "{}:", name),
            AsmInst::Comment(text) => write!(f, "# {}", text),
        }
    }
}

/// Storage directive of one data-section entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataDirective {
    /// `.word value:count`
    Word { value: i32, count: u32 },
    /// `.space bytes` (zero-filled)
    Space(u32),
    /// `.asciiz "text"`; the text is stored unescaped
    Asciiz(String),
    /// `.align power` (aligns to 2^power bytes)
    Align(u32),
}

/// One line of the data section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataItem {
    pub label: Option<String>,
    pub directive: DataDirective,
}

impl DataItem {
    pub fn labeled(label: impl Into<String>, directive: DataDirective) -> Self {
        Self {
            label: Some(label.into()),
            directive,
        }
    }

    pub fn align(power: u32) -> Self {
        Self {
            label: None,
            directive: DataDirective::Align(power),
        }
    }
}

/// A complete assembled program: data section followed by text section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsmProgram {
    pub data: Vec<DataItem>,
    pub text: Vec<AsmInst>,
}

impl AsmProgram {
    /// Instructions only, without labels and comments
    pub fn instructions(&self) -> impl Iterator<Item = &AsmInst> {
        self.text
            .iter()
            .filter(|i| !matches!(i, AsmInst::Label(_) | AsmInst::Comment(_)))
    }
}
