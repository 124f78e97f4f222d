//! Quadruples
//!
//! Operand slots per opcode:
//!
//! | op        | dst            | arg1           | arg2              |
//! |-----------|----------------|----------------|-------------------|
//! | Label     | label          |                |                   |
//! | Goto      | label          |                |                   |
//! | Branch    | label          | lhs / value    | rhs (compares)    |
//! | Param     | parameter      |                |                   |
//! | Print     |                | value / string |                   |
//! | Scan      | variable       |                |                   |
//! | Assign    | target         | value          |                   |
//! | Add..Div  | result         | lhs            | rhs               |
//! | Neg       | result         | value          |                   |
//! | Return    |                | value (opt)    | exit label        |
//! | Push      |                | value          | argument slot     |
//! | Call      | result (opt)   | function       |                   |

use crate::operand::OperandId;
use c0c_ast::CompareOp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Branch conditions, in negation pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BranchCond {
    Eq,
    Ne,
    Lt,
    Ge,
    Gt,
    Le,
    /// Taken when the value is zero
    Zero,
    NonZero,
}

impl BranchCond {
    pub const ALL: [BranchCond; 8] = [
        BranchCond::Eq,
        BranchCond::Ne,
        BranchCond::Lt,
        BranchCond::Ge,
        BranchCond::Gt,
        BranchCond::Le,
        BranchCond::Zero,
        BranchCond::NonZero,
    ];

    pub fn negate(self) -> Self {
        match self {
            BranchCond::Eq => BranchCond::Ne,
            BranchCond::Ne => BranchCond::Eq,
            BranchCond::Lt => BranchCond::Ge,
            BranchCond::Ge => BranchCond::Lt,
            BranchCond::Gt => BranchCond::Le,
            BranchCond::Le => BranchCond::Gt,
            BranchCond::Zero => BranchCond::NonZero,
            BranchCond::NonZero => BranchCond::Zero,
        }
    }

    /// The branch taken when `op` is false
    pub fn when_false(op: CompareOp) -> Self {
        match op {
            CompareOp::Ge => BranchCond::Lt,
            CompareOp::Le => BranchCond::Gt,
            CompareOp::Eq => BranchCond::Ne,
            CompareOp::Ne => BranchCond::Eq,
            CompareOp::Gt => BranchCond::Le,
            CompareOp::Lt => BranchCond::Ge,
        }
    }

    /// Whether the branch tests one value instead of comparing two
    pub fn is_unary(self) -> bool {
        matches!(self, BranchCond::Zero | BranchCond::NonZero)
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            BranchCond::Eq => "beq",
            BranchCond::Ne => "bne",
            BranchCond::Lt => "blt",
            BranchCond::Ge => "bge",
            BranchCond::Gt => "bgt",
            BranchCond::Le => "ble",
            BranchCond::Zero => "bz",
            BranchCond::NonZero => "bnz",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuadOp {
    Label,
    Branch(BranchCond),
    Goto,
    Param,
    Print,
    Scan,
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Neg,
    Return,
    Push,
    Call,
}

impl QuadOp {
    pub fn name(self) -> &'static str {
        match self {
            QuadOp::Label => "label",
            QuadOp::Branch(cond) => cond.mnemonic(),
            QuadOp::Goto => "goto",
            QuadOp::Param => "param",
            QuadOp::Print => "printf",
            QuadOp::Scan => "scanf",
            QuadOp::Assign => "assign",
            QuadOp::Add => "plus",
            QuadOp::Sub => "minu",
            QuadOp::Mul => "mult",
            QuadOp::Div => "div",
            QuadOp::Neg => "neg",
            QuadOp::Return => "ret",
            QuadOp::Push => "push",
            QuadOp::Call => "call",
        }
    }

    pub fn is_branch(self) -> bool {
        matches!(self, QuadOp::Branch(_))
    }
}

impl fmt::Display for QuadOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quadruple {
    pub op: QuadOp,
    pub dst: Option<OperandId>,
    pub arg1: Option<OperandId>,
    pub arg2: Option<OperandId>,
}

impl Quadruple {
    pub fn new(
        op: QuadOp,
        dst: Option<OperandId>,
        arg1: Option<OperandId>,
        arg2: Option<OperandId>,
    ) -> Self {
        Self { op, dst, arg1, arg2 }
    }

    /// All operand slots in dst, arg1, arg2 order
    pub fn operands(&self) -> impl Iterator<Item = OperandId> {
        [self.dst, self.arg1, self.arg2].into_iter().flatten()
    }

    /// Flip the sense of a branch in place.
    pub fn negate(&mut self) -> bool {
        match self.op {
            QuadOp::Branch(cond) => {
                self.op = QuadOp::Branch(cond.negate());
                true
            }
            _ => false,
        }
    }
}
