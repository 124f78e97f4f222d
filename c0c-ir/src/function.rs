//! Function Context
//!
//! Everything the generator accumulates for one function: its operand arena,
//! the quadruple list in generation order, the frame, the declaration map,
//! the leaf flag and the register bindings of the leaf fast path.

use crate::arena::Arena;
use crate::errors::IrError;
use crate::naming::{entry_label, exit_label};
use crate::operand::{Operand, OperandId, OperandKind};
use crate::quad::{QuadOp, Quadruple};
use c0c_codegen::{Frame, Reg, RegisterPool};
use c0c_common::{DeclId, TempId, Type};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize)]
pub struct FunctionContext {
    pub name: String,
    pub return_type: Type,
    /// Parameter operands in declaration order
    pub params: Vec<OperandId>,
    pub operands: Arena<Operand>,
    pub quads: Vec<Quadruple>,
    pub frame: Frame,
    #[serde(skip)]
    pub(crate) symbols: HashMap<DeclId, OperandId>,
    pub(crate) next_temp: TempId,
    /// Bytes of locals and temporaries allocated so far
    pub(crate) cursor: i32,
    /// Largest outgoing-argument area needed by any call
    pub(crate) arg_area: i32,
    pub(crate) is_leaf: bool,
    #[serde(skip)]
    pub(crate) registers: RegisterPool<OperandId>,
    pub(crate) frame_resolved: bool,
}

impl FunctionContext {
    pub fn new(name: &str, return_type: Type) -> Self {
        Self {
            name: name.to_string(),
            return_type,
            params: Vec::new(),
            operands: Arena::new(),
            quads: Vec::new(),
            frame: Frame::default(),
            symbols: HashMap::new(),
            next_temp: 0,
            cursor: 0,
            arg_area: 0,
            is_leaf: true,
            registers: RegisterPool::new(),
            frame_resolved: false,
        }
    }

    pub fn is_main(&self) -> bool {
        self.name == "main"
    }

    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    pub fn is_frame_resolved(&self) -> bool {
        self.frame_resolved
    }

    pub fn entry_label(&self) -> String {
        entry_label(&self.name)
    }

    pub fn exit_label(&self) -> String {
        exit_label(&self.name)
    }

    pub fn arg_area(&self) -> i32 {
        self.arg_area
    }

    pub fn cursor(&self) -> i32 {
        self.cursor
    }

    pub fn operand(&self, id: OperandId) -> &Operand {
        self.operands.get(id)
    }

    pub fn lookup(&self, decl: DeclId) -> Option<OperandId> {
        self.symbols.get(&decl).copied()
    }

    /// Register bound to `id`, if any
    pub fn binding(&self, id: OperandId) -> Option<Reg> {
        self.registers.binding(id)
    }

    pub fn bound_registers(&self) -> Vec<Reg> {
        self.registers.bound_registers()
    }

    pub fn add_operand(&mut self, operand: Operand) -> OperandId {
        self.operands.alloc(operand)
    }

    pub fn push(&mut self, quad: Quadruple) {
        self.quads.push(quad);
    }

    /// Flip the branch sense of the most recently emitted quadruple.
    pub fn negate_last_branch(&mut self) -> Result<(), IrError> {
        let last = self.quads.last_mut().ok_or_else(|| IrError::NoBranchToNegate {
            found: "<empty>".to_string(),
        })?;
        if last.negate() {
            Ok(())
        } else {
            Err(IrError::NoBranchToNegate {
                found: last.op.to_string(),
            })
        }
    }

    /// Try to give `id` a register from the pool. On success the binding is
    /// recorded in the pool and on the operand.
    pub fn allocate_register(&mut self, id: OperandId) -> Option<Reg> {
        let reg = self.registers.allocate(id)?;
        self.operands.get_mut(id).binding = Some(reg);
        Some(reg)
    }

    /// Listing form of an operand, e.g. `x(4)`, `@T3(8)`, `g[@T1(12)]`
    pub fn format_operand(&self, id: OperandId) -> String {
        let operand = self.operands.get(id);
        match &operand.kind {
            OperandKind::IntLiteral(v) => v.to_string(),
            OperandKind::CharLiteral(c) => format!("'{}'", *c as char),
            OperandKind::Variable { name, is_global: true, .. } => name.clone(),
            OperandKind::Variable { name, .. } => format!("{}({})", name, operand.offset),
            OperandKind::Temporary { id, .. } => format!("@T{}({})", id, operand.offset),
            OperandKind::Label(name) => name.clone(),
            OperandKind::ArrayElement { base, index, .. } => {
                let name = self.operands.get(*base).symbol_name().unwrap_or("?");
                format!("{}[{}]", name, self.format_operand(*index))
            }
            OperandKind::StackOffsetOnly => format!("({})", operand.offset),
            OperandKind::StringLiteral { label, text } => format!("{} {:?}", label, text),
            OperandKind::Function { name, .. } => name.clone(),
        }
    }

    /// Listing form of a quadruple, e.g. `plus @T3(8) = x(4) + 1`
    pub fn format_quad(&self, quad: &Quadruple) -> String {
        let op = |slot: Option<OperandId>| match slot {
            Some(id) => self.format_operand(id),
            None => "_".to_string(),
        };
        match quad.op {
            QuadOp::Label => format!("{}:", op(quad.dst)),
            QuadOp::Goto => format!("goto {}", op(quad.dst)),
            QuadOp::Branch(cond) if cond.is_unary() => {
                format!("{} {}, {}", cond.mnemonic(), op(quad.dst), op(quad.arg1))
            }
            QuadOp::Branch(cond) => format!(
                "{} {}, {}, {}",
                cond.mnemonic(),
                op(quad.dst),
                op(quad.arg1),
                op(quad.arg2)
            ),
            QuadOp::Param => format!("param {}", op(quad.dst)),
            QuadOp::Print => format!("printf {}", op(quad.arg1)),
            QuadOp::Scan => format!("scanf {}", op(quad.dst)),
            QuadOp::Assign => format!("assign {} = {}", op(quad.dst), op(quad.arg1)),
            QuadOp::Add | QuadOp::Sub | QuadOp::Mul | QuadOp::Div => {
                let symbol = match quad.op {
                    QuadOp::Add => "+",
                    QuadOp::Sub => "-",
                    QuadOp::Mul => "*",
                    _ => "/",
                };
                format!(
                    "{} {} = {} {} {}",
                    quad.op,
                    op(quad.dst),
                    op(quad.arg1),
                    symbol,
                    op(quad.arg2)
                )
            }
            QuadOp::Neg => format!("neg {} = -{}", op(quad.dst), op(quad.arg1)),
            QuadOp::Return => match quad.arg1 {
                Some(value) => format!("ret {} (to {})", self.format_operand(value), op(quad.arg2)),
                None => format!("ret (to {})", op(quad.arg2)),
            },
            QuadOp::Push => format!("push {}, {}", op(quad.arg1), op(quad.arg2)),
            QuadOp::Call => match quad.dst {
                Some(dst) => format!("call {} = call {}", self.format_operand(dst), op(quad.arg1)),
                None => format!("call {}", op(quad.arg1)),
            },
        }
    }

    /// Human-readable listing of the whole function
    pub fn listing(&self) -> String {
        let mut out = String::new();
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| self.operands.get(*p).symbol_name().unwrap_or("?").to_string())
            .collect();
        out.push_str(&format!(
            "define {} {}({}) {{\n",
            self.return_type,
            self.name,
            params.join(", ")
        ));
        for quad in &self.quads {
            out.push_str(&format!("    {}\n", self.format_quad(quad)));
        }
        out.push_str("}\n");
        out.push_str(&format!(
            ".frame {} mask {:#010x}\n",
            self.frame.size, self.frame.saved_register_mask
        ));
        out
    }
}
