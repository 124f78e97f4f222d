//! Per-quadruple instruction templates

use crate::errors::CodegenError;
use crate::function::FunctionLowering;
use c0c_codegen::{Address, AsmInst, CallingConvention, Reg, Syscall};
use c0c_ir::naming::entry_label;
use c0c_ir::{BranchCond, OperandId, OperandKind, QuadOp, Quadruple, ValueClass};

const LHS: Reg = CallingConvention::SCRATCH[0];
const RHS: Reg = CallingConvention::SCRATCH[1];

fn required(quad: &Quadruple, slot: Option<OperandId>, name: &'static str) -> Result<OperandId, CodegenError> {
    slot.ok_or_else(|| CodegenError::MissingOperand {
        op: quad.op.to_string(),
        slot: name,
    })
}

impl<'a> FunctionLowering<'a> {
    pub fn lower_quad(&mut self, quad: &Quadruple) -> Result<(), CodegenError> {
        if self.options.annotate && quad.op != QuadOp::Label {
            self.code.push(AsmInst::Comment(self.ctx.format_quad(quad)));
        }

        match quad.op {
            QuadOp::Label => {
                let label = self.label(quad, quad.dst)?;
                self.code.push(AsmInst::Label(label));
            }
            QuadOp::Goto => {
                let label = self.label(quad, quad.dst)?;
                self.code.push(AsmInst::J(label));
            }
            QuadOp::Branch(cond) => self.lower_branch(quad, cond)?,
            QuadOp::Param => self.lower_param(quad)?,
            QuadOp::Print => self.lower_print(quad)?,
            QuadOp::Scan => self.lower_scan(quad)?,
            QuadOp::Assign => {
                let dst = required(quad, quad.dst, "destination")?;
                let value = self.load(required(quad, quad.arg1, "source")?, LHS)?;
                self.store(dst, value)?;
            }
            QuadOp::Add | QuadOp::Sub | QuadOp::Mul | QuadOp::Div => self.lower_arithmetic(quad)?,
            QuadOp::Neg => {
                let dst = required(quad, quad.dst, "destination")?;
                let value = self.load(required(quad, quad.arg1, "source")?, LHS)?;
                let result = self.result_reg(dst);
                self.code.push(AsmInst::Subu(result, Reg::Zero, value));
                self.store(dst, result)?;
            }
            QuadOp::Return => self.lower_return(quad)?,
            QuadOp::Push => self.lower_push(quad)?,
            QuadOp::Call => {
                let function = required(quad, quad.arg1, "function")?;
                let name = match &self.ctx.operand(function).kind {
                    OperandKind::Function { name, .. } => name.clone(),
                    _ => return Err(self.unsupported("call", function)),
                };
                self.code.push(AsmInst::Jal(entry_label(&name)));
                if let Some(dst) = quad.dst {
                    self.store(dst, CallingConvention::RETURN_VALUE)?;
                }
            }
        }
        Ok(())
    }

    fn label(&self, quad: &Quadruple, slot: Option<OperandId>) -> Result<String, CodegenError> {
        let id = required(quad, slot, "label")?;
        match &self.ctx.operand(id).kind {
            OperandKind::Label(name) => Ok(name.clone()),
            _ => Err(self.unsupported(&quad.op.to_string(), id)),
        }
    }

    fn lower_branch(&mut self, quad: &Quadruple, cond: BranchCond) -> Result<(), CodegenError> {
        let target = self.label(quad, quad.dst)?;
        let lhs = self.load(required(quad, quad.arg1, "lhs")?, LHS)?;
        let rhs = if cond.is_unary() {
            None
        } else {
            Some(self.load(required(quad, quad.arg2, "rhs")?, RHS)?)
        };

        let inst = match (cond, rhs) {
            (BranchCond::Zero, _) => AsmInst::Beqz(lhs, target),
            (BranchCond::NonZero, _) => AsmInst::Bnez(lhs, target),
            (BranchCond::Eq, Some(rhs)) => AsmInst::Beq(lhs, rhs, target),
            (BranchCond::Ne, Some(rhs)) => AsmInst::Bne(lhs, rhs, target),
            (BranchCond::Lt, Some(rhs)) => AsmInst::Blt(lhs, rhs, target),
            (BranchCond::Ge, Some(rhs)) => AsmInst::Bge(lhs, rhs, target),
            (BranchCond::Gt, Some(rhs)) => AsmInst::Bgt(lhs, rhs, target),
            (BranchCond::Le, Some(rhs)) => AsmInst::Ble(lhs, rhs, target),
            (_, None) => {
                return Err(CodegenError::MissingOperand {
                    op: quad.op.to_string(),
                    slot: "rhs",
                })
            }
        };
        self.code.push(inst);
        Ok(())
    }

    /// The first four arguments go to `$a0`-`$a3` when register arguments
    /// are on; the rest are stored into the outgoing slot.
    fn lower_push(&mut self, quad: &Quadruple) -> Result<(), CodegenError> {
        let value = required(quad, quad.arg1, "value")?;
        let slot = required(quad, quad.arg2, "slot")?;
        let offset = match self.ctx.operand(slot).kind {
            OperandKind::StackOffsetOnly => self.ctx.operand(slot).offset,
            _ => return Err(self.unsupported("push", slot)),
        };
        if let Some(reg) = self.arg_register(offset) {
            return self.load_into(value, reg);
        }
        let value = self.load(value, LHS)?;
        self.code
            .push(AsmInst::Sw(value, Address::Offset(offset, CallingConvention::STACK_PTR)));
        Ok(())
    }

    /// A parameter that arrived in `$aN` is moved to its register, or
    /// stored to its slot in the caller's argument area. A bound stack
    /// parameter is loaded into its register; an unbound one is read in
    /// place and needs no code.
    fn lower_param(&mut self, quad: &Quadruple) -> Result<(), CodegenError> {
        let param = required(quad, quad.dst, "parameter")?;
        let position = self.ctx.params.iter().position(|p| *p == param);
        let incoming = position.and_then(|i| self.arg_register(i as i32 * CallingConvention::ARG_SLOT_SIZE));

        match (incoming, self.bound(param)) {
            (Some(arg), Some(reg)) => self.code.push(AsmInst::Move(reg, arg)),
            (Some(arg), None) => {
                let offset = self.stack_offset(param)?;
                self.code
                    .push(AsmInst::Sw(arg, Address::Offset(offset, CallingConvention::STACK_PTR)));
            }
            (None, Some(reg)) => {
                let offset = self.stack_offset(param)?;
                self.code
                    .push(AsmInst::Lw(reg, Address::Offset(offset, CallingConvention::STACK_PTR)));
            }
            (None, None) => {}
        }
        Ok(())
    }

    fn lower_print(&mut self, quad: &Quadruple) -> Result<(), CodegenError> {
        let value = required(quad, quad.arg1, "value")?;
        let ctx = self.ctx;
        let operand = ctx.operand(value);
        let syscall = match &operand.kind {
            OperandKind::StringLiteral { label, .. } => {
                self.code.push(AsmInst::La(CallingConvention::SYSCALL_ARG, label.clone()));
                Syscall::PrintString
            }
            _ => {
                let class = operand
                    .value_class()
                    .ok_or_else(|| self.unsupported("printf", value))?;
                self.load_into(value, CallingConvention::SYSCALL_ARG)?;
                match class {
                    ValueClass::Int => Syscall::PrintInt,
                    ValueClass::Char => Syscall::PrintChar,
                }
            }
        };
        self.code.push(AsmInst::Li(CallingConvention::RETURN_VALUE, syscall.code()));
        self.code.push(AsmInst::Syscall);
        Ok(())
    }

    fn lower_scan(&mut self, quad: &Quadruple) -> Result<(), CodegenError> {
        let dst = required(quad, quad.dst, "destination")?;
        let syscall = match self.ctx.operand(dst).value_class() {
            Some(ValueClass::Int) => Syscall::ReadInt,
            Some(ValueClass::Char) => Syscall::ReadChar,
            None => return Err(self.unsupported("scanf", dst)),
        };
        self.code.push(AsmInst::Li(CallingConvention::RETURN_VALUE, syscall.code()));
        self.code.push(AsmInst::Syscall);
        self.store(dst, CallingConvention::RETURN_VALUE)
    }

    fn lower_arithmetic(&mut self, quad: &Quadruple) -> Result<(), CodegenError> {
        let dst = required(quad, quad.dst, "destination")?;
        let lhs = self.load(required(quad, quad.arg1, "lhs")?, LHS)?;
        let rhs = self.load(required(quad, quad.arg2, "rhs")?, RHS)?;
        let result = self.result_reg(dst);
        match quad.op {
            QuadOp::Add => self.code.push(AsmInst::Addu(result, lhs, rhs)),
            QuadOp::Sub => self.code.push(AsmInst::Subu(result, lhs, rhs)),
            QuadOp::Mul => self.code.push(AsmInst::Mul(result, lhs, rhs)),
            _ => {
                self.code.push(AsmInst::Div(lhs, rhs));
                self.code.push(AsmInst::Mflo(result));
            }
        }
        self.store(dst, result)
    }

    /// `main` returns by exiting; other functions leave their value in `$v0`
    /// and jump to the exit label, or run the epilogue in place.
    fn lower_return(&mut self, quad: &Quadruple) -> Result<(), CodegenError> {
        if self.ctx.is_main() {
            self.exit_syscall();
            return Ok(());
        }
        if let Some(value) = quad.arg1 {
            self.load_into(value, CallingConvention::RETURN_VALUE)?;
        }
        if self.options.inline_epilogue {
            let epilogue = self.epilogue()?;
            self.code.extend(epilogue);
        } else {
            let exit = self.label(quad, quad.arg2)?;
            self.code.push(AsmInst::J(exit));
        }
        Ok(())
    }
}
