//! Operand access
//!
//! Values are staged through `$t8`/`$t9`. A load returns the register that
//! holds the value, which is the operand's bound register when it has one,
//! so callers must not assume the scratch register they passed was written.

use crate::errors::CodegenError;
use crate::function::FunctionLowering;
use c0c_codegen::{Address, AsmInst, CallingConvention, Reg};
use c0c_ir::{OperandId, OperandKind};

impl<'a> FunctionLowering<'a> {
    pub fn unsupported(&self, op: &str, id: OperandId) -> CodegenError {
        CodegenError::UnsupportedOperand {
            op: op.to_string(),
            operand: self.ctx.format_operand(id),
        }
    }

    /// Bound register of `id`, if bindings apply to this function
    pub fn bound(&self, id: OperandId) -> Option<Reg> {
        if self.use_bindings {
            self.ctx.binding(id)
        } else {
            None
        }
    }

    pub fn stack_offset(&self, id: OperandId) -> Result<i32, CodegenError> {
        let operand = self.ctx.operand(id);
        if !operand.resolved {
            return Err(CodegenError::Unresolved {
                function: self.ctx.name.clone(),
                operand: self.ctx.format_operand(id),
            });
        }
        Ok(operand.offset)
    }

    /// Put the value of `id` in a register, using `scratch` if needed.
    pub fn load(&mut self, id: OperandId, scratch: Reg) -> Result<Reg, CodegenError> {
        let ctx = self.ctx;
        match &ctx.operand(id).kind {
            OperandKind::IntLiteral(value) => {
                self.code.push(AsmInst::Li(scratch, *value));
                Ok(scratch)
            }
            OperandKind::CharLiteral(c) => {
                self.code.push(AsmInst::Li(scratch, *c as i32));
                Ok(scratch)
            }
            OperandKind::Variable { ty, .. } if ty.is_array() => Err(self.unsupported("load", id)),
            OperandKind::Variable {
                name, is_global: true, ..
            } => {
                self.code.push(AsmInst::Lw(scratch, Address::Label(name.clone())));
                Ok(scratch)
            }
            OperandKind::Variable { .. } | OperandKind::Temporary { .. } => {
                if let Some(reg) = self.bound(id) {
                    return Ok(reg);
                }
                let offset = self.stack_offset(id)?;
                self.code
                    .push(AsmInst::Lw(scratch, Address::Offset(offset, CallingConvention::STACK_PTR)));
                Ok(scratch)
            }
            OperandKind::ArrayElement { base, index, .. } => {
                let address = self.element_address(*base, *index, scratch)?;
                self.code.push(AsmInst::Lw(scratch, address));
                Ok(scratch)
            }
            _ => Err(self.unsupported("load", id)),
        }
    }

    /// Load `id` into exactly `target`.
    pub fn load_into(&mut self, id: OperandId, target: Reg) -> Result<(), CodegenError> {
        let reg = self.load(id, target)?;
        if reg != target {
            self.code.push(AsmInst::Move(target, reg));
        }
        Ok(())
    }

    /// Address of `base[index]`, computed in `reg`.
    ///
    /// Globals use `label(reg)` with `reg = index*4`; stack arrays add the
    /// array's frame offset and `$sp` first.
    fn element_address(&mut self, base: OperandId, index: OperandId, reg: Reg) -> Result<Address, CodegenError> {
        let ctx = self.ctx;
        let index = self.load(index, reg)?;
        self.code.push(AsmInst::Sll(reg, index, 2));
        match &ctx.operand(base).kind {
            OperandKind::Variable {
                name, is_global: true, ..
            } => Ok(Address::Indexed(name.clone(), reg)),
            OperandKind::Variable { .. } => {
                let offset = self.stack_offset(base)?;
                self.code.push(AsmInst::Addiu(reg, reg, offset));
                self.code.push(AsmInst::Addu(reg, reg, CallingConvention::STACK_PTR));
                Ok(Address::Offset(0, reg))
            }
            _ => Err(self.unsupported("index", base)),
        }
    }

    /// Store `value` into the location of `id`.
    pub fn store(&mut self, id: OperandId, value: Reg) -> Result<(), CodegenError> {
        let ctx = self.ctx;
        match &ctx.operand(id).kind {
            OperandKind::Variable { ty, .. } if ty.is_array() => Err(self.unsupported("store", id)),
            OperandKind::Variable {
                name, is_global: true, ..
            } => {
                self.code.push(AsmInst::Sw(value, Address::Label(name.clone())));
                Ok(())
            }
            OperandKind::Variable { .. } | OperandKind::Temporary { .. } => {
                if let Some(reg) = self.bound(id) {
                    if reg != value {
                        self.code.push(AsmInst::Move(reg, value));
                    }
                    return Ok(());
                }
                let offset = self.stack_offset(id)?;
                self.code
                    .push(AsmInst::Sw(value, Address::Offset(offset, CallingConvention::STACK_PTR)));
                Ok(())
            }
            OperandKind::ArrayElement { base, index, .. } => {
                let address_reg = CallingConvention::other_scratch(value);
                let address = self.element_address(*base, *index, address_reg)?;
                self.code.push(AsmInst::Sw(value, address));
                Ok(())
            }
            _ => Err(self.unsupported("store", id)),
        }
    }

    /// Register carrying the argument of an outgoing slot, if register
    /// arguments are on
    pub fn arg_register(&self, slot_offset: i32) -> Option<Reg> {
        if self.options.reg_args {
            CallingConvention::arg_register(slot_offset)
        } else {
            None
        }
    }

    /// Register to compute a result for `dst` in: its binding, else `$t8`.
    pub fn result_reg(&self, dst: OperandId) -> Reg {
        self.bound(dst).unwrap_or(CallingConvention::SCRATCH[0])
    }
}
