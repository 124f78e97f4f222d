//! Expression lowering
//!
//! Post-order: operands first, then the quadruple producing the result.
//! Literals never emit anything, and arithmetic on two literals is folded
//! when `fold_constants` is on.

use super::declarations::lookup;
use super::FunctionGenerator;
use crate::errors::IrError;
use crate::operand::{Operand, OperandId, OperandKind, ValueClass};
use crate::quad::QuadOp;
use c0c_ast::{BinaryOp, FunctionRef, Symbol, TypedExpr, UnaryOp};
use c0c_codegen::{CallingConvention, Reg};
use log::trace;

impl<'a> FunctionGenerator<'a> {
    /// Lower an expression used as a value
    pub fn lower_expr(&mut self, expr: &TypedExpr) -> Result<OperandId, IrError> {
        match expr {
            TypedExpr::IntLiteral { value } => Ok(self.int_literal(*value)),
            TypedExpr::CharLiteral { value } => {
                Ok(self.ctx.add_operand(Operand::new(OperandKind::CharLiteral(*value))))
            }
            TypedExpr::Variable { symbol } => self.lookup_symbol(symbol),
            TypedExpr::Unary { op, operand, .. } => self.lower_unary(*op, operand),
            TypedExpr::Binary {
                op, left, right, ..
            } => self.lower_binary(*op, left, right),
            TypedExpr::Assign { target, value } => self.lower_assign(target, value),
            TypedExpr::ArrayIndex { array, index } => {
                let element = self.lower_element(array, index, false)?;
                let class = ValueClass::of(&array.ty);
                let temp = self.new_temp(class);
                self.emit(QuadOp::Assign, Some(temp), Some(element), None);
                Ok(temp)
            }
            TypedExpr::Call { callee, arguments } => self
                .lower_call(callee, arguments)?
                .ok_or_else(|| IrError::VoidValue {
                    callee: callee.name.clone(),
                }),
        }
    }

    pub fn lookup_symbol(&mut self, symbol: &Symbol) -> Result<OperandId, IrError> {
        lookup(self, symbol).ok_or_else(|| IrError::UnresolvedIdentifier {
            name: symbol.name.clone(),
        })
    }

    fn literal_of(&self, id: OperandId) -> Option<i32> {
        if self.options.fold_constants {
            self.ctx.operand(id).literal()
        } else {
            None
        }
    }

    fn lower_unary(&mut self, op: UnaryOp, operand: &TypedExpr) -> Result<OperandId, IrError> {
        let value = self.lower_expr(operand)?;
        match op {
            UnaryOp::Plus => Ok(value),
            UnaryOp::Minus => {
                if let Some(v) = self.literal_of(value) {
                    trace!("folding -{} to {}", v, v.wrapping_neg());
                    return Ok(self.int_literal(v.wrapping_neg()));
                }
                let temp = self.new_temp(ValueClass::Int);
                self.emit(QuadOp::Neg, Some(temp), Some(value), None);
                Ok(temp)
            }
        }
    }

    fn lower_binary(
        &mut self,
        op: BinaryOp,
        left: &TypedExpr,
        right: &TypedExpr,
    ) -> Result<OperandId, IrError> {
        let rhs = self.lower_expr(right)?;
        let lhs = self.lower_expr(left)?;

        if let (Some(a), Some(b)) = (self.literal_of(lhs), self.literal_of(rhs)) {
            if let Some(folded) = op.fold(a, b) {
                trace!("folding {} {:?} {} to {}", a, op, b, folded);
                return Ok(self.int_literal(folded));
            }
        }

        let quad_op = match op {
            BinaryOp::Add => QuadOp::Add,
            BinaryOp::Sub => QuadOp::Sub,
            BinaryOp::Mul => QuadOp::Mul,
            BinaryOp::Div => QuadOp::Div,
        };
        let temp = self.new_temp(ValueClass::Int);
        self.emit(quad_op, Some(temp), Some(lhs), Some(rhs));
        Ok(temp)
    }

    /// The assignment's result is its target; no temporary is made.
    fn lower_assign(&mut self, target: &TypedExpr, value: &TypedExpr) -> Result<OperandId, IrError> {
        let value = self.lower_expr(value)?;
        let target = self.lower_lvalue(target)?;
        self.emit(QuadOp::Assign, Some(target), Some(value), None);
        Ok(target)
    }

    pub fn lower_lvalue(&mut self, target: &TypedExpr) -> Result<OperandId, IrError> {
        match target {
            TypedExpr::Variable { symbol } if !symbol.ty.is_array() => self.lookup_symbol(symbol),
            TypedExpr::ArrayIndex { array, index } => self.lower_element(array, index, true),
            _ => Err(IrError::InvalidLvalue),
        }
    }

    fn lower_element(
        &mut self,
        array: &Symbol,
        index: &TypedExpr,
        is_lvalue: bool,
    ) -> Result<OperandId, IrError> {
        let base = self.lookup_symbol(array)?;
        let index = self.lower_expr(index)?;
        Ok(self.ctx.add_operand(Operand::new(OperandKind::ArrayElement {
            base,
            index,
            class: ValueClass::of(&array.ty),
            is_lvalue,
        })))
    }

    /// Lower a call. Returns the result temporary, or `None` for a void
    /// callee.
    pub fn lower_call(
        &mut self,
        callee: &FunctionRef,
        arguments: &[TypedExpr],
    ) -> Result<Option<OperandId>, IrError> {
        if self.ctx.is_leaf {
            self.ctx.is_leaf = false;
            self.ctx.frame.saved_register_mask |= Reg::Ra.mask_bit();
        }

        let mut values = Vec::with_capacity(arguments.len());
        for arg in arguments {
            values.push(self.lower_expr(arg)?);
        }

        let mut offset = 0;
        for value in values {
            let slot = self.ctx.add_operand(Operand::stack_slot(offset));
            self.emit(QuadOp::Push, None, Some(value), Some(slot));
            offset += CallingConvention::ARG_SLOT_SIZE;
        }
        self.ctx.arg_area = self.ctx.arg_area.max(offset);

        let function = self.ctx.add_operand(Operand::new(OperandKind::Function {
            name: callee.name.clone(),
            returns_value: callee.returns_value(),
        }));
        let result = if callee.returns_value() {
            Some(self.new_temp(ValueClass::of(&callee.return_type)))
        } else {
            None
        };
        self.emit(QuadOp::Call, result, Some(function), None);
        Ok(result)
    }
}
