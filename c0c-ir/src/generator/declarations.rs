//! Declarations: globals, parameters and locals

use super::FunctionGenerator;
use crate::data_segment::DataSegmentBuilder;
use crate::operand::{Operand, OperandId, OperandKind};
use crate::quad::QuadOp;
use c0c_ast::{GlobalDecl, LocalDecl, Symbol};
use log::debug;

pub fn declare_global(data: &mut DataSegmentBuilder, decl: &GlobalDecl) {
    data.add_global(&decl.symbol.name, &decl.symbol.ty, decl.const_value);
}

fn variable(symbol: &Symbol) -> OperandKind {
    OperandKind::Variable {
        decl: symbol.id,
        name: symbol.name.clone(),
        ty: symbol.ty.clone(),
        is_global: symbol.is_global,
    }
}

fn try_bind(gen: &mut FunctionGenerator, id: OperandId, symbol: &Symbol) {
    if !gen.options.leaf_registers || symbol.ty.is_array() {
        return;
    }
    match gen.ctx.allocate_register(id) {
        Some(reg) => debug!("'{}' bound to {}", symbol.name, reg),
        None => debug!("register pool exhausted, '{}' stays on the stack", symbol.name),
    }
}

/// Parameters sit in the caller's outgoing-argument area, so their
/// provisional offset is their slot in that area and they take no space
/// from the allocation cursor.
pub fn declare_param(gen: &mut FunctionGenerator, symbol: &Symbol) {
    let slot = 4 * gen.ctx.params.len() as i32;
    let id = gen.ctx.add_operand(Operand::on_stack(variable(symbol), slot));
    try_bind(gen, id, symbol);
    gen.ctx.symbols.insert(symbol.id, id);
    gen.ctx.params.push(id);
    gen.emit(QuadOp::Param, Some(id), None, None);
}

pub fn declare_local(gen: &mut FunctionGenerator, decl: &LocalDecl) {
    let symbol = &decl.symbol;
    gen.ctx.cursor += symbol.ty.size_in_bytes() as i32;
    let id = gen
        .ctx
        .add_operand(Operand::on_stack(variable(symbol), gen.ctx.cursor));
    try_bind(gen, id, symbol);
    gen.ctx.symbols.insert(symbol.id, id);

    if let Some(value) = decl.const_value {
        let init = if symbol.ty.is_char() {
            OperandKind::CharLiteral(value as u8)
        } else {
            OperandKind::IntLiteral(value)
        };
        let init = gen.ctx.add_operand(Operand::new(init));
        gen.emit(QuadOp::Assign, Some(id), Some(init), None);
    }
}

/// Operand for a resolved identifier. Globals get an operand on first use
/// in each function.
pub fn lookup(gen: &mut FunctionGenerator, symbol: &Symbol) -> Option<OperandId> {
    if let Some(id) = gen.ctx.lookup(symbol.id) {
        return Some(id);
    }
    if !symbol.is_global {
        return None;
    }
    let id = gen.ctx.add_operand(Operand::new(variable(symbol)));
    gen.ctx.symbols.insert(symbol.id, id);
    Some(id)
}
