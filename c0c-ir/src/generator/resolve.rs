//! Frame resolution
//!
//! Runs once a function body is fully generated. The frame is
//!
//! ```text
//! size = round4(save_size + cursor + param_homes + arg_area)
//! ```
//!
//! where `save_size` covers `$ra` (non-leaf) or the pool registers bound in a
//! leaf. Every stack operand then gets its final `$sp`-relative offset:
//! `size - save_size - provisional` for locals and temporaries,
//! `size + provisional` for parameters, which live in the caller's frame.

use crate::errors::IrError;
use crate::function::FunctionContext;
use crate::operand::{OperandId, OperandKind};
use crate::quad::QuadOp;
use c0c_codegen::Frame;
use log::trace;

fn round_to_word(bytes: i32) -> i32 {
    (bytes + 3) & !3
}

fn resolve_param(ctx: &mut FunctionContext, id: OperandId, frame_size: i32) {
    let operand = ctx.operands.get_mut(id);
    if !operand.resolved {
        operand.offset += frame_size;
        operand.resolved = true;
    }
}

fn resolve_local(ctx: &mut FunctionContext, id: OperandId, frame_size: i32, save_size: i32) {
    let operand = ctx.operands.get_mut(id);
    let nested = match operand.kind {
        OperandKind::ArrayElement { base, index, .. } => Some((base, index)),
        _ => None,
    };
    if !operand.resolved {
        operand.offset = frame_size - save_size - operand.offset;
        operand.resolved = true;
        trace!("resolved {} in '{}'", ctx.format_operand(id), ctx.name);
    }
    if let Some((base, index)) = nested {
        resolve_local(ctx, base, frame_size, save_size);
        resolve_local(ctx, index, frame_size, save_size);
    }
}

/// Compute the final frame of `ctx` and resolve all of its stack operands.
/// Calling it again once resolved changes nothing.
pub fn resolve_frame(ctx: &mut FunctionContext) -> Result<(), IrError> {
    if ctx.frame_resolved {
        return Ok(());
    }

    let mut mask = ctx.frame.saved_register_mask;
    if ctx.is_leaf {
        for reg in ctx.bound_registers() {
            mask |= reg.mask_bit();
        }
    }
    let save_size = mask.count_ones() as i32 * 4;
    // Non-leaf functions keep a home word per parameter.
    let param_homes = if ctx.is_leaf {
        0
    } else {
        4 * ctx.params.len() as i32
    };
    let size = round_to_word(save_size + ctx.cursor + param_homes + ctx.arg_area);

    ctx.frame = Frame::new(size, mask);
    ctx.frame
        .validate()
        .map_err(|source| IrError::InvalidFrame {
            function: ctx.name.clone(),
            source,
        })?;

    let params: Vec<OperandId> = ctx
        .quads
        .iter()
        .filter(|q| q.op == QuadOp::Param)
        .filter_map(|q| q.dst)
        .collect();
    for id in params {
        resolve_param(ctx, id, size);
    }

    let referenced: Vec<OperandId> = ctx.quads.iter().flat_map(|q| q.operands()).collect();
    for id in referenced {
        resolve_local(ctx, id, size, save_size);
    }

    // Locals no quadruple mentions still get a final offset.
    let unreferenced: Vec<OperandId> = ctx
        .operands
        .iter()
        .filter(|(_, op)| !op.resolved)
        .map(|(id, _)| id)
        .collect();
    for id in unreferenced {
        resolve_local(ctx, id, size, save_size);
    }

    ctx.frame_resolved = true;
    Ok(())
}
