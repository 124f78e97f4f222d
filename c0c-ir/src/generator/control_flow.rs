//! Control flow statement lowering (if, while, do-while, for)
//!
//! Loops lower their condition twice: once as the entry test branching out
//! of the loop, and again at the bottom of the body, where the trailing
//! branch is negated so it jumps back while the condition holds. A condition
//! with side effects therefore runs once per test site.

use super::FunctionGenerator;
use crate::errors::IrError;
use crate::operand::OperandId;
use crate::quad::{BranchCond, QuadOp};
use c0c_ast::{Condition, ForInit, ForStep, TypedStmt};

/// Emit a branch to `target` taken when `condition` is false.
pub fn lower_condition(
    gen: &mut FunctionGenerator,
    condition: &Condition,
    target: OperandId,
) -> Result<(), IrError> {
    match condition {
        Condition::Truthy(expr) => {
            let value = gen.lower_expr(expr)?;
            gen.emit(QuadOp::Branch(BranchCond::Zero), Some(target), Some(value), None);
        }
        Condition::Compare { op, left, right } => {
            let lhs = gen.lower_expr(left)?;
            let rhs = gen.lower_expr(right)?;
            gen.emit(
                QuadOp::Branch(BranchCond::when_false(*op)),
                Some(target),
                Some(lhs),
                Some(rhs),
            );
        }
    }
    Ok(())
}

/// Emit a branch to `target` taken when `condition` is true.
fn lower_condition_taken(
    gen: &mut FunctionGenerator,
    condition: &Condition,
    target: OperandId,
) -> Result<(), IrError> {
    lower_condition(gen, condition, target)?;
    gen.ctx.negate_last_branch()
}

/// ```text
///     if !cond goto else
///     then
///     [goto end]
/// else:
///     [else
/// end:]
/// ```
pub fn generate_if(
    gen: &mut FunctionGenerator,
    condition: &Condition,
    then_stmt: &TypedStmt,
    else_stmt: Option<&TypedStmt>,
) -> Result<(), IrError> {
    let else_label = gen.new_label();
    lower_condition(gen, condition, else_label)?;

    gen.generate(then_stmt)?;

    match else_stmt {
        Some(else_stmt) => {
            let end_label = gen.new_label();
            gen.emit(QuadOp::Goto, Some(end_label), None, None);
            gen.place_label(else_label);
            gen.generate(else_stmt)?;
            gen.place_label(end_label);
        }
        None => gen.place_label(else_label),
    }
    Ok(())
}

/// ```text
/// begin:
///     if !cond goto end
/// body:
///     body
///     if cond goto body
/// end:
/// ```
pub fn generate_while(
    gen: &mut FunctionGenerator,
    condition: &Condition,
    body: &TypedStmt,
) -> Result<(), IrError> {
    let begin_label = gen.new_label();
    gen.place_label(begin_label);

    let end_label = gen.new_label();
    lower_condition(gen, condition, end_label)?;

    let body_label = gen.new_label();
    gen.place_label(body_label);
    gen.generate(body)?;

    lower_condition_taken(gen, condition, body_label)?;
    gen.place_label(end_label);
    Ok(())
}

/// ```text
/// begin:
///     body
///     if cond goto begin
/// ```
pub fn generate_do_while(
    gen: &mut FunctionGenerator,
    body: &TypedStmt,
    condition: &Condition,
) -> Result<(), IrError> {
    let begin_label = gen.new_label();
    gen.place_label(begin_label);
    gen.generate(body)?;
    lower_condition_taken(gen, condition, begin_label)
}

/// ```text
///     i = init
/// begin:
///     if !cond goto end
/// body:
///     body
///     j = k + step
///     if cond goto body
/// end:
/// ```
pub fn generate_for(
    gen: &mut FunctionGenerator,
    init: &ForInit,
    condition: &Condition,
    step: &ForStep,
    body: &TypedStmt,
) -> Result<(), IrError> {
    let target = gen.lookup_symbol(&init.target)?;
    let value = gen.lower_expr(&init.value)?;
    gen.emit(QuadOp::Assign, Some(target), Some(value), None);

    let begin_label = gen.new_label();
    gen.place_label(begin_label);

    let end_label = gen.new_label();
    lower_condition(gen, condition, end_label)?;

    let body_label = gen.new_label();
    gen.place_label(body_label);
    gen.generate(body)?;

    let source = gen.lookup_symbol(&step.source)?;
    let amount = gen.int_literal(step.amount);
    let step_target = gen.lookup_symbol(&step.target)?;
    gen.emit(QuadOp::Add, Some(step_target), Some(source), Some(amount));

    lower_condition_taken(gen, condition, body_label)?;
    gen.place_label(end_label);
    Ok(())
}
