//! Simple statements: expressions, return, printf, scanf

use super::FunctionGenerator;
use crate::errors::IrError;
use crate::operand::{Operand, OperandKind};
use crate::quad::QuadOp;
use c0c_ast::{Symbol, TypedExpr};

pub fn generate_expression_stmt(gen: &mut FunctionGenerator, expr: &TypedExpr) -> Result<(), IrError> {
    match expr {
        TypedExpr::Call { callee, arguments } => {
            gen.lower_call(callee, arguments)?;
        }
        _ => {
            gen.lower_expr(expr)?;
        }
    }
    Ok(())
}

pub fn generate_return(gen: &mut FunctionGenerator, value: Option<&TypedExpr>) -> Result<(), IrError> {
    let value = value.map(|v| gen.lower_expr(v)).transpose()?;
    let exit = gen.ctx.exit_label();
    let exit = gen.label_named(exit);
    gen.emit(QuadOp::Return, None, value, Some(exit));
    Ok(())
}

fn print_string(gen: &mut FunctionGenerator, text: &str) {
    let label = gen.unit.data.intern_string(text);
    let operand = gen.ctx.add_operand(Operand::new(OperandKind::StringLiteral {
        label,
        text: text.to_string(),
    }));
    gen.emit(QuadOp::Print, None, Some(operand), None);
}

/// `printf` always ends its output with a newline: after the text when
/// there is no value, after the value otherwise.
pub fn generate_print(
    gen: &mut FunctionGenerator,
    text: Option<&str>,
    value: Option<&TypedExpr>,
) -> Result<(), IrError> {
    let value = value.map(|v| gen.lower_expr(v)).transpose()?;

    if let Some(text) = text {
        if value.is_some() {
            print_string(gen, text);
        } else {
            print_string(gen, &format!("{}\n", text));
        }
    }
    if let Some(value) = value {
        gen.emit(QuadOp::Print, None, Some(value), None);
        print_string(gen, "\n");
    }
    Ok(())
}

pub fn generate_scan(gen: &mut FunctionGenerator, symbols: &[Symbol]) -> Result<(), IrError> {
    for symbol in symbols {
        let target = gen.lookup_symbol(symbol)?;
        gen.emit(QuadOp::Scan, Some(target), None, None);
    }
    Ok(())
}
