//! Shorthand constructors for hand-built trees
//!
//! The driver's JSON input and most tests build trees directly; these keep
//! that readable.

use crate::expressions::{BinaryOp, FunctionRef, Symbol, TypedExpr, UnaryOp};
use crate::statements::{CompareOp, Condition, Function, TypedBlock, TypedStmt};
use c0c_common::{DeclId, Type};

pub fn local(name: &str, id: DeclId, ty: Type) -> Symbol {
    Symbol {
        id,
        name: name.to_string(),
        ty,
        is_global: false,
        is_const: false,
    }
}

pub fn global(name: &str, id: DeclId, ty: Type) -> Symbol {
    Symbol {
        is_global: true,
        ..local(name, id, ty)
    }
}

pub fn constant(mut symbol: Symbol) -> Symbol {
    symbol.is_const = true;
    symbol
}

pub fn int(value: i32) -> TypedExpr {
    TypedExpr::IntLiteral { value }
}

pub fn chr(value: u8) -> TypedExpr {
    TypedExpr::CharLiteral { value }
}

pub fn var(symbol: &Symbol) -> TypedExpr {
    TypedExpr::Variable {
        symbol: symbol.clone(),
    }
}

pub fn neg(operand: TypedExpr) -> TypedExpr {
    TypedExpr::Unary {
        op: UnaryOp::Minus,
        operand: Box::new(operand),
        expr_type: Type::Int,
    }
}

pub fn binary(op: BinaryOp, left: TypedExpr, right: TypedExpr) -> TypedExpr {
    TypedExpr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        expr_type: Type::Int,
    }
}

pub fn assign(target: TypedExpr, value: TypedExpr) -> TypedExpr {
    TypedExpr::Assign {
        target: Box::new(target),
        value: Box::new(value),
    }
}

pub fn index(array: &Symbol, idx: TypedExpr) -> TypedExpr {
    TypedExpr::ArrayIndex {
        array: array.clone(),
        index: Box::new(idx),
    }
}

pub fn call(callee: &Function, arguments: Vec<TypedExpr>) -> TypedExpr {
    TypedExpr::Call {
        callee: FunctionRef {
            name: callee.name.clone(),
            return_type: callee.return_type.clone(),
            params: callee.params.iter().map(|p| p.ty.clone()).collect(),
        },
        arguments,
    }
}

pub fn compare(op: CompareOp, left: TypedExpr, right: TypedExpr) -> Condition {
    Condition::Compare { op, left, right }
}

pub fn expr_stmt(expr: TypedExpr) -> TypedStmt {
    TypedStmt::Expression(expr)
}

pub fn print_value(expr: TypedExpr) -> TypedStmt {
    TypedStmt::Print {
        text: None,
        value: Some(expr),
    }
}

pub fn function(name: &str, return_type: Type, params: Vec<Symbol>, body: TypedBlock) -> Function {
    Function {
        name: name.to_string(),
        return_type,
        params,
        body,
    }
}
