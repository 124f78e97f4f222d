//! Typed expressions

use c0c_common::{DeclId, Type};
use serde::{Deserialize, Serialize};

/// A resolved identifier: the declaration it names plus what the type
/// checker learned about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: DeclId,
    pub name: String,
    pub ty: Type,
    #[serde(default)]
    pub is_global: bool,
    #[serde(default)]
    pub is_const: bool,
}

/// A resolved call target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRef {
    pub name: String,
    pub return_type: Type,
    #[serde(default)]
    pub params: Vec<Type>,
}

impl FunctionRef {
    pub fn returns_value(&self) -> bool {
        !self.return_type.is_void()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// Evaluate on two literals with 32-bit wrapping semantics.
    /// Division by zero is left for run time.
    pub fn fold(self, lhs: i32, rhs: i32) -> Option<i32> {
        match self {
            BinaryOp::Add => Some(lhs.wrapping_add(rhs)),
            BinaryOp::Sub => Some(lhs.wrapping_sub(rhs)),
            BinaryOp::Mul => Some(lhs.wrapping_mul(rhs)),
            BinaryOp::Div => {
                if rhs == 0 {
                    None
                } else {
                    Some(lhs.wrapping_div(rhs))
                }
            }
        }
    }
}

/// Typed expression - produced by semantic analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypedExpr {
    /// Integer literal
    IntLiteral { value: i32 },

    /// Character literal
    CharLiteral { value: u8 },

    /// Variable reference (scalar or whole array)
    Variable { symbol: Symbol },

    /// Unary plus or minus
    Unary {
        op: UnaryOp,
        operand: Box<TypedExpr>,
        expr_type: Type,
    },

    /// Arithmetic on two operands of the same class
    Binary {
        op: BinaryOp,
        left: Box<TypedExpr>,
        right: Box<TypedExpr>,
        expr_type: Type,
    },

    /// `target = value`; target is a `Variable` or an `ArrayIndex`
    Assign {
        target: Box<TypedExpr>,
        value: Box<TypedExpr>,
    },

    /// Array indexing: arr[idx]
    ArrayIndex {
        array: Symbol,
        index: Box<TypedExpr>,
    },

    /// Function call
    Call {
        callee: FunctionRef,
        arguments: Vec<TypedExpr>,
    },
}

impl TypedExpr {
    /// Resolved type of this expression
    pub fn get_type(&self) -> Type {
        match self {
            TypedExpr::IntLiteral { .. } => Type::Int,
            TypedExpr::CharLiteral { .. } => Type::Char,
            TypedExpr::Variable { symbol } => symbol.ty.clone(),
            TypedExpr::Unary { expr_type, .. } | TypedExpr::Binary { expr_type, .. } => {
                expr_type.clone()
            }
            TypedExpr::Assign { target, .. } => target.get_type(),
            TypedExpr::ArrayIndex { array, .. } => array.ty.element_type().clone(),
            TypedExpr::Call { callee, .. } => callee.return_type.clone(),
        }
    }

    /// Whether the type checker could evaluate this expression statically.
    pub fn is_const(&self) -> bool {
        match self {
            TypedExpr::IntLiteral { .. } | TypedExpr::CharLiteral { .. } => true,
            TypedExpr::Unary { operand, .. } => operand.is_const(),
            TypedExpr::Binary { left, right, .. } => left.is_const() && right.is_const(),
            _ => false,
        }
    }

    pub fn is_lvalue(&self) -> bool {
        match self {
            TypedExpr::Variable { symbol } => !symbol.is_const && !symbol.ty.is_array(),
            TypedExpr::ArrayIndex { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_types_of_expressions() {
        let g = global("g", 1, Type::array_of(Type::Char, 4));
        let x = local("x", 2, Type::Int);

        assert_eq!(index(&g, int(1)).get_type(), Type::Char);
        assert_eq!(binary(BinaryOp::Add, var(&x), int(1)).get_type(), Type::Int);
        assert_eq!(assign(var(&x), int(3)).get_type(), Type::Int);
        assert_eq!(chr(b'a').get_type(), Type::Char);
    }

    #[test]
    fn test_constness() {
        let x = local("x", 2, Type::Int);
        assert!(binary(BinaryOp::Mul, int(3), neg(int(2))).is_const());
        assert!(!binary(BinaryOp::Mul, int(3), var(&x)).is_const());
    }

    #[test]
    fn test_fold() {
        assert_eq!(BinaryOp::Div.fold(6, 0), None);
        assert_eq!(BinaryOp::Div.fold(-7, 2), Some(-3));
        assert_eq!(BinaryOp::Add.fold(i32::MAX, 1), Some(i32::MIN));
    }

    #[test]
    fn test_lvalues() {
        let x = local("x", 2, Type::Int);
        let arr = local("a", 3, Type::array_of(Type::Int, 2));
        assert!(var(&x).is_lvalue());
        assert!(!var(&arr).is_lvalue());
        assert!(index(&arr, int(0)).is_lvalue());
        assert!(!int(4).is_lvalue());
    }
}
