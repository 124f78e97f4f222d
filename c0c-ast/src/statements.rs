//! Typed statements and top-level items

use crate::expressions::{Symbol, TypedExpr};
use c0c_common::Type;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

/// Loop and `if` conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    /// A bare expression, true when non-zero
    Truthy(TypedExpr),
    Compare {
        op: CompareOp,
        left: TypedExpr,
        right: TypedExpr,
    },
}

/// `i = e` in a `for` header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForInit {
    pub target: Symbol,
    pub value: TypedExpr,
}

/// `target = source + amount` in a `for` header. A negative amount encodes
/// the `-` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStep {
    pub target: Symbol,
    pub source: Symbol,
    pub amount: i32,
}

/// Typed statement - produced by semantic analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypedStmt {
    /// Expression statement
    Expression(TypedExpr),

    /// Compound statement
    Compound(Vec<TypedStmt>),

    If {
        condition: Condition,
        then_stmt: Box<TypedStmt>,
        else_stmt: Option<Box<TypedStmt>>,
    },

    While {
        condition: Condition,
        body: Box<TypedStmt>,
    },

    DoWhile {
        body: Box<TypedStmt>,
        condition: Condition,
    },

    For {
        init: ForInit,
        condition: Condition,
        step: ForStep,
        body: Box<TypedStmt>,
    },

    Return(Option<TypedExpr>),

    /// `printf(text)`, `printf(value)` or `printf(text, value)`
    Print {
        text: Option<String>,
        value: Option<TypedExpr>,
    },

    /// `scanf(a, b, ...)`
    Scan(Vec<Symbol>),

    Empty,
}

/// Local declaration at the top of a function body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalDecl {
    pub symbol: Symbol,
    /// Initializer of a `const` declaration
    #[serde(default)]
    pub const_value: Option<i32>,
}

/// Declarations followed by statements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypedBlock {
    #[serde(default)]
    pub decls: Vec<LocalDecl>,
    #[serde(default)]
    pub stmts: Vec<TypedStmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalDecl {
    pub symbol: Symbol,
    #[serde(default)]
    pub const_value: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub return_type: Type,
    #[serde(default)]
    pub params: Vec<Symbol>,
    pub body: TypedBlock,
}

impl Function {
    pub fn is_main(&self) -> bool {
        self.name == "main"
    }
}

/// A whole validated compilation unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub globals: Vec<GlobalDecl>,
    pub functions: Vec<Function>,
}

impl Program {
    pub fn main(&self) -> Option<&Function> {
        self.functions.iter().find(|f| f.is_main())
    }
}
