//! Typed syntax tree consumed by the C0 backend
//!
//! The lexer, parser and type checker live outside this workspace. What they
//! hand over is described here: every expression carries its resolved type,
//! every identifier is already resolved to a unique declaration, and every
//! call has been arity- and type-checked.

pub mod builder;
pub mod expressions;
pub mod statements;

pub use expressions::{BinaryOp, FunctionRef, Symbol, TypedExpr, UnaryOp};
pub use statements::{
    CompareOp, Condition, ForInit, ForStep, Function, GlobalDecl, LocalDecl, Program, TypedBlock,
    TypedStmt,
};
