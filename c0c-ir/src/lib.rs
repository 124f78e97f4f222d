//! Quadruple IR for the C0 MIPS compiler
//!
//! This crate turns a validated typed syntax tree into per-function lists of
//! three-address quadruples, plus the data segment of the compilation unit.
//! Stack offsets are assigned in two phases: provisionally while a function
//! is generated, and finally once its frame size is known.

pub mod arena;
pub mod data_segment;
pub mod errors;
pub mod function;
pub mod generator;
pub mod module;
pub mod naming;
pub mod operand;
pub mod quad;

pub use arena::{Arena, Id};
pub use data_segment::{DataSegmentBuilder, DataSegmentEntry, StorageClass};
pub use errors::IrError;
pub use function::FunctionContext;
pub use generator::{generate_program, GeneratorOptions};
pub use module::IrModule;
pub use operand::{Operand, OperandId, OperandKind, ValueClass};
pub use quad::{BranchCond, QuadOp, Quadruple};

pub use c0c_codegen::Frame;
