//! IR operands
//!
//! An operand is created once by the generator, stored in its function's
//! arena and referenced by id from any number of quadruples. Stack-resident
//! kinds start with a provisional offset and are resolved exactly once, when
//! the frame size of the function is known; every other kind is resolved on
//! creation.

use crate::arena::Id;
use c0c_codegen::Reg;
use c0c_common::{DeclId, TempId, Type};
use serde::{Deserialize, Serialize};

pub type OperandId = Id<Operand>;

/// Whether a value prints and reads as a number or as a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueClass {
    Int,
    Char,
}

impl ValueClass {
    pub fn of(ty: &Type) -> Self {
        if ty.element_type().is_char() {
            ValueClass::Char
        } else {
            ValueClass::Int
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OperandKind {
    IntLiteral(i32),
    CharLiteral(u8),
    /// A declared variable, global (addressed by label) or on the stack
    Variable {
        decl: DeclId,
        name: String,
        ty: Type,
        is_global: bool,
    },
    /// A compiler-generated stack temporary
    Temporary { id: TempId, class: ValueClass },
    Label(String),
    /// `base[index]`; `base` is an array `Variable`
    ArrayElement {
        base: OperandId,
        index: OperandId,
        class: ValueClass,
        is_lvalue: bool,
    },
    /// A raw slot in the outgoing argument area; the offset is final
    StackOffsetOnly,
    StringLiteral { label: String, text: String },
    Function { name: String, returns_value: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operand {
    pub kind: OperandKind,
    /// Byte offset from `$sp`; provisional until `resolved` is set
    pub offset: i32,
    pub resolved: bool,
    /// Register holding this operand in a leaf function
    pub binding: Option<Reg>,
}

impl Operand {
    pub fn new(kind: OperandKind) -> Self {
        let resolved = !Self::kind_needs_offset(&kind);
        Self {
            kind,
            offset: 0,
            resolved,
            binding: None,
        }
    }

    /// A stack-resident operand with a provisional offset
    pub fn on_stack(kind: OperandKind, provisional: i32) -> Self {
        let mut operand = Self::new(kind);
        operand.offset = provisional;
        operand
    }

    pub fn stack_slot(offset: i32) -> Self {
        Self {
            kind: OperandKind::StackOffsetOnly,
            offset,
            resolved: true,
            binding: None,
        }
    }

    fn kind_needs_offset(kind: &OperandKind) -> bool {
        match kind {
            OperandKind::Variable { is_global, .. } => !is_global,
            OperandKind::Temporary { .. } => true,
            _ => false,
        }
    }

    /// Whether this operand lives in the stack frame
    pub fn needs_offset(&self) -> bool {
        Self::kind_needs_offset(&self.kind)
    }

    pub fn is_global(&self) -> bool {
        matches!(self.kind, OperandKind::Variable { is_global: true, .. })
    }

    /// Literal value, if this operand is a compile-time constant
    pub fn literal(&self) -> Option<i32> {
        match self.kind {
            OperandKind::IntLiteral(v) => Some(v),
            OperandKind::CharLiteral(c) => Some(c as i32),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(&self.kind, OperandKind::Variable { ty, .. } if ty.is_array())
    }

    /// Print/read class of the value this operand denotes
    pub fn value_class(&self) -> Option<ValueClass> {
        match &self.kind {
            OperandKind::IntLiteral(_) => Some(ValueClass::Int),
            OperandKind::CharLiteral(_) => Some(ValueClass::Char),
            OperandKind::Variable { ty, .. } if !ty.is_array() => Some(ValueClass::of(ty)),
            OperandKind::Temporary { class, .. } | OperandKind::ArrayElement { class, .. } => {
                Some(*class)
            }
            _ => None,
        }
    }

    /// Name used for variables and labels in listings and assembly
    pub fn symbol_name(&self) -> Option<&str> {
        match &self.kind {
            OperandKind::Variable { name, .. }
            | OperandKind::Label(name)
            | OperandKind::Function { name, .. } => Some(name),
            OperandKind::StringLiteral { label, .. } => Some(label),
            _ => None,
        }
    }
}
