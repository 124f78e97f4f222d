//! Assembler text emission
//!
//! Renders an [`AsmProgram`] as MARS/SPIM-compatible source: a `.data`
//! section followed by a `.text` section. Labels start in column zero,
//! everything else is indented.

use crate::asm::{AsmInst, AsmProgram, DataDirective, DataItem};
use std::collections::HashSet;
use std::fmt::Write;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmitError {
    #[error("Label '{0}' is defined more than once")]
    DuplicateLabel(String),

    #[error("Branch to undefined label '{0}'")]
    UndefinedLabel(String),

    #[error("Formatting failed")]
    Format,
}

impl From<std::fmt::Error> for EmitError {
    fn from(_: std::fmt::Error) -> Self {
        EmitError::Format
    }
}

const INDENT: &str = "    ";

/// Escape text for an `.asciiz` directive.
pub fn escape_asciiz(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out
}

fn format_directive(directive: &DataDirective) -> String {
    match directive {
        DataDirective::Word { value, count } if *count <= 1 => format!(".word {}", value),
        DataDirective::Word { value, count } => format!(".word {}:{}", value, count),
        DataDirective::Space(bytes) => format!(".space {}", bytes),
        DataDirective::Asciiz(text) => format!(".asciiz \"{}\"", escape_asciiz(text)),
        DataDirective::Align(power) => format!(".align {}", power),
    }
}

fn format_data_item(item: &DataItem) -> String {
    match &item.label {
        Some(label) => format!("{}: {}", label, format_directive(&item.directive)),
        None => format_directive(&item.directive),
    }
}

/// Check that every text label is unique and every branch target exists.
pub fn check_labels(program: &AsmProgram) -> Result<(), EmitError> {
    let mut defined = HashSet::new();
    for inst in &program.text {
        if let AsmInst::Label(name) = inst {
            if !defined.insert(name.as_str()) {
                return Err(EmitError::DuplicateLabel(name.clone()));
            }
        }
    }
    for inst in &program.text {
        if let Some(target) = inst.target() {
            if !defined.contains(target) {
                return Err(EmitError::UndefinedLabel(target.to_string()));
            }
        }
    }
    Ok(())
}

/// Render a whole program
pub fn emit_program(program: &AsmProgram) -> Result<String, EmitError> {
    check_labels(program)?;

    let mut out = String::new();
    writeln!(out, "# MIPS assembly generated by c0c")?;
    writeln!(out, ".data")?;
    for item in &program.data {
        writeln!(out, "{}{}", INDENT, format_data_item(item))?;
    }
    writeln!(out)?;
    writeln!(out, ".text")?;
    for inst in &program.text {
        match inst {
            AsmInst::Label(_) => {
                writeln!(out)?;
                writeln!(out, "{}", inst)?;
            }
            _ => writeln!(out, "{}{}", INDENT, inst)?,
        }
    }
    Ok(out)
}
