//! IR Generator
//!
//! Walks each validated function and fills a [`FunctionContext`] with
//! quadruples, allocating temporaries, stack slots and labels on the way.
//! Once a function body is complete its frame is resolved, which fixes every
//! provisional stack offset.

mod control_flow;
mod declarations;
mod expressions;
mod resolve;
mod statements;

pub use resolve::resolve_frame;

use crate::data_segment::DataSegmentBuilder;
use crate::errors::IrError;
use crate::function::FunctionContext;
use crate::module::IrModule;
use crate::naming::NameGenerator;
use crate::operand::{Operand, OperandId, OperandKind, ValueClass};
use crate::quad::{QuadOp, Quadruple};
use c0c_ast::{Function, Program, TypedStmt};
use c0c_common::types::WORD_SIZE;
use log::{debug, info, trace};
use std::collections::HashSet;

/// Options for IR generation
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Fold arithmetic on two literal operands into a literal
    pub fold_constants: bool,
    /// Bind scalar locals and parameters to `$s0`-`$s7`; the bindings are
    /// only honoured when the function turns out to be a leaf
    pub leaf_registers: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            fold_constants: true,
            leaf_registers: true,
        }
    }
}

/// State shared by all functions of one compilation unit
pub(crate) struct UnitState {
    pub naming: NameGenerator,
    pub data: DataSegmentBuilder,
}

/// Generate the IR for a whole program
pub fn generate_program(program: &Program, options: &GeneratorOptions) -> Result<IrModule, IrError> {
    if program.main().is_none() {
        return Err(IrError::MissingMain);
    }

    let mut unit = UnitState {
        naming: NameGenerator::new(),
        data: DataSegmentBuilder::new(),
    };

    for global in &program.globals {
        declarations::declare_global(&mut unit.data, global);
    }

    let mut seen = HashSet::new();
    let mut functions = Vec::with_capacity(program.functions.len());
    for function in &program.functions {
        if !seen.insert(function.name.as_str()) {
            return Err(IrError::DuplicateFunction {
                name: function.name.clone(),
            });
        }
        functions.push(generate_function(function, &mut unit, options)?);
    }

    info!(
        "Generated IR for {} functions, {} data entries",
        functions.len(),
        unit.data.entries().len()
    );
    Ok(IrModule {
        functions,
        data: unit.data.finish(),
    })
}

fn generate_function(
    function: &Function,
    unit: &mut UnitState,
    options: &GeneratorOptions,
) -> Result<FunctionContext, IrError> {
    debug!("Generating IR for function '{}'", function.name);

    let mut gen = FunctionGenerator {
        ctx: FunctionContext::new(&function.name, function.return_type.clone()),
        unit,
        options,
    };

    for param in &function.params {
        declarations::declare_param(&mut gen, param);
    }
    for decl in &function.body.decls {
        declarations::declare_local(&mut gen, decl);
    }
    for stmt in &function.body.stmts {
        gen.generate(stmt)?;
    }

    let mut ctx = gen.ctx;
    resolve_frame(&mut ctx)?;
    debug!(
        "Function '{}': {} quads, frame {} bytes, mask {:#010x}, leaf: {}",
        ctx.name,
        ctx.quads.len(),
        ctx.frame.size,
        ctx.frame.saved_register_mask,
        ctx.is_leaf
    );
    Ok(ctx)
}

/// Per-function generation context
pub(crate) struct FunctionGenerator<'a> {
    pub ctx: FunctionContext,
    pub unit: &'a mut UnitState,
    pub options: &'a GeneratorOptions,
}

impl<'a> FunctionGenerator<'a> {
    /// Generate IR for a typed statement
    pub fn generate(&mut self, stmt: &TypedStmt) -> Result<(), IrError> {
        match stmt {
            TypedStmt::Expression(expr) => statements::generate_expression_stmt(self, expr),
            TypedStmt::Compound(stmts) => {
                for stmt in stmts {
                    self.generate(stmt)?;
                }
                Ok(())
            }
            TypedStmt::If {
                condition,
                then_stmt,
                else_stmt,
            } => control_flow::generate_if(self, condition, then_stmt, else_stmt.as_deref()),
            TypedStmt::While { condition, body } => {
                control_flow::generate_while(self, condition, body)
            }
            TypedStmt::DoWhile { body, condition } => {
                control_flow::generate_do_while(self, body, condition)
            }
            TypedStmt::For {
                init,
                condition,
                step,
                body,
            } => control_flow::generate_for(self, init, condition, step, body),
            TypedStmt::Return(value) => statements::generate_return(self, value.as_ref()),
            TypedStmt::Print { text, value } => {
                statements::generate_print(self, text.as_deref(), value.as_ref())
            }
            TypedStmt::Scan(symbols) => statements::generate_scan(self, symbols),
            TypedStmt::Empty => Ok(()),
        }
    }

    pub fn emit(&mut self, op: QuadOp, dst: Option<OperandId>, arg1: Option<OperandId>, arg2: Option<OperandId>) {
        let quad = Quadruple::new(op, dst, arg1, arg2);
        trace!("  {}", self.ctx.format_quad(&quad));
        self.ctx.push(quad);
    }

    /// A fresh stack temporary
    pub fn new_temp(&mut self, class: ValueClass) -> OperandId {
        self.ctx.cursor += WORD_SIZE as i32;
        let id = self.ctx.next_temp;
        self.ctx.next_temp += 1;
        self.ctx.add_operand(Operand::on_stack(
            OperandKind::Temporary { id, class },
            self.ctx.cursor,
        ))
    }

    /// A fresh control-flow label operand
    pub fn new_label(&mut self) -> OperandId {
        let name = self.unit.naming.new_label();
        self.ctx.add_operand(Operand::new(OperandKind::Label(name)))
    }

    pub fn label_named(&mut self, name: String) -> OperandId {
        self.ctx.add_operand(Operand::new(OperandKind::Label(name)))
    }

    pub fn int_literal(&mut self, value: i32) -> OperandId {
        self.ctx.add_operand(Operand::new(OperandKind::IntLiteral(value)))
    }

    pub fn place_label(&mut self, label: OperandId) {
        self.emit(QuadOp::Label, Some(label), None, None);
    }
}
