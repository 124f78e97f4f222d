//! Function lowering
//!
//! `main` is lowered inline at the top of the text section: its frame is
//! allocated but no registers are saved, and it ends in the exit syscall.
//! Every other function gets `$func_<name>_entry`, a prologue, its body,
//! `$func_<name>_exit` and an epilogue.

use crate::errors::CodegenError;
use crate::BackendOptions;
use c0c_codegen::abi::AbiError;
use c0c_codegen::{AsmInst, CallingConvention, Reg, Syscall};
use c0c_ir::FunctionContext;
use log::{debug, trace};

/// Lowering state for one function
pub(crate) struct FunctionLowering<'a> {
    pub ctx: &'a FunctionContext,
    pub options: &'a BackendOptions,
    /// Register bindings are only honoured in leaf functions
    pub use_bindings: bool,
    pub code: Vec<AsmInst>,
}

impl<'a> FunctionLowering<'a> {
    pub fn new(ctx: &'a FunctionContext, options: &'a BackendOptions) -> Result<Self, CodegenError> {
        if !ctx.is_frame_resolved() {
            return Err(CodegenError::UnresolvedFrame {
                function: ctx.name.clone(),
            });
        }
        Ok(Self {
            ctx,
            options,
            use_bindings: ctx.is_leaf(),
            code: Vec::new(),
        })
    }

    pub fn abi_error(&self, source: AbiError) -> CodegenError {
        CodegenError::Abi {
            function: self.ctx.name.clone(),
            source,
        }
    }

    pub fn epilogue(&self) -> Result<Vec<AsmInst>, CodegenError> {
        self.ctx.frame.gen_epilogue().map_err(|e| self.abi_error(e))
    }

    pub fn exit_syscall(&mut self) {
        self.code.push(AsmInst::Li(CallingConvention::RETURN_VALUE, Syscall::Exit.code()));
        self.code.push(AsmInst::Syscall);
    }

    fn lower_body(&mut self) -> Result<(), CodegenError> {
        let ctx = self.ctx;
        for quad in &ctx.quads {
            trace!("  lowering {}", ctx.format_quad(quad));
            self.lower_quad(quad)?;
        }
        Ok(())
    }
}

/// Lower `main` into straight-line code that ends the process.
pub fn lower_main(ctx: &FunctionContext, options: &BackendOptions) -> Result<Vec<AsmInst>, CodegenError> {
    debug!("Lowering main, frame {} bytes", ctx.frame.size);
    let mut lowering = FunctionLowering::new(ctx, options)?;

    ctx.frame.validate().map_err(|e| lowering.abi_error(e))?;
    if ctx.frame.size > 0 {
        lowering
            .code
            .push(AsmInst::Addiu(Reg::Sp, Reg::Sp, -ctx.frame.size));
    }
    lowering.lower_body()?;
    lowering.exit_syscall();
    Ok(lowering.code)
}

/// Lower a callable function.
pub fn lower_function(ctx: &FunctionContext, options: &BackendOptions) -> Result<Vec<AsmInst>, CodegenError> {
    debug!(
        "Lowering function '{}' ({} quads, frame {} bytes, leaf: {})",
        ctx.name,
        ctx.quads.len(),
        ctx.frame.size,
        ctx.is_leaf()
    );
    let mut lowering = FunctionLowering::new(ctx, options)?;

    lowering.code.push(AsmInst::Label(ctx.entry_label()));
    let prologue = ctx.frame.gen_prologue().map_err(|e| lowering.abi_error(e))?;
    lowering.code.extend(prologue);

    lowering.lower_body()?;

    lowering.code.push(AsmInst::Label(ctx.exit_label()));
    let epilogue = lowering.epilogue()?;
    lowering.code.extend(epilogue);
    Ok(lowering.code)
}
