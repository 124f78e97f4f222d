//! Module lowering

use crate::data::lower_data;
use crate::errors::CodegenError;
use crate::function::{lower_function, lower_main};
use crate::BackendOptions;
use c0c_codegen::AsmProgram;
use c0c_ir::IrModule;
use log::info;

/// Lower a whole compilation unit: data section, `main`, then the other
/// functions in declaration order.
pub fn lower_module(module: &IrModule, options: &BackendOptions) -> Result<AsmProgram, CodegenError> {
    let main = module.main().ok_or(CodegenError::MissingMain)?;

    let data = lower_data(&module.data);
    let mut text = lower_main(main, options)?;
    for function in module.functions.iter().filter(|f| !f.is_main()) {
        text.extend(lower_function(function, options)?);
    }

    info!(
        "Lowered {} functions: {} data items, {} text lines",
        module.functions.len(),
        data.len(),
        text.len()
    );
    Ok(AsmProgram { data, text })
}
