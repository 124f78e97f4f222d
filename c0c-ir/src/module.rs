//! IR for a whole compilation unit

use crate::data_segment::DataSegmentEntry;
use crate::function::FunctionContext;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct IrModule {
    /// Functions in declaration order
    pub functions: Vec<FunctionContext>,
    pub data: Vec<DataSegmentEntry>,
}

impl IrModule {
    pub fn main(&self) -> Option<&FunctionContext> {
        self.functions.iter().find(|f| f.is_main())
    }

    pub fn function(&self, name: &str) -> Option<&FunctionContext> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Quadruple listing of the unit: data entries, then each function
    pub fn listing(&self) -> String {
        let mut out = String::new();
        out.push_str("# C0 intermediate code generated by c0c\n");
        for entry in &self.data {
            out.push_str(&format!("{}\n", entry));
        }
        for function in &self.functions {
            out.push('\n');
            out.push_str(&function.listing());
        }
        out
    }
}
