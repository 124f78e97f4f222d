//! Label naming for one compilation unit
//!
//! Control-flow labels are numbered by a counter owned by the unit, so labels
//! stay distinct across every function of the unit. Function entry and exit
//! labels are derived from the function name.

use c0c_common::LabelId;

#[derive(Debug, Default)]
pub struct NameGenerator {
    next_label_id: LabelId,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_label_id(&mut self) -> LabelId {
        let id = self.next_label_id;
        self.next_label_id += 1;
        id
    }

    /// A fresh basic-block label
    pub fn new_label(&mut self) -> String {
        block_label(self.next_label_id())
    }
}

pub fn block_label(id: LabelId) -> String {
    format!("$BB_{}", id)
}

pub fn entry_label(function: &str) -> String {
    format!("$func_{}_entry", function)
}

pub fn exit_label(function: &str) -> String {
    format!("$func_{}_exit", function)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_labels() {
        let mut naming = NameGenerator::new();
        assert_eq!(naming.new_label(), "$BB_0");
        assert_eq!(naming.new_label(), "$BB_1");
        assert_eq!(entry_label("abs"), "$func_abs_entry");
        assert_eq!(exit_label("abs"), "$func_abs_exit");
    }
}
