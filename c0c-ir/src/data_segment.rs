//! Data Segment Builder
//!
//! Collects one entry per global declaration and one per distinct string
//! literal. Entries are appended during generation, never modified, and read
//! once by the backend in insertion order.

use c0c_common::types::WORD_SIZE;
use c0c_common::Type;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageClass {
    /// `count` words each holding `value`
    Word { value: i32 },
    /// `count` zero-filled words
    Space,
    /// Null-terminated string
    Asciiz { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSegmentEntry {
    pub label: String,
    pub class: StorageClass,
    /// Number of elements (words for `Word`/`Space`, 1 for strings)
    pub count: u32,
    /// Alignment in bytes
    pub align: u32,
}

impl DataSegmentEntry {
    pub fn size_in_bytes(&self) -> u32 {
        match &self.class {
            StorageClass::Word { .. } | StorageClass::Space => self.count * WORD_SIZE,
            StorageClass::Asciiz { text } => text.len() as u32 + 1,
        }
    }
}

impl fmt::Display for DataSegmentEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.class {
            StorageClass::Word { value } => {
                write!(f, "{}: .word {} : {}", self.label, value, self.count)
            }
            StorageClass::Space => write!(
                f,
                "{}: .space {} : {}",
                self.label,
                self.size_in_bytes(),
                self.count
            ),
            StorageClass::Asciiz { text } => {
                write!(f, "{}: .asciiz {:?}", self.label, text)
            }
        }
    }
}

/// Append-only builder for the compilation unit's data segment
#[derive(Debug, Default)]
pub struct DataSegmentBuilder {
    entries: Vec<DataSegmentEntry>,
    strings: HashMap<String, String>,
    next_string: u32,
}

impl DataSegmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register storage for a global. Scalars become initialized words,
    /// arrays a zero-filled block.
    pub fn add_global(&mut self, name: &str, ty: &Type, value: Option<i32>) -> &DataSegmentEntry {
        let class = if ty.is_array() {
            StorageClass::Space
        } else {
            StorageClass::Word {
                value: value.unwrap_or(0),
            }
        };
        let entry = DataSegmentEntry {
            label: name.to_string(),
            class,
            count: ty.element_count(),
            align: WORD_SIZE,
        };
        debug!("Data segment: global {}", entry);
        self.push(entry)
    }

    /// Label of the `.asciiz` entry holding `text`, creating it on first use.
    pub fn intern_string(&mut self, text: &str) -> String {
        if let Some(label) = self.strings.get(text) {
            return label.clone();
        }
        let label = format!("strlabel_{}", self.next_string);
        self.next_string += 1;
        self.strings.insert(text.to_string(), label.clone());
        self.push(DataSegmentEntry {
            label: label.clone(),
            class: StorageClass::Asciiz {
                text: text.to_string(),
            },
            count: 1,
            align: 1,
        });
        label
    }

    fn push(&mut self, entry: DataSegmentEntry) -> &DataSegmentEntry {
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[DataSegmentEntry] {
        &self.entries
    }

    pub fn finish(self) -> Vec<DataSegmentEntry> {
        self.entries
    }
}
