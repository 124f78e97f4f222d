//! Data section lowering
//!
//! One directive per data segment entry, in insertion order. Strings are
//! byte-aligned, so an `.align 2` is inserted before any word-aligned entry
//! that would otherwise start off a word boundary.

use c0c_codegen::{DataDirective, DataItem};
use c0c_ir::{DataSegmentEntry, StorageClass};
use log::trace;

pub fn lower_entry(entry: &DataSegmentEntry) -> DataItem {
    let directive = match &entry.class {
        StorageClass::Word { value } => DataDirective::Word {
            value: *value,
            count: entry.count,
        },
        StorageClass::Space => DataDirective::Space(entry.size_in_bytes()),
        StorageClass::Asciiz { text } => DataDirective::Asciiz(text.clone()),
    };
    DataItem::labeled(entry.label.clone(), directive)
}

pub fn lower_data(entries: &[DataSegmentEntry]) -> Vec<DataItem> {
    let mut items = Vec::with_capacity(entries.len());
    let mut offset = 0u32;
    for entry in entries {
        let align = entry.align.max(1);
        if offset % align != 0 {
            trace!("aligning '{}' to {} bytes", entry.label, align);
            items.push(DataItem::align(align.trailing_zeros()));
            offset = offset.next_multiple_of(align);
        }
        items.push(lower_entry(entry));
        offset += entry.size_in_bytes();
    }
    items
}
