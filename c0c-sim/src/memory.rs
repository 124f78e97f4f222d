//! Sparse byte-addressed little-endian memory

use crate::error::SimError;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Memory {
    bytes: HashMap<u32, u8>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unwritten bytes read as zero.
    pub fn read_byte(&self, addr: u32) -> u8 {
        self.bytes.get(&addr).copied().unwrap_or(0)
    }

    pub fn write_byte(&mut self, addr: u32, value: u8) {
        self.bytes.insert(addr, value);
    }

    pub fn read_word(&self, addr: u32) -> Result<i32, SimError> {
        if addr % 4 != 0 {
            return Err(SimError::UnalignedAccess(addr));
        }
        let mut bytes = [0u8; 4];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = self.read_byte(addr.wrapping_add(i as u32));
        }
        Ok(i32::from_le_bytes(bytes))
    }

    pub fn write_word(&mut self, addr: u32, value: i32) -> Result<(), SimError> {
        if addr % 4 != 0 {
            return Err(SimError::UnalignedAccess(addr));
        }
        for (i, byte) in value.to_le_bytes().into_iter().enumerate() {
            self.write_byte(addr.wrapping_add(i as u32), byte);
        }
        Ok(())
    }

    /// Bytes from `addr` up to, not including, the first zero byte
    pub fn read_c_string(&self, addr: u32) -> Vec<u8> {
        let mut out = Vec::new();
        let mut cursor = addr;
        loop {
            let byte = self.read_byte(cursor);
            if byte == 0 {
                return out;
            }
            out.push(byte);
            cursor = cursor.wrapping_add(1);
        }
    }
}
