//! Syscall services
//!
//! Input is a fixed string. `read int` consumes a whole line, as MARS does;
//! `read char` consumes one byte.

use super::Machine;
use crate::error::SimError;
use c0c_codegen::{Reg, Syscall};
use log::trace;

#[derive(Debug, Default)]
pub(crate) struct InputBuffer {
    bytes: Vec<u8>,
    pos: usize,
}

impl InputBuffer {
    pub fn new(input: &str) -> Self {
        Self {
            bytes: input.as_bytes().to_vec(),
            pos: 0,
        }
    }

    /// Next line including its newline, if any input is left
    fn next_line(&mut self) -> Option<&[u8]> {
        if self.pos >= self.bytes.len() {
            return None;
        }
        let start = self.pos;
        let end = self.bytes[start..]
            .iter()
            .position(|b| *b == b'\n')
            .map_or(self.bytes.len(), |i| start + i + 1);
        self.pos = end;
        Some(&self.bytes[start..end])
    }

    pub fn read_int(&mut self) -> Result<i32, SimError> {
        let line = self.next_line().ok_or(SimError::InputExhausted)?;
        let text = String::from_utf8_lossy(line).trim().to_string();
        text.parse().map_err(|_| SimError::InvalidInput(text))
    }

    pub fn read_char(&mut self) -> Result<u8, SimError> {
        let byte = self.bytes.get(self.pos).copied().ok_or(SimError::InputExhausted)?;
        self.pos += 1;
        Ok(byte)
    }

    /// Up to `max - 1` bytes of the next line
    pub fn read_string(&mut self, max: usize) -> Result<Vec<u8>, SimError> {
        let start = self.pos;
        let line = self.next_line().ok_or(SimError::InputExhausted)?;
        let take = line.len().min(max.saturating_sub(1));
        let out = line[..take].to_vec();
        self.pos = start + take;
        Ok(out)
    }
}

impl<'p> Machine<'p> {
    pub(super) fn syscall(&mut self) -> Result<(), SimError> {
        let code = self.reg(Reg::V0);
        let syscall = Syscall::from_code(code).ok_or(SimError::UnsupportedSyscall(code))?;
        trace!("syscall {:?}", syscall);
        let arg = self.reg(Reg::A0);
        match syscall {
            Syscall::PrintInt => self.output.extend_from_slice(arg.to_string().as_bytes()),
            Syscall::PrintString => {
                let bytes = self.memory.read_c_string(arg as u32);
                self.output.extend_from_slice(&bytes);
            }
            Syscall::PrintChar => self.output.push(arg as u8),
            Syscall::ReadInt => {
                let value = self.input.read_int()?;
                self.set_reg(Reg::V0, value);
            }
            Syscall::ReadChar => {
                let value = self.input.read_char()?;
                self.set_reg(Reg::V0, value as i32);
            }
            Syscall::ReadString => {
                let max = self.reg(Reg::A1).max(0) as usize;
                let bytes = self.input.read_string(max)?;
                let mut addr = arg as u32;
                for byte in bytes {
                    self.memory.write_byte(addr, byte);
                    addr = addr.wrapping_add(1);
                }
                if max > 0 {
                    self.memory.write_byte(addr, 0);
                }
            }
            Syscall::Exit => self.stopped = Some(super::StopReason::Exit),
        }
        Ok(())
    }
}
