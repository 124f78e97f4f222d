//! The simulated machine
//!
//! Labels and comments occupy a text line each but execute as no-ops and do
//! not count as steps.

mod execution;
mod syscall;

use crate::constants::*;
use crate::error::SimError;
use crate::memory::Memory;
use c0c_codegen::{AsmInst, AsmProgram, DataDirective, DataItem, Reg};
use log::{debug, trace};
use std::collections::HashMap;
use syscall::InputBuffer;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The exit syscall
    Exit,
    /// Execution ran past the last text line
    EndOfText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub output: String,
    /// Instructions executed, labels and comments excluded
    pub steps: u64,
    pub stop: StopReason,
}

pub struct Machine<'p> {
    text: &'p [AsmInst],
    pub registers: [i32; 32],
    hi: i32,
    lo: i32,
    /// Index of the next text line
    pc: usize,
    pub memory: Memory,
    data_labels: HashMap<String, u32>,
    text_labels: HashMap<String, usize>,
    input: InputBuffer,
    output: Vec<u8>,
    steps: u64,
    step_limit: u64,
    stopped: Option<StopReason>,
}

impl<'p> Machine<'p> {
    pub fn new(program: &'p AsmProgram, input: &str) -> Result<Self, SimError> {
        let mut machine = Self {
            text: &program.text,
            registers: [0; 32],
            hi: 0,
            lo: 0,
            pc: 0,
            memory: Memory::new(),
            data_labels: HashMap::new(),
            text_labels: HashMap::new(),
            input: InputBuffer::new(input),
            output: Vec::new(),
            steps: 0,
            step_limit: DEFAULT_STEP_LIMIT,
            stopped: None,
        };
        machine.load_data(&program.data)?;
        machine.index_text()?;
        machine.set_reg(Reg::Sp, STACK_TOP as i32);
        Ok(machine)
    }

    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = limit;
        self
    }

    fn load_data(&mut self, data: &[DataItem]) -> Result<(), SimError> {
        let mut addr = DATA_BASE;
        for item in data {
            match item.directive {
                DataDirective::Align(power) => addr = addr.next_multiple_of(1 << power),
                // `.word` aligns itself, as in MARS
                DataDirective::Word { .. } => addr = addr.next_multiple_of(4),
                _ => {}
            }
            if let Some(label) = &item.label {
                if self.data_labels.insert(label.clone(), addr).is_some() {
                    return Err(SimError::DuplicateLabel(label.clone()));
                }
                trace!("data label {} at {:#010x}", label, addr);
            }
            match &item.directive {
                DataDirective::Word { value, count } => {
                    for _ in 0..(*count).max(1) {
                        self.memory.write_word(addr, *value)?;
                        addr += 4;
                    }
                }
                DataDirective::Space(bytes) => addr += bytes,
                DataDirective::Asciiz(text) => {
                    for byte in text.bytes() {
                        self.memory.write_byte(addr, byte);
                        addr += 1;
                    }
                    self.memory.write_byte(addr, 0);
                    addr += 1;
                }
                DataDirective::Align(_) => {}
            }
        }
        debug!("Loaded {} bytes of data", addr - DATA_BASE);
        Ok(())
    }

    fn index_text(&mut self) -> Result<(), SimError> {
        let text = self.text;
        for (index, inst) in text.iter().enumerate() {
            if let AsmInst::Label(name) = inst {
                if self.text_labels.insert(name.clone(), index).is_some() {
                    return Err(SimError::DuplicateLabel(name.clone()));
                }
            }
        }
        Ok(())
    }

    pub fn reg(&self, reg: Reg) -> i32 {
        self.registers[reg.number() as usize]
    }

    pub fn set_reg(&mut self, reg: Reg, value: i32) {
        if reg != Reg::Zero {
            self.registers[reg.number() as usize] = value;
        }
    }

    pub fn data_address(&self, label: &str) -> Result<u32, SimError> {
        self.data_labels
            .get(label)
            .copied()
            .ok_or_else(|| SimError::UnknownLabel(label.to_string()))
    }

    fn text_index(&self, label: &str) -> Result<usize, SimError> {
        self.text_labels
            .get(label)
            .copied()
            .ok_or_else(|| SimError::UnknownLabel(label.to_string()))
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    pub fn stopped(&self) -> Option<StopReason> {
        self.stopped
    }

    /// Execute one text line.
    pub fn step(&mut self) -> Result<(), SimError> {
        let text = self.text;
        let Some(inst) = text.get(self.pc) else {
            self.stopped = Some(StopReason::EndOfText);
            return Ok(());
        };
        let line = self.pc;
        self.pc += 1;
        if matches!(inst, AsmInst::Label(_) | AsmInst::Comment(_)) {
            return Ok(());
        }

        self.steps += 1;
        if self.steps > self.step_limit {
            return Err(SimError::StepLimitExceeded(self.step_limit));
        }
        trace!("{:5} {}", line, inst);
        self.execute(inst, line)
    }

    pub fn run(&mut self) -> Result<RunOutcome, SimError> {
        let stop = loop {
            if let Some(reason) = self.stopped {
                break reason;
            }
            self.step()?;
        };
        debug!("Program stopped ({:?}) after {} steps", stop, self.steps);
        Ok(RunOutcome {
            output: self.output(),
            steps: self.steps,
            stop,
        })
    }
}
