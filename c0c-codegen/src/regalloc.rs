//! Register Allocation
//!
//! A fixed pool of the eight callee-saved registers, handed out first-fit to
//! variables of leaf functions. Bindings are recorded in both directions so
//! the generator can ask "which register holds this operand" and the pool can
//! answer "which operand owns this register".

use crate::abi::CallingConvention;
use crate::asm::Reg;
use std::collections::HashMap;
use std::hash::Hash;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegAllocError {
    #[error("Register {0} is not part of the allocation pool")]
    InvalidRegister(Reg),

    #[error("Register {0} is not bound")]
    NotBound(Reg),
}

/// First-fit register pool keyed by the caller's operand handle
#[derive(Debug, Clone)]
pub struct RegisterPool<K> {
    slots: [Option<K>; 8],
    bindings: HashMap<K, Reg>,
}

impl<K: Copy + Eq + Hash> RegisterPool<K> {
    pub fn new() -> Self {
        Self {
            slots: [None; 8],
            bindings: HashMap::new(),
        }
    }

    /// Bind `key` to the first free register. Returns `None` when the pool is
    /// exhausted; the caller then keeps the value on the stack. Allocating an
    /// already-bound key returns its existing register.
    pub fn allocate(&mut self, key: K) -> Option<Reg> {
        if let Some(reg) = self.bindings.get(&key) {
            return Some(*reg);
        }
        let index = self.slots.iter().position(Option::is_none)?;
        let reg = CallingConvention::SAVED_POOL[index];
        self.slots[index] = Some(key);
        self.bindings.insert(key, reg);
        Some(reg)
    }

    /// Release a register so a later `allocate` can reuse it.
    pub fn free(&mut self, reg: Reg) -> Result<K, RegAllocError> {
        let index = Self::slot_index(reg)?;
        let key = self.slots[index].take().ok_or(RegAllocError::NotBound(reg))?;
        self.bindings.remove(&key);
        Ok(key)
    }

    pub fn binding(&self, key: K) -> Option<Reg> {
        self.bindings.get(&key).copied()
    }

    pub fn owner(&self, reg: Reg) -> Option<K> {
        Self::slot_index(reg).ok().and_then(|i| self.slots[i])
    }

    /// Registers currently bound, in pool order
    pub fn bound_registers(&self) -> Vec<Reg> {
        self.slots
            .iter()
            .zip(CallingConvention::SAVED_POOL)
            .filter(|(slot, _)| slot.is_some())
            .map(|(_, reg)| reg)
            .collect()
    }

    pub fn is_exhausted(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    fn slot_index(reg: Reg) -> Result<usize, RegAllocError> {
        CallingConvention::SAVED_POOL
            .iter()
            .position(|r| *r == reg)
            .ok_or(RegAllocError::InvalidRegister(reg))
    }
}

impl<K: Copy + Eq + Hash> Default for RegisterPool<K> {
    fn default() -> Self {
        Self::new()
    }
}
