//! Memory map and limits

/// Address of the first data-section byte
pub const DATA_BASE: u32 = 0x1001_0000;

/// Initial stack pointer
pub const STACK_TOP: u32 = 0x7fff_effc;

/// Address of the first text line
pub const TEXT_BASE: u32 = 0x0040_0000;

/// Instructions executed before a run is abandoned
pub const DEFAULT_STEP_LIMIT: u64 = 1_000_000;
