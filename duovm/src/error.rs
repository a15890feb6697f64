//! Error types for the DuoVM core.
//!
//! Memory faults (ROM writes, out-of-bounds access) are modeled as
//! [`VmError`] values rather than panics so the driver can restore the
//! terminal and print a diagnostic before exiting, per the fatal-abort
//! policy of the machine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VmError {
    #[error("write to ROM at {addr:#06x}")]
    RomWrite { addr: u16 },

    #[error("out-of-bounds memory access at {addr:#x}")]
    OutOfBounds { addr: u32 },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read hex file: {0}")]
    Io(#[from] std::io::Error),

    #[error("record at line {line} writes past end of memory")]
    Overflow { line: usize },
}
