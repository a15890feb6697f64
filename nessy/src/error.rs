//! Fatal ROM-loading errors. The CPU/PPU interpreter never returns errors
//! at runtime (unknown opcodes are charged cycles and ignored); only
//! loading a cartridge can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RomError {
    #[error("failed to read ROM file: {0}")]
    Io(#[from] std::io::Error),

    #[error("not an iNES image (missing 'NES\\x1A' signature)")]
    BadSignature,

    #[error("iNES header claims {declared} bytes of PRG/CHR data but the file only has {available}")]
    Truncated { declared: usize, available: usize },

    #[error("iNES header declares 0 PRG-ROM banks; a cartridge needs at least one")]
    EmptyPrgRom,

    #[error("unsupported mapper {0}; only mapper 0 (NROM) is implemented")]
    UnsupportedMapper(u8),
}
