#![doc = r#"
DuoVM core library.

A 16-bit-address toy machine: a 1-byte opcode ISA, ROM/RAM split memory,
an ALU with a single carry flag, and a character-cell display plus
4-button input interface.

Modules:
- memory: flat 64 KiB address space, ROM/SRAM split
- cpu: fetch-decode-execute core and the display cursor it drives
- io: display/input collaborator trait plus a headless test backend
- loader: the `HHHH: BB BB ...` hex program format
- driver: the burst-stepping run loop
- error: fatal VM errors and loader errors
- terminal (feature `terminal`): crossterm-backed reference `DuoIo`
"#]

pub mod cpu;
pub mod driver;
pub mod error;
pub mod io;
pub mod loader;
pub mod memory;

#[cfg(feature = "terminal")]
pub mod terminal;

pub use cpu::Cpu;
pub use driver::Driver;
pub use memory::Memory;
