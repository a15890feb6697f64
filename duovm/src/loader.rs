//! Hex program loader: `HHHH: BB BB BB ...` records, one per line.
//!
//! Lines not starting with a hex digit are skipped. Byte parsing stops at
//! the first non-hex-digit token after the colon, matching a permissive
//! line-oriented scan rather than a strict grammar.

use crate::error::LoadError;
use crate::memory::Memory;

pub fn load_hex(mem: &mut Memory, text: &str) -> Result<(), LoadError> {
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim_start();
        if !line.starts_with(|c: char| c.is_ascii_hexdigit()) {
            continue;
        }

        let Some(colon) = line.find(':') else { continue };
        let addr_text = &line[..colon];
        let mut addr = match u16::from_str_radix(addr_text.trim(), 16) {
            Ok(a) => a,
            Err(_) => continue,
        };

        let mut rest = &line[colon + 1..];
        loop {
            rest = rest.trim_start_matches(' ');
            if rest.len() < 2 || !rest.as_bytes()[0].is_ascii_hexdigit() || !rest.as_bytes()[1].is_ascii_hexdigit()
            {
                break;
            }
            let byte = u8::from_str_radix(&rest[..2], 16).map_err(|_| LoadError::Overflow { line: lineno + 1 })?;
            mem.load_byte(addr, byte);
            addr = addr.wrapping_add(1);
            rest = &rest[2..];
        }
    }
    Ok(())
}

pub fn load_hex_file(mem: &mut Memory, path: &std::path::Path) -> Result<(), LoadError> {
    let text = std::fs::read_to_string(path)?;
    load_hex(mem, &text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_record_line() {
        let mut mem = Memory::new();
        load_hex(&mut mem, "E000: 01 2A 41 6E\n").unwrap();
        assert_eq!(mem.read(0xE000), 0x01);
        assert_eq!(mem.read(0xE001), 0x2A);
        assert_eq!(mem.read(0xE002), 0x41);
        assert_eq!(mem.read(0xE003), 0x6E);
    }

    #[test]
    fn skips_comment_lines() {
        let mut mem = Memory::new();
        load_hex(&mut mem, "; a comment\nE000: FF\n").unwrap();
        assert_eq!(mem.read(0xE000), 0xFF);
    }

    #[test]
    fn can_write_rom_region_directly() {
        let mut mem = Memory::new();
        load_hex(&mut mem, "0000: 01 02\n").unwrap();
        assert_eq!(mem.read(0x0000), 0x01);
        assert_eq!(mem.read(0x0001), 0x02);
    }
}
