//! Frame driver: interleaves CPU instructions with PPU cycles at the
//! documented 1:3 ratio, services NMI edges between instructions, and
//! detects frame boundaries so a caller can request exactly N frames.

use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::cpu::{self, Cpu};
use crate::ppu::SCANLINES_PER_FRAME;

const PPU_CYCLES_PER_CPU_CYCLE: u32 = 3;

pub struct Machine {
    pub cpu: Cpu,
    pub bus: Bus,
    last_scanline: u16,
}

impl Machine {
    pub fn new(cartridge: Cartridge) -> Self {
        let mut bus = Bus::new(cartridge);
        let mut cpu = Cpu::new();
        cpu::reset(&mut cpu, &mut bus);
        let last_scanline = bus.ppu.scanline();
        Self { cpu, bus, last_scanline }
    }

    /// Runs CPU instructions, advancing the PPU alongside each one, until
    /// a full frame (scanline wrap `261 -> 0`) has completed.
    pub fn run_frame(&mut self) {
        loop {
            if self.bus.ppu.take_nmi() {
                cpu::nmi(&mut self.cpu, &mut self.bus);
            }

            cpu::step(&mut self.cpu, &mut self.bus);

            let mut frame_done = false;
            for _ in 0..PPU_CYCLES_PER_CPU_CYCLE {
                self.bus.ppu.step();
                let scanline = self.bus.ppu.scanline();
                if self.last_scanline == SCANLINES_PER_FRAME - 1 && scanline == 0 {
                    frame_done = true;
                }
                self.last_scanline = scanline;
            }

            if frame_done {
                break;
            }
        }
    }

    pub fn framebuffer(&self) -> &[u8] {
        self.bus.ppu.framebuffer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::build_ines;

    #[test]
    fn run_frame_advances_exactly_one_scanline_wrap() {
        let rom = build_ines(1, 0, 0xEA); // NOP-filled PRG
        let cart = Cartridge::from_bytes(&rom).unwrap();
        let mut machine = Machine::new(cart);
        machine.run_frame();
        assert_eq!(machine.bus.ppu.scanline(), 0);
    }
}
