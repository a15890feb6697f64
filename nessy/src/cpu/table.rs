//! Table-driven opcode dispatch: every legal 6502 opcode maps to a
//! `(Op, AddrMode, base_cycles)` triple, decoded once per fetch and handed
//! to a single executor. This is the shape the original switch-statement
//! interpreter was always meant to grow into — one opcode, one table row,
//! one execution path, instead of 150 inlined cases.

use crate::bus::Bus;
use crate::cpu::addressing::{resolve, AddrMode, Operand};
use crate::cpu::execute::*;
use crate::cpu::state::{Cpu, CARRY, DECIMAL, IRQ_DISABLE, NEGATIVE, OVERFLOW, ZERO};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs,
    Clc, Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny,
    Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror,
    Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
    /// Any opcode byte outside the documented instruction set.
    Unknown,
}

#[derive(Debug, Clone, Copy)]
pub struct OpInfo {
    pub op: Op,
    pub mode: AddrMode,
    pub base_cycles: u8,
}

const fn info(op: Op, mode: AddrMode, base_cycles: u8) -> OpInfo {
    OpInfo { op, mode, base_cycles }
}

/// Decode a raw opcode byte into its operation, addressing mode, and base
/// cycle count. Page-cross and branch-taken penalties are applied by the
/// caller, not folded in here.
pub fn decode(opcode: u8) -> OpInfo {
    use AddrMode::*;
    use Op::*;
    match opcode {
        0x00 => info(Brk, Implied, 7),
        0x01 => info(Ora, IndexedIndirect, 6),
        0x05 => info(Ora, ZeroPage, 3),
        0x06 => info(Asl, ZeroPage, 5),
        0x08 => info(Php, Implied, 3),
        0x09 => info(Ora, Immediate, 2),
        0x0A => info(Asl, Accumulator, 2),
        0x0D => info(Ora, Absolute, 4),
        0x0E => info(Asl, Absolute, 6),

        0x10 => info(Bpl, Relative, 2),
        0x11 => info(Ora, IndirectIndexed, 5),
        0x15 => info(Ora, ZeroPageX, 4),
        0x16 => info(Asl, ZeroPageX, 6),
        0x18 => info(Clc, Implied, 2),
        0x19 => info(Ora, AbsoluteY, 4),
        0x1D => info(Ora, AbsoluteX, 4),
        0x1E => info(Asl, AbsoluteX, 7),

        0x20 => info(Jsr, Absolute, 6),
        0x21 => info(And, IndexedIndirect, 6),
        0x24 => info(Bit, ZeroPage, 3),
        0x25 => info(And, ZeroPage, 3),
        0x26 => info(Rol, ZeroPage, 5),
        0x28 => info(Plp, Implied, 4),
        0x29 => info(And, Immediate, 2),
        0x2A => info(Rol, Accumulator, 2),
        0x2C => info(Bit, Absolute, 4),
        0x2D => info(And, Absolute, 4),
        0x2E => info(Rol, Absolute, 6),

        0x30 => info(Bmi, Relative, 2),
        0x31 => info(And, IndirectIndexed, 5),
        0x35 => info(And, ZeroPageX, 4),
        0x36 => info(Rol, ZeroPageX, 6),
        0x38 => info(Sec, Implied, 2),
        0x39 => info(And, AbsoluteY, 4),
        0x3D => info(And, AbsoluteX, 4),
        0x3E => info(Rol, AbsoluteX, 7),

        0x40 => info(Rti, Implied, 6),
        0x41 => info(Eor, IndexedIndirect, 6),
        0x45 => info(Eor, ZeroPage, 3),
        0x46 => info(Lsr, ZeroPage, 5),
        0x48 => info(Pha, Implied, 3),
        0x49 => info(Eor, Immediate, 2),
        0x4A => info(Lsr, Accumulator, 2),
        0x4C => info(Jmp, Absolute, 3),
        0x4D => info(Eor, Absolute, 4),
        0x4E => info(Lsr, Absolute, 6),

        0x50 => info(Bvc, Relative, 2),
        0x51 => info(Eor, IndirectIndexed, 5),
        0x55 => info(Eor, ZeroPageX, 4),
        0x56 => info(Lsr, ZeroPageX, 6),
        0x58 => info(Cli, Implied, 2),
        0x59 => info(Eor, AbsoluteY, 4),
        0x5D => info(Eor, AbsoluteX, 4),
        0x5E => info(Lsr, AbsoluteX, 7),

        0x60 => info(Rts, Implied, 6),
        0x61 => info(Adc, IndexedIndirect, 6),
        0x65 => info(Adc, ZeroPage, 3),
        0x66 => info(Ror, ZeroPage, 5),
        0x68 => info(Pla, Implied, 4),
        0x69 => info(Adc, Immediate, 2),
        0x6A => info(Ror, Accumulator, 2),
        0x6C => info(Jmp, Indirect, 5),
        0x6D => info(Adc, Absolute, 4),
        0x6E => info(Ror, Absolute, 6),

        0x70 => info(Bvs, Relative, 2),
        0x71 => info(Adc, IndirectIndexed, 5),
        0x75 => info(Adc, ZeroPageX, 4),
        0x76 => info(Ror, ZeroPageX, 6),
        0x78 => info(Sei, Implied, 2),
        0x79 => info(Adc, AbsoluteY, 4),
        0x7D => info(Adc, AbsoluteX, 4),
        0x7E => info(Ror, AbsoluteX, 7),

        0x81 => info(Sta, IndexedIndirect, 6),
        0x84 => info(Sty, ZeroPage, 3),
        0x85 => info(Sta, ZeroPage, 3),
        0x86 => info(Stx, ZeroPage, 3),
        0x88 => info(Dey, Implied, 2),
        0x8A => info(Txa, Implied, 2),
        0x8C => info(Sty, Absolute, 4),
        0x8D => info(Sta, Absolute, 4),
        0x8E => info(Stx, Absolute, 4),

        0x90 => info(Bcc, Relative, 2),
        0x91 => info(Sta, IndirectIndexed, 6),
        0x94 => info(Sty, ZeroPageX, 4),
        0x95 => info(Sta, ZeroPageX, 4),
        0x96 => info(Stx, ZeroPageY, 4),
        0x98 => info(Tya, Implied, 2),
        0x99 => info(Sta, AbsoluteY, 5),
        0x9A => info(Txs, Implied, 2),
        0x9D => info(Sta, AbsoluteX, 5),

        0xA0 => info(Ldy, Immediate, 2),
        0xA1 => info(Lda, IndexedIndirect, 6),
        0xA2 => info(Ldx, Immediate, 2),
        0xA4 => info(Ldy, ZeroPage, 3),
        0xA5 => info(Lda, ZeroPage, 3),
        0xA6 => info(Ldx, ZeroPage, 3),
        0xA8 => info(Tay, Implied, 2),
        0xA9 => info(Lda, Immediate, 2),
        0xAA => info(Tax, Implied, 2),
        0xAC => info(Ldy, Absolute, 4),
        0xAD => info(Lda, Absolute, 4),
        0xAE => info(Ldx, Absolute, 4),

        0xB0 => info(Bcs, Relative, 2),
        0xB1 => info(Lda, IndirectIndexed, 5),
        0xB4 => info(Ldy, ZeroPageX, 4),
        0xB5 => info(Lda, ZeroPageX, 4),
        0xB6 => info(Ldx, ZeroPageY, 4),
        0xB8 => info(Clv, Implied, 2),
        0xB9 => info(Lda, AbsoluteY, 4),
        0xBA => info(Tsx, Implied, 2),
        0xBC => info(Ldy, AbsoluteX, 4),
        0xBD => info(Lda, AbsoluteX, 4),
        0xBE => info(Ldx, AbsoluteY, 4),

        0xC0 => info(Cpy, Immediate, 2),
        0xC1 => info(Cmp, IndexedIndirect, 6),
        0xC4 => info(Cpy, ZeroPage, 3),
        0xC5 => info(Cmp, ZeroPage, 3),
        0xC6 => info(Dec, ZeroPage, 5),
        0xC8 => info(Iny, Implied, 2),
        0xC9 => info(Cmp, Immediate, 2),
        0xCA => info(Dex, Implied, 2),
        0xCC => info(Cpy, Absolute, 4),
        0xCD => info(Cmp, Absolute, 4),
        0xCE => info(Dec, Absolute, 6),

        0xD0 => info(Bne, Relative, 2),
        0xD1 => info(Cmp, IndirectIndexed, 5),
        0xD5 => info(Cmp, ZeroPageX, 4),
        0xD6 => info(Dec, ZeroPageX, 6),
        0xD8 => info(Cld, Implied, 2),
        0xD9 => info(Cmp, AbsoluteY, 4),
        0xDD => info(Cmp, AbsoluteX, 4),
        0xDE => info(Dec, AbsoluteX, 7),

        0xE0 => info(Cpx, Immediate, 2),
        0xE1 => info(Sbc, IndexedIndirect, 6),
        0xE4 => info(Cpx, ZeroPage, 3),
        0xE5 => info(Sbc, ZeroPage, 3),
        0xE6 => info(Inc, ZeroPage, 5),
        0xE8 => info(Inx, Implied, 2),
        0xE9 => info(Sbc, Immediate, 2),
        0xEA => info(Nop, Implied, 2),
        0xEC => info(Cpx, Absolute, 4),
        0xED => info(Sbc, Absolute, 4),
        0xEE => info(Inc, Absolute, 6),

        0xF0 => info(Beq, Relative, 2),
        0xF1 => info(Sbc, IndirectIndexed, 5),
        0xF5 => info(Sbc, ZeroPageX, 4),
        0xF6 => info(Inc, ZeroPageX, 6),
        0xF8 => info(Sed, Implied, 2),
        0xF9 => info(Sbc, AbsoluteY, 4),
        0xFD => info(Sbc, AbsoluteX, 4),
        0xFE => info(Inc, AbsoluteX, 7),

        _ => info(Unknown, Implied, 2),
    }
}

/// Read-only load/arithmetic opcodes whose indexed/indirect-Y addressing
/// adds 1 cycle on a page cross. Writes and read-modify-write instructions
/// already charge the worst-case cycle count in the table above.
fn penalized_on_page_cross(op: Op) -> bool {
    matches!(
        op,
        Op::Adc | Op::And | Op::Cmp | Op::Eor | Op::Lda | Op::Ldx | Op::Ldy | Op::Ora | Op::Sbc
    )
}

/// Decode, resolve, and execute one instruction. Returns the number of
/// cycles it consumed.
pub fn step(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let opcode = bus.read(cpu.pc);
    cpu.pc = cpu.pc.wrapping_add(1);
    let entry = decode(opcode);

    let operand = resolve(cpu, bus, entry.mode);
    let mut cycles = entry.base_cycles as u32;
    if operand.page_crossed && penalized_on_page_cross(entry.op) {
        cycles += 1;
    }

    cycles += execute(cpu, bus, entry.op, entry.mode, &operand);
    cpu.cycles = cpu.cycles.wrapping_add(cycles as u64);
    cycles
}

fn read_operand(cpu: &Cpu, bus: &mut Bus, mode: AddrMode, operand: &Operand) -> u8 {
    if mode == AddrMode::Accumulator {
        cpu.a
    } else {
        bus.read(operand.addr)
    }
}

fn write_back(cpu: &mut Cpu, bus: &mut Bus, mode: AddrMode, operand: &Operand, value: u8) {
    if mode == AddrMode::Accumulator {
        cpu.a = value;
    } else {
        bus.write(operand.addr, value);
    }
}

/// Executes the decoded instruction. Returns any *extra* cycles beyond the
/// table's base count (branch-taken / branch-page-cross penalties); every
/// other side effect (register writes, memory writes, flags) happens here.
fn execute(cpu: &mut Cpu, bus: &mut Bus, op: Op, mode: AddrMode, operand: &Operand) -> u32 {
    use Op::*;
    match op {
        Adc => {
            let m = read_operand(cpu, bus, mode, operand);
            adc(cpu, m);
            0
        }
        Sbc => {
            let m = read_operand(cpu, bus, mode, operand);
            sbc(cpu, m);
            0
        }
        And => {
            let m = read_operand(cpu, bus, mode, operand);
            cpu.a &= m;
            cpu.update_zn(cpu.a);
            0
        }
        Ora => {
            let m = read_operand(cpu, bus, mode, operand);
            cpu.a |= m;
            cpu.update_zn(cpu.a);
            0
        }
        Eor => {
            let m = read_operand(cpu, bus, mode, operand);
            cpu.a ^= m;
            cpu.update_zn(cpu.a);
            0
        }
        Cmp => {
            let m = read_operand(cpu, bus, mode, operand);
            compare(cpu, cpu.a, m);
            0
        }
        Cpx => {
            let m = read_operand(cpu, bus, mode, operand);
            compare(cpu, cpu.x, m);
            0
        }
        Cpy => {
            let m = read_operand(cpu, bus, mode, operand);
            compare(cpu, cpu.y, m);
            0
        }
        Bit => {
            let m = read_operand(cpu, bus, mode, operand);
            bit(cpu, m);
            0
        }
        Lda => {
            cpu.a = read_operand(cpu, bus, mode, operand);
            cpu.update_zn(cpu.a);
            0
        }
        Ldx => {
            cpu.x = read_operand(cpu, bus, mode, operand);
            cpu.update_zn(cpu.x);
            0
        }
        Ldy => {
            cpu.y = read_operand(cpu, bus, mode, operand);
            cpu.update_zn(cpu.y);
            0
        }
        Sta => {
            write_back(cpu, bus, mode, operand, cpu.a);
            0
        }
        Stx => {
            write_back(cpu, bus, mode, operand, cpu.x);
            0
        }
        Sty => {
            write_back(cpu, bus, mode, operand, cpu.y);
            0
        }
        Asl => {
            let v = read_operand(cpu, bus, mode, operand);
            let result = asl(cpu, v);
            write_back(cpu, bus, mode, operand, result);
            0
        }
        Lsr => {
            let v = read_operand(cpu, bus, mode, operand);
            let result = lsr(cpu, v);
            write_back(cpu, bus, mode, operand, result);
            0
        }
        Rol => {
            let v = read_operand(cpu, bus, mode, operand);
            let result = rol(cpu, v);
            write_back(cpu, bus, mode, operand, result);
            0
        }
        Ror => {
            let v = read_operand(cpu, bus, mode, operand);
            let result = ror(cpu, v);
            write_back(cpu, bus, mode, operand, result);
            0
        }
        Inc => {
            let v = read_operand(cpu, bus, mode, operand).wrapping_add(1);
            cpu.update_zn(v);
            write_back(cpu, bus, mode, operand, v);
            0
        }
        Dec => {
            let v = read_operand(cpu, bus, mode, operand).wrapping_sub(1);
            cpu.update_zn(v);
            write_back(cpu, bus, mode, operand, v);
            0
        }
        Inx => {
            cpu.x = cpu.x.wrapping_add(1);
            cpu.update_zn(cpu.x);
            0
        }
        Iny => {
            cpu.y = cpu.y.wrapping_add(1);
            cpu.update_zn(cpu.y);
            0
        }
        Dex => {
            cpu.x = cpu.x.wrapping_sub(1);
            cpu.update_zn(cpu.x);
            0
        }
        Dey => {
            cpu.y = cpu.y.wrapping_sub(1);
            cpu.update_zn(cpu.y);
            0
        }
        Tax => {
            cpu.x = cpu.a;
            cpu.update_zn(cpu.x);
            0
        }
        Tay => {
            cpu.y = cpu.a;
            cpu.update_zn(cpu.y);
            0
        }
        Txa => {
            cpu.a = cpu.x;
            cpu.update_zn(cpu.a);
            0
        }
        Tya => {
            cpu.a = cpu.y;
            cpu.update_zn(cpu.a);
            0
        }
        Tsx => {
            cpu.x = cpu.sp;
            cpu.update_zn(cpu.x);
            0
        }
        Txs => {
            cpu.sp = cpu.x;
            0
        }
        Clc => {
            cpu.set_flag(CARRY, false);
            0
        }
        Sec => {
            cpu.set_flag(CARRY, true);
            0
        }
        Cli => {
            cpu.set_flag(IRQ_DISABLE, false);
            0
        }
        Sei => {
            cpu.set_flag(IRQ_DISABLE, true);
            0
        }
        Cld => {
            cpu.set_flag(DECIMAL, false);
            0
        }
        Sed => {
            cpu.set_flag(DECIMAL, true);
            0
        }
        Clv => {
            cpu.set_flag(OVERFLOW, false);
            0
        }
        Jmp => {
            cpu.pc = operand.addr;
            0
        }
        Jsr => {
            let return_to = cpu.pc.wrapping_sub(1);
            push_word(cpu, bus, return_to);
            cpu.pc = operand.addr;
            0
        }
        Rts => {
            cpu.pc = pop_word(cpu, bus).wrapping_add(1);
            0
        }
        Brk => {
            cpu.pc = cpu.pc.wrapping_add(1);
            push_word(cpu, bus, cpu.pc);
            push(cpu, bus, status_for_push(cpu));
            cpu.set_flag(IRQ_DISABLE, true);
            let lo = bus.read(0xFFFE) as u16;
            let hi = bus.read(0xFFFF) as u16;
            cpu.pc = (hi << 8) | lo;
            0
        }
        Rti => {
            let status = pop(cpu, bus);
            cpu.status = status_after_pop(status);
            cpu.pc = pop_word(cpu, bus);
            0
        }
        Pha => {
            push(cpu, bus, cpu.a);
            0
        }
        Pla => {
            cpu.a = pop(cpu, bus);
            cpu.update_zn(cpu.a);
            0
        }
        Php => {
            push(cpu, bus, status_for_push(cpu));
            0
        }
        Plp => {
            let status = pop(cpu, bus);
            cpu.status = status_after_pop(status);
            0
        }
        Nop => 0,
        Unknown => {
            log::trace!("unimplemented opcode at pc={:#06x}", cpu.pc.wrapping_sub(1));
            0
        }
        Bpl => branch(cpu, operand, !cpu.flag(NEGATIVE)),
        Bmi => branch(cpu, operand, cpu.flag(NEGATIVE)),
        Bvc => branch(cpu, operand, !cpu.flag(OVERFLOW)),
        Bvs => branch(cpu, operand, cpu.flag(OVERFLOW)),
        Bcc => branch(cpu, operand, !cpu.flag(CARRY)),
        Bcs => branch(cpu, operand, cpu.flag(CARRY)),
        Bne => branch(cpu, operand, !cpu.flag(ZERO)),
        Beq => branch(cpu, operand, cpu.flag(ZERO)),
    }
}

fn branch(cpu: &mut Cpu, operand: &Operand, taken: bool) -> u32 {
    if !taken {
        return 0;
    }
    let extra = if operand.page_crossed { 2 } else { 1 };
    cpu.pc = operand.addr;
    extra
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::{build_ines_with_prg, Cartridge};

    fn test_bus(patches: &[(u16, u8)]) -> Bus {
        let rom = build_ines_with_prg(patches);
        Bus::new(Cartridge::from_bytes(&rom).unwrap())
    }

    #[test]
    fn jsr_then_rts_round_trips_pc_and_stack() {
        // JSR $9000 at $8000, RTS at $9000.
        let mut bus = test_bus(&[
            (0x8000, 0x20),
            (0x8001, 0x00),
            (0x8002, 0x90),
            (0x9000, 0x60),
        ]);
        let mut cpu = Cpu::new();
        cpu.pc = 0x8000;
        cpu.sp = 0xFF;

        let sp_before = cpu.sp;
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.pc, 0x9000);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.pc, 0x8003);
        assert_eq!(cpu.sp, sp_before);
    }

    #[test]
    fn unknown_opcode_charges_two_cycles_and_continues() {
        let mut bus = test_bus(&[(0x8000, 0xFF)]); // not a documented opcode
        let mut cpu = Cpu::new();
        cpu.pc = 0x8000;
        let cycles = step(&mut cpu, &mut bus);
        assert_eq!(cycles, 2);
        assert_eq!(cpu.pc, 0x8001);
    }

    #[test]
    fn brk_pushes_pc_and_p_then_loads_irq_vector() {
        let mut bus = test_bus(&[
            (0x8000, 0x00), // BRK
            (0xFFFE, 0x34),
            (0xFFFF, 0x12),
        ]);
        let mut cpu = Cpu::new();
        cpu.pc = 0x8000;
        cpu.sp = 0xFF;
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.pc, 0x1234);
        assert!(cpu.status & IRQ_DISABLE != 0);
        assert_eq!(cpu.sp, 0xFC);
    }
}
