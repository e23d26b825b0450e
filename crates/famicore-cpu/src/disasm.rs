//! Table-driven disassembler.
//!
//! Decodes with the same opcode table the interpreter dispatches from, so
//! the listing can never drift from execution.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::addressing::AddrMode;
use crate::bus::Bus;
use crate::opcodes::OPCODE_TABLE;

/// Disassemble `[start, stop]`, keyed by instruction start address.
pub fn disassemble(bus: &mut impl Bus, start: u16, stop: u16) -> BTreeMap<u16, String> {
    let mut listing = BTreeMap::new();
    let mut addr = u32::from(start);

    while addr <= u32::from(stop) {
        let line_addr = addr as u16;
        let opcode = bus.read(line_addr);
        let instruction = &OPCODE_TABLE[opcode as usize];
        addr += 1;

        let mut line = format!("${line_addr:04X}: {}", instruction.mnemonic);

        match instruction.mode {
            AddrMode::Imp => {}
            AddrMode::Imm => {
                let value = bus.read(addr as u16);
                addr += 1;
                let _ = write!(line, " #${value:02X}");
            }
            AddrMode::Zp0 => {
                let value = bus.read(addr as u16);
                addr += 1;
                let _ = write!(line, " ${value:02X}");
            }
            AddrMode::Zpx => {
                let value = bus.read(addr as u16);
                addr += 1;
                let _ = write!(line, " ${value:02X},X");
            }
            AddrMode::Zpy => {
                let value = bus.read(addr as u16);
                addr += 1;
                let _ = write!(line, " ${value:02X},Y");
            }
            AddrMode::Izx => {
                let value = bus.read(addr as u16);
                addr += 1;
                let _ = write!(line, " (${value:02X},X)");
            }
            AddrMode::Izy => {
                let value = bus.read(addr as u16);
                addr += 1;
                let _ = write!(line, " (${value:02X}),Y");
            }
            AddrMode::Abs | AddrMode::Abx | AddrMode::Aby | AddrMode::Ind => {
                let lo = u16::from(bus.read(addr as u16));
                let hi = u16::from(bus.read((addr + 1) as u16));
                addr += 2;
                let target = (hi << 8) | lo;
                let _ = match instruction.mode {
                    AddrMode::Abs => write!(line, " ${target:04X}"),
                    AddrMode::Abx => write!(line, " ${target:04X},X"),
                    AddrMode::Aby => write!(line, " ${target:04X},Y"),
                    _ => write!(line, " (${target:04X})"),
                };
            }
            AddrMode::Rel => {
                let offset = bus.read(addr as u16);
                addr += 1;
                let target = (addr as u16).wrapping_add(offset as i8 as u16);
                let _ = write!(line, " ${offset:02X} [${target:04X}]");
            }
        }

        listing.insert(line_addr, line);
    }

    listing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::tests::FlatBus;

    #[test]
    fn formats_each_addressing_shape() {
        let program = [
            0xA9, 0x0A, // LDA #$0A
            0x85, 0x10, // STA $10
            0xB5, 0x10, // LDA $10,X
            0xB6, 0x10, // LDX $10,Y
            0xA1, 0x20, // LDA ($20,X)
            0xB1, 0x20, // LDA ($20),Y
            0xAD, 0x34, 0x12, // LDA $1234
            0xBD, 0x34, 0x12, // LDA $1234,X
            0xB9, 0x34, 0x12, // LDA $1234,Y
            0x6C, 0x34, 0x12, // JMP ($1234)
            0xD0, 0xFE, // BNE back onto itself
            0xEA, // NOP
        ];
        let mut bus = FlatBus::load(&program, 0x8000);
        let listing = disassemble(&mut bus, 0x8000, 0x8000 + program.len() as u16 - 1);

        assert_eq!(listing[&0x8000], "$8000: LDA #$0A");
        assert_eq!(listing[&0x8002], "$8002: STA $10");
        assert_eq!(listing[&0x8004], "$8004: LDA $10,X");
        assert_eq!(listing[&0x8006], "$8006: LDX $10,Y");
        assert_eq!(listing[&0x8008], "$8008: LDA ($20,X)");
        assert_eq!(listing[&0x800A], "$800A: LDA ($20),Y");
        assert_eq!(listing[&0x800C], "$800C: LDA $1234");
        assert_eq!(listing[&0x800F], "$800F: LDA $1234,X");
        assert_eq!(listing[&0x8012], "$8012: LDA $1234,Y");
        assert_eq!(listing[&0x8015], "$8015: JMP ($1234)");
        assert_eq!(listing[&0x8018], "$8018: BNE $FE [$8018]");
        assert_eq!(listing[&0x801A], "$801A: NOP");
    }

    #[test]
    fn keys_are_instruction_starts() {
        let mut bus = FlatBus::load(&[0xA9, 0x01, 0xA9, 0x02], 0x8000);
        let listing = disassemble(&mut bus, 0x8000, 0x8003);
        let keys: Vec<u16> = listing.keys().copied().collect();
        assert_eq!(keys, vec![0x8000, 0x8002]);
    }
}
