//! The 256-entry opcode table.
//!
//! Indexed directly by opcode byte. Unofficial opcodes either alias NOP/SBC
//! (the handful games actually hit) or fall through to the illegal-opcode
//! sink, which behaves as a no-op.

use crate::addressing::AddrMode;

/// Operation selector for the execution dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)] // variants are the 6502 mnemonics themselves
#[rustfmt::skip]
pub enum Operation {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
    /// Illegal-opcode sink; executes as a no-op.
    Xxx,
}

/// One opcode table entry.
#[derive(Debug, Clone, Copy)]
pub struct Instruction {
    /// Mnemonic for disassembly.
    pub mnemonic: &'static str,
    /// Operation dispatched by the execute step.
    pub operation: Operation,
    /// Addressing mode.
    pub mode: AddrMode,
    /// Base cycle count before page-cross or branch penalties.
    pub cycles: u8,
}

const fn i(mnemonic: &'static str, operation: Operation, mode: AddrMode, cycles: u8) -> Instruction {
    Instruction {
        mnemonic,
        operation,
        mode,
        cycles,
    }
}

use AddrMode::{Abs, Abx, Aby, Imm, Imp, Ind, Izx, Izy, Rel, Zp0, Zpx, Zpy};
use Operation as O;

/// The fixed 256-entry dispatch table, 16 opcodes per row.
#[rustfmt::skip]
pub const OPCODE_TABLE: [Instruction; 256] = [
    // 0x00
    i("BRK", O::Brk, Imp, 7), i("ORA", O::Ora, Izx, 6), i("???", O::Xxx, Imp, 2), i("???", O::Xxx, Imp, 8),
    i("???", O::Nop, Imp, 3), i("ORA", O::Ora, Zp0, 3), i("ASL", O::Asl, Zp0, 5), i("???", O::Xxx, Imp, 5),
    i("PHP", O::Php, Imp, 3), i("ORA", O::Ora, Imm, 2), i("ASL", O::Asl, Imp, 2), i("???", O::Xxx, Imp, 2),
    i("???", O::Nop, Imp, 4), i("ORA", O::Ora, Abs, 4), i("ASL", O::Asl, Abs, 6), i("???", O::Xxx, Imp, 6),
    // 0x10
    i("BPL", O::Bpl, Rel, 2), i("ORA", O::Ora, Izy, 5), i("???", O::Xxx, Imp, 2), i("???", O::Xxx, Imp, 8),
    i("???", O::Nop, Imp, 4), i("ORA", O::Ora, Zpx, 4), i("ASL", O::Asl, Zpx, 6), i("???", O::Xxx, Imp, 6),
    i("CLC", O::Clc, Imp, 2), i("ORA", O::Ora, Aby, 4), i("???", O::Nop, Imp, 2), i("???", O::Xxx, Imp, 7),
    i("NOP", O::Nop, Abx, 4), i("ORA", O::Ora, Abx, 4), i("ASL", O::Asl, Abx, 7), i("???", O::Xxx, Imp, 7),
    // 0x20
    i("JSR", O::Jsr, Abs, 6), i("AND", O::And, Izx, 6), i("???", O::Xxx, Imp, 2), i("???", O::Xxx, Imp, 8),
    i("BIT", O::Bit, Zp0, 3), i("AND", O::And, Zp0, 3), i("ROL", O::Rol, Zp0, 5), i("???", O::Xxx, Imp, 5),
    i("PLP", O::Plp, Imp, 4), i("AND", O::And, Imm, 2), i("ROL", O::Rol, Imp, 2), i("???", O::Xxx, Imp, 2),
    i("BIT", O::Bit, Abs, 4), i("AND", O::And, Abs, 4), i("ROL", O::Rol, Abs, 6), i("???", O::Xxx, Imp, 6),
    // 0x30
    i("BMI", O::Bmi, Rel, 2), i("AND", O::And, Izy, 5), i("???", O::Xxx, Imp, 2), i("???", O::Xxx, Imp, 8),
    i("???", O::Nop, Imp, 4), i("AND", O::And, Zpx, 4), i("ROL", O::Rol, Zpx, 6), i("???", O::Xxx, Imp, 6),
    i("SEC", O::Sec, Imp, 2), i("AND", O::And, Aby, 4), i("???", O::Nop, Imp, 2), i("???", O::Xxx, Imp, 7),
    i("NOP", O::Nop, Abx, 4), i("AND", O::And, Abx, 4), i("ROL", O::Rol, Abx, 7), i("???", O::Xxx, Imp, 7),
    // 0x40
    i("RTI", O::Rti, Imp, 6), i("EOR", O::Eor, Izx, 6), i("???", O::Xxx, Imp, 2), i("???", O::Xxx, Imp, 8),
    i("???", O::Nop, Imp, 3), i("EOR", O::Eor, Zp0, 3), i("LSR", O::Lsr, Zp0, 5), i("???", O::Xxx, Imp, 5),
    i("PHA", O::Pha, Imp, 3), i("EOR", O::Eor, Imm, 2), i("LSR", O::Lsr, Imp, 2), i("???", O::Xxx, Imp, 2),
    i("JMP", O::Jmp, Abs, 3), i("EOR", O::Eor, Abs, 4), i("LSR", O::Lsr, Abs, 6), i("???", O::Xxx, Imp, 6),
    // 0x50
    i("BVC", O::Bvc, Rel, 2), i("EOR", O::Eor, Izy, 5), i("???", O::Xxx, Imp, 2), i("???", O::Xxx, Imp, 8),
    i("???", O::Nop, Imp, 4), i("EOR", O::Eor, Zpx, 4), i("LSR", O::Lsr, Zpx, 6), i("???", O::Xxx, Imp, 6),
    i("CLI", O::Cli, Imp, 2), i("EOR", O::Eor, Aby, 4), i("???", O::Nop, Imp, 2), i("???", O::Xxx, Imp, 7),
    i("NOP", O::Nop, Abx, 4), i("EOR", O::Eor, Abx, 4), i("LSR", O::Lsr, Abx, 7), i("???", O::Xxx, Imp, 7),
    // 0x60
    i("RTS", O::Rts, Imp, 6), i("ADC", O::Adc, Izx, 6), i("???", O::Xxx, Imp, 2), i("???", O::Xxx, Imp, 8),
    i("???", O::Nop, Imp, 3), i("ADC", O::Adc, Zp0, 3), i("ROR", O::Ror, Zp0, 5), i("???", O::Xxx, Imp, 5),
    i("PLA", O::Pla, Imp, 4), i("ADC", O::Adc, Imm, 2), i("ROR", O::Ror, Imp, 2), i("???", O::Xxx, Imp, 2),
    i("JMP", O::Jmp, Ind, 5), i("ADC", O::Adc, Abs, 4), i("ROR", O::Ror, Abs, 6), i("???", O::Xxx, Imp, 6),
    // 0x70
    i("BVS", O::Bvs, Rel, 2), i("ADC", O::Adc, Izy, 5), i("???", O::Xxx, Imp, 2), i("???", O::Xxx, Imp, 8),
    i("???", O::Nop, Imp, 4), i("ADC", O::Adc, Zpx, 4), i("ROR", O::Ror, Zpx, 6), i("???", O::Xxx, Imp, 6),
    i("SEI", O::Sei, Imp, 2), i("ADC", O::Adc, Aby, 4), i("???", O::Nop, Imp, 2), i("???", O::Xxx, Imp, 7),
    i("NOP", O::Nop, Abx, 4), i("ADC", O::Adc, Abx, 4), i("ROR", O::Ror, Abx, 7), i("???", O::Xxx, Imp, 7),
    // 0x80
    i("???", O::Nop, Imp, 2), i("STA", O::Sta, Izx, 6), i("???", O::Nop, Imp, 2), i("???", O::Xxx, Imp, 6),
    i("STY", O::Sty, Zp0, 3), i("STA", O::Sta, Zp0, 3), i("STX", O::Stx, Zp0, 3), i("???", O::Xxx, Imp, 3),
    i("DEY", O::Dey, Imp, 2), i("???", O::Nop, Imp, 2), i("TXA", O::Txa, Imp, 2), i("???", O::Xxx, Imp, 2),
    i("STY", O::Sty, Abs, 4), i("STA", O::Sta, Abs, 4), i("STX", O::Stx, Abs, 4), i("???", O::Xxx, Imp, 4),
    // 0x90
    i("BCC", O::Bcc, Rel, 2), i("STA", O::Sta, Izy, 6), i("???", O::Xxx, Imp, 2), i("???", O::Xxx, Imp, 6),
    i("STY", O::Sty, Zpx, 4), i("STA", O::Sta, Zpx, 4), i("STX", O::Stx, Zpy, 4), i("???", O::Xxx, Imp, 4),
    i("TYA", O::Tya, Imp, 2), i("STA", O::Sta, Aby, 5), i("TXS", O::Txs, Imp, 2), i("???", O::Xxx, Imp, 5),
    i("???", O::Nop, Imp, 5), i("STA", O::Sta, Abx, 5), i("???", O::Xxx, Imp, 5), i("???", O::Xxx, Imp, 5),
    // 0xA0
    i("LDY", O::Ldy, Imm, 2), i("LDA", O::Lda, Izx, 6), i("LDX", O::Ldx, Imm, 2), i("???", O::Xxx, Imp, 6),
    i("LDY", O::Ldy, Zp0, 3), i("LDA", O::Lda, Zp0, 3), i("LDX", O::Ldx, Zp0, 3), i("???", O::Xxx, Imp, 3),
    i("TAY", O::Tay, Imp, 2), i("LDA", O::Lda, Imm, 2), i("TAX", O::Tax, Imp, 2), i("???", O::Xxx, Imp, 2),
    i("LDY", O::Ldy, Abs, 4), i("LDA", O::Lda, Abs, 4), i("LDX", O::Ldx, Abs, 4), i("???", O::Xxx, Imp, 4),
    // 0xB0
    i("BCS", O::Bcs, Rel, 2), i("LDA", O::Lda, Izy, 5), i("???", O::Xxx, Imp, 2), i("???", O::Xxx, Imp, 5),
    i("LDY", O::Ldy, Zpx, 4), i("LDA", O::Lda, Zpx, 4), i("LDX", O::Ldx, Zpy, 4), i("???", O::Xxx, Imp, 4),
    i("CLV", O::Clv, Imp, 2), i("LDA", O::Lda, Aby, 4), i("TSX", O::Tsx, Imp, 2), i("???", O::Xxx, Imp, 4),
    i("LDY", O::Ldy, Abx, 4), i("LDA", O::Lda, Abx, 4), i("LDX", O::Ldx, Aby, 4), i("???", O::Xxx, Imp, 4),
    // 0xC0
    i("CPY", O::Cpy, Imm, 2), i("CMP", O::Cmp, Izx, 6), i("???", O::Nop, Imp, 2), i("???", O::Xxx, Imp, 8),
    i("CPY", O::Cpy, Zp0, 3), i("CMP", O::Cmp, Zp0, 3), i("DEC", O::Dec, Zp0, 5), i("???", O::Xxx, Imp, 5),
    i("INY", O::Iny, Imp, 2), i("CMP", O::Cmp, Imm, 2), i("DEX", O::Dex, Imp, 2), i("???", O::Xxx, Imp, 2),
    i("CPY", O::Cpy, Abs, 4), i("CMP", O::Cmp, Abs, 4), i("DEC", O::Dec, Abs, 6), i("???", O::Xxx, Imp, 6),
    // 0xD0
    i("BNE", O::Bne, Rel, 2), i("CMP", O::Cmp, Izy, 5), i("???", O::Xxx, Imp, 2), i("???", O::Xxx, Imp, 8),
    i("???", O::Nop, Imp, 4), i("CMP", O::Cmp, Zpx, 4), i("DEC", O::Dec, Zpx, 6), i("???", O::Xxx, Imp, 6),
    i("CLD", O::Cld, Imp, 2), i("CMP", O::Cmp, Aby, 4), i("NOP", O::Nop, Imp, 2), i("???", O::Xxx, Imp, 7),
    i("NOP", O::Nop, Abx, 4), i("CMP", O::Cmp, Abx, 4), i("DEC", O::Dec, Abx, 7), i("???", O::Xxx, Imp, 7),
    // 0xE0
    i("CPX", O::Cpx, Imm, 2), i("SBC", O::Sbc, Izx, 6), i("???", O::Nop, Imp, 2), i("???", O::Xxx, Imp, 8),
    i("CPX", O::Cpx, Zp0, 3), i("SBC", O::Sbc, Zp0, 3), i("INC", O::Inc, Zp0, 5), i("???", O::Xxx, Imp, 5),
    i("INX", O::Inx, Imp, 2), i("SBC", O::Sbc, Imm, 2), i("NOP", O::Nop, Imp, 2), i("SBC", O::Sbc, Imm, 2),
    i("CPX", O::Cpx, Abs, 4), i("SBC", O::Sbc, Abs, 4), i("INC", O::Inc, Abs, 6), i("???", O::Xxx, Imp, 6),
    // 0xF0
    i("BEQ", O::Beq, Rel, 2), i("SBC", O::Sbc, Izy, 5), i("???", O::Xxx, Imp, 2), i("???", O::Xxx, Imp, 8),
    i("???", O::Nop, Imp, 4), i("SBC", O::Sbc, Zpx, 4), i("INC", O::Inc, Zpx, 6), i("???", O::Xxx, Imp, 6),
    i("SED", O::Sed, Imp, 2), i("SBC", O::Sbc, Aby, 4), i("NOP", O::Nop, Imp, 2), i("???", O::Xxx, Imp, 7),
    i("NOP", O::Nop, Abx, 4), i("SBC", O::Sbc, Abx, 4), i("INC", O::Inc, Abx, 7), i("???", O::Xxx, Imp, 7),
];
