//! 6502 CPU core.
//!
//! The interpreter is table driven: `clock()` burns cycles until the
//! current instruction's budget is exhausted, then fetches the next opcode,
//! resolves its addressing mode, and executes the whole operation on that
//! same clock. Page-cross and branch penalties are added to the budget as
//! they are discovered.

use crate::addressing::AddrMode;
use crate::bus::Bus;
use crate::opcodes::{Operation, OPCODE_TABLE};
use crate::status::Status;

/// Reset vector location.
pub const RESET_VECTOR: u16 = 0xFFFC;
/// IRQ/BRK vector location.
pub const IRQ_VECTOR: u16 = 0xFFFE;
/// NMI vector location.
pub const NMI_VECTOR: u16 = 0xFFFA;

/// Base of the fixed stack page.
const STACK_BASE: u16 = 0x0100;

/// Where the current instruction's operand lives.
#[derive(Debug, Clone, Copy)]
enum Operand {
    /// Implied addressing; read/write target is the accumulator.
    Accumulator,
    /// A memory address (for relative mode, the branch target).
    Address(u16),
}

/// MOS 6502 CPU (2A03 variant: decimal mode is recorded but unused).
#[derive(Debug)]
pub struct Cpu {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Stack pointer, offset into the `$0100` page, next free slot.
    pub sp: u8,
    /// Program counter.
    pub pc: u16,
    /// Status register.
    pub status: Status,
    /// Cycles left before the next instruction may start.
    cycles_remaining: u8,
    /// Total clock ticks since reset, wrapping.
    cycles: u64,
}

impl Cpu {
    /// Create a CPU in its pre-reset state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0,
            status: Status::U,
            cycles_remaining: 0,
            cycles: 0,
        }
    }

    /// Advance one clock cycle.
    ///
    /// When the previous instruction has finished, this fetches and fully
    /// executes the next one; otherwise it only burns a cycle.
    pub fn clock(&mut self, bus: &mut impl Bus) {
        if self.cycles_remaining == 0 {
            let opcode = bus.read(self.pc);
            self.status.insert(Status::U);
            self.pc = self.pc.wrapping_add(1);

            let instruction = &OPCODE_TABLE[opcode as usize];
            self.cycles_remaining = instruction.cycles;

            let (operand, page_crossed) = self.resolve(instruction.mode, bus);
            let extra = self.execute(instruction.operation, operand, page_crossed, bus);
            self.cycles_remaining += extra;

            self.status.insert(Status::U);
        }

        self.cycles_remaining -= 1;
        self.cycles = self.cycles.wrapping_add(1);
    }

    /// True when the current instruction has retired.
    #[must_use]
    pub fn is_instruction_complete(&self) -> bool {
        self.cycles_remaining == 0
    }

    /// Total clock ticks since the last reset.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Reset: load PC from the reset vector and restore power-on register
    /// state. Costs 8 cycles.
    pub fn reset(&mut self, bus: &mut impl Bus) {
        self.pc = bus.read_u16(RESET_VECTOR);
        log::debug!("cpu reset, pc = ${:04X}", self.pc);
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = 0xFD;
        self.status = Status::U;
        self.cycles_remaining = 8;
        self.cycles = 0;
    }

    /// Maskable interrupt. Ignored while I is set. Costs 7 cycles.
    pub fn irq(&mut self, bus: &mut impl Bus) {
        if self.status.contains(Status::I) {
            return;
        }
        self.interrupt(bus, IRQ_VECTOR);
        self.cycles_remaining = 7;
    }

    /// Non-maskable interrupt. Costs 8 cycles.
    pub fn nmi(&mut self, bus: &mut impl Bus) {
        self.interrupt(bus, NMI_VECTOR);
        self.cycles_remaining = 8;
    }

    fn interrupt(&mut self, bus: &mut impl Bus, vector: u16) {
        self.push_u16(bus, self.pc);
        self.status.remove(Status::B);
        self.status.insert(Status::U);
        self.status.insert(Status::I);
        self.push(bus, self.status.bits());
        self.pc = bus.read_u16(vector);
    }

    // ----- operand resolution ------------------------------------------------

    fn resolve(&mut self, mode: AddrMode, bus: &mut impl Bus) -> (Operand, bool) {
        match mode {
            AddrMode::Imp => (Operand::Accumulator, false),
            AddrMode::Imm => {
                let addr = self.pc;
                self.pc = self.pc.wrapping_add(1);
                (Operand::Address(addr), false)
            }
            AddrMode::Zp0 => {
                let addr = u16::from(bus.read(self.pc));
                self.pc = self.pc.wrapping_add(1);
                (Operand::Address(addr), false)
            }
            AddrMode::Zpx => {
                let base = bus.read(self.pc);
                self.pc = self.pc.wrapping_add(1);
                (Operand::Address(u16::from(base.wrapping_add(self.x))), false)
            }
            AddrMode::Zpy => {
                let base = bus.read(self.pc);
                self.pc = self.pc.wrapping_add(1);
                (Operand::Address(u16::from(base.wrapping_add(self.y))), false)
            }
            AddrMode::Abs => {
                let addr = bus.read_u16(self.pc);
                self.pc = self.pc.wrapping_add(2);
                (Operand::Address(addr), false)
            }
            AddrMode::Abx => {
                let base = bus.read_u16(self.pc);
                self.pc = self.pc.wrapping_add(2);
                let addr = base.wrapping_add(u16::from(self.x));
                (Operand::Address(addr), (addr ^ base) & 0xFF00 != 0)
            }
            AddrMode::Aby => {
                let base = bus.read_u16(self.pc);
                self.pc = self.pc.wrapping_add(2);
                let addr = base.wrapping_add(u16::from(self.y));
                (Operand::Address(addr), (addr ^ base) & 0xFF00 != 0)
            }
            AddrMode::Ind => {
                let ptr = bus.read_u16(self.pc);
                self.pc = self.pc.wrapping_add(2);
                (Operand::Address(bus.read_u16_wrap(ptr)), false)
            }
            AddrMode::Izx => {
                let base = bus.read(self.pc);
                self.pc = self.pc.wrapping_add(1);
                // Both pointer bytes come from the zero page, with 8-bit wrap
                let ptr = base.wrapping_add(self.x);
                let lo = u16::from(bus.read(u16::from(ptr)));
                let hi = u16::from(bus.read(u16::from(ptr.wrapping_add(1))));
                (Operand::Address((hi << 8) | lo), false)
            }
            AddrMode::Izy => {
                let ptr = bus.read(self.pc);
                self.pc = self.pc.wrapping_add(1);
                let lo = u16::from(bus.read(u16::from(ptr)));
                let hi = u16::from(bus.read(u16::from(ptr.wrapping_add(1))));
                let base = (hi << 8) | lo;
                let addr = base.wrapping_add(u16::from(self.y));
                (Operand::Address(addr), (addr ^ base) & 0xFF00 != 0)
            }
            AddrMode::Rel => {
                let offset = bus.read(self.pc) as i8;
                self.pc = self.pc.wrapping_add(1);
                (Operand::Address(self.pc.wrapping_add(offset as u16)), false)
            }
        }
    }

    fn fetch(&self, bus: &mut impl Bus, operand: Operand) -> u8 {
        match operand {
            Operand::Accumulator => self.a,
            Operand::Address(addr) => bus.read(addr),
        }
    }

    fn store(&mut self, bus: &mut impl Bus, operand: Operand, value: u8) {
        match operand {
            Operand::Accumulator => self.a = value,
            Operand::Address(addr) => bus.write(addr, value),
        }
    }

    // ----- execution ---------------------------------------------------------

    /// Execute one operation; returns extra cycles beyond the table base.
    #[allow(clippy::too_many_lines)]
    fn execute(
        &mut self,
        operation: Operation,
        operand: Operand,
        page_crossed: bool,
        bus: &mut impl Bus,
    ) -> u8 {
        let penalty = u8::from(page_crossed);

        match operation {
            Operation::Adc => {
                let m = self.fetch(bus, operand);
                self.add_with_carry(m);
                penalty
            }
            Operation::Sbc => {
                let m = self.fetch(bus, operand) ^ 0xFF;
                self.add_with_carry(m);
                penalty
            }
            Operation::And => {
                self.a &= self.fetch(bus, operand);
                self.status.set_zn(self.a);
                penalty
            }
            Operation::Ora => {
                self.a |= self.fetch(bus, operand);
                self.status.set_zn(self.a);
                penalty
            }
            Operation::Eor => {
                self.a ^= self.fetch(bus, operand);
                self.status.set_zn(self.a);
                penalty
            }
            Operation::Asl => {
                let value = self.fetch(bus, operand);
                let result = value << 1;
                self.status.set(Status::C, value & 0x80 != 0);
                self.status.set_zn(result);
                self.store(bus, operand, result);
                0
            }
            Operation::Lsr => {
                let value = self.fetch(bus, operand);
                let result = value >> 1;
                self.status.set(Status::C, value & 0x01 != 0);
                self.status.set_zn(result);
                self.store(bus, operand, result);
                0
            }
            Operation::Rol => {
                let value = self.fetch(bus, operand);
                let result = (value << 1) | u8::from(self.status.contains(Status::C));
                self.status.set(Status::C, value & 0x80 != 0);
                self.status.set_zn(result);
                self.store(bus, operand, result);
                0
            }
            Operation::Ror => {
                let value = self.fetch(bus, operand);
                let result = (value >> 1) | (u8::from(self.status.contains(Status::C)) << 7);
                self.status.set(Status::C, value & 0x01 != 0);
                self.status.set_zn(result);
                self.store(bus, operand, result);
                0
            }
            Operation::Bit => {
                let m = self.fetch(bus, operand);
                self.status.set(Status::Z, self.a & m == 0);
                self.status.set(Status::V, m & 0x40 != 0);
                self.status.set(Status::N, m & 0x80 != 0);
                0
            }
            Operation::Bcc => self.branch(!self.status.contains(Status::C), operand),
            Operation::Bcs => self.branch(self.status.contains(Status::C), operand),
            Operation::Bne => self.branch(!self.status.contains(Status::Z), operand),
            Operation::Beq => self.branch(self.status.contains(Status::Z), operand),
            Operation::Bpl => self.branch(!self.status.contains(Status::N), operand),
            Operation::Bmi => self.branch(self.status.contains(Status::N), operand),
            Operation::Bvc => self.branch(!self.status.contains(Status::V), operand),
            Operation::Bvs => self.branch(self.status.contains(Status::V), operand),
            Operation::Brk => {
                self.pc = self.pc.wrapping_add(1);
                self.push_u16(bus, self.pc);
                self.status.insert(Status::B);
                self.push(bus, self.status.bits());
                self.status.remove(Status::B);
                self.status.insert(Status::I);
                self.pc = bus.read_u16(IRQ_VECTOR);
                0
            }
            Operation::Rti => {
                let value = self.pull(bus);
                self.status = Status::from_bits_truncate(value);
                self.status.remove(Status::B);
                self.status.insert(Status::U);
                self.pc = self.pull_u16(bus);
                0
            }
            Operation::Jmp => {
                if let Operand::Address(addr) = operand {
                    self.pc = addr;
                }
                0
            }
            Operation::Jsr => {
                if let Operand::Address(addr) = operand {
                    self.push_u16(bus, self.pc.wrapping_sub(1));
                    self.pc = addr;
                }
                0
            }
            Operation::Rts => {
                self.pc = self.pull_u16(bus).wrapping_add(1);
                0
            }
            Operation::Clc => {
                self.status.remove(Status::C);
                0
            }
            Operation::Sec => {
                self.status.insert(Status::C);
                0
            }
            Operation::Cld => {
                self.status.remove(Status::D);
                0
            }
            Operation::Sed => {
                self.status.insert(Status::D);
                0
            }
            Operation::Cli => {
                self.status.remove(Status::I);
                0
            }
            Operation::Sei => {
                self.status.insert(Status::I);
                0
            }
            Operation::Clv => {
                self.status.remove(Status::V);
                0
            }
            Operation::Cmp => {
                let m = self.fetch(bus, operand);
                self.compare(self.a, m);
                penalty
            }
            Operation::Cpx => {
                let m = self.fetch(bus, operand);
                self.compare(self.x, m);
                0
            }
            Operation::Cpy => {
                let m = self.fetch(bus, operand);
                self.compare(self.y, m);
                0
            }
            Operation::Dec => {
                let result = self.fetch(bus, operand).wrapping_sub(1);
                self.status.set_zn(result);
                self.store(bus, operand, result);
                0
            }
            Operation::Inc => {
                let result = self.fetch(bus, operand).wrapping_add(1);
                self.status.set_zn(result);
                self.store(bus, operand, result);
                0
            }
            Operation::Dex => {
                self.x = self.x.wrapping_sub(1);
                self.status.set_zn(self.x);
                0
            }
            Operation::Dey => {
                self.y = self.y.wrapping_sub(1);
                self.status.set_zn(self.y);
                0
            }
            Operation::Inx => {
                self.x = self.x.wrapping_add(1);
                self.status.set_zn(self.x);
                0
            }
            Operation::Iny => {
                self.y = self.y.wrapping_add(1);
                self.status.set_zn(self.y);
                0
            }
            Operation::Lda => {
                self.a = self.fetch(bus, operand);
                self.status.set_zn(self.a);
                penalty
            }
            Operation::Ldx => {
                self.x = self.fetch(bus, operand);
                self.status.set_zn(self.x);
                penalty
            }
            Operation::Ldy => {
                self.y = self.fetch(bus, operand);
                self.status.set_zn(self.y);
                penalty
            }
            Operation::Sta => {
                self.store(bus, operand, self.a);
                0
            }
            Operation::Stx => {
                self.store(bus, operand, self.x);
                0
            }
            Operation::Sty => {
                self.store(bus, operand, self.y);
                0
            }
            Operation::Pha => {
                self.push(bus, self.a);
                0
            }
            Operation::Php => {
                // Pushed copy carries B and U; the live register does not
                // keep B.
                self.push(bus, (self.status | Status::B | Status::U).bits());
                self.status.remove(Status::B);
                self.status.remove(Status::U);
                0
            }
            Operation::Pla => {
                self.a = self.pull(bus);
                self.status.set_zn(self.a);
                0
            }
            Operation::Plp => {
                let value = self.pull(bus);
                self.status = Status::from_bits_truncate(value);
                self.status.remove(Status::B);
                self.status.insert(Status::U);
                0
            }
            Operation::Tax => {
                self.x = self.a;
                self.status.set_zn(self.x);
                0
            }
            Operation::Tay => {
                self.y = self.a;
                self.status.set_zn(self.y);
                0
            }
            Operation::Tsx => {
                self.x = self.sp;
                self.status.set_zn(self.x);
                0
            }
            Operation::Txa => {
                self.a = self.x;
                self.status.set_zn(self.a);
                0
            }
            Operation::Txs => {
                self.sp = self.x;
                0
            }
            Operation::Tya => {
                self.a = self.y;
                self.status.set_zn(self.a);
                0
            }
            Operation::Nop => penalty,
            Operation::Xxx => 0,
        }
    }

    fn branch(&mut self, condition: bool, operand: Operand) -> u8 {
        let Operand::Address(target) = operand else {
            return 0;
        };
        if !condition {
            return 0;
        }
        let extra = if (target ^ self.pc) & 0xFF00 != 0 { 2 } else { 1 };
        self.pc = target;
        extra
    }

    fn add_with_carry(&mut self, m: u8) {
        let sum =
            u16::from(self.a) + u16::from(m) + u16::from(self.status.contains(Status::C));
        let result = sum as u8;
        self.status.set(Status::C, sum > 0xFF);
        self.status
            .set(Status::V, (!(self.a ^ m) & (self.a ^ result) & 0x80) != 0);
        self.a = result;
        self.status.set_zn(result);
    }

    fn compare(&mut self, register: u8, m: u8) {
        let result = register.wrapping_sub(m);
        self.status.set(Status::C, register >= m);
        self.status.set_zn(result);
    }

    // ----- stack -------------------------------------------------------------

    fn push(&mut self, bus: &mut impl Bus, value: u8) {
        bus.write(STACK_BASE | u16::from(self.sp), value);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn push_u16(&mut self, bus: &mut impl Bus, value: u16) {
        self.push(bus, (value >> 8) as u8);
        self.push(bus, (value & 0xFF) as u8);
    }

    fn pull(&mut self, bus: &mut impl Bus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(STACK_BASE | u16::from(self.sp))
    }

    fn pull_u16(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = u16::from(self.pull(bus));
        let hi = u16::from(self.pull(bus));
        (hi << 8) | lo
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::tests::FlatBus;
    use proptest::prelude::*;

    /// Run whole instructions until the predicate on the CPU holds.
    fn run_until(cpu: &mut Cpu, bus: &mut FlatBus, stop: impl Fn(&Cpu) -> bool) {
        while !stop(cpu) {
            step(cpu, bus);
        }
    }

    /// Clock through one instruction boundary.
    fn step(cpu: &mut Cpu, bus: &mut FlatBus) {
        loop {
            cpu.clock(bus);
            if cpu.is_instruction_complete() {
                break;
            }
        }
    }

    fn boot(program: &[u8]) -> (Cpu, FlatBus) {
        let mut bus = FlatBus::load(program, 0x8000);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        step(&mut cpu, &mut bus); // burn the reset sequence
        (cpu, bus)
    }

    #[test]
    fn reset_restores_documented_state() {
        let mut bus = FlatBus::load(&[0xEA], 0x8123);
        let mut cpu = Cpu::new();
        cpu.a = 0x55;
        cpu.x = 0xAA;
        cpu.sp = 0x10;
        cpu.status = Status::all();

        cpu.reset(&mut bus);
        assert_eq!(cpu.pc, 0x8123);
        assert_eq!((cpu.a, cpu.x, cpu.y), (0, 0, 0));
        assert_eq!(cpu.sp, 0xFD);
        assert_eq!(cpu.status, Status::U);
        assert!(!cpu.is_instruction_complete());

        for _ in 0..8 {
            cpu.clock(&mut bus);
        }
        assert!(cpu.is_instruction_complete());
        assert_eq!(cpu.cycles(), 8);
    }

    #[test]
    fn lda_immediate_sets_flags() {
        let (mut cpu, mut bus) = boot(&[0xA9, 0x00, 0xA9, 0x80, 0xA9, 0x01]);

        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a, 0);
        assert!(cpu.status.contains(Status::Z));

        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.status.contains(Status::N));
        assert!(!cpu.status.contains(Status::Z));

        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a, 0x01);
        assert!(!cpu.status.contains(Status::N));
    }

    #[test]
    fn adc_overflow_vectors() {
        // (a, m, carry_in) -> (result, c, v)
        let vectors = [
            (0x50u8, 0x10u8, false, 0x60u8, false, false),
            (0x50, 0x50, false, 0xA0, false, true),
            (0x50, 0xD0, false, 0x20, true, false),
            (0xD0, 0x90, false, 0x60, true, true),
            (0xFF, 0x01, false, 0x00, true, false),
            (0x00, 0x00, true, 0x01, false, false),
        ];
        for (a, m, carry, result, c, v) in vectors {
            let (mut cpu, mut bus) = boot(&[0x69, m]);
            cpu.a = a;
            cpu.status.set(Status::C, carry);
            step(&mut cpu, &mut bus);
            assert_eq!(cpu.a, result, "ADC {a:#04X}+{m:#04X}");
            assert_eq!(cpu.status.contains(Status::C), c, "carry for {a:#04X}+{m:#04X}");
            assert_eq!(cpu.status.contains(Status::V), v, "overflow for {a:#04X}+{m:#04X}");
        }
    }

    #[test]
    fn sbc_is_adc_of_inverted_operand() {
        // 0x50 - 0x30 with carry set = 0x20, no borrow
        let (mut cpu, mut bus) = boot(&[0xE9, 0x30]);
        cpu.a = 0x50;
        cpu.status.insert(Status::C);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a, 0x20);
        assert!(cpu.status.contains(Status::C));

        // 0x10 - 0x20 borrows
        let (mut cpu, mut bus) = boot(&[0xE9, 0x20]);
        cpu.a = 0x10;
        cpu.status.insert(Status::C);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a, 0xF0);
        assert!(!cpu.status.contains(Status::C));
        assert!(cpu.status.contains(Status::N));
    }

    #[test]
    fn compare_flag_shapes() {
        let (mut cpu, mut bus) = boot(&[0xC9, 0x40, 0xC9, 0x41, 0xC9, 0x3F]);
        cpu.a = 0x40;

        step(&mut cpu, &mut bus); // equal
        assert!(cpu.status.contains(Status::C));
        assert!(cpu.status.contains(Status::Z));

        step(&mut cpu, &mut bus); // less than operand
        assert!(!cpu.status.contains(Status::C));
        assert!(!cpu.status.contains(Status::Z));

        step(&mut cpu, &mut bus); // greater than operand
        assert!(cpu.status.contains(Status::C));
        assert!(!cpu.status.contains(Status::Z));
    }

    #[test]
    fn shifts_and_rotates_move_carry() {
        // ASL A: carry out of bit 7
        let (mut cpu, mut bus) = boot(&[0x0A]);
        cpu.a = 0x81;
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a, 0x02);
        assert!(cpu.status.contains(Status::C));

        // ROR A: carry rotates into bit 7 and out of bit 0
        let (mut cpu, mut bus) = boot(&[0x6A]);
        cpu.a = 0x01;
        cpu.status.insert(Status::C);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.status.contains(Status::C));
        assert!(cpu.status.contains(Status::N));

        // LSR memory
        let (mut cpu, mut bus) = boot(&[0x46, 0x10]);
        bus.ram[0x0010] = 0x03;
        step(&mut cpu, &mut bus);
        assert_eq!(bus.ram[0x0010], 0x01);
        assert!(cpu.status.contains(Status::C));
    }

    #[test]
    fn bit_copies_operand_high_bits() {
        let (mut cpu, mut bus) = boot(&[0x24, 0x10]);
        bus.ram[0x0010] = 0xC0;
        cpu.a = 0x3F;
        step(&mut cpu, &mut bus);
        assert!(cpu.status.contains(Status::Z)); // a & m == 0
        assert!(cpu.status.contains(Status::N));
        assert!(cpu.status.contains(Status::V));
    }

    #[test]
    fn branch_cycle_penalties() {
        // BNE not taken: 2 cycles
        let (mut cpu, mut bus) = boot(&[0xD0, 0x10]);
        cpu.status.insert(Status::Z);
        let before = cpu.cycles();
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.cycles() - before, 2);

        // Taken, same page: 3 cycles
        let (mut cpu, mut bus) = boot(&[0xD0, 0x10]);
        cpu.status.remove(Status::Z);
        let before = cpu.cycles();
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.cycles() - before, 3);
        assert_eq!(cpu.pc, 0x8012);

        // Taken across a page: 4 cycles. Branch backwards over $8000.
        let (mut cpu, mut bus) = boot(&[0xD0, 0xFA]);
        cpu.status.remove(Status::Z);
        let before = cpu.cycles();
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.cycles() - before, 4);
        assert_eq!(cpu.pc, 0x7FFC);
    }

    #[test]
    fn read_page_cross_adds_a_cycle_but_stores_do_not() {
        // LDA $80F0,X with X=0x20 crosses into $8110
        let (mut cpu, mut bus) = boot(&[0xBD, 0xF0, 0x80]);
        cpu.x = 0x20;
        bus.ram[0x8110] = 0x42;
        let before = cpu.cycles();
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a, 0x42);
        assert_eq!(cpu.cycles() - before, 5);

        // Same addressing without a cross costs the base 4
        let (mut cpu, mut bus) = boot(&[0xBD, 0xF0, 0x80]);
        cpu.x = 0x01;
        let before = cpu.cycles();
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.cycles() - before, 4);

        // STA $80F0,X always costs 5, crossing or not
        let (mut cpu, mut bus) = boot(&[0x9D, 0xF0, 0x80]);
        cpu.x = 0x20;
        cpu.a = 0x99;
        let before = cpu.cycles();
        step(&mut cpu, &mut bus);
        assert_eq!(bus.ram[0x8110], 0x99);
        assert_eq!(cpu.cycles() - before, 5);
    }

    #[test]
    fn jmp_indirect_reproduces_page_wrap_bug() {
        let (mut cpu, mut bus) = boot(&[0x6C, 0xFF, 0x02]);
        bus.ram[0x02FF] = 0x34;
        bus.ram[0x0300] = 0x56; // would be the high byte without the bug
        bus.ram[0x0200] = 0x12; // byte actually fetched
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.pc, 0x1234);
    }

    #[test]
    fn indexed_indirect_wraps_in_zero_page() {
        // IZX: pointer at (0xFE + 0x03) & 0xFF = 0x01, high byte from 0x02
        let (mut cpu, mut bus) = boot(&[0xA1, 0xFE]);
        cpu.x = 0x03;
        bus.ram[0x0001] = 0x20;
        bus.ram[0x0002] = 0x04;
        bus.ram[0x0420] = 0x77;
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a, 0x77);

        // IZY: pointer bytes at 0xFF and 0x00
        let (mut cpu, mut bus) = boot(&[0xB1, 0xFF]);
        cpu.y = 0x01;
        bus.ram[0x00FF] = 0x10;
        bus.ram[0x0000] = 0x03;
        bus.ram[0x0311] = 0x66;
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a, 0x66);
    }

    #[test]
    fn php_pushes_b_and_u_and_plp_drops_b() {
        let (mut cpu, mut bus) = boot(&[0x08, 0x28]);
        cpu.status = Status::U | Status::C;

        step(&mut cpu, &mut bus); // PHP
        let pushed = bus.ram[0x01FD];
        assert_eq!(pushed & 0x30, 0x30); // B and U in the stacked copy
        assert!(!cpu.status.contains(Status::B));

        // Make the byte on the stack carry B; PLP must not adopt it
        bus.ram[0x01FD] = pushed | Status::B.bits();
        step(&mut cpu, &mut bus); // PLP
        assert!(!cpu.status.contains(Status::B));
        assert!(cpu.status.contains(Status::U));
        assert!(cpu.status.contains(Status::C));
    }

    #[test]
    fn jsr_rts_round_trip() {
        let program = [
            0x20, 0x10, 0x80, // JSR $8010
            0xEA, // landing point after RTS
        ];
        let (mut cpu, mut bus) = boot(&program);
        bus.ram[0x8010] = 0x60; // RTS

        step(&mut cpu, &mut bus); // JSR
        assert_eq!(cpu.pc, 0x8010);
        // Return address pushed is the JSR's last byte
        assert_eq!(bus.ram[0x01FD], 0x80);
        assert_eq!(bus.ram[0x01FC], 0x02);

        step(&mut cpu, &mut bus); // RTS
        assert_eq!(cpu.pc, 0x8003);
    }

    #[test]
    fn brk_and_rti_round_trip() {
        let (mut cpu, mut bus) = boot(&[0x00, 0xEA, 0xEA]);
        bus.ram[0xFFFE] = 0x00;
        bus.ram[0xFFFF] = 0x90;
        bus.ram[0x9000] = 0x40; // RTI
        cpu.status.insert(Status::C);

        step(&mut cpu, &mut bus); // BRK
        assert_eq!(cpu.pc, 0x9000);
        assert!(cpu.status.contains(Status::I));
        // Stacked status carries B; return address skips the padding byte
        assert_eq!(bus.ram[0x01FB] & Status::B.bits(), Status::B.bits());
        assert_eq!(bus.ram[0x01FC], 0x02);

        step(&mut cpu, &mut bus); // RTI
        assert_eq!(cpu.pc, 0x8002);
        assert!(!cpu.status.contains(Status::B));
        assert!(cpu.status.contains(Status::C));
    }

    #[test]
    fn irq_respects_interrupt_disable() {
        let (mut cpu, mut bus) = boot(&[0xEA]);
        bus.ram[0xFFFE] = 0x00;
        bus.ram[0xFFFF] = 0x90;

        cpu.status.insert(Status::I);
        let pc = cpu.pc;
        cpu.irq(&mut bus);
        assert_eq!(cpu.pc, pc); // masked

        cpu.status.remove(Status::I);
        cpu.irq(&mut bus);
        assert_eq!(cpu.pc, 0x9000);
        assert!(cpu.status.contains(Status::I));
    }

    #[test]
    fn nmi_is_not_maskable() {
        let (mut cpu, mut bus) = boot(&[0xEA]);
        bus.ram[0xFFFA] = 0x00;
        bus.ram[0xFFFB] = 0xA0;

        cpu.status.insert(Status::I);
        cpu.nmi(&mut bus);
        assert_eq!(cpu.pc, 0xA000);
        // Stacked status has B clear
        assert_eq!(bus.ram[0x01FB] & Status::B.bits(), 0);
    }

    #[test]
    fn multiply_by_repeated_addition() {
        // 10 * 3 computed by adding RAM[$0001] ten times
        let program = [
            0xA2, 0x0A, // LDX #10
            0x8E, 0x00, 0x00, // STX $0000
            0xA2, 0x03, // LDX #3
            0x8E, 0x01, 0x00, // STX $0001
            0xAC, 0x00, 0x00, // LDY $0000
            0xA9, 0x00, // LDA #0
            0x18, // CLC
            0x6D, 0x01, 0x00, // ADC $0001
            0x88, // DEY
            0xD0, 0xFA, // BNE back to the ADC
            0x8D, 0x02, 0x00, // STA $0002
            0xEA, 0xEA, 0xEA, // NOP padding
        ];
        let mut bus = FlatBus::load(&program, 0x8000);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);

        run_until(&mut cpu, &mut bus, |cpu| cpu.pc >= 0x801A);

        assert_eq!(bus.ram[0x0000], 10);
        assert_eq!(bus.ram[0x0001], 3);
        assert_eq!(bus.ram[0x0002], 30);
        assert_eq!(cpu.a, 30);
        assert_eq!(cpu.status, Status::U | Status::Z);
        // 8 reset cycles, 20 of setup, 89 in the add loop, 4 for the STA
        // and 2 for the NOP the run stops on
        assert_eq!(cpu.cycles(), 123);
    }

    proptest! {
        /// U is asserted after every retired instruction, whatever ran.
        #[test]
        fn unused_flag_always_set_after_instructions(bytes in proptest::collection::vec(any::<u8>(), 1..64)) {
            let mut bus = FlatBus::load(&bytes, 0x4000);
            let mut cpu = Cpu::new();
            cpu.reset(&mut bus);
            for _ in 0..256 {
                step(&mut cpu, &mut bus);
                prop_assert!(cpu.status.contains(Status::U));
            }
        }
    }
}
