//! CPU status register (P) flags.
//!
//! ```text
//! 7  6  5  4  3  2  1  0
//! N  V  U  B  D  I  Z  C
//! │  │  │  │  │  │  │  └─ Carry
//! │  │  │  │  │  │  └──── Zero
//! │  │  │  │  │  └─────── Interrupt Disable
//! │  │  │  │  └────────── Decimal (recorded, arithmetically unused)
//! │  │  │  └───────────── Break (1 only in bytes pushed by PHP/BRK)
//! │  │  └──────────────── Unused (held set)
//! │  └─────────────────── Overflow
//! └────────────────────── Negative
//! ```

use bitflags::bitflags;

bitflags! {
    /// CPU status register flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Status: u8 {
        /// Carry out of bit 7 (or not-borrow for compares).
        const C = 1 << 0;
        /// Result was zero.
        const Z = 1 << 1;
        /// IRQ interrupts disabled. NMI is unaffected.
        const I = 1 << 2;
        /// Decimal mode. The 2A03 has no BCD unit, so this is state only.
        const D = 1 << 3;
        /// Break marker in stacked copies of the register.
        const B = 1 << 4;
        /// Unused bit, asserted after every instruction.
        const U = 1 << 5;
        /// Signed overflow.
        const V = 1 << 6;
        /// Bit 7 of the result.
        const N = 1 << 7;
    }
}

impl Status {
    /// Sets or clears Z and N from a result byte.
    #[inline]
    pub fn set_zn(&mut self, value: u8) {
        self.set(Self::Z, value == 0);
        self.set(Self::N, value & 0x80 != 0);
    }
}
