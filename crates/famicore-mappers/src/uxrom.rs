//! Mapper 2: UxROM.
//!
//! Discrete-logic board with a switchable 16 KiB program bank at
//! `$8000-$BFFF` and the last bank fixed at `$C000-$FFFF`. Character
//! memory is a single unbanked window, usually RAM.

use crate::mapper::{Mapped, MapperError};

/// UxROM mapper state (mapper 2).
#[derive(Debug, Clone)]
pub struct Uxrom {
    prg_banks: u8,
    chr_banks: u8,
    /// Switchable bank mapped at `$8000-$BFFF`.
    bank_lo: u8,
    /// Fixed bank mapped at `$C000-$FFFF` (always the last).
    bank_hi: u8,
}

impl Uxrom {
    /// Create a UxROM mapper.
    ///
    /// Accepts 1-255 program banks and 0 or 1 character banks; zero
    /// character banks means the character window is RAM.
    pub fn new(prg_banks: u8, chr_banks: u8) -> Result<Self, MapperError> {
        if prg_banks == 0 {
            return Err(MapperError::InvalidProgramBankCount(prg_banks));
        }
        if chr_banks > 1 {
            return Err(MapperError::InvalidCharacterBankCount(chr_banks));
        }
        Ok(Self {
            prg_banks,
            chr_banks,
            bank_lo: 0,
            bank_hi: prg_banks - 1,
        })
    }

    pub(crate) fn read(&self, addr: u16) -> Mapped {
        match addr {
            0x0000..=0x1FFF => Mapped::Chr(u32::from(addr)),
            0x8000..=0xBFFF => {
                Mapped::Prg(u32::from(self.bank_lo) * 0x4000 + u32::from(addr & 0x3FFF))
            }
            0xC000..=0xFFFF => {
                Mapped::Prg(u32::from(self.bank_hi) * 0x4000 + u32::from(addr & 0x3FFF))
            }
            _ => Mapped::None,
        }
    }

    pub(crate) fn write(&mut self, value: u8, addr: u16) -> Mapped {
        match addr {
            // Character window acts as RAM when no ROM banks exist
            0x0000..=0x1FFF if self.chr_banks == 0 => Mapped::Chr(u32::from(addr)),
            0x8000..=0xFFFF => {
                self.bank_lo = value & 0x0F;
                Mapped::None
            }
            _ => Mapped::None,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.bank_lo = 0;
        self.bank_hi = self.prg_banks - 1;
    }
}
