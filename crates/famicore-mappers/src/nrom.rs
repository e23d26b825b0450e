//! Mapper 0: NROM.
//!
//! The simplest board: one or two fixed 16 KiB program banks and a single
//! 8 KiB character bank. Two program banks span the whole `$8000-$FFFF`
//! window; one bank is mirrored across it.

use crate::mapper::{Mapped, MapperError};

/// NROM mapper state (mapper 0).
#[derive(Debug, Clone)]
pub struct Nrom {
    prg_banks: u8,
}

impl Nrom {
    /// Create an NROM mapper.
    ///
    /// Accepts 1 or 2 program banks and exactly 1 character bank.
    pub fn new(prg_banks: u8, chr_banks: u8) -> Result<Self, MapperError> {
        if !(1..=2).contains(&prg_banks) {
            return Err(MapperError::InvalidProgramBankCount(prg_banks));
        }
        if chr_banks != 1 {
            return Err(MapperError::InvalidCharacterBankCount(chr_banks));
        }
        Ok(Self { prg_banks })
    }

    pub(crate) fn read(&self, addr: u16) -> Mapped {
        match addr {
            0x0000..=0x1FFF => Mapped::Chr(u32::from(addr)),
            0x8000..=0xFFFF => {
                let mask = if self.prg_banks > 1 { 0x7FFF } else { 0x3FFF };
                Mapped::Prg(u32::from(addr & mask))
            }
            _ => Mapped::None,
        }
    }

    pub(crate) fn write(&mut self, _value: u8, _addr: u16) -> Mapped {
        Mapped::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_bank_counts() {
        assert!(matches!(
            Nrom::new(0, 1),
            Err(MapperError::InvalidProgramBankCount(0))
        ));
        assert!(matches!(
            Nrom::new(3, 1),
            Err(MapperError::InvalidProgramBankCount(3))
        ));
        assert!(matches!(
            Nrom::new(1, 0),
            Err(MapperError::InvalidCharacterBankCount(0))
        ));
        assert!(matches!(
            Nrom::new(1, 2),
            Err(MapperError::InvalidCharacterBankCount(2))
        ));
    }

    #[test]
    fn single_bank_mirrors_program_window() {
        let m = Nrom::new(1, 1).unwrap();
        assert_eq!(m.read(0x8000), Mapped::Prg(0x0000));
        assert_eq!(m.read(0xC000), Mapped::Prg(0x0000));
        assert_eq!(m.read(0xFFFC), Mapped::Prg(0x3FFC));
    }

    #[test]
    fn double_bank_spans_program_window() {
        let m = Nrom::new(2, 1).unwrap();
        assert_eq!(m.read(0x8000), Mapped::Prg(0x0000));
        assert_eq!(m.read(0xC000), Mapped::Prg(0x4000));
        assert_eq!(m.read(0xFFFF), Mapped::Prg(0x7FFF));
    }

    #[test]
    fn character_window_passes_through() {
        let m = Nrom::new(1, 1).unwrap();
        assert_eq!(m.read(0x0000), Mapped::Chr(0x0000));
        assert_eq!(m.read(0x1FFF), Mapped::Chr(0x1FFF));
    }

    #[test]
    fn writes_never_respond() {
        let mut m = Nrom::new(2, 1).unwrap();
        assert_eq!(m.write(0xFF, 0x8000), Mapped::None);
        assert_eq!(m.write(0xFF, 0x0000), Mapped::None);
        // Bank layout is unchanged by writes
        assert_eq!(m.read(0xC000), Mapped::Prg(0x4000));
    }

    #[test]
    fn outside_windows_is_silent() {
        let m = Nrom::new(1, 1).unwrap();
        assert_eq!(m.read(0x4020), Mapped::None);
        assert_eq!(m.read(0x7FFF), Mapped::None);
    }
}
