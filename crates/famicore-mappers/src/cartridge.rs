//! Cartridge: program/character memory plus a mapper.
//!
//! The cartridge owns the memory arrays parsed out of an iNES image and
//! delegates every address to its mapper. It is visible from both the CPU
//! bus (`cpu_read`/`cpu_write`, program window) and the PPU bus
//! (`ppu_read`/`ppu_write`, character window).

use log::info;

use crate::ines::{InesHeader, CHR_BANK_SIZE};
use crate::mapper::{Mapped, Mapper, MirroringMode};
use crate::nrom::Nrom;
use crate::uxrom::Uxrom;
use crate::CartridgeError;

/// A loaded cartridge.
#[derive(Debug, Clone)]
pub struct Cartridge {
    prg: Vec<u8>,
    chr: Vec<u8>,
    mapper: Mapper,
    mirroring: MirroringMode,
}

impl Cartridge {
    /// Build a cartridge from a complete iNES image.
    pub fn from_ines_bytes(data: &[u8]) -> Result<Self, CartridgeError> {
        let header = InesHeader::parse(data)?;

        let prg_start = header.prg_offset();
        let prg_end = prg_start + header.prg_len();
        let chr_end = prg_end + header.chr_len();
        if data.len() < chr_end {
            return Err(CartridgeError::InvalidDataFormat);
        }

        let prg = data[prg_start..prg_end].to_vec();
        // Zero character banks means the board carries 8 KiB of RAM instead
        let chr = if header.chr_banks == 0 {
            vec![0; CHR_BANK_SIZE]
        } else {
            data[prg_end..chr_end].to_vec()
        };

        let mapper = match header.mapper_id {
            0 => Mapper::Nrom(Nrom::new(header.prg_banks, header.chr_banks)?),
            2 => Mapper::Uxrom(Uxrom::new(header.prg_banks, header.chr_banks)?),
            id => return Err(CartridgeError::MapperNotImplemented(id)),
        };

        info!(
            "loaded cartridge: mapper {}, {} prg bank(s), {} chr bank(s)",
            header.mapper_id, header.prg_banks, header.chr_banks
        );

        Ok(Self {
            prg,
            chr,
            mapper,
            mirroring: header.mirroring,
        })
    }

    /// Read from the CPU-side window.
    #[must_use]
    pub fn cpu_read(&self, addr: u16) -> u8 {
        self.resolve_read(self.mapper.read(addr))
    }

    /// Write to the CPU-side window.
    pub fn cpu_write(&mut self, addr: u16, value: u8) {
        let mapped = self.mapper.write(value, addr);
        self.resolve_write(mapped, value);
    }

    /// Read from the PPU-side window.
    #[must_use]
    pub fn ppu_read(&self, addr: u16) -> u8 {
        self.resolve_read(self.mapper.read(addr))
    }

    /// Write to the PPU-side window.
    pub fn ppu_write(&mut self, addr: u16, value: u8) {
        let mapped = self.mapper.write(value, addr);
        self.resolve_write(mapped, value);
    }

    fn resolve_read(&self, mapped: Mapped) -> u8 {
        match mapped {
            Mapped::Prg(offset) => self.prg.get(offset as usize).copied().unwrap_or(0),
            Mapped::Chr(offset) => self.chr.get(offset as usize).copied().unwrap_or(0),
            Mapped::Value(value) => value,
            Mapped::None => 0,
        }
    }

    fn resolve_write(&mut self, mapped: Mapped, value: u8) {
        match mapped {
            Mapped::Prg(offset) => {
                if let Some(slot) = self.prg.get_mut(offset as usize) {
                    *slot = value;
                }
            }
            Mapped::Chr(offset) => {
                if let Some(slot) = self.chr.get_mut(offset as usize) {
                    *slot = value;
                }
            }
            Mapped::Value(_) | Mapped::None => {}
        }
    }

    /// Current mirroring: mapper override first, header otherwise.
    #[must_use]
    pub fn mirroring(&self) -> MirroringMode {
        self.mapper.mirroring_mode().unwrap_or(self.mirroring)
    }

    /// Restore the mapper's initial bank selection.
    pub fn reset(&mut self) {
        self.mapper.reset();
    }
}
