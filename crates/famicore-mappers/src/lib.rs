//! Cartridge and mapper support for the famicore NES emulation core.
//!
//! This crate parses iNES images, owns the cartridge memory arrays, and
//! implements address translation for the supported mapper boards:
//!
//! | Mapper | Name | Description |
//! |--------|-------|-------------------------------------------|
//! | 0 | NROM | Fixed banks, no switching |
//! | 2 | UxROM | Switchable low bank, fixed high bank |
//!
//! # Example
//!
//! ```no_run
//! use famicore_mappers::Cartridge;
//!
//! let image = std::fs::read("game.nes").expect("failed to read image");
//! let cartridge = Cartridge::from_ines_bytes(&image).expect("bad image");
//! let reset_lo = cartridge.cpu_read(0xFFFC);
//! ```

pub mod cartridge;
pub mod ines;
pub mod mapper;

mod nrom;
mod uxrom;

pub use cartridge::Cartridge;
pub use ines::InesHeader;
pub use mapper::{Mapped, Mapper, MapperError, MirroringMode};
pub use nrom::Nrom;
pub use uxrom::Uxrom;

/// Errors raised while constructing a cartridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CartridgeError {
    /// The iNES magic is missing or the image is shorter than its header
    /// declares.
    #[error("invalid iNES data format")]
    InvalidDataFormat,

    /// The image requests a mapper this crate does not implement.
    #[error("mapper {0} is not implemented")]
    MapperNotImplemented(u8),

    /// The mapper rejected the header's bank configuration.
    #[error(transparent)]
    Mapper(#[from] MapperError),
}
