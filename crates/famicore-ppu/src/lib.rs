//! Cycle-driven pixel processing unit for the famicore NES emulation core.
//!
//! The PPU renders one pixel per [`Ppu::clock`] call into a [`VideoSink`],
//! raises an edge-triggered NMI request at the start of vertical blank, and
//! exposes the eight memory-mapped registers the CPU sees at `$2000-$3FFF`.
//! Pattern memory and mirroring come from the attached cartridge.

pub mod oam;
pub mod palette;
pub mod ppu;
pub mod registers;
pub mod scroll;
pub mod sink;

pub use oam::{Oam, OamEntry};
pub use palette::SYSTEM_PALETTE;
pub use ppu::Ppu;
pub use registers::{Control, Mask, StatusRegister};
pub use scroll::VramAddress;
pub use sink::{FrameBuffer, VideoSink, FRAME_HEIGHT, FRAME_WIDTH};
