//! NES emulation core.
//!
//! This crate wires the 6502 CPU, the pixel processing unit, the
//! cartridge, the OAM DMA controller and the controller ports onto an
//! address bus and clocks the lot at per-dot granularity: the PPU runs on
//! every master tick, the CPU (or an in-flight DMA transfer) on every
//! third.
//!
//! # Example
//!
//! ```no_run
//! use famicore_core::Console;
//! use famicore_mappers::Cartridge;
//! use famicore_ppu::FrameBuffer;
//!
//! let image = std::fs::read("game.nes").expect("failed to read image");
//! let cartridge = Cartridge::from_ines_bytes(&image).expect("bad image");
//!
//! let mut console = Console::new(Box::new(FrameBuffer::new())).expect("console");
//! console.insert_cartridge(cartridge);
//! console.reset();
//! console.advance_frame().expect("frame");
//! ```

pub mod bus;
pub mod console;
pub mod devices;
pub mod dma;
pub mod input;
pub mod ram;

pub use bus::{AddressRange, Bus, BusDevice, BusError};
pub use console::{AudioSink, Console, ConsoleError};
pub use devices::{CartridgeConnector, DmaPort, PpuRegisters};
pub use dma::{DmaController, DmaError, DmaReadSource, DmaWriteTarget};
pub use input::{Buttons, ControlPad, Controller, ControllerPort, ShiftRegister};
pub use ram::{Ram, RamError};
