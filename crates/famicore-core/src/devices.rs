//! Bus adapters for the console's shared components.
//!
//! Each adapter binds one address window to a component owned elsewhere
//! via a shared handle: the PPU register window, the OAM DMA port, and the
//! cartridge connector.

use std::cell::RefCell;
use std::rc::Rc;

use famicore_mappers::Cartridge;
use famicore_ppu::Ppu;

use crate::bus::BusDevice;
use crate::dma::DmaController;

/// The eight PPU registers, mirrored across `$2000-$3FFF`.
pub struct PpuRegisters {
    ppu: Rc<RefCell<Ppu>>,
}

impl PpuRegisters {
    /// Bind the window to a PPU.
    #[must_use]
    pub fn new(ppu: Rc<RefCell<Ppu>>) -> Self {
        Self { ppu }
    }
}

impl BusDevice for PpuRegisters {
    fn read(&mut self, addr: u16) -> u8 {
        self.ppu.borrow_mut().cpu_read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.ppu.borrow_mut().cpu_write(addr, value);
    }
}

/// The write-only OAM DMA trigger register.
pub struct DmaPort {
    dma: Rc<RefCell<DmaController>>,
}

impl DmaPort {
    /// Bind the register to a DMA controller.
    #[must_use]
    pub fn new(dma: Rc<RefCell<DmaController>>) -> Self {
        Self { dma }
    }
}

impl BusDevice for DmaPort {
    fn read(&mut self, _addr: u16) -> u8 {
        0
    }

    fn write(&mut self, _addr: u16, value: u8) {
        self.dma.borrow_mut().begin_transfer(value);
    }
}

/// The cartridge slot as seen from the CPU bus.
pub struct CartridgeConnector {
    cartridge: Option<Rc<RefCell<Cartridge>>>,
}

impl CartridgeConnector {
    /// Create an empty connector.
    #[must_use]
    pub fn new() -> Self {
        Self { cartridge: None }
    }

    /// Seat a cartridge (replacing any present).
    pub fn insert(&mut self, cartridge: Rc<RefCell<Cartridge>>) {
        self.cartridge = Some(cartridge);
    }
}

impl Default for CartridgeConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl BusDevice for CartridgeConnector {
    fn read(&mut self, addr: u16) -> u8 {
        self.cartridge
            .as_ref()
            .map_or(0, |cart| cart.borrow().cpu_read(addr))
    }

    fn write(&mut self, addr: u16, value: u8) {
        if let Some(cart) = &self.cartridge {
            cart.borrow_mut().cpu_write(addr, value);
        }
    }
}
