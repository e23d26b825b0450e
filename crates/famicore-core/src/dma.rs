//! The OAM DMA controller.
//!
//! A CPU write to the DMA register latches a source page; the controller
//! then occupies the CPU's clock slot, copying 256 bytes from CPU memory
//! into PPU OAM. Transfers start on an odd master cycle; thereafter even
//! cycles read and odd cycles write, one byte per pair.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

/// The controller's view of CPU memory.
pub trait DmaReadSource {
    /// Read one byte, with the same side effects a CPU read would have.
    fn dma_read(&mut self, addr: u16) -> u8;
}

/// The controller's view of sprite memory.
pub trait DmaWriteTarget {
    /// Store one byte at an OAM offset.
    fn dma_write(&mut self, offset: u8, value: u8);
}

impl DmaWriteTarget for famicore_ppu::Ppu {
    fn dma_write(&mut self, offset: u8, value: u8) {
        self.write_oam(offset, value);
    }
}

/// Errors raised when the controller is clocked without its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DmaError {
    /// No CPU-memory read endpoint has been connected.
    #[error("DMA read device not assigned")]
    ReadDeviceNotAssigned,

    /// No OAM write endpoint has been connected.
    #[error("DMA write device not assigned")]
    WriteDeviceNotAssigned,
}

/// The OAM DMA engine.
pub struct DmaController {
    page: u8,
    addr: u8,
    data: u8,
    transfer_in_progress: bool,
    sync_cycle: bool,
    read_source: Option<Rc<RefCell<dyn DmaReadSource>>>,
    write_target: Option<Rc<RefCell<dyn DmaWriteTarget>>>,
}

impl DmaController {
    /// Create an idle controller with no endpoints.
    #[must_use]
    pub fn new() -> Self {
        Self {
            page: 0,
            addr: 0,
            data: 0,
            transfer_in_progress: false,
            sync_cycle: true,
            read_source: None,
            write_target: None,
        }
    }

    /// Connect the CPU-memory endpoint.
    pub fn connect_read_source(&mut self, source: Rc<RefCell<dyn DmaReadSource>>) {
        self.read_source = Some(source);
    }

    /// Connect the OAM endpoint.
    pub fn connect_write_target(&mut self, target: Rc<RefCell<dyn DmaWriteTarget>>) {
        self.write_target = Some(target);
    }

    /// Latch the source page and start stalling the CPU.
    pub fn begin_transfer(&mut self, page: u8) {
        debug!("OAM DMA from page ${page:02X}");
        self.page = page;
        self.addr = 0;
        self.transfer_in_progress = true;
    }

    /// True while a transfer occupies the CPU slot.
    #[must_use]
    pub fn is_transferring(&self) -> bool {
        self.transfer_in_progress
    }

    /// Abort any transfer and rearm the start synchronization.
    pub fn reset(&mut self) {
        self.page = 0;
        self.addr = 0;
        self.data = 0;
        self.transfer_in_progress = false;
        self.sync_cycle = true;
    }

    /// Run one CPU slot of the transfer. `clock_count` is the master
    /// cycle counter, whose parity schedules the read/write alternation.
    pub fn clock(&mut self, clock_count: u64) -> Result<(), DmaError> {
        if !self.transfer_in_progress {
            return Ok(());
        }

        // Wait for an odd cycle so the first read lands on an even one
        if self.sync_cycle {
            if clock_count % 2 == 1 {
                self.sync_cycle = false;
            }
            return Ok(());
        }

        if clock_count % 2 == 0 {
            let source = self
                .read_source
                .as_ref()
                .ok_or(DmaError::ReadDeviceNotAssigned)?;
            let addr = (u16::from(self.page) << 8) | u16::from(self.addr);
            self.data = source.borrow_mut().dma_read(addr);
        } else {
            let target = self
                .write_target
                .as_ref()
                .ok_or(DmaError::WriteDeviceNotAssigned)?;
            target.borrow_mut().dma_write(self.addr, self.data);
            self.addr = self.addr.wrapping_add(1);
            if self.addr == 0 {
                self.transfer_in_progress = false;
                self.sync_cycle = true;
            }
        }
        Ok(())
    }
}

impl Default for DmaController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PatternSource;

    impl DmaReadSource for PatternSource {
        fn dma_read(&mut self, addr: u16) -> u8 {
            (addr & 0xFF) as u8
        }
    }

    #[derive(Default)]
    struct CaptureTarget {
        bytes: Vec<(u8, u8)>,
    }

    impl DmaWriteTarget for CaptureTarget {
        fn dma_write(&mut self, offset: u8, value: u8) {
            self.bytes.push((offset, value));
        }
    }

    fn wired() -> (DmaController, Rc<RefCell<CaptureTarget>>) {
        let mut dma = DmaController::new();
        let target = Rc::new(RefCell::new(CaptureTarget::default()));
        dma.connect_read_source(Rc::new(RefCell::new(PatternSource)));
        dma.connect_write_target(target.clone());
        (dma, target)
    }

    #[test]
    fn unwired_clock_reports_missing_endpoints() {
        let mut dma = DmaController::new();
        dma.begin_transfer(0x02);
        // Burn the sync cycle, then hit the read slot
        dma.clock(1).unwrap();
        assert_eq!(dma.clock(2), Err(DmaError::ReadDeviceNotAssigned));

        let mut dma = DmaController::new();
        dma.connect_read_source(Rc::new(RefCell::new(PatternSource)));
        dma.begin_transfer(0x02);
        dma.clock(1).unwrap();
        dma.clock(2).unwrap();
        assert_eq!(dma.clock(3), Err(DmaError::WriteDeviceNotAssigned));
    }

    #[test]
    fn transfers_a_full_page_in_order() {
        let (mut dma, target) = wired();
        dma.begin_transfer(0x03);

        let mut clock_count = 0u64;
        while dma.is_transferring() {
            dma.clock(clock_count).unwrap();
            clock_count += 1;
        }

        let captured = target.borrow();
        assert_eq!(captured.bytes.len(), 256);
        for (i, &(offset, value)) in captured.bytes.iter().enumerate() {
            assert_eq!(offset, i as u8);
            assert_eq!(value, i as u8);
        }
        // 1 sync cycle (count 0 is even) + one read/write pair per byte
        assert_eq!(clock_count, 2 + 512);
    }

    #[test]
    fn start_defers_until_an_odd_cycle() {
        let (mut dma, target) = wired();
        dma.begin_transfer(0x00);

        dma.clock(0).unwrap(); // even: still syncing
        assert!(target.borrow().bytes.is_empty());
        dma.clock(1).unwrap(); // odd: sync satisfied
        dma.clock(2).unwrap(); // even: first read
        assert!(target.borrow().bytes.is_empty());
        dma.clock(3).unwrap(); // odd: first write
        assert_eq!(target.borrow().bytes.len(), 1);
    }

    #[test]
    fn sync_rearms_after_completion() {
        let (mut dma, _target) = wired();
        dma.begin_transfer(0x00);
        let mut clock_count = 1u64; // start on an odd cycle: sync clears at once
        while dma.is_transferring() {
            dma.clock(clock_count).unwrap();
            clock_count += 1;
        }
        assert!(!dma.is_transferring());

        dma.begin_transfer(0x01);
        assert!(dma.is_transferring());
        // The next transfer waits for its own odd cycle again
        dma.clock(0).unwrap();
        dma.clock(2).unwrap();
        assert!(dma.is_transferring());
    }
}
