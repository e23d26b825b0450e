//! The address bus.
//!
//! An ordered list of (range, device) pairs. A read or write goes to the
//! first device whose range contains the address; unmatched reads return 0
//! and unmatched writes drop silently. Ranges must not overlap, which is
//! checked when a device is attached.

use std::cell::RefCell;
use std::rc::Rc;

use crate::dma::DmaReadSource;

/// Inclusive range of bus addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    /// First address in the range.
    pub start: u16,
    /// Last address in the range.
    pub end: u16,
}

impl AddressRange {
    /// Create a range; `start` must not exceed `end`.
    #[must_use]
    pub const fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    /// Whether `addr` falls inside the range.
    #[inline]
    #[must_use]
    pub const fn contains(&self, addr: u16) -> bool {
        addr >= self.start && addr <= self.end
    }

    /// Number of addresses covered.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.end as u32 - self.start as u32 + 1
    }

    /// Ranges never cover zero addresses.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// A device attached to a bus.
pub trait BusDevice {
    /// Read a byte. `addr` is the absolute bus address.
    fn read(&mut self, addr: u16) -> u8;

    /// Write a byte. `addr` is the absolute bus address.
    fn write(&mut self, addr: u16, value: u8);
}

/// Errors raised while assembling a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    /// Two devices claimed intersecting address ranges.
    #[error("address range {attached:?} overlaps already attached range {existing:?}")]
    Overlap {
        /// The range being attached.
        attached: AddressRange,
        /// The range it collides with.
        existing: AddressRange,
    },
}

/// A bus routing reads and writes to attached devices.
#[derive(Default)]
pub struct Bus {
    devices: Vec<(AddressRange, Rc<RefCell<dyn BusDevice>>)>,
}

impl Bus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
        }
    }

    /// Attach a device to a range. Fails if the range overlaps any device
    /// already attached.
    pub fn attach(
        &mut self,
        range: AddressRange,
        device: Rc<RefCell<dyn BusDevice>>,
    ) -> Result<(), BusError> {
        for (existing, _) in &self.devices {
            if existing.overlaps(&range) {
                return Err(BusError::Overlap {
                    attached: range,
                    existing: *existing,
                });
            }
        }
        self.devices.push((range, device));
        Ok(())
    }

    /// Read from the first device whose range contains `addr`, else 0.
    #[must_use]
    pub fn read(&self, addr: u16) -> u8 {
        for (range, device) in &self.devices {
            if range.contains(addr) {
                return device.borrow_mut().read(addr);
            }
        }
        0
    }

    /// Write to the first device whose range contains `addr`; otherwise
    /// the write is dropped.
    pub fn write(&self, addr: u16, value: u8) {
        for (range, device) in &self.devices {
            if range.contains(addr) {
                device.borrow_mut().write(addr, value);
                return;
            }
        }
    }
}

impl famicore_cpu::Bus for Bus {
    fn read(&mut self, addr: u16) -> u8 {
        Bus::read(self, addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        Bus::write(self, addr, value);
    }
}

impl DmaReadSource for Bus {
    fn dma_read(&mut self, addr: u16) -> u8 {
        Bus::read(self, addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        reads: u32,
        last_write: Option<(u16, u8)>,
        value: u8,
    }

    impl Counter {
        fn shared(value: u8) -> Rc<RefCell<Self>> {
            Rc::new(RefCell::new(Self {
                reads: 0,
                last_write: None,
                value,
            }))
        }
    }

    impl BusDevice for Counter {
        fn read(&mut self, _addr: u16) -> u8 {
            self.reads += 1;
            self.value
        }

        fn write(&mut self, addr: u16, value: u8) {
            self.last_write = Some((addr, value));
        }
    }

    #[test]
    fn routes_to_first_matching_range() {
        let mut bus = Bus::new();
        let low = Counter::shared(0x11);
        let high = Counter::shared(0x22);
        bus.attach(AddressRange::new(0x0000, 0x0FFF), low.clone()).unwrap();
        bus.attach(AddressRange::new(0x1000, 0x1FFF), high.clone()).unwrap();

        assert_eq!(bus.read(0x0123), 0x11);
        assert_eq!(bus.read(0x1FFF), 0x22);
        assert_eq!(low.borrow().reads, 1);
        assert_eq!(high.borrow().reads, 1);
    }

    #[test]
    fn unmatched_reads_return_zero_and_writes_drop() {
        let mut bus = Bus::new();
        let device = Counter::shared(0x7F);
        bus.attach(AddressRange::new(0x4000, 0x40FF), device.clone()).unwrap();

        assert_eq!(bus.read(0x2000), 0);
        bus.write(0x2000, 0xFF); // no device; silently dropped
        assert!(device.borrow().last_write.is_none());

        bus.write(0x4010, 0xAB);
        assert_eq!(device.borrow().last_write, Some((0x4010, 0xAB)));
    }

    #[test]
    fn overlapping_ranges_are_rejected() {
        let mut bus = Bus::new();
        bus.attach(AddressRange::new(0x0000, 0x1FFF), Counter::shared(0)).unwrap();
        let result = bus.attach(AddressRange::new(0x1FFF, 0x3FFF), Counter::shared(0));
        assert!(matches!(result, Err(BusError::Overlap { .. })));
    }

    #[test]
    fn range_len_covers_full_address_space() {
        assert_eq!(AddressRange::new(0x0000, 0xFFFF).len(), 0x10000);
        assert_eq!(AddressRange::new(0x2000, 0x3FFF).len(), 0x2000);
    }
}
