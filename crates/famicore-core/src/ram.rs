//! Random-access memory device.
//!
//! A byte array bound to a bus range whose length must be a whole multiple
//! of the memory size; the memory repeats across the range. The console's
//! work RAM is 2 KiB mirrored four times over `$0000-$1FFF`.

use crate::bus::{AddressRange, BusDevice};

/// Errors raised when constructing a RAM device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RamError {
    /// The bus range does not divide evenly into the memory size.
    #[error("address range length {range_len} is not a multiple of memory size {memory_size}")]
    AddressRangeNotMultipleOfMemorySize {
        /// Addresses covered by the requested range.
        range_len: u32,
        /// Bytes of backing storage.
        memory_size: u32,
    },
}

/// A mirrored RAM block.
#[derive(Debug, Clone)]
pub struct Ram {
    memory: Vec<u8>,
    range: AddressRange,
}

impl Ram {
    /// Create `memory_size` bytes of RAM serving `range`.
    pub fn new(memory_size: usize, range: AddressRange) -> Result<Self, RamError> {
        if memory_size == 0 || range.len() % memory_size as u32 != 0 {
            return Err(RamError::AddressRangeNotMultipleOfMemorySize {
                range_len: range.len(),
                memory_size: memory_size as u32,
            });
        }
        Ok(Self {
            memory: vec![0; memory_size],
            range,
        })
    }

    /// The range this device expects to be attached at.
    #[must_use]
    pub fn range(&self) -> AddressRange {
        self.range
    }

    #[inline]
    fn index(&self, addr: u16) -> usize {
        (addr - self.range.start) as usize % self.memory.len()
    }
}

impl BusDevice for Ram {
    fn read(&mut self, addr: u16) -> u8 {
        self.memory[self.index(addr)]
    }

    fn write(&mut self, addr: u16, value: u8) {
        let index = self.index(addr);
        self.memory[index] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_non_multiple_range() {
        let result = Ram::new(2048, AddressRange::new(0x0000, 0x1000));
        assert!(matches!(
            result,
            Err(RamError::AddressRangeNotMultipleOfMemorySize { .. })
        ));
        assert!(Ram::new(0, AddressRange::new(0, 0xFF)).is_err());
    }

    #[test]
    fn console_ram_mirrors_every_two_kib() {
        let mut ram = Ram::new(2048, AddressRange::new(0x0000, 0x1FFF)).unwrap();
        ram.write(0x0001, 0xAA);
        assert_eq!(ram.read(0x0001), 0xAA);
        assert_eq!(ram.read(0x0801), 0xAA);
        assert_eq!(ram.read(0x1001), 0xAA);
        assert_eq!(ram.read(0x1801), 0xAA);

        ram.write(0x1FFF, 0x55);
        assert_eq!(ram.read(0x07FF), 0x55);
    }

    #[test]
    fn offset_ranges_index_from_range_start() {
        let mut ram = Ram::new(256, AddressRange::new(0x6000, 0x60FF)).unwrap();
        ram.write(0x6000, 0x01);
        ram.write(0x60FF, 0x02);
        assert_eq!(ram.read(0x6000), 0x01);
        assert_eq!(ram.read(0x60FF), 0x02);
    }

    proptest! {
        /// Reads after writes through any mirror are coherent.
        #[test]
        fn mirrored_aliases_are_coherent(addr in 0u16..0x2000, value: u8) {
            let mut ram = Ram::new(2048, AddressRange::new(0x0000, 0x1FFF)).unwrap();
            ram.write(addr, value);
            prop_assert_eq!(ram.read(addr & 0x07FF), value);
            prop_assert_eq!(ram.read((addr & 0x07FF) + 0x1800), value);
        }
    }
}
