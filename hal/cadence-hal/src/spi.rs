//! SPI bus abstractions
//!
//! Buffer-level SPI master operations. The software implementation in
//! `cadence-core` holds select asserted for the whole buffer.

/// SPI bus master
pub trait SpiBus {
    /// Error type for SPI operations
    type Error;

    /// Transfer data (simultaneous read/write)
    ///
    /// Writes data from `write` buffer while reading into `read` buffer.
    /// Only `min(read.len(), write.len())` bytes are exchanged.
    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error>;

    /// Write data, discarding what is clocked in
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data (writes zeros)
    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Transfer data in place
    ///
    /// Writes data from buffer while reading into the same buffer.
    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error>;
}

/// Bit order on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Most significant bit first (SPI)
    MsbFirst,
    /// Least significant bit first (UART)
    LsbFirst,
}

impl BitOrder {
    /// Bit of `byte` sent in slot `slot` (0 = first on the wire)
    ///
    /// Slots wrap modulo 8, so slot 8 is the first bit again.
    pub fn bit(self, byte: u8, slot: u8) -> bool {
        let slot = slot & 7;
        let index = match self {
            BitOrder::MsbFirst => 7 - slot,
            BitOrder::LsbFirst => slot,
        };
        byte & (1 << index) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_order_slots() {
        // 0b1000_0001 is symmetric, 0b1000_0000 is not
        assert!(BitOrder::MsbFirst.bit(0x80, 0));
        assert!(!BitOrder::LsbFirst.bit(0x80, 0));
        assert!(BitOrder::LsbFirst.bit(0x80, 7));
        assert!(BitOrder::LsbFirst.bit(0x01, 0));
        assert!(BitOrder::MsbFirst.bit(0x01, 7));
    }

    #[test]
    fn test_bit_order_slots_wrap() {
        for slot in 0..8u8 {
            for order in [BitOrder::MsbFirst, BitOrder::LsbFirst] {
                assert_eq!(order.bit(0x96, slot + 8), order.bit(0x96, slot));
                assert_eq!(order.bit(0x96, slot + 248), order.bit(0x96, slot));
            }
        }
        assert!(BitOrder::MsbFirst.bit(0x80, 8));
        assert!(!BitOrder::MsbFirst.bit(0x80, 255));
        assert!(BitOrder::LsbFirst.bit(0x80, 255));
    }
}
