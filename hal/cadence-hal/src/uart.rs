//! UART transmit abstractions
//!
//! Transmit-only: receive framing is not part of this system. The
//! software bit-banger and the peripheral-backed transmitter both
//! implement [`ByteTx`], so callers can swap one for the other.

/// Single-byte transmitter
///
/// `send_byte` blocks until the byte has been accepted. For the software
/// bit-banger that means the whole frame has been shifted out; for a
/// peripheral it means the byte sits in the transmit register.
pub trait ByteTx {
    /// Send one byte
    fn send_byte(&mut self, byte: u8);
}

impl<T: ByteTx + ?Sized> ByteTx for &mut T {
    fn send_byte(&mut self, byte: u8) {
        (**self).send_byte(byte)
    }
}

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Bits in one 8N1 frame: start + 8 data + stop
pub const FRAME_BITS: u32 = 10;
