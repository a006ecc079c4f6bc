//! Software UART transmitter, 8N1
//!
//! One line, idle high. A frame is a low start bit, eight data bits LSB
//! first and a high stop bit, each held for one bit period:
//!
//! ```text
//! idle ‾‾‾\_____/‾‾‾‾‾\_____ ... _____/‾‾‾‾‾‾‾‾‾ idle
//!         start  d0    d1          d7   stop
//! ```
//!
//! The receiver has no clock of its own and resynchronises only on the
//! start edge, so every edge of the frame is paced from one advancing
//! deadline and the whole frame runs with interrupts masked.

use core::convert::Infallible;

use cadence_hal::spi::BitOrder;
use cadence_hal::uart::FRAME_BITS;
use cadence_hal::{ByteTx, CycleCounter, OutputPin, UartTx};

use crate::config::TimingConfig;
use crate::deadline::Cadence;
use crate::time::CycleClock;
use crate::wait::{Relax, Spin};

/// Line levels of one 8N1 frame, in transmit order
pub fn frame_bits(byte: u8) -> [bool; FRAME_BITS as usize] {
    let mut bits = [true; FRAME_BITS as usize];
    bits[0] = false;
    for slot in 0..8u8 {
        bits[1 + slot as usize] = BitOrder::LsbFirst.bit(byte, slot);
    }
    bits
}

/// Bit-banged 8N1 transmitter
///
/// Bit deadlines are waited through the `R` hook at [`WaitPoint::Deadline`].
///
/// [`WaitPoint::Deadline`]: crate::wait::WaitPoint::Deadline
pub struct SoftUartTx<'a, C, TX, R = Spin> {
    clock: &'a CycleClock<C>,
    bit_period: u32,
    tx: TX,
    relax: R,
}

impl<'a, C, TX> SoftUartTx<'a, C, TX>
where
    C: CycleCounter,
    TX: OutputPin,
{
    /// Take the line and drive it idle high
    pub fn new(clock: &'a CycleClock<C>, timing: &TimingConfig, tx: TX) -> Self {
        Self::with_relax(clock, timing, tx, Spin)
    }
}

impl<'a, C, TX, R> SoftUartTx<'a, C, TX, R>
where
    C: CycleCounter,
    TX: OutputPin,
    R: Relax,
{
    /// [`SoftUartTx::new`] with a caller-supplied wait hook
    pub fn with_relax(
        clock: &'a CycleClock<C>,
        timing: &TimingConfig,
        mut tx: TX,
        relax: R,
    ) -> Self {
        tx.set_high();
        Self {
            clock,
            bit_period: timing.bit_period_cycles(),
            tx,
            relax,
        }
    }

    /// Cycles per bit
    pub fn bit_period(&self) -> u32 {
        self.bit_period
    }

    /// Transmit one frame
    ///
    /// Blocks for ten bit periods with interrupts masked and returns with
    /// the line idle high. The first deadline is anchored on the counter
    /// read taken just before the start edge.
    pub fn send_byte(&mut self, byte: u8) {
        let bits = frame_bits(byte);
        let Self {
            clock,
            bit_period,
            tx,
            relax,
        } = self;
        critical_section::with(|_| {
            let mut ticks = Cadence::start_with(*clock, *bit_period, relax);
            for level in bits {
                tx.set_state(level);
                ticks.next();
            }
        });
    }

    /// Release the line, leaving it idle high
    pub fn release(self) -> TX {
        self.tx
    }
}

impl<C: CycleCounter, TX: OutputPin, R: Relax> ByteTx for SoftUartTx<'_, C, TX, R> {
    fn send_byte(&mut self, byte: u8) {
        SoftUartTx::send_byte(self, byte)
    }
}

/// Frames are masked one at a time, so interrupts run between bytes
impl<C: CycleCounter, TX: OutputPin, R: Relax> UartTx for SoftUartTx<'_, C, TX, R> {
    type Error = Infallible;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        for &byte in data {
            self.send_byte(byte);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        // Nothing is buffered: send_byte returns after the stop bit
        Ok(())
    }
}

impl<C, TX, R> embedded_io::ErrorType for SoftUartTx<'_, C, TX, R> {
    type Error = Infallible;
}

impl<C: CycleCounter, TX: OutputPin, R: Relax> embedded_io::Write for SoftUartTx<'_, C, TX, R> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for &byte in buf {
            self.send_byte(byte);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
