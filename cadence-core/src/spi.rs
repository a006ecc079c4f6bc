//! Software SPI master, mode 0
//!
//! Full duplex on four GPIOs: clock idles low, data-out is set up before
//! the rising edge, data-in is sampled half a period after it, bytes go
//! MSB first, and select is held low around each transfer.
//!
//! ```text
//! CS   ‾‾‾\_____________________________________/‾‾‾
//! SCK  _____/‾‾‾\___/‾‾‾\___ ... ___/‾‾‾\___________
//! MOSI ----< b7  >< b6  >< ...    ><  b0 >----------
//!            ^ sample  ^ sample          ^ sample
//! ```
//!
//! Each byte runs inside a critical section. An interrupt between two
//! edges would stretch that half-bit by the length of the handler.

use core::convert::Infallible;

use cadence_hal::spi::BitOrder;
use cadence_hal::{CycleCounter, InputPin, OutputPin, SpiBus};

use crate::config::timing::MAX_HALF_PERIOD_CYCLES;
use crate::config::TimingConfig;
use crate::delay::Delay;
use crate::time::CycleClock;
use crate::wait::{Relax, Spin};

/// Bits go out most significant first
pub const BIT_ORDER: BitOrder = BitOrder::MsbFirst;

/// Bit-banged SPI mode 0 master
///
/// Half-period waits go through the `R` hook at [`WaitPoint::Delay`].
///
/// [`WaitPoint::Delay`]: crate::wait::WaitPoint::Delay
pub struct SoftSpi<'a, C, SCK, MOSI, MISO, CS, R = Spin> {
    delay: Delay<'a, C, R>,
    half_period: u32,
    sck: SCK,
    mosi: MOSI,
    miso: MISO,
    cs: CS,
}

impl<'a, C, SCK, MOSI, MISO, CS> SoftSpi<'a, C, SCK, MOSI, MISO, CS>
where
    C: CycleCounter,
    SCK: OutputPin,
    MOSI: OutputPin,
    MISO: InputPin,
    CS: OutputPin,
{
    /// Take the pins and drive them to idle
    ///
    /// Clock low, data-out low, select high (deselected). The pins must
    /// already be configured as push-pull outputs and an input.
    pub fn new(
        clock: &'a CycleClock<C>,
        timing: &TimingConfig,
        sck: SCK,
        mosi: MOSI,
        miso: MISO,
        cs: CS,
    ) -> Self {
        Self::with_relax(clock, timing, sck, mosi, miso, cs, Spin)
    }
}

impl<'a, C, SCK, MOSI, MISO, CS, R> SoftSpi<'a, C, SCK, MOSI, MISO, CS, R>
where
    C: CycleCounter,
    SCK: OutputPin,
    MOSI: OutputPin,
    MISO: InputPin,
    CS: OutputPin,
    R: Relax,
{
    /// [`SoftSpi::new`] with a caller-supplied wait hook
    #[allow(clippy::too_many_arguments)]
    pub fn with_relax(
        clock: &'a CycleClock<C>,
        timing: &TimingConfig,
        mut sck: SCK,
        mut mosi: MOSI,
        miso: MISO,
        mut cs: CS,
        relax: R,
    ) -> Self {
        cs.set_high();
        sck.set_low();
        mosi.set_low();

        let half_period = timing
            .half_period_cycles()
            .min(MAX_HALF_PERIOD_CYCLES as u64) as u32;

        Self {
            delay: Delay::with_relax(clock, timing.clock_hz, relax),
            half_period,
            sck,
            mosi,
            miso,
            cs,
        }
    }

    /// Half-period in cycles
    pub fn half_period(&self) -> u32 {
        self.half_period
    }

    /// Exchange one byte
    ///
    /// Sends `byte` MSB first while sampling data-in, with select held low
    /// for the 16 half-periods. Nothing acknowledges the byte: with no
    /// responder, the result is whatever the data-in pull resistor yields.
    pub fn transfer(&mut self, byte: u8) -> u8 {
        critical_section::with(|_| {
            self.cs.set_low();
            let received = self.shift(byte);
            self.cs.set_high();
            received
        })
    }

    /// Clock one byte out and one in, select untouched
    fn shift(&mut self, byte: u8) -> u8 {
        let mut received = 0u8;
        for slot in 0..8 {
            self.mosi.set_state(BIT_ORDER.bit(byte, slot));

            self.sck.set_high();
            self.delay.delay_cycles(self.half_period);
            received = (received << 1) | u8::from(self.miso.is_high());

            self.sck.set_low();
            self.delay.delay_cycles(self.half_period);
        }
        received
    }

    /// Shift one byte inside its own critical section
    fn shift_masked(&mut self, byte: u8) -> u8 {
        critical_section::with(|_| self.shift(byte))
    }

    /// Release the pins, leaving them at idle levels
    pub fn release(self) -> (SCK, MOSI, MISO, CS) {
        (self.sck, self.mosi, self.miso, self.cs)
    }
}

/// Buffer transfers hold select low across the whole buffer
///
/// Interrupts are masked per byte, not per buffer: a pause between bytes
/// leaves the clock idle, which mode-0 responders ignore.
impl<C, SCK, MOSI, MISO, CS, R> SpiBus for SoftSpi<'_, C, SCK, MOSI, MISO, CS, R>
where
    C: CycleCounter,
    SCK: OutputPin,
    MOSI: OutputPin,
    MISO: InputPin,
    CS: OutputPin,
    R: Relax,
{
    type Error = Infallible;

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.cs.set_low();
        for (rx, &tx) in read.iter_mut().zip(write) {
            *rx = self.shift_masked(tx);
        }
        self.cs.set_high();
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.cs.set_low();
        for &tx in data {
            self.shift_masked(tx);
        }
        self.cs.set_high();
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.cs.set_low();
        for rx in buf.iter_mut() {
            *rx = self.shift_masked(0x00);
        }
        self.cs.set_high();
        Ok(())
    }

    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error> {
        self.cs.set_low();
        for byte in data.iter_mut() {
            *byte = self.shift_masked(*byte);
        }
        self.cs.set_high();
        Ok(())
    }
}
