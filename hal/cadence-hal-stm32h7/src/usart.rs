//! Peripheral-backed transmitter
//!
//! The USART shifts the frame out on its own, so nothing here depends on
//! the cycle counter. Each byte is offered to the driver until the
//! transmit data register has room; every refused offer is one
//! [`WaitPoint::TransmitReady`] iteration of the caller's [`Relax`] hook.
//!
//! `divider()` is `round(clock_hz / baudrate)` from the build-time config
//! and is only range-checked against the 16-bit BRR with 16x
//! oversampling. embassy programs BRR itself from the kernel clock it
//! configured, so the two agree only when `clock_hz` matches that clock.

use cadence_core::config::{ConfigError, TimingConfig};
use cadence_core::wait::{spin_while_with, Relax, Spin, WaitPoint};
use cadence_hal::{ByteTx, UartTx};
use embassy_stm32::mode::Blocking;
use embassy_stm32::usart::{self, Config, Instance, TxPin};
use embassy_stm32::Peri;
use embedded_hal_nb::serial;

/// Errors from USART setup and transmit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsartError {
    /// Line rate unreachable from the kernel clock
    Timing(ConfigError),
    /// Driver refused the configuration
    Rejected,
    /// Framing error
    Framing,
    /// Noise error
    Noise,
    /// Overrun error
    Overrun,
    /// Parity error
    Parity,
    /// Other error
    Other,
}

impl From<ConfigError> for UsartError {
    fn from(e: ConfigError) -> Self {
        UsartError::Timing(e)
    }
}

impl From<usart::ConfigError> for UsartError {
    fn from(_: usart::ConfigError) -> Self {
        UsartError::Rejected
    }
}

impl From<usart::Error> for UsartError {
    fn from(e: usart::Error) -> Self {
        match e {
            usart::Error::Framing => UsartError::Framing,
            usart::Error::Noise => UsartError::Noise,
            usart::Error::Overrun => UsartError::Overrun,
            usart::Error::Parity => UsartError::Parity,
            _ => UsartError::Other,
        }
    }
}

/// Transmit-only USART, 8N1
pub struct HwUartTx<'d, R = Spin> {
    tx: usart::UartTx<'d, Blocking>,
    divider: u32,
    failed_writes: u32,
    relax: R,
}

impl<'d> HwUartTx<'d> {
    /// Configure the USART for `timing.baudrate` and enable the transmitter
    ///
    /// The divider is checked against `timing.clock_hz` before the
    /// peripheral is touched.
    pub fn new<T: Instance>(
        peri: Peri<'d, T>,
        tx_pin: Peri<'d, impl TxPin<T>>,
        timing: &TimingConfig,
    ) -> Result<Self, UsartError> {
        Self::with_relax(peri, tx_pin, timing, Spin)
    }
}

impl<'d, R: Relax> HwUartTx<'d, R> {
    /// [`HwUartTx::new`] with a caller-supplied wait hook
    pub fn with_relax<T: Instance>(
        peri: Peri<'d, T>,
        tx_pin: Peri<'d, impl TxPin<T>>,
        timing: &TimingConfig,
        relax: R,
    ) -> Result<Self, UsartError> {
        let divider = timing.check_divider()?;

        let mut config = Config::default();
        config.baudrate = timing.baudrate;
        let tx = usart::UartTx::new_blocking(peri, tx_pin, config)?;

        Ok(Self {
            tx,
            divider,
            failed_writes: 0,
            relax,
        })
    }

    /// Divider expected from the configured clock and rate
    ///
    /// Not written to the peripheral; embassy derives BRR from its own
    /// kernel clock.
    pub fn divider(&self) -> u32 {
        self.divider
    }

    /// Bytes dropped by [`ByteTx::send_byte`] because the driver reported an error
    pub fn failed_writes(&self) -> u32 {
        self.failed_writes
    }

    /// Hand one byte to the peripheral once the data register has room
    pub fn write_byte(&mut self, byte: u8) -> Result<(), UsartError> {
        let Self { tx, relax, .. } = self;
        let mut result = Ok(());
        spin_while_with(relax, WaitPoint::TransmitReady, || {
            match serial::Write::write(&mut *tx, byte) {
                Ok(()) => false,
                Err(nb::Error::WouldBlock) => true,
                Err(nb::Error::Other(e)) => {
                    result = Err(e.into());
                    false
                }
            }
        });
        result
    }

    /// Write bytes, waiting for transmit-register-empty before each
    pub fn write(&mut self, data: &[u8]) -> Result<(), UsartError> {
        for &byte in data {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    /// Wait for the last frame to leave the shift register
    pub fn flush(&mut self) -> Result<(), UsartError> {
        self.tx.blocking_flush()?;
        Ok(())
    }
}

impl<R: Relax> ByteTx for HwUartTx<'_, R> {
    fn send_byte(&mut self, byte: u8) {
        if self.write_byte(byte).is_err() {
            self.failed_writes = self.failed_writes.wrapping_add(1);
        }
    }
}

impl<R: Relax> UartTx for HwUartTx<'_, R> {
    type Error = UsartError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        HwUartTx::flush(self)
    }
}

impl embedded_io::Error for UsartError {
    fn kind(&self) -> embedded_io::ErrorKind {
        embedded_io::ErrorKind::Other
    }
}

impl<R> embedded_io::ErrorType for HwUartTx<'_, R> {
    type Error = UsartError;
}

impl<R: Relax> embedded_io::Write for HwUartTx<'_, R> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        HwUartTx::write(self, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        HwUartTx::flush(self)
    }
}
