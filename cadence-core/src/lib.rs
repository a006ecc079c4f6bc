//! Board-agnostic timing core for the Cadence firmware
//!
//! Everything here runs against the traits in `cadence-hal`, so it builds
//! and tests on the host with a simulated cycle counter:
//!
//! - Cycle clock lifecycle and wrap-safe cycle arithmetic
//! - Busy-wait delays converted from microseconds and milliseconds
//! - Advancing-deadline pacing for multi-bit frames
//! - Software SPI mode 0 master
//! - Software 8N1 UART transmitter
//! - Configuration types, validated at build time
//!
//! ```text
//!   SoftSpi ──► Delay ──┐
//!                       ├──► CycleClock ──► CycleCounter (DWT)
//!   SoftUartTx ► Cadence┘        │
//!                                └── spin_while (WaitPoint)
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod deadline;
pub mod delay;
pub mod spi;
pub mod time;
pub mod uart;
pub mod wait;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, DemoConfig, PinAssignment, PinId, TimingConfig, Transport};
pub use deadline::{wait_until, wait_until_with, Cadence};
pub use delay::Delay;
pub use spi::SoftSpi;
pub use time::{ClockState, CycleClock, CycleCount};
pub use uart::SoftUartTx;
pub use wait::{spin_while, spin_while_with, Relax, Spin, WaitPoint};
