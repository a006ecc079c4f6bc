//! Board wiring generated from cadence.toml
//!
//! build.rs writes the constants and the pin macros; this module gives the
//! concrete transmitter types the tasks are spawned with.

#![allow(dead_code, unused_macros)]

use cadence_core::{CycleClock, SoftSpi, SoftUartTx};
use cadence_hal_stm32h7::{DwtCounter, PushPull, Sense};

include!(concat!(env!("OUT_DIR"), "/board.rs"));

/// The cycle clock every bit-banger paces against
pub type Clock = CycleClock<DwtCounter>;

/// Software SPI on the configured sync lines
pub type DemoSpi =
    SoftSpi<'static, DwtCounter, PushPull<'static>, PushPull<'static>, Sense<'static>, PushPull<'static>>;

/// Software UART on the configured TX line
pub type DemoSoftUart = SoftUartTx<'static, DwtCounter, PushPull<'static>>;
