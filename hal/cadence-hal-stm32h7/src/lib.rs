//! STM32H7 bindings for the Cadence firmware
//!
//! Implements the `cadence-hal` traits on top of `cortex-m` and
//! `embassy-stm32`:
//!
//! - [`DwtCounter`] - the Cortex-M7 DWT cycle counter
//! - [`PushPull`] / [`Sense`] - GPIO lines driven through BSRR and read from IDR
//! - [`HwUartTx`] - transmit-only USART, the peripheral-backed transmitter
//!
//! # Features
//!
//! - `stm32h743zi` - Enable support for STM32H743ZI (Nucleo-H743ZI)
//! - `stm32h723zg` - Enable support for STM32H723ZG (Nucleo-H723ZG)
//! - `defmt` - Enable debug formatting support
//!
//! Clock tree setup and pin multiplexing stay with `embassy_stm32::init`;
//! this crate only wraps the pieces the timing core drives.

#![no_std]
#![deny(unsafe_code)]

pub mod counter;
pub mod gpio;
pub mod usart;

pub use counter::DwtCounter;
pub use gpio::{PushPull, Sense};
pub use usart::{HwUartTx, UsartError};
