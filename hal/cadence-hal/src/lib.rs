//! Cadence Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the timing engine is written
//! against. Chip-specific crates implement them; `cadence-core` consumes
//! them, and host tests substitute simulated counters and recording pins.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (cadence-firmware)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  cadence-core (clock, delay, bit-bang)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  cadence-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!           ┌───────────────────┐
//!           │ cadence-hal-      │
//!           │     stm32h7       │
//!           └───────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`counter::CycleCounter`] - Free-running cycle counter
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Atomic single-pin I/O
//! - [`spi::SpiBus`] - SPI bus operations
//! - [`uart::ByteTx`], [`uart::UartTx`] - Serial transmit

#![no_std]
#![deny(unsafe_code)]

pub mod counter;
pub mod gpio;
pub mod spi;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use counter::CycleCounter;
pub use gpio::{InputPin, OutputPin};
pub use spi::SpiBus;
pub use uart::{ByteTx, UartTx};
