//! Embassy async tasks
//!
//! One demo task runs, selected at build time. Each owns its transmitter
//! and wakes once per `repeat_interval_ms`; the transfer itself blocks
//! with interrupts masked.

#[cfg(transport = "soft_spi")]
pub mod spi_demo;
#[cfg(any(transport = "soft_uart", transport = "hardware_uart"))]
pub mod uart_demo;

#[cfg(transport = "soft_spi")]
pub use spi_demo::spi_demo_task;
#[cfg(transport = "hardware_uart")]
pub use uart_demo::hw_uart_task;
#[cfg(transport = "soft_uart")]
pub use uart_demo::soft_uart_task;
