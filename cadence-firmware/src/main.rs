//! Cadence - cycle-accurate bit-banging demo firmware
//!
//! Starts the DWT cycle counter once, builds the transmitter selected in
//! cadence.toml and sends one byte every `repeat_interval_ms`.
//!
//! Everything timing-related is fixed at build time: edit cadence.toml and
//! rebuild to change the transport, the pins or the bit rate.

#![no_std]
#![no_main]

#[macro_use]
mod board;
mod tasks;

use cadence_core::delay::Delay;
use cadence_core::CycleClock;
use cadence_hal_stm32h7::DwtCounter;
use defmt::*;
use embassy_executor::Spawner;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::board::Clock;

/// Time the lines sit at idle before the first transfer
const IDLE_SETTLE_MS: u32 = 10;

// Cycle clock must live forever for task references
static CLOCK: StaticCell<Clock> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Cadence firmware starting...");

    // Take the core peripherals before the HAL init can steal them
    let Some(core) = cortex_m::Peripherals::take() else {
        panic!("Core peripherals already taken");
    };

    // Clocks and pin multiplexing; the default config runs from HSI
    let p = embassy_stm32::init(Default::default());
    info!("Peripherals initialized");

    let counter = DwtCounter::new(core.DCB, core.DWT);
    if !counter.is_available() {
        panic!("No DWT cycle counter on this core");
    }
    let clock = CLOCK.init(CycleClock::new(counter));
    clock.init();
    let clock: &'static Clock = clock;
    info!(
        "Cycle counter running, assuming {} Hz core clock",
        board::TIMING.clock_hz
    );

    #[cfg(transport = "soft_spi")]
    {
        use cadence_core::SoftSpi;
        use cadence_hal_stm32h7::{PushPull, Sense};

        let (sck, mosi, miso, cs) = sync_lines!(p);
        let spi = SoftSpi::new(
            clock,
            &board::TIMING,
            PushPull::new(sck),
            PushPull::new(mosi),
            Sense::new(miso),
            PushPull::new(cs),
        );
        info!(
            "Software SPI ready: {} cycles per half-period",
            spi.half_period()
        );
        settle(clock);
        spawner.spawn(tasks::spi_demo_task(spi)).unwrap();
    }

    #[cfg(transport = "soft_uart")]
    {
        use cadence_core::SoftUartTx;
        use cadence_hal_stm32h7::PushPull;

        let uart = SoftUartTx::new(clock, &board::TIMING, PushPull::new(tx_line!(p)));
        info!(
            "Software UART ready: {} Bd, {} cycles per bit",
            board::TIMING.baudrate,
            uart.bit_period()
        );
        settle(clock);
        spawner.spawn(tasks::soft_uart_task(uart)).unwrap();
    }

    #[cfg(transport = "hardware_uart")]
    {
        use cadence_hal_stm32h7::HwUartTx;

        let (usart, tx_pin) = usart_parts!(p);
        let uart = match HwUartTx::new(usart, tx_pin, &board::TIMING) {
            Ok(uart) => uart,
            Err(e) => {
                error!("USART setup failed: {:?}", e);
                panic!("USART setup failed");
            }
        };
        info!(
            "Hardware UART ready: {} Bd, expected divider {} at {} Hz",
            board::TIMING.baudrate,
            uart.divider(),
            board::TIMING.clock_hz
        );
        settle(clock);
        spawner.spawn(tasks::hw_uart_task(uart)).unwrap();
    }

    info!("Demo task spawned, firmware running");
}

/// Hold every line at idle so the far end sees a clean first edge
fn settle(clock: &Clock) {
    Delay::new(clock, board::TIMING.clock_hz).delay_ms(IDLE_SETTLE_MS);
}
