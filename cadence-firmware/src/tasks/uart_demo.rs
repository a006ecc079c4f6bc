//! UART demos
//!
//! Both transmitters send the configured byte once per interval. The
//! software one bit-bangs the frame against the cycle counter; the
//! hardware one hands it to the USART and waits for the data register.

use defmt::*;
use embassy_time::{Duration, Ticker};

use crate::board::{BYTE_TO_SEND, REPEAT_INTERVAL_MS};

/// Software UART task - one 8N1 frame per interval
#[cfg(transport = "soft_uart")]
#[embassy_executor::task]
pub async fn soft_uart_task(mut uart: crate::board::DemoSoftUart) {
    info!("Software UART task started");

    let mut ticker = Ticker::every(Duration::from_millis(REPEAT_INTERVAL_MS));
    let mut frames: u32 = 0;

    loop {
        uart.send_byte(BYTE_TO_SEND);
        frames = frames.wrapping_add(1);
        trace!("Frame {} sent", frames);

        ticker.next().await;
    }
}

/// Hardware UART task - one USART frame per interval
#[cfg(transport = "hardware_uart")]
#[embassy_executor::task]
pub async fn hw_uart_task(mut uart: cadence_hal_stm32h7::HwUartTx<'static>) {
    use cadence_hal::ByteTx;

    info!("Hardware UART task started");

    let mut ticker = Ticker::every(Duration::from_millis(REPEAT_INTERVAL_MS));
    let mut failed = 0;

    loop {
        ByteTx::send_byte(&mut uart, BYTE_TO_SEND);

        if uart.failed_writes() != failed {
            failed = uart.failed_writes();
            warn!("USART write failed ({} total)", failed);
        }

        ticker.next().await;
    }
}
