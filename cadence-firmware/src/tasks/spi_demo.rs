//! Software SPI demo
//!
//! Exchanges the configured byte once per interval and logs what came
//! back on data-in. With no responder wired, that is the pull-up: 0xFF.

use defmt::*;
use embassy_time::{Duration, Ticker};

use crate::board::{DemoSpi, BYTE_TO_SEND, REPEAT_INTERVAL_MS};

/// SPI demo task - one mode-0 transfer per interval
#[embassy_executor::task]
pub async fn spi_demo_task(mut spi: DemoSpi) {
    info!("SPI demo task started");

    let mut ticker = Ticker::every(Duration::from_millis(REPEAT_INTERVAL_MS));
    let mut last: Option<u8> = None;

    loop {
        let received = spi.transfer(BYTE_TO_SEND);

        if last != Some(received) {
            info!("SPI sent {=u8:#x}, received {=u8:#x}", BYTE_TO_SEND, received);
            last = Some(received);
        } else {
            trace!("SPI received {=u8:#x}", received);
        }

        ticker.next().await;
    }
}
