//! Configuration types
//!
//! Everything here is plain data fixed at build time: the firmware's build
//! script deserializes `cadence.toml` into [`DemoConfig`], validates it and
//! bakes the values into the binary as constants.

pub mod pins;
pub mod timing;

pub use pins::{PinAssignment, PinError, PinId, MAX_PIN_NAME_LEN};
pub use timing::{
    ConfigError, TimingConfig, MAX_BAUD_ERROR_PPM, MAX_DIVIDER, MIN_BIT_PERIOD_CYCLES, MIN_DIVIDER,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which transmitter the demo loop drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Transport {
    /// Software SPI mode 0 on four GPIOs
    SoftSpi,
    /// Software 8N1 transmit on one GPIO
    #[default]
    SoftUart,
    /// USART peripheral transmit
    HardwareUart,
}

/// Complete demo configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DemoConfig {
    /// Transmitter to drive
    pub transport: Transport,
    /// Payload sent on every iteration
    pub byte_to_send: u8,
    /// Outer loop period, milliseconds
    pub repeat_interval_ms: u32,
    /// Clock and bit-rate inputs
    pub timing: TimingConfig,
    /// Pin roles
    pub pins: PinAssignment,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            byte_to_send: b'H',
            repeat_interval_ms: 1000,
            timing: TimingConfig::default(),
            pins: PinAssignment::default(),
        }
    }
}

impl DemoConfig {
    /// Check the parts of the config the selected transport uses
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timing.validate()?;
        if self.repeat_interval_ms == 0 {
            return Err(ConfigError::ZeroRepeatInterval);
        }
        match self.transport {
            Transport::SoftSpi => self.pins.validate_sync()?,
            Transport::SoftUart => {}
            Transport::HardwareUart => {
                self.timing.check_divider()?;
            }
        }
        Ok(())
    }
}
