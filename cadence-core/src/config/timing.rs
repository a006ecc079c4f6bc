//! Bit timing parameters
//!
//! Every timing constant is derived from three inputs:
//!
//! ```text
//! bit_period   = clock_hz / baudrate               (cycles, truncated)
//! half_period  = ceil(clock_hz * half_period_us / 1e6)   (cycles)
//! divider      = round(clock_hz / baudrate) = (clock_hz + baudrate / 2) / baudrate
//! ```
//!
//! The derived values are fixed at construction of each bit-banger. If the
//! core clock changes afterwards they must be rebuilt.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::delay::{cycles_for, MICROS};

/// Fewest cycles a bit may last
///
/// Below this, one pin write plus one deadline check no longer fit inside
/// a bit and the frame stretches.
pub const MIN_BIT_PERIOD_CYCLES: u32 = 32;

/// Largest tolerated bit-period error, parts per million (2 %)
///
/// 8N1 receivers resample at mid-bit; the accumulated error over ten bits
/// must stay under half a bit, so each side gets about 2 %.
pub const MAX_BAUD_ERROR_PPM: u32 = 20_000;

/// Largest half-period, in cycles, a single delay pass can measure
pub const MAX_HALF_PERIOD_CYCLES: u32 = 1 << 31;

/// Smallest USART divider with 16x oversampling
pub const MIN_DIVIDER: u32 = 16;

/// Largest value the 16-bit baud-rate register holds
pub const MAX_DIVIDER: u32 = 0xFFFF;

/// Errors in timing or demo configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `clock_hz` is zero
    ZeroClock,
    /// `baudrate` is zero
    ZeroBaudrate,
    /// Bit period shorter than [`MIN_BIT_PERIOD_CYCLES`]
    BaudrateTooHigh,
    /// Integer bit period off by more than [`MAX_BAUD_ERROR_PPM`]
    BaudrateInexact,
    /// `half_period_us` is zero
    ZeroHalfPeriod,
    /// Half-period longer than [`MAX_HALF_PERIOD_CYCLES`]
    HalfPeriodTooLong,
    /// USART divider outside [`MIN_DIVIDER`]..=[`MAX_DIVIDER`]
    DividerOutOfRange,
    /// `repeat_interval_ms` is zero
    ZeroRepeatInterval,
    /// A pin assignment is invalid
    Pins(super::PinError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroClock => f.write_str("clock_hz must be non-zero"),
            ConfigError::ZeroBaudrate => f.write_str("baudrate must be non-zero"),
            ConfigError::BaudrateTooHigh => write!(
                f,
                "baudrate leaves fewer than {} cycles per bit",
                MIN_BIT_PERIOD_CYCLES
            ),
            ConfigError::BaudrateInexact => write!(
                f,
                "bit period error exceeds {} ppm",
                MAX_BAUD_ERROR_PPM
            ),
            ConfigError::ZeroHalfPeriod => f.write_str("half_period_us must be non-zero"),
            ConfigError::HalfPeriodTooLong => f.write_str("half_period_us too long for the clock"),
            ConfigError::DividerOutOfRange => write!(
                f,
                "USART divider must be {}-{}",
                MIN_DIVIDER, MAX_DIVIDER
            ),
            ConfigError::ZeroRepeatInterval => f.write_str("repeat_interval_ms must be non-zero"),
            ConfigError::Pins(e) => write!(f, "pins: {}", e),
        }
    }
}

impl From<super::PinError> for ConfigError {
    fn from(e: super::PinError) -> Self {
        ConfigError::Pins(e)
    }
}

/// Clock and bit-rate inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct TimingConfig {
    /// Frequency of the cycle counter (the core clock), Hz
    pub clock_hz: u32,
    /// Asynchronous line rate, bits per second
    pub baudrate: u32,
    /// Synchronous clock half-period, microseconds
    pub half_period_us: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            clock_hz: 64_000_000, // HSI after reset
            baudrate: 9600,
            half_period_us: 10,
        }
    }
}

impl TimingConfig {
    /// Cycles per asynchronous bit, truncated
    ///
    /// Zero when `baudrate` is zero; [`TimingConfig::validate`] rejects that.
    pub const fn bit_period_cycles(&self) -> u32 {
        if self.baudrate == 0 {
            return 0;
        }
        self.clock_hz / self.baudrate
    }

    /// Cycles per synchronous half-period, rounded up
    pub const fn half_period_cycles(&self) -> u64 {
        cycles_for(self.clock_hz, self.half_period_us, MICROS)
    }

    /// USART baud-rate divider, rounded to nearest
    pub const fn divider(&self) -> u32 {
        if self.baudrate == 0 {
            return 0;
        }
        ((self.clock_hz as u64 + self.baudrate as u64 / 2) / self.baudrate as u64) as u32
    }

    /// Relative error of the truncated bit period, ppm
    pub const fn bit_period_error_ppm(&self) -> u32 {
        Self::error_ppm(self.clock_hz, self.baudrate, self.bit_period_cycles())
    }

    /// Relative error of the rounded divider, ppm
    pub const fn divider_error_ppm(&self) -> u32 {
        Self::error_ppm(self.clock_hz, self.baudrate, self.divider())
    }

    const fn error_ppm(clock_hz: u32, baudrate: u32, cycles: u32) -> u32 {
        if clock_hz == 0 {
            return 0;
        }
        let actual = cycles as u64 * baudrate as u64;
        let ideal = clock_hz as u64;
        let diff = if actual > ideal {
            actual - ideal
        } else {
            ideal - actual
        };
        (diff * 1_000_000 / ideal) as u32
    }

    /// Duration of one 8N1 frame, cycles
    pub const fn frame_cycles(&self) -> u64 {
        self.bit_period_cycles() as u64 * cadence_hal::uart::FRAME_BITS as u64
    }

    /// Duration of one synchronous byte (16 half-periods), cycles
    pub const fn transfer_cycles(&self) -> u64 {
        self.half_period_cycles() * 16
    }

    /// Rounded USART divider, checked against the register range
    pub fn check_divider(&self) -> Result<u32, ConfigError> {
        if self.clock_hz == 0 {
            return Err(ConfigError::ZeroClock);
        }
        if self.baudrate == 0 {
            return Err(ConfigError::ZeroBaudrate);
        }
        let divider = self.divider();
        if !(MIN_DIVIDER..=MAX_DIVIDER).contains(&divider) {
            return Err(ConfigError::DividerOutOfRange);
        }
        Ok(divider)
    }

    /// Check that the derived timing is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock_hz == 0 {
            return Err(ConfigError::ZeroClock);
        }
        if self.baudrate == 0 {
            return Err(ConfigError::ZeroBaudrate);
        }
        if self.bit_period_cycles() < MIN_BIT_PERIOD_CYCLES {
            return Err(ConfigError::BaudrateTooHigh);
        }
        if self.bit_period_error_ppm() > MAX_BAUD_ERROR_PPM {
            return Err(ConfigError::BaudrateInexact);
        }
        if self.half_period_us == 0 {
            return Err(ConfigError::ZeroHalfPeriod);
        }
        if self.half_period_cycles() > MAX_HALF_PERIOD_CYCLES as u64 {
            return Err(ConfigError::HalfPeriodTooLong);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_derive_reference_timing() {
        let timing = TimingConfig::default();
        assert_eq!(timing.bit_period_cycles(), 6666);
        assert_eq!(timing.half_period_cycles(), 640);
        assert_eq!(timing.divider(), 6667);
        assert_eq!(timing.frame_cycles(), 66_660);
        assert_eq!(timing.transfer_cycles(), 10_240);
        assert_eq!(timing.validate(), Ok(()));
    }

    #[test]
    fn test_divider_rounds_to_nearest() {
        let timing = TimingConfig {
            clock_hz: 64_000_000,
            baudrate: 115_200,
            ..Default::default()
        };
        // 555.55 rounds up, truncation would give 555
        assert_eq!(timing.divider(), 556);
        assert_eq!(timing.bit_period_cycles(), 555);
        assert!(timing.divider_error_ppm() < timing.bit_period_error_ppm());
    }

    #[test]
    fn test_divider_does_not_overflow_fast_clocks() {
        let timing = TimingConfig {
            clock_hz: u32::MAX,
            baudrate: 9600,
            ..Default::default()
        };
        assert_eq!(timing.divider(), 447_392);
    }

    #[test]
    fn test_check_divider_range() {
        assert_eq!(TimingConfig::default().check_divider(), Ok(6667));

        // 64 MHz / 300 Bd = 213_333, too wide for the register
        let slow = TimingConfig {
            baudrate: 300,
            ..Default::default()
        };
        assert_eq!(slow.check_divider(), Err(ConfigError::DividerOutOfRange));

        // 64 MHz / 8 MBd = 8, under the oversampling floor
        let fast = TimingConfig {
            baudrate: 8_000_000,
            ..Default::default()
        };
        assert_eq!(fast.check_divider(), Err(ConfigError::DividerOutOfRange));

        let stopped = TimingConfig {
            clock_hz: 0,
            ..Default::default()
        };
        assert_eq!(stopped.check_divider(), Err(ConfigError::ZeroClock));
    }

    #[test]
    fn test_validate_rejects_zero_inputs() {
        let mut timing = TimingConfig::default();
        timing.clock_hz = 0;
        assert_eq!(timing.validate(), Err(ConfigError::ZeroClock));

        let mut timing = TimingConfig::default();
        timing.baudrate = 0;
        assert_eq!(timing.validate(), Err(ConfigError::ZeroBaudrate));
        assert_eq!(timing.bit_period_cycles(), 0);

        let mut timing = TimingConfig::default();
        timing.half_period_us = 0;
        assert_eq!(timing.validate(), Err(ConfigError::ZeroHalfPeriod));
    }

    #[test]
    fn test_validate_rejects_unreachable_baud() {
        let timing = TimingConfig {
            clock_hz: 8_000_000,
            baudrate: 1_000_000,
            ..Default::default()
        };
        assert_eq!(timing.validate(), Err(ConfigError::BaudrateTooHigh));

        // 32.9 cycles per bit truncates to 32, 2.7 % off
        let timing = TimingConfig {
            clock_hz: 1_000_000,
            baudrate: 30_395,
            ..Default::default()
        };
        assert_eq!(timing.bit_period_cycles(), 32);
        assert_eq!(timing.bit_period_error_ppm(), 27_360);
        assert_eq!(timing.validate(), Err(ConfigError::BaudrateInexact));
    }

    #[test]
    fn test_validate_rejects_long_half_period() {
        let timing = TimingConfig {
            clock_hz: 400_000_000,
            half_period_us: 10_000_000,
            ..Default::default()
        };
        assert_eq!(timing.validate(), Err(ConfigError::HalfPeriodTooLong));
    }
}
