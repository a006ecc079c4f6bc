//! Pin role assignment
//!
//! Pins are named the way the reference manual names them (`PA5`,
//! `PB10`), so a board layout can be changed in the config file without
//! touching code.

use core::fmt;

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Longest pin name accepted ("PK15")
pub const MAX_PIN_NAME_LEN: usize = 4;

/// Highest port letter on the largest STM32H7 packages
pub const LAST_PORT: char = 'K';

/// Pins per GPIO port
pub const PINS_PER_PORT: u8 = 16;

/// Errors from pin names and assignments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Not of the form `P<port><number>`
    Malformed,
    /// Port letter outside `A..=K`
    UnknownPort,
    /// Pin number 16 or above
    PinOutOfRange,
    /// Two roles of one transport share a pin
    Conflict,
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            PinError::Malformed => "pin name must look like PA5",
            PinError::UnknownPort => "port letter must be A-K",
            PinError::PinOutOfRange => "pin number must be 0-15",
            PinError::Conflict => "pin assigned to more than one role",
        };
        f.write_str(msg)
    }
}

/// A GPIO pin, by port letter and number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(
        try_from = "String<MAX_PIN_NAME_LEN>",
        into = "String<MAX_PIN_NAME_LEN>"
    )
)]
pub struct PinId {
    /// Port letter, `'A'..='K'`
    pub port: char,
    /// Pin within the port, `0..16`
    pub pin: u8,
}

impl PinId {
    /// Pin `pin` of port `port`
    pub const fn new(port: char, pin: u8) -> Self {
        Self { port, pin }
    }

    /// Parse a pin name
    ///
    /// Accepts `"PA0"` through `"PK15"`, surrounding whitespace ignored.
    pub fn parse(name: &str) -> Result<Self, PinError> {
        let name = name.trim();
        let rest = name.strip_prefix('P').ok_or(PinError::Malformed)?;

        let mut chars = rest.chars();
        let port = chars.next().ok_or(PinError::Malformed)?;
        if !port.is_ascii_uppercase() {
            return Err(PinError::Malformed);
        }
        if port > LAST_PORT {
            return Err(PinError::UnknownPort);
        }

        let number = chars.as_str();
        if number.is_empty() || number.len() > 2 || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PinError::Malformed);
        }
        let pin: u8 = number.parse().map_err(|_| PinError::Malformed)?;
        if pin >= PINS_PER_PORT {
            return Err(PinError::PinOutOfRange);
        }

        Ok(Self { port, pin })
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.port, self.pin)
    }
}

impl TryFrom<String<MAX_PIN_NAME_LEN>> for PinId {
    type Error = PinError;

    fn try_from(name: String<MAX_PIN_NAME_LEN>) -> Result<Self, Self::Error> {
        Self::parse(&name)
    }
}

impl From<PinId> for String<MAX_PIN_NAME_LEN> {
    fn from(id: PinId) -> Self {
        use core::fmt::Write;
        let mut name = String::new();
        // "PK15" is the longest name and fits exactly
        let _ = write!(name, "{}", id);
        name
    }
}

/// Physical pins for each logical role
///
/// Defaults follow the reference wiring on GPIOA: PA5 clock, PA8 data-out,
/// PA6 data-in, PA4 select, PA5 serial TX.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PinAssignment {
    /// Synchronous clock (SCK)
    pub clock: PinId,
    /// Synchronous data out (MOSI)
    pub data_out: PinId,
    /// Synchronous data in (MISO)
    pub data_in: PinId,
    /// Synchronous select, active low (CS)
    pub select: PinId,
    /// Asynchronous transmit line (TX)
    pub tx: PinId,
}

impl Default for PinAssignment {
    fn default() -> Self {
        Self {
            clock: PinId::new('A', 5),
            data_out: PinId::new('A', 8),
            data_in: PinId::new('A', 6),
            select: PinId::new('A', 4),
            tx: PinId::new('A', 5),
        }
    }
}

impl PinAssignment {
    /// The four synchronous roles must be distinct pins
    pub fn validate_sync(&self) -> Result<(), PinError> {
        let roles = [self.clock, self.data_out, self.data_in, self.select];
        for (i, a) in roles.iter().enumerate() {
            if roles[i + 1..].contains(a) {
                return Err(PinError::Conflict);
            }
        }
        Ok(())
    }
}
