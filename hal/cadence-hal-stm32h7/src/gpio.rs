//! GPIO lines for the bit-bangers
//!
//! `embassy_stm32` outputs write BSRR, so a set or clear touches one pin
//! without a read-modify-write of the port. The newtypes only exist to
//! carry the `cadence-hal` pin traits.

use cadence_hal::{InputPin, OutputPin};
use embassy_stm32::gpio::{Input, Output};

/// Push-pull output line
pub struct PushPull<'d>(Output<'d>);

impl<'d> PushPull<'d> {
    /// Wrap a configured output
    pub fn new(output: Output<'d>) -> Self {
        Self(output)
    }

    /// Unwrap the embassy output
    pub fn into_inner(self) -> Output<'d> {
        self.0
    }
}

impl OutputPin for PushPull<'_> {
    #[inline(always)]
    fn set_high(&mut self) {
        self.0.set_high();
    }

    #[inline(always)]
    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn toggle(&mut self) {
        self.0.toggle();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

/// Input line
pub struct Sense<'d>(Input<'d>);

impl<'d> Sense<'d> {
    /// Wrap a configured input
    pub fn new(input: Input<'d>) -> Self {
        Self(input)
    }

    /// Unwrap the embassy input
    pub fn into_inner(self) -> Input<'d> {
        self.0
    }
}

impl InputPin for Sense<'_> {
    #[inline(always)]
    fn is_high(&self) -> bool {
        self.0.is_high()
    }

    #[inline(always)]
    fn is_low(&self) -> bool {
        self.0.is_low()
    }
}
