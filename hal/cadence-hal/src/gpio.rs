//! GPIO pin abstractions
//!
//! Single-pin set/clear operations used by the bit-bangers. Implementations
//! must change one pin without a read-modify-write of the whole port (on
//! STM32 this is a BSRR write), so an interrupt touching another pin of the
//! same port can never undo a bit edge.

/// Digital output pin
///
/// Drives the clock, data-out, select and serial TX lines.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Toggle the pin state
    fn toggle(&mut self) {
        if self.is_set_high() {
            self.set_low();
        } else {
            self.set_high();
        }
    }

    /// Drive the pin to a bit value
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input pin
///
/// The data-in line. Its level is owned by the external line driver;
/// the bit-bangers only sample it.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

impl<T: OutputPin + ?Sized> OutputPin for &mut T {
    fn set_high(&mut self) {
        (**self).set_high()
    }

    fn set_low(&mut self) {
        (**self).set_low()
    }

    fn is_set_high(&self) -> bool {
        (**self).is_set_high()
    }
}

impl<T: InputPin + ?Sized> InputPin for &T {
    fn is_high(&self) -> bool {
        (**self).is_high()
    }
}
