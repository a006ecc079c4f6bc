//! Free-running cycle counter abstraction
//!
//! The counter is the only time source in the system. It increments once
//! per core clock and wraps modulo 2^32.

/// Free-running hardware cycle counter
///
/// # Preconditions
///
/// The counter hardware must exist. Probing for it needs vendor-specific
/// debug infrastructure, so implementations do not check; reading an
/// absent counter is undefined.
pub trait CycleCounter {
    /// Enable, unlock, zero and start the counter
    ///
    /// Resets the count, so callers must run this at most once. The
    /// clock in `cadence-core` guards that.
    fn start(&mut self);

    /// Read the current count
    fn read(&self) -> u32;
}

impl<T: CycleCounter + ?Sized> CycleCounter for &mut T {
    fn start(&mut self) {
        (**self).start()
    }

    fn read(&self) -> u32 {
        (**self).read()
    }
}
