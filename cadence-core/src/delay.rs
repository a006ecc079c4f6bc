//! Busy-wait delays
//!
//! Converts a duration into a cycle count and spins on the cycle clock
//! until that many cycles have elapsed. The guarantee is a lower bound
//! only: an interrupt during the spin makes the delay longer, never
//! shorter.

use cadence_hal::CycleCounter;

use crate::time::CycleClock;
use crate::wait::{spin_while_with, Relax, Spin, WaitPoint};

/// Microseconds per second
pub const MICROS: u64 = 1_000_000;

/// Milliseconds per second
pub const MILLIS: u64 = 1_000;

/// Nanoseconds per second
pub const NANOS: u64 = 1_000_000_000;

/// Largest span waited in one pass
///
/// Half the counter range, so an overshoot of up to 2^31 cycles past one
/// chunk is still measured correctly by the next.
const MAX_CHUNK: u32 = 1 << 31;

/// Cycles needed to cover `amount` units at `clock_hz`
///
/// `units_per_second` is [`MICROS`], [`MILLIS`] or [`NANOS`]. The product
/// is formed in 64 bits (400 MHz × 4 s already exceeds `u32`) and rounded
/// up so the delay never falls short of the request.
pub const fn cycles_for(clock_hz: u32, amount: u32, units_per_second: u64) -> u64 {
    (clock_hz as u64 * amount as u64).div_ceil(units_per_second)
}

/// Blocking delay on the cycle clock
///
/// Borrows the clock, so it can coexist with the bit-bangers. Every spin
/// iteration goes through the `R` hook at [`WaitPoint::Delay`].
pub struct Delay<'a, C, R = Spin> {
    clock: &'a CycleClock<C>,
    clock_hz: u32,
    relax: R,
}

impl<'a, C: CycleCounter> Delay<'a, C> {
    /// Create a delay for a counter ticking at `clock_hz`
    pub fn new(clock: &'a CycleClock<C>, clock_hz: u32) -> Self {
        Self::with_relax(clock, clock_hz, Spin)
    }
}

impl<'a, C: CycleCounter, R: Relax> Delay<'a, C, R> {
    /// Create a delay that calls `relax` on every spin iteration
    pub fn with_relax(clock: &'a CycleClock<C>, clock_hz: u32, relax: R) -> Self {
        Self {
            clock,
            clock_hz,
            relax,
        }
    }

    /// Counter frequency this delay converts with
    pub fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    /// Spin for at least `cycles` cycles
    pub fn delay_cycles(&mut self, cycles: u32) {
        let clock = self.clock;
        let start = clock.now();
        spin_while_with(&mut self.relax, WaitPoint::Delay, || {
            clock.elapsed(start) < cycles
        });
    }

    /// Spin for at least `cycles` cycles, beyond one counter wrap if needed
    pub fn delay_cycles_long(&mut self, cycles: u64) {
        let clock = self.clock;
        let mut start = clock.now();
        let mut remaining = cycles;
        while remaining > 0 {
            let chunk = remaining.min(MAX_CHUNK as u64) as u32;
            spin_while_with(&mut self.relax, WaitPoint::Delay, || {
                clock.elapsed(start) < chunk
            });
            // Advance the anchor rather than re-reading, so overshoot in
            // one chunk is not added on top of the next
            start = start.wrapping_add(chunk);
            remaining -= chunk as u64;
        }
    }

    /// Spin for at least `us` microseconds
    pub fn delay_us(&mut self, us: u32) {
        self.delay_cycles_long(cycles_for(self.clock_hz, us, MICROS));
    }

    /// Spin for at least `ms` milliseconds
    pub fn delay_ms(&mut self, ms: u32) {
        self.delay_cycles_long(cycles_for(self.clock_hz, ms, MILLIS));
    }
}

impl<C: CycleCounter, R: Relax> embedded_hal::delay::DelayNs for Delay<'_, C, R> {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_cycles_long(cycles_for(self.clock_hz, ns, NANOS));
    }

    fn delay_us(&mut self, us: u32) {
        Delay::delay_us(self, us)
    }

    fn delay_ms(&mut self, ms: u32) {
        Delay::delay_ms(self, ms)
    }
}
