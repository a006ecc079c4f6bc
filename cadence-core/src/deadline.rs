//! Absolute-deadline scheduling
//!
//! Repeated elapsed-time delays drift: each call starts measuring only
//! after the previous one returned, so the setup cost of every call adds
//! up over a frame. Waiting on an absolute deadline that advances by
//! exactly one period per bit keeps the error of bit `n` within one check
//! granularity of `n × period`, however long the sequence is.

use cadence_hal::CycleCounter;

use crate::time::{CycleClock, CycleCount};
use crate::wait::{spin_while_with, Relax, Spin, WaitPoint};

/// Spin until the clock reaches `deadline`
///
/// Returns immediately for a deadline already in the past (up to 2^31
/// cycles ago).
#[inline(always)]
pub fn wait_until<C: CycleCounter>(clock: &CycleClock<C>, deadline: CycleCount) {
    wait_until_with(clock, deadline, &mut Spin);
}

/// [`wait_until`], calling `relax` at [`WaitPoint::Deadline`] on every spin
#[inline(always)]
pub fn wait_until_with<C: CycleCounter, R: Relax + ?Sized>(
    clock: &CycleClock<C>,
    deadline: CycleCount,
    relax: &mut R,
) {
    spin_while_with(relax, WaitPoint::Deadline, || clock.now().is_before(deadline));
}

/// A fixed-period sequence of deadlines
///
/// ```ignore
/// let mut ticks = Cadence::start(&clock, bit_period);
/// for bit in bits {
///     line.set_state(bit);
///     ticks.next();
/// }
/// ```
pub struct Cadence<'a, C, R = Spin> {
    clock: &'a CycleClock<C>,
    period: u32,
    deadline: CycleCount,
    relax: R,
}

impl<'a, C: CycleCounter> Cadence<'a, C> {
    /// Anchor a new sequence at the current time
    #[inline(always)]
    pub fn start(clock: &'a CycleClock<C>, period: u32) -> Self {
        Self::start_with(clock, period, Spin)
    }

    /// Anchor a new sequence at `anchor`
    pub fn starting_at(clock: &'a CycleClock<C>, anchor: CycleCount, period: u32) -> Self {
        Self::starting_at_with(clock, anchor, period, Spin)
    }
}

impl<'a, C: CycleCounter, R: Relax> Cadence<'a, C, R> {
    /// Anchor a new sequence at the current time, waiting through `relax`
    #[inline(always)]
    pub fn start_with(clock: &'a CycleClock<C>, period: u32, relax: R) -> Self {
        Self::starting_at_with(clock, clock.now(), period, relax)
    }

    /// Anchor a new sequence at `anchor`, waiting through `relax`
    pub fn starting_at_with(
        clock: &'a CycleClock<C>,
        anchor: CycleCount,
        period: u32,
        relax: R,
    ) -> Self {
        Self {
            clock,
            period,
            deadline: anchor,
            relax,
        }
    }

    /// Advance the deadline by one period and wait for it
    #[inline(always)]
    pub fn next(&mut self) {
        self.deadline = self.deadline.wrapping_add(self.period);
        wait_until_with(self.clock, self.deadline, &mut self.relax);
    }

    /// The deadline most recently waited for (the anchor before any `next`)
    pub fn deadline(&self) -> CycleCount {
        self.deadline
    }

    /// Cycles between deadlines
    pub fn period(&self) -> u32 {
        self.period
    }
}
