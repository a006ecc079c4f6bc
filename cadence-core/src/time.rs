//! Monotonic cycle clock
//!
//! Time in this crate is always a cycle count, never wall-clock. The
//! underlying counter is 32 bits wide and wraps every `2^32 / clock_hz`
//! seconds (about 67 s at 64 MHz, 10 s at 400 MHz), so every comparison
//! goes through wrapping subtraction.

use cadence_hal::CycleCounter;

/// A reading of the cycle counter, modulo 2^32
///
/// Deliberately not `PartialOrd`: ordering two counts with `<` breaks at
/// the wrap. Use [`CycleCount::since`] for durations and
/// [`CycleCount::has_reached`] for deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleCount(pub u32);

impl CycleCount {
    /// Raw counter value
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Count `cycles` later, wrapping
    #[must_use]
    pub const fn wrapping_add(self, cycles: u32) -> Self {
        Self(self.0.wrapping_add(cycles))
    }

    /// Cycles elapsed from `earlier` to `self`
    ///
    /// Correct as long as less than one full wrap separates the two.
    pub const fn since(self, earlier: CycleCount) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// Signed distance from `deadline` to `self`
    ///
    /// Negative while `self` is before `deadline`. Valid while the two are
    /// within 2^31 cycles of each other.
    pub const fn offset_from(self, deadline: CycleCount) -> i32 {
        self.0.wrapping_sub(deadline.0) as i32
    }

    /// True once `self` is at or past `deadline`
    pub const fn has_reached(self, deadline: CycleCount) -> bool {
        self.offset_from(deadline) >= 0
    }

    /// True while `self` is strictly before `other`
    pub const fn is_before(self, other: CycleCount) -> bool {
        self.offset_from(other) < 0
    }
}

/// Lifecycle of the counter behind a [`CycleClock`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockState {
    /// Counter not yet started; readings are meaningless
    Uninitialized,
    /// Counter started and free-running
    Running,
}

/// Monotonic clock over a free-running cycle counter
///
/// Initialise once with [`CycleClock::init`] before any delay or transfer.
/// After that the clock is only read, so the bit-bangers share it by
/// reference.
#[derive(Debug)]
pub struct CycleClock<C> {
    counter: C,
    state: ClockState,
}

impl<C: CycleCounter> CycleClock<C> {
    /// Wrap a counter that has not been started yet
    pub const fn new(counter: C) -> Self {
        Self {
            counter,
            state: ClockState::Uninitialized,
        }
    }

    /// Wrap a counter that something else already started
    ///
    /// [`CycleClock::init`] on the result is a no-op, so the running count
    /// is never reset.
    pub const fn running(counter: C) -> Self {
        Self {
            counter,
            state: ClockState::Running,
        }
    }

    /// Start the counter
    ///
    /// Only the first call touches the hardware. Later calls return
    /// without resetting the count, so readings taken before them stay
    /// comparable with readings taken after.
    pub fn init(&mut self) {
        if self.state == ClockState::Running {
            return;
        }
        self.counter.start();
        self.state = ClockState::Running;
    }

    /// Current lifecycle state
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// True once [`CycleClock::init`] has run
    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    /// Read the counter
    #[inline(always)]
    pub fn now(&self) -> CycleCount {
        debug_assert!(self.is_running(), "cycle clock read before init");
        CycleCount(self.counter.read())
    }

    /// Cycles since `since`, wrap-safe
    #[inline(always)]
    pub fn elapsed(&self, since: CycleCount) -> u32 {
        self.now().since(since)
    }

    /// Release the counter
    pub fn into_inner(self) -> C {
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SimCounter;
    use proptest::prelude::*;

    #[test]
    fn test_since_across_wrap() {
        let start = CycleCount(u32::MAX - 9);
        let now = CycleCount(20);
        assert_eq!(now.since(start), 30);
    }

    #[test]
    fn test_deadline_ordering_across_wrap() {
        let deadline = CycleCount(5);
        assert!(CycleCount(u32::MAX - 3).is_before(deadline));
        assert!(!CycleCount(u32::MAX - 3).has_reached(deadline));
        assert!(CycleCount(5).has_reached(deadline));
        assert!(CycleCount(6).has_reached(deadline));
    }

    #[test]
    fn test_init_starts_counter_once() {
        let sim = SimCounter::new(1000, 1);
        let mut clock = CycleClock::new(&sim);
        assert_eq!(clock.state(), ClockState::Uninitialized);

        clock.init();
        assert!(clock.is_running());
        assert_eq!(sim.starts(), 1);
        let first = clock.now();

        clock.init();
        assert_eq!(sim.starts(), 1);
        let second = clock.now();

        // The second init did not reset the count
        assert_eq!(second.since(first), 1);
    }

    #[test]
    fn test_running_clock_skips_start() {
        let sim = SimCounter::new(0, 1);
        let mut clock = CycleClock::running(&sim);
        clock.init();
        assert_eq!(sim.starts(), 0);
    }

    #[test]
    fn test_elapsed_tracks_counter() {
        let sim = SimCounter::new(u32::MAX - 2, 4);
        let mut clock = CycleClock::new(&sim);
        clock.init();
        let start = clock.now();
        sim.advance(100);
        // One more read step elapses inside elapsed()
        assert_eq!(clock.elapsed(start), 104);
    }

    proptest! {
        #[test]
        fn prop_elapsed_is_true_difference(start in any::<u32>(), delta in any::<u32>()) {
            let now = CycleCount(start.wrapping_add(delta));
            prop_assert_eq!(now.since(CycleCount(start)), delta);
        }

        #[test]
        fn prop_deadline_order_matches_signed_distance(
            base in any::<u32>(),
            ahead in 1u32..(1 << 31),
        ) {
            let now = CycleCount(base);
            let deadline = now.wrapping_add(ahead);
            prop_assert!(now.is_before(deadline));
            prop_assert!(deadline.has_reached(now));
            prop_assert!(!now.has_reached(deadline));
        }
    }
}
