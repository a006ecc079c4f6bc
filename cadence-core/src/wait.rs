//! Named busy-wait suspension points
//!
//! Every place the engine blocks goes through [`spin_while_with`] with a
//! [`WaitPoint`] naming what it is waiting for. None of them time out:
//! a condition that never clears blocks forever. A [`Relax`] hook sees each
//! iteration together with its wait point, which is where watchdog feeding
//! or a timeout would attach. Every blocking type takes a hook at
//! construction, with [`Spin`] as the default.

/// What a busy-wait is blocked on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitPoint {
    /// An elapsed-time delay has not yet run its cycle count
    Delay,
    /// The cycle counter has not yet reached an absolute deadline
    Deadline,
    /// The transmit data register is still full
    TransmitReady,
}

/// Called once per iteration of a busy-wait
///
/// Runs between two checks of the wait condition, so whatever it costs
/// becomes check granularity. Inside a frame that is bit-timing jitter.
pub trait Relax {
    /// One iteration of waiting at `point`
    fn relax(&mut self, point: WaitPoint);
}

impl<R: Relax + ?Sized> Relax for &mut R {
    #[inline(always)]
    fn relax(&mut self, point: WaitPoint) {
        R::relax(self, point)
    }
}

/// Default hook: a CPU spin-loop hint and nothing else
#[derive(Debug, Clone, Copy, Default)]
pub struct Spin;

impl Relax for Spin {
    #[inline(always)]
    fn relax(&mut self, _point: WaitPoint) {
        core::hint::spin_loop();
    }
}

/// Spin until `busy` returns false, relaxing with `relax` in between
///
/// `busy` is evaluated at least once.
#[inline(always)]
pub fn spin_while_with<R: Relax + ?Sized>(
    relax: &mut R,
    point: WaitPoint,
    mut busy: impl FnMut() -> bool,
) {
    while busy() {
        relax.relax(point);
    }
}

/// Spin until `busy` returns false
#[inline(always)]
pub fn spin_while(point: WaitPoint, busy: impl FnMut() -> bool) {
    spin_while_with(&mut Spin, point, busy)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingRelax {
        point: Option<WaitPoint>,
        calls: u32,
    }

    impl Relax for CountingRelax {
        fn relax(&mut self, point: WaitPoint) {
            self.point = Some(point);
            self.calls += 1;
        }
    }

    #[test]
    fn test_spin_while_polls_until_clear() {
        let mut polls = 0;
        spin_while(WaitPoint::TransmitReady, || {
            polls += 1;
            polls < 5
        });
        assert_eq!(polls, 5);
    }

    #[test]
    fn test_spin_while_checks_once_when_clear() {
        let mut polls = 0;
        spin_while(WaitPoint::Delay, || {
            polls += 1;
            false
        });
        assert_eq!(polls, 1);
    }

    #[test]
    fn test_relax_sees_wait_point() {
        let mut relax = CountingRelax {
            point: None,
            calls: 0,
        };
        let mut remaining = 3;
        spin_while_with(&mut relax, WaitPoint::Deadline, || {
            remaining -= 1;
            remaining > 0
        });
        assert_eq!(relax.calls, 2);
        assert_eq!(relax.point, Some(WaitPoint::Deadline));
    }

    #[test]
    fn test_relax_through_reference() {
        fn wait_twice<R: Relax>(mut relax: R) {
            let mut remaining = 2;
            spin_while_with(&mut relax, WaitPoint::TransmitReady, || {
                remaining -= 1;
                remaining > 0
            });
        }

        let mut relax = CountingRelax {
            point: None,
            calls: 0,
        };
        wait_twice(&mut relax);
        assert_eq!(relax.calls, 1);
        assert_eq!(relax.point, Some(WaitPoint::TransmitReady));
    }
}
