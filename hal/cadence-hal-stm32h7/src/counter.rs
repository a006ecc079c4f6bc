//! DWT cycle counter
//!
//! CYCCNT is a 32-bit up-counter clocked by the core clock. It only runs
//! once trace is enabled in DEMCR, and on the Cortex-M7 the DWT register
//! block is write-locked until LAR is unlocked.

use cadence_hal::CycleCounter;
use cortex_m::peripheral::{DCB, DWT};

/// The core's cycle counter
///
/// Owns DCB and DWT so nothing else can stop or reset the counter.
pub struct DwtCounter {
    dcb: DCB,
    dwt: DWT,
}

impl DwtCounter {
    /// Take ownership of the debug blocks
    ///
    /// The counter is not running until [`CycleCounter::start`].
    pub fn new(dcb: DCB, dwt: DWT) -> Self {
        Self { dcb, dwt }
    }

    /// Whether the core implements CYCCNT at all
    pub fn is_available(&self) -> bool {
        self.dwt.has_cycle_counter()
    }

    /// Give the debug blocks back
    pub fn free(self) -> (DCB, DWT) {
        (self.dcb, self.dwt)
    }
}

impl CycleCounter for DwtCounter {
    fn start(&mut self) {
        // TRCENA in DEMCR powers the DWT
        self.dcb.enable_trace();
        DWT::unlock();
        self.dwt.set_cycle_count(0);
        self.dwt.enable_cycle_counter();
    }

    #[inline(always)]
    fn read(&self) -> u32 {
        DWT::cycle_count()
    }
}
