//! Host-side test doubles
//!
//! [`SimCounter`] stands in for the hardware cycle counter: every read
//! advances it by a fixed step, which models the cost of one polling
//! iteration. [`Trace`] records every pin write together with the counter
//! value at that moment, so tests can check edge order and bit timing.

use core::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use cadence_hal::{CycleCounter, InputPin, OutputPin};

use crate::wait::{Relax, WaitPoint};
use heapless::Vec;

/// Simulated free-running counter
pub struct SimCounter {
    seed: u32,
    value: Cell<u32>,
    total: Cell<u64>,
    step: Cell<u32>,
    jitter: Cell<u32>,
    reads: Cell<u32>,
    starts: Cell<u32>,
    stall: Cell<Option<(u32, u32)>>,
}

impl SimCounter {
    /// Counter that starts (and restarts) at `seed`, advancing `step` per read
    pub fn new(seed: u32, step: u32) -> Self {
        Self {
            seed,
            value: Cell::new(seed),
            total: Cell::new(0),
            step: Cell::new(step),
            jitter: Cell::new(0),
            reads: Cell::new(0),
            starts: Cell::new(0),
            stall: Cell::new(None),
        }
    }

    /// Add `0..=jitter` extra cycles to reads in a repeating pattern
    pub fn set_jitter(&self, jitter: u32) {
        self.jitter.set(jitter);
    }

    /// After `reads` more reads, the next one jumps by an extra `cycles`
    pub fn stall_after(&self, reads: u32, cycles: u32) {
        self.stall.set(Some((reads, cycles)));
    }

    /// Let `cycles` pass without a read
    pub fn advance(&self, cycles: u32) {
        self.value.set(self.value.get().wrapping_add(cycles));
        self.total.set(self.total.get() + u64::from(cycles));
    }

    /// Last value, without advancing
    pub fn peek(&self) -> u32 {
        self.value.get()
    }

    /// Cycles advanced since creation, unwrapped
    pub fn total(&self) -> u64 {
        self.total.get()
    }

    /// How many times the counter was started
    pub fn starts(&self) -> u32 {
        self.starts.get()
    }
}

impl CycleCounter for &SimCounter {
    fn start(&mut self) {
        self.value.set(self.seed);
        self.starts.set(self.starts.get() + 1);
    }

    fn read(&self) -> u32 {
        let reads = self.reads.get();
        self.reads.set(reads.wrapping_add(1));

        let mut cycles = self.step.get() + reads % (self.jitter.get() + 1);
        match self.stall.get() {
            Some((0, extra)) => {
                cycles += extra;
                self.stall.set(None);
            }
            Some((left, extra)) => self.stall.set(Some((left - 1, extra))),
            None => {}
        }

        self.advance(cycles);
        self.value.get()
    }
}

/// Logical role of a traced output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Clock,
    DataOut,
    Select,
    Tx,
}

/// One recorded pin write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub line: Line,
    pub high: bool,
    pub at: u32,
}

/// Shared record of pin writes
pub struct Trace<'a> {
    counter: &'a SimCounter,
    edges: RefCell<Vec<Edge, 512>>,
    data_out: Cell<bool>,
    data_out_before: Cell<bool>,
}

impl<'a> Trace<'a> {
    pub fn new(counter: &'a SimCounter) -> Self {
        Self {
            counter,
            edges: RefCell::new(Vec::new()),
            data_out: Cell::new(false),
            data_out_before: Cell::new(false),
        }
    }

    /// Output pin recording into this trace
    pub fn pin(&'a self, line: Line) -> TracePin<'a> {
        TracePin {
            line,
            trace: self,
            high: false,
        }
    }

    fn record(&self, line: Line, high: bool) {
        if line == Line::DataOut {
            self.data_out_before.set(self.data_out.get());
            self.data_out.set(high);
        }
        let edge = Edge {
            line,
            high,
            at: self.counter.peek(),
        };
        self.edges
            .borrow_mut()
            .push(edge)
            .expect("trace capacity exceeded");
    }

    /// Writes to one line, in order
    pub fn edges_on(&self, line: Line) -> Vec<Edge, 512> {
        self.edges
            .borrow()
            .iter()
            .filter(|e| e.line == line)
            .copied()
            .collect()
    }

    /// All writes, in order
    pub fn edges(&self) -> Vec<Edge, 512> {
        self.edges.borrow().clone()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.edges.borrow_mut().clear();
    }
}

/// Output pin that records into a [`Trace`]
pub struct TracePin<'a> {
    line: Line,
    trace: &'a Trace<'a>,
    high: bool,
}

impl OutputPin for TracePin<'_> {
    fn set_high(&mut self) {
        self.high = true;
        self.trace.record(self.line, true);
    }

    fn set_low(&mut self) {
        self.high = false;
        self.trace.record(self.line, false);
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Data-in that echoes data-out one bit late
///
/// Reads the data-out level from before its most recent write, like a
/// one-stage shift register looped back onto the bus.
pub struct LaggedEcho<'a> {
    pub trace: &'a Trace<'a>,
}

impl InputPin for LaggedEcho<'_> {
    fn is_high(&self) -> bool {
        self.trace.data_out_before.get()
    }
}

/// Data-in that plays back a byte MSB first, one bit per sample
pub struct Responder {
    byte: Cell<u8>,
    samples: Cell<u8>,
}

impl Responder {
    pub fn new(byte: u8) -> Self {
        Self {
            byte: Cell::new(byte),
            samples: Cell::new(0),
        }
    }

    /// Replace the byte played back from the next sample on
    pub fn load(&self, byte: u8) {
        self.byte.set(byte);
        self.samples.set(0);
    }

    pub fn samples(&self) -> u8 {
        self.samples.get()
    }
}

impl InputPin for &Responder {
    fn is_high(&self) -> bool {
        let n = self.samples.get();
        self.samples.set(n.wrapping_add(1));
        self.byte.get() & (0x80 >> (n % 8)) != 0
    }
}

/// Relax hook that counts iterations per wait point
#[derive(Debug, Default)]
pub struct RecordingRelax {
    pub delay: u32,
    pub deadline: u32,
    pub transmit_ready: u32,
}

impl Relax for RecordingRelax {
    fn relax(&mut self, point: WaitPoint) {
        match point {
            WaitPoint::Delay => self.delay += 1,
            WaitPoint::Deadline => self.deadline += 1,
            WaitPoint::TransmitReady => self.transmit_ready += 1,
        }
    }
}

/// Second context that tries to enter a critical section on request
///
/// The host critical-section implementation is a process-wide lock, so
/// while a frame holds it the other thread cannot run its section, just
/// as an interrupt handler cannot run while interrupts are masked.
pub struct Preemptor {
    request: Sender<()>,
    ran: Arc<AtomicBool>,
    seen: Cell<Option<bool>>,
    handle: JoinHandle<()>,
}

impl Preemptor {
    pub fn spawn() -> Self {
        let (request, requested) = mpsc::channel();
        let ran = Arc::new(AtomicBool::new(false));
        let handle = thread::spawn({
            let ran = ran.clone();
            move || {
                if requested.recv().is_ok() {
                    critical_section::with(|_| ran.store(true, Ordering::SeqCst));
                }
            }
        });
        Self {
            request,
            ran,
            seen: Cell::new(None),
            handle,
        }
    }

    /// Ask the other context to run, give it time, and note whether it did
    pub fn interrupt(&self) {
        let _ = self.request.send(());
        thread::sleep(Duration::from_millis(50));
        self.seen.set(Some(self.ran.load(Ordering::SeqCst)));
    }

    /// What [`Preemptor::interrupt`] saw, `None` if it was never called
    pub fn seen(&self) -> Option<bool> {
        self.seen.get()
    }

    /// Wait for the other context to finish, reporting whether it ran
    pub fn join(self) -> bool {
        let Self {
            request,
            ran,
            handle,
            ..
        } = self;
        drop(request);
        handle.join().expect("preempting thread panicked");
        ran.load(Ordering::SeqCst)
    }
}

/// Output pin that fires a [`Preemptor`] on one of its writes
pub struct PreemptedPin<'p, P> {
    inner: P,
    preemptor: &'p Preemptor,
    writes_left: u32,
}

impl<'p, P: OutputPin> PreemptedPin<'p, P> {
    /// Fire on write number `at` (1-based)
    pub fn new(inner: P, preemptor: &'p Preemptor, at: u32) -> Self {
        Self {
            inner,
            preemptor,
            writes_left: at,
        }
    }

    fn count(&mut self) {
        if self.writes_left == 1 {
            self.preemptor.interrupt();
        }
        self.writes_left = self.writes_left.saturating_sub(1);
    }
}

impl<P: OutputPin> OutputPin for PreemptedPin<'_, P> {
    fn set_high(&mut self) {
        self.inner.set_high();
        self.count();
    }

    fn set_low(&mut self) {
        self.inner.set_low();
        self.count();
    }

    fn is_set_high(&self) -> bool {
        self.inner.is_set_high()
    }
}
