//! Blocking waits on the tick counter.
//!
//! The control loop is single-threaded and cooperative: every wait is a busy
//! poll of the [`TickSource`], isolated here so the interaction logic never
//! spells out raw polling loops.

use crate::time::{TickSource, Ticks};

/// How a bounded wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitOutcome {
    /// The condition became true before the span elapsed.
    Satisfied,
    /// The span elapsed first.
    TimedOut,
}

impl WaitOutcome {
    /// Returns true if the condition was met.
    #[inline]
    pub fn is_satisfied(self) -> bool {
        self == WaitOutcome::Satisfied
    }
}

/// Blocks for `span` ticks.
pub fn wait_ticks<T: TickSource + ?Sized>(ticks: &T, span: Ticks) {
    let start = ticks.now();
    while ticks.now().elapsed_since(start) < span {
        core::hint::spin_loop();
    }
}

/// Blocks until `condition` holds or `span` ticks have elapsed.
///
/// The condition is checked before the deadline, so a condition that already
/// holds is reported as satisfied even for an empty span.
pub fn wait_until<T, F>(ticks: &T, span: Ticks, mut condition: F) -> WaitOutcome
where
    T: TickSource + ?Sized,
    F: FnMut() -> bool,
{
    let start = ticks.now();
    loop {
        if condition() {
            return WaitOutcome::Satisfied;
        }
        if ticks.now().elapsed_since(start) >= span {
            return WaitOutcome::TimedOut;
        }
        core::hint::spin_loop();
    }
}

/// Blocks until `condition` holds, with no deadline.
pub fn wait_for<F: FnMut() -> bool>(mut condition: F) {
    while !condition() {
        core::hint::spin_loop();
    }
}
