//! Tick counter and time source abstraction.
//!
//! The counter is advanced from one asynchronous context (the timer
//! interrupt) and read from the main loop. All elapsed-time arithmetic is
//! done with wrapping subtraction, so the counter may roll over freely.

use core::cell::Cell;
use critical_section::Mutex;

/// A snapshot of the monotonic tick counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick(pub u32);

impl Tick {
    /// Counter value after a restart.
    pub const ZERO: Self = Tick(0);

    /// Ticks elapsed since an earlier snapshot, tolerant of wraparound.
    #[inline]
    pub fn elapsed_since(self, earlier: Tick) -> Ticks {
        Ticks(self.0.wrapping_sub(earlier.0))
    }

    /// The snapshot `span` ticks later, wrapping like the counter does.
    #[inline]
    pub fn wrapping_add(self, span: Ticks) -> Tick {
        Tick(self.0.wrapping_add(span.0))
    }
}

/// A span measured in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ticks(pub u32);

impl Ticks {
    /// Empty span.
    pub const ZERO: Self = Ticks(0);

    /// Converts milliseconds to ticks for a tick period given in microseconds.
    ///
    /// Rounds up, so any non-zero duration lasts at least one tick.
    pub fn from_millis(millis: u32, tick_period_us: u32) -> Self {
        let period = u64::from(tick_period_us.max(1));
        let ticks = (u64::from(millis) * 1000).div_ceil(period);
        Ticks(u32::try_from(ticks).unwrap_or(u32::MAX))
    }

    /// Raw tick count.
    #[inline]
    pub fn count(self) -> u32 {
        self.0
    }
}

/// Trait for abstracting the tick counter.
///
/// Every read must be a single consistent snapshot, even where the counter
/// is wider than one memory word.
pub trait TickSource {
    /// Returns the current counter value.
    fn now(&self) -> Tick;
}

/// Tick counter advanced by a periodic timer interrupt.
///
/// Place it in a `static` and call [`SystemTick::increment`] from the timer
/// overflow handler. Reads from the main loop take the counter inside a
/// critical section, which is the atomic snapshot on targets whose native
/// word is narrower than `u32`.
pub struct SystemTick {
    counter: Mutex<Cell<u32>>,
    running: Mutex<Cell<bool>>,
}

impl SystemTick {
    /// Creates a running counter at zero.
    pub const fn new() -> Self {
        Self {
            counter: Mutex::new(Cell::new(0)),
            running: Mutex::new(Cell::new(true)),
        }
    }

    /// Advances the counter by one tick. Interrupt context only.
    ///
    /// Ignored while the counter is halted.
    pub fn increment(&self) {
        critical_section::with(|cs| {
            if self.running.borrow(cs).get() {
                let counter = self.counter.borrow(cs);
                counter.set(counter.get().wrapping_add(1));
            }
        });
    }

    /// Stops counting, mirroring a disabled timer interrupt before sleep.
    ///
    /// Call from [`PowerControl::park_peripherals`]. Counting only starts
    /// again with a fresh counter after the restart.
    ///
    /// [`PowerControl::park_peripherals`]: crate::power::PowerControl::park_peripherals
    pub fn halt(&self) {
        critical_section::with(|cs| self.running.borrow(cs).set(false));
    }
}

impl Default for SystemTick {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for SystemTick {
    fn now(&self) -> Tick {
        critical_section::with(|cs| Tick(self.counter.borrow(cs).get()))
    }
}
