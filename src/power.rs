//! Power-down and wake.
//!
//! A long hold runs the shutdown sequence:
//!
//! 1. the Ready/Warning/Error countdown blink
//! 2. sleep frames to the drivers, link disabled
//! 3. tick timer and battery monitor parked
//! 4. wake armed on either button edge
//! 5. deepest sleep until the wake edge
//! 6. full restart
//!
//! The sequence cannot be interrupted once started. A failed blink or frame
//! write is logged and the sequence carries on.

use core::cell::Cell;

use critical_section::Mutex;

use crate::blink;
use crate::display::Display;
use crate::link::SerialLink;
use crate::time::TickSource;

/// Power state of the cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    Active,
    ShutdownSequence,
    Sleeping,
}

/// Trait for abstracting the board's power controls.
pub trait PowerControl {
    /// Stops the tick timer and the battery monitor.
    ///
    /// Boards using [`SystemTick`](crate::time::SystemTick) call its
    /// `halt` here.
    fn park_peripherals(&mut self);

    /// Configures the button input to wake the MCU on either edge.
    fn arm_wake(&mut self);

    /// Enters the lowest-power sleep mode.
    ///
    /// Returns once `wake` reports a wake edge.
    fn sleep(&mut self, wake: &WakeLatch);

    /// Restarts the whole device.
    ///
    /// On hardware this does not return. Host implementations may return, in
    /// which case the caller treats the cube as freshly reset.
    fn restart(&mut self);
}

/// Wake flag shared between the button edge interrupt and the sequencer.
///
/// # Example
///
/// ```
/// use rgb_cube::WakeLatch;
///
/// static WAKE: WakeLatch = WakeLatch::new();
///
/// // from the pin change interrupt:
/// WAKE.notify();
/// assert!(!WAKE.is_woken()); // not armed, edge ignored
/// ```
pub struct WakeLatch {
    armed: Mutex<Cell<bool>>,
    woken: Mutex<Cell<bool>>,
}

impl WakeLatch {
    pub const fn new() -> Self {
        Self {
            armed: Mutex::new(Cell::new(false)),
            woken: Mutex::new(Cell::new(false)),
        }
    }

    /// Starts listening for a wake edge. Clears any earlier wake.
    pub fn arm(&self) {
        critical_section::with(|cs| {
            self.woken.borrow(cs).set(false);
            self.armed.borrow(cs).set(true);
        });
    }

    /// Records a button edge. Call from the pin change interrupt.
    pub fn notify(&self) {
        critical_section::with(|cs| {
            if self.armed.borrow(cs).get() {
                self.woken.borrow(cs).set(true);
            }
        });
    }

    /// Stops listening.
    pub fn disarm(&self) {
        critical_section::with(|cs| self.armed.borrow(cs).set(false));
    }

    pub fn is_armed(&self) -> bool {
        critical_section::with(|cs| self.armed.borrow(cs).get())
    }

    /// Returns true once an armed latch has seen an edge.
    pub fn is_woken(&self) -> bool {
        critical_section::with(|cs| self.woken.borrow(cs).get())
    }
}

impl Default for WakeLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the shutdown sequence and tracks the power state.
#[derive(Debug)]
pub struct PowerSequencer {
    state: PowerState,
    countdown_intensity: u8,
}

impl PowerSequencer {
    /// `countdown_intensity` is the brightness of the countdown blink.
    pub fn new(countdown_intensity: u8) -> Self {
        Self {
            state: PowerState::Active,
            countdown_intensity,
        }
    }

    pub fn state(&self) -> PowerState {
        self.state
    }

    /// Runs the full shutdown sequence and requests a restart.
    ///
    /// Returns only if `power.restart()` returns; the state is then back to
    /// [`PowerState::Active`].
    pub fn shutdown<L, T, P>(&mut self, display: &mut Display<'_, L, T>, power: &mut P, wake: &WakeLatch)
    where
        L: SerialLink,
        T: TickSource,
        P: PowerControl,
    {
        self.state = PowerState::ShutdownSequence;
        info!("shutdown sequence started");

        match blink::shutdown_countdown(self.countdown_intensity) {
            Ok(countdown) => {
                if let Err(err) = countdown.play(display) {
                    warn!("countdown blink failed: {}", err);
                }
            }
            Err(err) => warn!("countdown unavailable: {}", err),
        }

        if let Err(err) = display.shutdown() {
            warn!("driver sleep frames failed: {}", err);
        }
        power.park_peripherals();

        wake.arm();
        power.arm_wake();

        self.state = PowerState::Sleeping;
        debug!("sleeping");
        power.sleep(wake);
        wake.disarm();

        info!("woken, restarting");
        power.restart();
        self.state = PowerState::Active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_ignores_edges_until_armed() {
        let latch = WakeLatch::new();
        latch.notify();
        assert!(!latch.is_woken());

        latch.arm();
        assert!(latch.is_armed());
        latch.notify();
        assert!(latch.is_woken());

        latch.disarm();
        assert!(!latch.is_armed());
        assert!(latch.is_woken());
    }

    #[test]
    fn arming_clears_a_previous_wake() {
        let latch = WakeLatch::new();
        latch.arm();
        latch.notify();
        latch.arm();
        assert!(!latch.is_woken());
    }

    #[test]
    fn sequencer_starts_active() {
        assert_eq!(PowerSequencer::new(1).state(), PowerState::Active);
    }
}
