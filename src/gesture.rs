//! Multi-click gesture decoding.
//!
//! Presses are counted while they keep arriving within the command window.
//! Once the window passes with no new press, the count is dispatched:
//!
//! | Clicks | Gesture                          |
//! |--------|----------------------------------|
//! | 1      | adjust red                       |
//! | 2      | adjust green                     |
//! | 3      | adjust blue                      |
//! | 4      | adjust intensity                 |
//! | other  | unknown, error blink, back to idle |
//!
//! A press held past the long-hold duration is not a click at all; the
//! caller hands off to the power sequencer instead.

use crate::config::CubeConfig;
use crate::time::{Tick, Ticks};
use crate::types::Attribute;

/// Decoder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecoderState {
    /// No press pending.
    Idle,
    /// At least one press counted, window still open.
    Counting,
}

/// Gesture bookkeeping, recycled every idle cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GestureState {
    pub click_count: u32,
    pub last_press: Tick,
    pub session_active: bool,
}

impl GestureState {
    const IDLE: Self = Self {
        click_count: 0,
        last_press: Tick::ZERO,
        session_active: false,
    };
}

/// Outcome of a closed command window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    /// The click count selected an attribute; a session should start.
    Command(Attribute),
    /// The click count maps to nothing.
    Unknown(u32),
}

/// Counts clicks and decides when a gesture is complete.
#[derive(Debug, Clone)]
pub struct GestureDecoder {
    gesture: GestureState,
    window: Ticks,
    long_hold: Ticks,
}

impl GestureDecoder {
    /// Creates an idle decoder using the configured window and hold time.
    pub fn new(config: &CubeConfig) -> Self {
        Self {
            gesture: GestureState::IDLE,
            window: config.command_window(),
            long_hold: config.long_hold(),
        }
    }

    /// Returns the current decoder state.
    pub fn state(&self) -> DecoderState {
        if self.gesture.click_count == 0 {
            DecoderState::Idle
        } else {
            DecoderState::Counting
        }
    }

    /// Returns the gesture bookkeeping.
    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    /// Records a press edge at `now`.
    ///
    /// The first press opens the window; later presses add a click and
    /// restart it.
    pub fn press(&mut self, now: Tick) {
        self.gesture.click_count = self.gesture.click_count.saturating_add(1);
        self.gesture.last_press = now;
        trace!("click {} at {}", self.gesture.click_count, now);
    }

    /// Returns true once a press that started at `pressed_at` has been held
    /// for the long-hold duration.
    pub fn hold_expired(&self, pressed_at: Tick, now: Tick) -> bool {
        now.elapsed_since(pressed_at) >= self.long_hold
    }

    /// Ticks of the long-hold duration still left for a press started at
    /// `pressed_at`.
    pub fn hold_remaining(&self, pressed_at: Tick, now: Tick) -> Ticks {
        Ticks(self.long_hold.0.saturating_sub(now.elapsed_since(pressed_at).0))
    }

    /// Closes the window if it has expired and returns the decoded gesture.
    ///
    /// Returns `None` while idle or while the window is still open. On
    /// dispatch the decoder returns to `Idle`; a recognised command marks the
    /// session active until [`GestureDecoder::end_session`].
    pub fn poll(&mut self, now: Tick) -> Option<Gesture> {
        if self.state() == DecoderState::Idle {
            return None;
        }
        if now.elapsed_since(self.gesture.last_press) <= self.window {
            return None;
        }

        let clicks = self.gesture.click_count;
        self.gesture.click_count = 0;

        let gesture = match Attribute::from_clicks(clicks) {
            Some(attribute) => {
                self.gesture.session_active = true;
                Gesture::Command(attribute)
            }
            None => Gesture::Unknown(clicks),
        };
        debug!("gesture after {} clicks: {}", clicks, gesture);
        Some(gesture)
    }

    /// Marks the current session consumed.
    pub fn end_session(&mut self) {
        self.gesture.session_active = false;
    }

    /// Drops any pending clicks and session.
    pub fn reset(&mut self) {
        self.gesture = GestureState::IDLE;
    }
}
