//! Fixed blink indications.
//!
//! The cube has no display beyond its two channels, so every acknowledgement
//! and error is a blink. Single patterns come from the constructors below;
//! multi-stage indications such as the shutdown countdown are
//! [`BlinkSequence`]s.

use crate::colors::status_color;
use crate::display::Display;
use crate::link::{LinkError, SerialLink};
use crate::time::TickSource;
use crate::types::{BlinkPattern, BlinkTarget, Channel, ChannelColor, ChannelSet, SequenceError, Status};
use heapless::Vec;

/// Acknowledges a counted press.
pub fn press_ack(intensity: u8) -> BlinkPattern {
    BlinkPattern::new(
        BlinkTarget::LEFT_THEN_RIGHT,
        status_color(Status::Ready, intensity),
        100,
        0,
    )
}

/// Reports the battery check at startup: Ready if healthy, Error otherwise.
pub fn startup(battery_ok: bool, intensity: u8) -> BlinkPattern {
    let status = if battery_ok { Status::Ready } else { Status::Error };
    BlinkPattern::new(BlinkTarget::LEFT_THEN_RIGHT, status_color(status, intensity), 200, 2)
}

/// Reports a click count that maps to no command.
pub fn unknown_gesture(intensity: u8) -> BlinkPattern {
    BlinkPattern::new(
        BlinkTarget::steady(ChannelSet::Both),
        status_color(Status::Error, intensity),
        500,
        4,
    )
}

/// Confirms a committed session on its channel with the committed colour.
pub fn confirmation(channel: Channel, color: ChannelColor) -> BlinkPattern {
    BlinkPattern::new(BlinkTarget::steady(channel.into()), color, 100, 2)
}

/// The visual countdown played before power-down: Ready, Warning, Error.
pub fn shutdown_countdown(intensity: u8) -> Result<BlinkSequence<3>, SequenceError> {
    let stage = |status| {
        BlinkPattern::new(BlinkTarget::LEFT_THEN_RIGHT, status_color(status, intensity), 500, 0)
    };
    BlinkSequence::builder()
        .pattern(stage(Status::Ready))?
        .pattern(stage(Status::Warning))?
        .pattern(stage(Status::Error))?
        .build()
}

/// An ordered, non-interruptible series of blink patterns.
///
/// # Type Parameters
/// * `N` - Maximum number of patterns
#[derive(Debug, Clone)]
pub struct BlinkSequence<const N: usize> {
    patterns: Vec<BlinkPattern, N>,
}

impl<const N: usize> BlinkSequence<N> {
    /// Creates a new sequence builder.
    pub fn builder() -> BlinkSequenceBuilder<N> {
        BlinkSequenceBuilder::new()
    }

    /// Plays every pattern in order.
    pub fn play<L: SerialLink, T: TickSource>(
        &self,
        display: &mut Display<'_, L, T>,
    ) -> Result<(), LinkError> {
        for pattern in &self.patterns {
            display.blink(pattern)?;
        }
        Ok(())
    }

    /// Returns the number of patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Always false for a built sequence.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns the pattern at `index`.
    pub fn get(&self, index: usize) -> Option<&BlinkPattern> {
        self.patterns.get(index)
    }
}

/// Builder for constructing blink sequences.
#[derive(Debug)]
pub struct BlinkSequenceBuilder<const N: usize> {
    patterns: Vec<BlinkPattern, N>,
}

impl<const N: usize> BlinkSequenceBuilder<N> {
    /// Creates a new empty builder.
    pub fn new() -> Self {
        Self { patterns: Vec::new() }
    }

    /// Appends a pattern.
    ///
    /// # Errors
    /// * `CapacityExceeded` - The sequence already holds `N` patterns
    pub fn pattern(mut self, pattern: BlinkPattern) -> Result<Self, SequenceError> {
        self.patterns
            .push(pattern)
            .map_err(|_| SequenceError::CapacityExceeded)?;
        Ok(self)
    }

    /// Builds the sequence.
    ///
    /// # Errors
    /// * `EmptySequence` - No patterns were added
    pub fn build(self) -> Result<BlinkSequence<N>, SequenceError> {
        if self.patterns.is_empty() {
            return Err(SequenceError::EmptySequence);
        }
        Ok(BlinkSequence {
            patterns: self.patterns,
        })
    }
}

impl<const N: usize> Default for BlinkSequenceBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}
