//! Command session state and adjustment rules.
//!
//! A session owns one attribute of one channel. Each adjustment step adds one
//! to that attribute: colour values wrap modulo 256, intensity wraps from the
//! configured maximum back to the configured minimum.

use crate::config::CubeConfig;
use crate::frame::CHANNEL_COUNT;
use crate::time::Ticks;
use crate::types::{Attribute, Channel, ChannelColor};

/// Next colour channel value. Wraps 255 to 0.
#[inline]
pub fn step_color(value: u8) -> u8 {
    value.wrapping_add(1)
}

/// Next intensity within `min..=max`.
///
/// Stepping past `max` lands on `min`; a value already outside the range
/// (e.g. loaded from storage) is pulled back to `min` as well.
#[inline]
pub fn step_intensity(value: u8, min: u8, max: u8) -> u8 {
    let next = value.wrapping_add(1);
    if next < min || next > max { min } else { next }
}

impl Attribute {
    /// Applies one adjustment step to `color`.
    pub fn step(self, color: &mut ChannelColor, config: &CubeConfig) {
        match self {
            Attribute::Red => color.rgb.red = step_color(color.rgb.red),
            Attribute::Green => color.rgb.green = step_color(color.rgb.green),
            Attribute::Blue => color.rgb.blue = step_color(color.rgb.blue),
            Attribute::Intensity => {
                color.intensity =
                    step_intensity(color.intensity, config.intensity_min, config.intensity_max)
            }
        }
    }

    /// Delay between adjustment steps. Intensity moves slower than colour.
    pub fn step_delay(self, config: &CubeConfig) -> Ticks {
        match self {
            Attribute::Intensity => config.ticks(config.intensity_step_delay_ms),
            _ => config.ticks(config.color_step_delay_ms),
        }
    }
}

/// Phase of a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionPhase {
    /// Presses toggle the target channel.
    SelectingChannel,
    /// The attribute steps until the next press.
    Adjusting,
    /// Confirmed; the channel is being persisted.
    Committed,
}

/// One interactive adjustment of a single channel attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Session {
    attribute: Attribute,
    channel: Channel,
    phase: SessionPhase,
    steps: u32,
}

impl Session {
    /// Starts a session in channel selection, pointing at `channel`.
    pub fn new(attribute: Attribute, channel: Channel) -> Self {
        Self {
            attribute,
            channel,
            phase: SessionPhase::SelectingChannel,
            steps: 0,
        }
    }

    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Number of adjustment steps applied so far.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Switches the target channel. Only while selecting.
    pub fn toggle_channel(&mut self) {
        if self.phase == SessionPhase::SelectingChannel {
            self.channel = self.channel.toggled();
        }
    }

    /// Fixes the channel and starts adjusting.
    pub fn begin_adjusting(&mut self) {
        self.phase = SessionPhase::Adjusting;
    }

    /// Steps the target attribute and returns the new channel colour.
    ///
    /// Outside the adjusting phase the colours are left untouched.
    pub fn step(
        &mut self,
        colors: &mut [ChannelColor; CHANNEL_COUNT],
        config: &CubeConfig,
    ) -> ChannelColor {
        let color = &mut colors[self.channel.index()];
        if self.phase == SessionPhase::Adjusting {
            self.attribute.step(color, config);
            self.steps = self.steps.wrapping_add(1);
        }
        *color
    }

    /// Delay between steps for this session's attribute.
    pub fn step_delay(&self, config: &CubeConfig) -> Ticks {
        self.attribute.step_delay(config)
    }

    /// Marks the session confirmed.
    pub fn commit(&mut self) {
        self.phase = SessionPhase::Committed;
    }
}
