//! Drives the two light channels over the serial link.
//!
//! Provides [`Display`], which turns channel colours and blink requests into
//! complete frame updates. Every emission is one start marker, one frame per
//! channel, one end marker.

use crate::frame::{self, CHANNEL_COUNT, SleepBuffer, UpdateBuffer};
use crate::link::{LinkError, SerialLink};
use crate::time::{TickSource, Ticks};
use crate::types::{BlinkPattern, Channel, ChannelColor, ChannelSet};
use crate::wait::wait_ticks;

/// Renders channel state onto the LED drivers.
///
/// # Type Parameters
/// * `'t` - Lifetime of the tick source reference
/// * `L` - Serial link implementation
/// * `T` - Tick source implementation
pub struct Display<'t, L: SerialLink, T: TickSource> {
    link: L,
    ticks: &'t T,
    tick_period_us: u32,
}

impl<'t, L: SerialLink, T: TickSource> Display<'t, L, T> {
    /// Wraps a link. Nothing is sent until [`Display::init`].
    pub fn new(link: L, ticks: &'t T, tick_period_us: u32) -> Self {
        Self {
            link,
            ticks,
            tick_period_us,
        }
    }

    /// Enables the link and blanks both channels.
    ///
    /// On a master abort the link is disabled again and the error returned.
    pub fn init(&mut self) -> Result<(), LinkError> {
        if let Err(err) = self.link.enable() {
            warn!("serial link enable failed: {}", err);
            self.link.disable();
            return Err(err);
        }
        self.all_off()
    }

    /// Sends both channel colours as one update.
    pub fn update(&mut self, colors: &[ChannelColor; CHANNEL_COUNT]) -> Result<(), LinkError> {
        self.emit(|channel| frame::channel_frame(colors[channel.index()]))
    }

    /// Lights `channels` with `color` and turns every other channel off.
    pub fn show(&mut self, channels: ChannelSet, color: ChannelColor) -> Result<(), LinkError> {
        self.emit(|channel| {
            if channels.contains(channel) {
                frame::channel_frame(color)
            } else {
                frame::off_frame()
            }
        })
    }

    /// Sends the off frame on every channel.
    pub fn all_off(&mut self) -> Result<(), LinkError> {
        self.show(ChannelSet::None, ChannelColor::OFF)
    }

    /// Plays a blink pattern, then turns every channel off.
    ///
    /// Each cycle lights the target's `lit` set for one delay, then its
    /// `alternate` set for one delay.
    pub fn blink(&mut self, pattern: &BlinkPattern) -> Result<(), LinkError> {
        let half_cycle = Ticks::from_millis(pattern.delay_ms, self.tick_period_us);
        for _ in 0..pattern.cycles() {
            self.show(pattern.target.lit, pattern.color)?;
            wait_ticks(self.ticks, half_cycle);
            self.show(pattern.target.alternate, pattern.color)?;
            wait_ticks(self.ticks, half_cycle);
        }
        self.all_off()
    }

    /// Puts the drivers to sleep and disables the link.
    ///
    /// The link is disabled even if the sleep sequence fails to send.
    pub fn shutdown(&mut self) -> Result<(), LinkError> {
        let encoded: Result<SleepBuffer, _> = frame::encode_sleep(CHANNEL_COUNT);
        let sent = match encoded {
            Ok(bytes) => self.link.write(&bytes),
            Err(err) => Err(LinkError::from(err)),
        };
        self.link.disable();
        sent
    }

    /// Returns a reference to the underlying link.
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Returns a mutable reference to the underlying link.
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    fn emit<F>(&mut self, frame_for: F) -> Result<(), LinkError>
    where
        F: Fn(Channel) -> [u8; frame::CHANNEL_FRAME_LEN],
    {
        let bytes: UpdateBuffer = frame::encode_update(Channel::ALL.map(frame_for))?;
        trace!("update: {} bytes", bytes.len());
        self.link.write(&bytes)
    }
}
