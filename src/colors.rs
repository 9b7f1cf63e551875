//! Status colours.
//!
//! The only indirection between an abstract [`Status`] and a concrete colour.
//! Channel values are raw 8-bit; brightness comes from the frame intensity.

use crate::types::{ChannelColor, Status};
use palette::Srgb;

pub const BLACK: Srgb<u8> = Srgb::new(0x00, 0x00, 0x00);
pub const GREEN: Srgb<u8> = Srgb::new(0x00, 0xFF, 0x00);
pub const YELLOW: Srgb<u8> = Srgb::new(0xFF, 0xFF, 0x00);
pub const RED: Srgb<u8> = Srgb::new(0xFF, 0x00, 0x00);

impl Status {
    /// The fixed colour for this status.
    #[inline]
    pub fn rgb(self) -> Srgb<u8> {
        match self {
            Status::Ready => GREEN,
            Status::Warning => YELLOW,
            Status::Error => RED,
        }
    }
}

/// Builds the channel colour for `status` at the caller's intensity.
#[inline]
pub fn status_color(status: Status, intensity: u8) -> ChannelColor {
    ChannelColor::from_rgb(intensity, status.rgb())
}
