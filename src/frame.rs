//! LED frame protocol.
//!
//! Bytes are shifted out most-significant-bit first. A complete update is a
//! start marker, one 4-byte frame per channel, and an end marker:
//!
//! ```text
//! 00 00 00 00 | E0|i  B  G  R | E0|i  B  G  R | FF FF FF FF
//! ```
//!
//! Note the colour order on the wire: blue, green, red.

use crate::types::ChannelColor;
use heapless::Vec;

/// Length of the start and end markers.
pub const MARKER_LEN: usize = 4;
/// Length of one channel frame.
pub const CHANNEL_FRAME_LEN: usize = 4;
/// Number of channels on the cube.
pub const CHANNEL_COUNT: usize = 2;

pub const START_BYTE: u8 = 0x00;
pub const END_BYTE: u8 = 0xFF;
/// Mode byte flag for a lit (or explicitly dark) channel.
pub const ENABLE_FLAG: u8 = 0xE0;
/// Mode byte flag that puts a channel driver to sleep.
pub const SLEEP_FLAG: u8 = 0xA0;
/// Bits of the mode byte carrying intensity.
pub const INTENSITY_MASK: u8 = 0x3F;
/// Number of sleep updates sent when disabling the LEDs.
pub const SLEEP_REPEATS: usize = 4;

pub const START_MARKER: [u8; MARKER_LEN] = [START_BYTE; MARKER_LEN];
pub const END_MARKER: [u8; MARKER_LEN] = [END_BYTE; MARKER_LEN];

/// Byte length of a complete update carrying `channels` frames.
pub const fn update_len(channels: usize) -> usize {
    MARKER_LEN + CHANNEL_FRAME_LEN * channels + MARKER_LEN
}

/// Buffer sized for one complete update of the cube.
pub type UpdateBuffer = Vec<u8, { update_len(CHANNEL_COUNT) }>;

/// Buffer sized for the full sleep sequence of the cube.
pub type SleepBuffer = Vec<u8, { update_len(CHANNEL_COUNT) * SLEEP_REPEATS }>;

/// Frame encoding errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// The output buffer cannot hold the encoded update.
    CapacityExceeded,
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FrameError::CapacityExceeded => write!(f, "frame buffer capacity exceeded"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FrameError {}

/// Encodes one channel's frame: mode, blue, green, red.
#[inline]
pub fn channel_frame(color: ChannelColor) -> [u8; CHANNEL_FRAME_LEN] {
    [
        ENABLE_FLAG | (color.intensity & INTENSITY_MASK),
        color.rgb.blue,
        color.rgb.green,
        color.rgb.red,
    ]
}

/// An enabled, zero-intensity, black frame.
#[inline]
pub fn off_frame() -> [u8; CHANNEL_FRAME_LEN] {
    channel_frame(ChannelColor::OFF)
}

/// A frame that puts the channel driver to sleep.
#[inline]
pub fn sleep_frame() -> [u8; CHANNEL_FRAME_LEN] {
    [SLEEP_FLAG, 0x00, 0x00, 0x00]
}

/// Wraps channel frames between one start and one end marker.
///
/// # Errors
/// * `CapacityExceeded` - `CAP` is smaller than the encoded update
pub fn encode_update<const CAP: usize, I>(frames: I) -> Result<Vec<u8, CAP>, FrameError>
where
    I: IntoIterator<Item = [u8; CHANNEL_FRAME_LEN]>,
{
    let mut bytes = Vec::new();
    append_update(&mut bytes, frames)?;
    Ok(bytes)
}

/// Encodes the LED disable sequence: repeated updates of sleep frames.
///
/// # Errors
/// * `CapacityExceeded` - `CAP` is smaller than the encoded sequence
pub fn encode_sleep<const CAP: usize>(channels: usize) -> Result<Vec<u8, CAP>, FrameError> {
    let mut bytes = Vec::new();
    for _ in 0..SLEEP_REPEATS {
        append_update(&mut bytes, (0..channels).map(|_| sleep_frame()))?;
    }
    Ok(bytes)
}

fn append_update<const CAP: usize, I>(bytes: &mut Vec<u8, CAP>, frames: I) -> Result<(), FrameError>
where
    I: IntoIterator<Item = [u8; CHANNEL_FRAME_LEN]>,
{
    extend(bytes, &START_MARKER)?;
    for frame in frames {
        extend(bytes, &frame)?;
    }
    extend(bytes, &END_MARKER)
}

fn extend<const CAP: usize>(bytes: &mut Vec<u8, CAP>, chunk: &[u8]) -> Result<(), FrameError> {
    bytes
        .extend_from_slice(chunk)
        .map_err(|_| FrameError::CapacityExceeded)
}
