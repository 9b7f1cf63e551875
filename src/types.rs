//! Core types shared by the decoder, the session and the LED driver.

use palette::Srgb;

/// One of the two independently addressable light outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Left,
    Right,
}

impl Channel {
    /// Both channels in wire order.
    pub const ALL: [Channel; 2] = [Channel::Left, Channel::Right];

    /// The other channel.
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            Channel::Left => Channel::Right,
            Channel::Right => Channel::Left,
        }
    }

    /// Position of this channel's frame within an update.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Channel::Left => 0,
            Channel::Right => 1,
        }
    }
}

/// Colour and brightness of one channel.
///
/// `intensity` is the 6-bit global brightness of the frame; the RGB values
/// are raw 8-bit channel values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelColor {
    pub intensity: u8,
    pub rgb: Srgb<u8>,
}

impl ChannelColor {
    /// Zero intensity, black.
    pub const OFF: Self = Self::new(0, 0, 0, 0);

    /// Size of a persisted record.
    pub const RECORD_LEN: usize = 4;

    #[inline]
    pub const fn new(intensity: u8, red: u8, green: u8, blue: u8) -> Self {
        Self {
            intensity,
            rgb: Srgb::new(red, green, blue),
        }
    }

    /// Creates a colour from an RGB value.
    #[inline]
    pub const fn from_rgb(intensity: u8, rgb: Srgb<u8>) -> Self {
        Self { intensity, rgb }
    }

    /// Persisted layout: intensity, red, green, blue.
    pub fn to_record(self) -> [u8; Self::RECORD_LEN] {
        [self.intensity, self.rgb.red, self.rgb.green, self.rgb.blue]
    }

    /// Inverse of [`ChannelColor::to_record`].
    pub fn from_record(record: [u8; Self::RECORD_LEN]) -> Self {
        let [intensity, red, green, blue] = record;
        Self::new(intensity, red, green, blue)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ChannelColor {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "ChannelColor {{ intensity: {}, rgb: ({}, {}, {}) }}",
            self.intensity,
            self.rgb.red,
            self.rgb.green,
            self.rgb.blue
        )
    }
}

/// The channel property a session adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Attribute {
    Red,
    Green,
    Blue,
    Intensity,
}

impl Attribute {
    /// Maps a decoded click count to the attribute it selects.
    ///
    /// One click selects red, two green, three blue, four intensity. Any other
    /// count is an unknown gesture.
    pub fn from_clicks(clicks: u32) -> Option<Self> {
        match clicks {
            1 => Some(Attribute::Red),
            2 => Some(Attribute::Green),
            3 => Some(Attribute::Blue),
            4 => Some(Attribute::Intensity),
            _ => None,
        }
    }
}

/// Abstract device status shown through a fixed colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Ready,
    Warning,
    Error,
}

/// A subset of the two channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelSet {
    #[default]
    None,
    Left,
    Right,
    Both,
}

impl ChannelSet {
    /// Returns true if `channel` belongs to the set.
    pub fn contains(self, channel: Channel) -> bool {
        matches!(
            (self, channel),
            (ChannelSet::Both, _)
                | (ChannelSet::Left, Channel::Left)
                | (ChannelSet::Right, Channel::Right)
        )
    }

    /// Returns true if no channel is selected.
    pub fn is_empty(self) -> bool {
        self == ChannelSet::None
    }
}

impl From<Channel> for ChannelSet {
    fn from(channel: Channel) -> Self {
        match channel {
            Channel::Left => ChannelSet::Left,
            Channel::Right => ChannelSet::Right,
        }
    }
}

/// Which channels a blink lights in each half-cycle.
///
/// The first half of every cycle lights `lit`; the second half lights
/// `alternate`. A steady blink leaves `alternate` empty, so the second half
/// is dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkTarget {
    pub lit: ChannelSet,
    pub alternate: ChannelSet,
}

impl BlinkTarget {
    /// Blinks `channels` on and off together.
    pub const fn steady(channels: ChannelSet) -> Self {
        Self {
            lit: channels,
            alternate: ChannelSet::None,
        }
    }

    /// Lights `lit` then `alternate` on successive half-cycles.
    pub const fn alternating(lit: ChannelSet, alternate: ChannelSet) -> Self {
        Self { lit, alternate }
    }

    /// Left first, then right: the status countdown layout.
    pub const LEFT_THEN_RIGHT: Self = Self::alternating(ChannelSet::Left, ChannelSet::Right);
}

/// A complete blink request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkPattern {
    pub target: BlinkTarget,
    pub color: ChannelColor,
    /// Duration of each half-cycle.
    pub delay_ms: u32,
    /// Additional cycles after the first.
    pub repeat: u8,
}

impl BlinkPattern {
    #[inline]
    pub fn new(target: BlinkTarget, color: ChannelColor, delay_ms: u32, repeat: u8) -> Self {
        Self {
            target,
            color,
            delay_ms,
            repeat,
        }
    }

    /// Number of on/alternate cycles this pattern renders.
    #[inline]
    pub fn cycles(&self) -> u16 {
        u16::from(self.repeat) + 1
    }
}

/// Blink sequence construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceError {
    /// No patterns provided.
    EmptySequence,

    /// Sequence capacity exceeded.
    CapacityExceeded,
}

impl core::fmt::Display for SequenceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SequenceError::EmptySequence => {
                write!(f, "blink sequence must have at least one pattern")
            }
            SequenceError::CapacityExceeded => {
                write!(f, "blink sequence capacity exceeded")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SequenceError {}
