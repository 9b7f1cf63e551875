//! Persistence of the channel colours.
//!
//! Storage layout:
//!
//! | Offset | Length | Content                                   |
//! |--------|--------|-------------------------------------------|
//! | 0      | 96     | NUL-terminated metadata strings, padded   |
//! | 96     | 4      | left record: intensity, red, green, blue  |
//! | 100    | 4      | right record: intensity, red, green, blue |
//!
//! Records are written only when a session commits, and only while
//! persistence is enabled. Writes are fire-and-forget: a failed write is
//! reported to the caller but never retried.

use crate::frame::INTENSITY_MASK;
use crate::types::{Channel, ChannelColor};

/// Size of the metadata region.
pub const METADATA_LEN: usize = 96;
/// Offset of the left channel record.
pub const LEFT_RECORD_OFFSET: usize = METADATA_LEN;
/// Offset of the right channel record.
pub const RIGHT_RECORD_OFFSET: usize = LEFT_RECORD_OFFSET + ChannelColor::RECORD_LEN;
/// Total bytes used.
pub const STORAGE_LEN: usize = RIGHT_RECORD_OFFSET + ChannelColor::RECORD_LEN;

/// Human-readable strings stored ahead of the records.
pub const METADATA: [&str; 3] = [
    concat!("rgb-cube v", env!("CARGO_PKG_VERSION")),
    "two-channel button-operated light cube",
    "records: intensity red green blue",
];

/// Factory record for the left channel.
pub const FACTORY_LEFT: ChannelColor = ChannelColor::new(0x01, 0x0F, 0x00, 0x0A);
/// Factory record for the right channel.
pub const FACTORY_RIGHT: ChannelColor = ChannelColor::new(0x01, 0x00, 0x0F, 0x0A);

/// Trait for abstracting byte-addressed non-volatile memory.
pub trait NvStore {
    /// Error type for the underlying memory.
    type Error;

    /// Reads `buf.len()` bytes starting at `offset`.
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Writes `data` starting at `offset`.
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), Self::Error>;
}

/// Errors returned by [`Persistence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Writes are disabled by configuration; nothing was written.
    Disabled,
    /// The memory rejected a read.
    Read,
    /// The memory rejected a write.
    Write,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StorageError::Disabled => write!(f, "persistence is disabled"),
            StorageError::Read => write!(f, "storage read failed"),
            StorageError::Write => write!(f, "storage write failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StorageError {}

/// Offset of a channel's record.
pub fn record_offset(channel: Channel) -> usize {
    match channel {
        Channel::Left => LEFT_RECORD_OFFSET,
        Channel::Right => RIGHT_RECORD_OFFSET,
    }
}

/// Factory record for a channel.
pub fn factory_color(channel: Channel) -> ChannelColor {
    match channel {
        Channel::Left => FACTORY_LEFT,
        Channel::Right => FACTORY_RIGHT,
    }
}

/// Returns true if a raw record can be a stored colour.
///
/// An intensity above the 6-bit frame field cannot have been written by the
/// cube; erased cells (`0xFF`) fall in this class.
pub fn is_valid_record(record: &[u8; ChannelColor::RECORD_LEN]) -> bool {
    record[0] <= INTENSITY_MASK
}

/// Loads and saves the channel colours.
pub struct Persistence<S: NvStore> {
    store: S,
    writes_enabled: bool,
}

impl<S: NvStore> Persistence<S> {
    /// Wraps a store. With `writes_enabled` false, [`Persistence::save`]
    /// never touches the memory.
    pub fn new(store: S, writes_enabled: bool) -> Self {
        Self {
            store,
            writes_enabled,
        }
    }

    /// Returns true if saves reach the memory.
    pub fn writes_enabled(&self) -> bool {
        self.writes_enabled
    }

    /// Loads both channel colours.
    ///
    /// A record that cannot be read, or that fails [`is_valid_record`], is
    /// replaced by that channel's factory record.
    pub fn load(&mut self) -> (ChannelColor, ChannelColor) {
        (self.load_channel(Channel::Left), self.load_channel(Channel::Right))
    }

    /// Loads one channel's colour, falling back to its factory record.
    pub fn load_channel(&mut self, channel: Channel) -> ChannelColor {
        match self.read_record(channel) {
            Ok(record) if is_valid_record(&record) => ChannelColor::from_record(record),
            Ok(_) => {
                warn!("{} record blank or corrupt, using factory colour", channel);
                factory_color(channel)
            }
            Err(err) => {
                warn!("{} record unreadable ({}), using factory colour", channel, err);
                factory_color(channel)
            }
        }
    }

    /// Reads a channel's raw record.
    pub fn read_record(
        &mut self,
        channel: Channel,
    ) -> Result<[u8; ChannelColor::RECORD_LEN], StorageError> {
        let mut record = [0u8; ChannelColor::RECORD_LEN];
        self.store
            .read(record_offset(channel), &mut record)
            .map_err(|_| StorageError::Read)?;
        Ok(record)
    }

    /// Writes a channel's colour.
    ///
    /// # Errors
    /// * `Disabled` - Persistence is disabled; nothing was written
    /// * `Write` - The memory rejected the write
    pub fn save(&mut self, channel: Channel, color: ChannelColor) -> Result<(), StorageError> {
        if !self.writes_enabled {
            return Err(StorageError::Disabled);
        }
        self.store
            .write(record_offset(channel), &color.to_record())
            .map_err(|_| StorageError::Write)?;
        debug!("saved {}: {}", channel, color);
        Ok(())
    }

    /// Writes the factory image: metadata strings and both factory records.
    ///
    /// Ignores the write-enable setting; this is an explicit provisioning
    /// step, not a wear-relevant runtime write.
    pub fn provision(&mut self) -> Result<(), StorageError> {
        let mut metadata = [0u8; METADATA_LEN];
        let mut cursor = 0;
        for text in METADATA {
            let bytes = text.as_bytes();
            let end = (cursor + bytes.len()).min(METADATA_LEN - 1);
            metadata[cursor..end].copy_from_slice(&bytes[..end - cursor]);
            cursor = end + 1;
            if cursor >= METADATA_LEN {
                break;
            }
        }

        self.store
            .write(0, &metadata)
            .map_err(|_| StorageError::Write)?;
        for channel in Channel::ALL {
            self.store
                .write(record_offset(channel), &factory_color(channel).to_record())
                .map_err(|_| StorageError::Write)?;
        }
        Ok(())
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a mutable reference to the underlying store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
