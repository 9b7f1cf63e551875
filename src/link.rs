//! Serial link to the LED drivers.
//!
//! Provides the [`SerialLink`] trait the display writes through, and
//! [`SpiLink`], an implementation over any `embedded-hal` SPI bus.

use embedded_hal::digital::{ErrorType, InputPin};
use embedded_hal::spi::SpiBus;

use crate::frame::FrameError;

/// Trait for abstracting the synchronous serial link.
///
/// Implement this for your bus hardware. Bus setup (clock, phase, bit order)
/// happens before the link is handed over; `enable` only arms it.
pub trait SerialLink {
    /// Arms the link for transmission.
    ///
    /// Returns `LinkError::MasterAbort` if the select line was driven
    /// externally; the caller is expected to disable the link.
    fn enable(&mut self) -> Result<(), LinkError>;

    /// Shifts out `bytes`, blocking until the last one is sent.
    fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError>;

    /// Releases the bus and parks its pins.
    fn disable(&mut self);
}

/// Errors reported by a serial link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// The select line was asserted by another master during enable.
    MasterAbort,
    /// A write was attempted while the link is disabled.
    Disabled,
    /// The underlying bus reported an error.
    Bus,
    /// The update did not fit its frame buffer; nothing was sent.
    Frame(FrameError),
}

impl core::fmt::Display for LinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinkError::MasterAbort => write!(f, "serial link aborted: select line driven externally"),
            LinkError::Disabled => write!(f, "serial link is disabled"),
            LinkError::Bus => write!(f, "serial bus error"),
            LinkError::Frame(err) => write!(f, "frame not sent: {}", err),
        }
    }
}

impl From<FrameError> for LinkError {
    fn from(err: FrameError) -> Self {
        LinkError::Frame(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LinkError {}

/// Stand-in select line for boards that do not monitor it. Always idle.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSelectLine;

impl ErrorType for NoSelectLine {
    type Error = core::convert::Infallible;
}

impl InputPin for NoSelectLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }
}

/// [`SerialLink`] over an `embedded-hal` SPI bus.
///
/// The select line is pulled up while the link is a master; reading it low
/// at enable time means another device is driving it.
pub struct SpiLink<S, P = NoSelectLine> {
    bus: S,
    select: P,
    enabled: bool,
}

impl<S: SpiBus<u8>> SpiLink<S, NoSelectLine> {
    /// Creates a link without select-line monitoring.
    pub fn new(bus: S) -> Self {
        Self::with_select_line(bus, NoSelectLine)
    }
}

impl<S: SpiBus<u8>, P: InputPin> SpiLink<S, P> {
    /// Creates a link that checks `select` for a master abort on enable.
    pub fn with_select_line(bus: S, select: P) -> Self {
        Self {
            bus,
            select,
            enabled: false,
        }
    }

    /// Returns true between a successful enable and the next disable.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Gives back the bus and the select line.
    pub fn release(self) -> (S, P) {
        (self.bus, self.select)
    }
}

impl<S: SpiBus<u8>, P: InputPin> SerialLink for SpiLink<S, P> {
    fn enable(&mut self) -> Result<(), LinkError> {
        // An unreadable select line is treated like a driven one.
        if !matches!(self.select.is_high(), Ok(true)) {
            self.enabled = false;
            return Err(LinkError::MasterAbort);
        }
        self.enabled = true;
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        if !self.enabled {
            return Err(LinkError::Disabled);
        }
        self.bus.write(bytes).map_err(|_| LinkError::Bus)?;
        self.bus.flush().map_err(|_| LinkError::Bus)
    }

    fn disable(&mut self) {
        if self.enabled && self.bus.flush().is_err() {
            warn!("bus flush failed while disabling link");
        }
        self.enabled = false;
    }
}
