//! The single push-button.

use embedded_hal::digital::InputPin;

/// Pin level that means "pressed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Pressed reads high.
    #[default]
    High,
    /// Pressed reads low.
    Low,
}

/// Level-polled button on one digital input.
///
/// A pin read error is treated as "released", so a faulty input can never
/// hold the cube in a session or trigger a power-down.
pub struct Button<P: InputPin> {
    pin: P,
    active: ActiveLevel,
}

impl<P: InputPin> Button<P> {
    /// Wraps an input that reads high while pressed.
    pub fn new(pin: P) -> Self {
        Self::with_active_level(pin, ActiveLevel::High)
    }

    pub fn with_active_level(pin: P, active: ActiveLevel) -> Self {
        Self { pin, active }
    }

    /// Samples the pin.
    pub fn is_pressed(&mut self) -> bool {
        let level = match self.active {
            ActiveLevel::High => self.pin.is_high(),
            ActiveLevel::Low => self.pin.is_low(),
        };
        matches!(level, Ok(true))
    }

    /// Returns a mutable reference to the pin, e.g. to configure wake edges.
    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }

    /// Gives back the pin.
    pub fn release(self) -> P {
        self.pin
    }
}
