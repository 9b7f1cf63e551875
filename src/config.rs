//! Runtime configuration for the control core.

use crate::time::Ticks;

/// Highest intensity the frame's 6-bit brightness field can carry.
pub const INTENSITY_LIMIT: u8 = 0x3F;

/// Timing, intensity and persistence settings, fixed at construction.
///
/// `Default` reproduces the factory firmware: 1 ms ticks, 3 s hold to power
/// off, 3 s command window, 10 ms colour steps, 350 ms intensity steps,
/// intensity 1..=15, persistence enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CubeConfig {
    /// Tick period in microseconds.
    pub tick_period_us: u32,
    /// Continuous hold that starts the shutdown sequence.
    pub long_hold_ms: u32,
    /// Quiet time after the last press before a gesture is dispatched.
    pub command_window_ms: u32,
    /// Delay between colour channel steps.
    pub color_step_delay_ms: u32,
    /// Delay between intensity steps.
    pub intensity_step_delay_ms: u32,
    /// Lowest intensity reachable during adjustment.
    pub intensity_min: u8,
    /// Highest intensity reachable during adjustment.
    pub intensity_max: u8,
    /// Whether committed sessions are written to non-volatile storage.
    pub persistence_enabled: bool,
}

impl CubeConfig {
    /// Creates a builder seeded with the factory defaults.
    pub fn builder() -> CubeConfigBuilder {
        CubeConfigBuilder::new()
    }

    /// Converts a millisecond setting into ticks of the configured period.
    pub fn ticks(&self, millis: u32) -> Ticks {
        Ticks::from_millis(millis, self.tick_period_us)
    }

    pub fn long_hold(&self) -> Ticks {
        self.ticks(self.long_hold_ms)
    }

    pub fn command_window(&self) -> Ticks {
        self.ticks(self.command_window_ms)
    }

    /// Checks the invariants the builder enforces.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_us == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if self.long_hold_ms == 0
            || self.command_window_ms == 0
            || self.color_step_delay_ms == 0
            || self.intensity_step_delay_ms == 0
        {
            return Err(ConfigError::ZeroDuration);
        }
        if self.intensity_min == 0
            || self.intensity_min > self.intensity_max
            || self.intensity_max > INTENSITY_LIMIT
        {
            return Err(ConfigError::InvalidIntensityRange {
                min: self.intensity_min,
                max: self.intensity_max,
            });
        }
        Ok(())
    }
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            tick_period_us: 1000,
            long_hold_ms: 3000,
            command_window_ms: 3000,
            color_step_delay_ms: 10,
            intensity_step_delay_ms: 350,
            intensity_min: 0x01,
            intensity_max: 0x0F,
            persistence_enabled: true,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Tick period of zero.
    ZeroTickPeriod,

    /// A hold, window or step delay of zero.
    ZeroDuration,

    /// Intensity bounds outside `1..=63` or inverted.
    InvalidIntensityRange { min: u8, max: u8 },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroTickPeriod => write!(f, "tick period must be non-zero"),
            ConfigError::ZeroDuration => {
                write!(f, "hold, window and step delays must be non-zero")
            }
            ConfigError::InvalidIntensityRange { min, max } => {
                write!(
                    f,
                    "intensity range {}..={} must satisfy 1 <= min <= max <= {}",
                    min, max, INTENSITY_LIMIT
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Builder for a validated [`CubeConfig`].
#[derive(Debug, Clone, Copy)]
pub struct CubeConfigBuilder {
    config: CubeConfig,
}

impl CubeConfigBuilder {
    /// Creates a builder holding the factory defaults.
    pub fn new() -> Self {
        Self {
            config: CubeConfig::default(),
        }
    }

    pub fn tick_period_us(mut self, period: u32) -> Self {
        self.config.tick_period_us = period;
        self
    }

    pub fn long_hold_ms(mut self, millis: u32) -> Self {
        self.config.long_hold_ms = millis;
        self
    }

    pub fn command_window_ms(mut self, millis: u32) -> Self {
        self.config.command_window_ms = millis;
        self
    }

    pub fn color_step_delay_ms(mut self, millis: u32) -> Self {
        self.config.color_step_delay_ms = millis;
        self
    }

    pub fn intensity_step_delay_ms(mut self, millis: u32) -> Self {
        self.config.intensity_step_delay_ms = millis;
        self
    }

    /// Sets the inclusive intensity bounds used during adjustment.
    pub fn intensity_range(mut self, min: u8, max: u8) -> Self {
        self.config.intensity_min = min;
        self.config.intensity_max = max;
        self
    }

    /// Enables or disables writes to non-volatile storage.
    pub fn persistence(mut self, enabled: bool) -> Self {
        self.config.persistence_enabled = enabled;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    /// * `ZeroTickPeriod` - Tick period is zero
    /// * `ZeroDuration` - A hold, window or delay is zero
    /// * `InvalidIntensityRange` - Bounds are inverted, zero, or above 63
    pub fn build(self) -> Result<CubeConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for CubeConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
