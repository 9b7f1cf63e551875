//! Battery health as seen by the startup check.
//!
//! Sampling and thresholds belong to the board; the cube only needs a
//! healthy/faulty answer once per boot.

/// Outcome of a battery check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BatteryStatus {
    Ok,
    Fault,
}

impl BatteryStatus {
    /// Returns true for a healthy battery.
    pub fn is_ok(self) -> bool {
        self == BatteryStatus::Ok
    }
}

/// Trait for abstracting the battery monitor.
pub trait BatteryMonitor {
    /// Samples the battery once.
    fn status(&mut self) -> BatteryStatus;
}

impl<F> BatteryMonitor for F
where
    F: FnMut() -> BatteryStatus,
{
    fn status(&mut self) -> BatteryStatus {
        self()
    }
}
