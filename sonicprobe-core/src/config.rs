//! Probe configuration types
//!
//! Range validation (all fields strictly positive) is the caller's job;
//! the core only rejects parameter combinations it cannot turn into a
//! move sequence.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters for one probe run
///
/// Immutable for the duration of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProbeConfig {
    /// Oscillation frequency in Hz
    pub freq: f64,
    /// Extruder oscillation amplitude (mm of filament per swing)
    pub incr: f64,
    /// Total probe duration and wall-clock deadline (seconds)
    pub dt: f64,
    /// Acceleration budget per Hz of oscillation (mm/s^2 per Hz)
    pub accel_per_hz: f64,
    /// Total Z travel over the run (mm)
    pub dz: f64,
    /// Minimum time between endstop polls (seconds)
    pub check_dt: f64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            freq: 50.0,
            incr: 0.1,
            dt: 3.0,
            accel_per_hz: 75.0,
            dz: 0.01,
            check_dt: 0.1,
        }
    }
}

impl ProbeConfig {
    /// Duration of one oscillation segment (seconds)
    pub fn segment_time(&self) -> f64 {
        1.0 / self.freq
    }

    /// Number of oscillation steps that fit in the probe duration
    pub fn step_count(&self) -> usize {
        (self.dt * self.freq) as usize
    }

    /// Acceleration limit applied while the probe runs (mm/s^2)
    pub fn elevated_accel(&self) -> f64 {
        self.freq * self.accel_per_hz
    }

    /// Vertical travel speed implied by the Z range and duration (mm/s)
    pub fn descent_speed(&self) -> f64 {
        self.dz / self.dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_step_count() {
        let config = ProbeConfig::default();
        // 3 seconds at 50 Hz
        assert_eq!(config.step_count(), 150);
    }

    #[test]
    fn test_elevated_accel() {
        let config = ProbeConfig::default();
        assert_eq!(config.elevated_accel(), 3750.0);
    }

    #[test]
    fn test_step_count_truncates() {
        let config = ProbeConfig {
            freq: 0.9,
            dt: 1.0,
            ..Default::default()
        };
        assert_eq!(config.step_count(), 0);
    }
}
