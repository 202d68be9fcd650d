//! Scoped acceleration override
//!
//! The oscillation needs far more acceleration than normal printing, so
//! the probe raises the controller limits to `freq * accel_per_hz` for
//! the duration of the run. The saved limits are restored exactly once
//! per run, on every exit path; consuming the snapshot on restore makes
//! a double restore unrepresentable.

use crate::config::ProbeConfig;
use crate::traits::{AccelLimits, MotionController};

/// Saved acceleration limits from before the override
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelSnapshot {
    pub max_accel: f64,
    pub max_accel_to_decel: f64,
}

impl AccelSnapshot {
    /// Read the current limits, apply the elevated limits, and return
    /// the snapshot to restore later.
    ///
    /// The probe is the sole writer of the limits while it holds the
    /// snapshot; no other activity may alter them during a run.
    pub fn begin<M: MotionController>(controller: &mut M, config: &ProbeConfig) -> Self {
        let saved = controller.accel_limits();
        controller.set_accel_limits(AccelLimits::uniform(config.elevated_accel()));
        Self {
            max_accel: saved.max_accel,
            max_accel_to_decel: saved.max_accel_to_decel,
        }
    }

    /// Reapply the saved limits, consuming the snapshot.
    pub fn end<M: MotionController>(self, controller: &mut M) {
        controller.set_accel_limits(AccelLimits {
            max_accel: self.max_accel,
            max_accel_to_decel: self.max_accel_to_decel,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::runner::tests::MockToolhead;

    #[test]
    fn test_begin_applies_elevated_limits() {
        let config = ProbeConfig::default();
        let mut toolhead = MockToolhead::new();
        toolhead.limits = AccelLimits {
            max_accel: 1500.0,
            max_accel_to_decel: 750.0,
        };

        let snapshot = AccelSnapshot::begin(&mut toolhead, &config);

        assert_eq!(toolhead.limits.max_accel, 3750.0);
        assert_eq!(toolhead.limits.max_accel_to_decel, 3750.0);
        assert_eq!(snapshot.max_accel, 1500.0);
        assert_eq!(snapshot.max_accel_to_decel, 750.0);
    }

    #[test]
    fn test_end_restores_saved_limits() {
        let config = ProbeConfig::default();
        let mut toolhead = MockToolhead::new();
        toolhead.limits = AccelLimits {
            max_accel: 1500.0,
            max_accel_to_decel: 750.0,
        };

        let snapshot = AccelSnapshot::begin(&mut toolhead, &config);
        snapshot.end(&mut toolhead);

        assert_eq!(toolhead.limits.max_accel, 1500.0);
        assert_eq!(toolhead.limits.max_accel_to_decel, 750.0);
    }
}
