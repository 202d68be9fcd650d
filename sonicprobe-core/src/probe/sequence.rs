//! Move sequence generation
//!
//! Turns probe parameters into the full oscillation pattern for one run:
//! Z creeps linearly toward the bed, E alternates sign every step, X and
//! Y hold position. Generation is pure and deterministic; no I/O, no
//! clock access.

use heapless::Vec;

use super::{ConfigError, ProbeError};
use crate::config::ProbeConfig;

/// Maximum steps in a generated sequence
pub const MAX_PROBE_STEPS: usize = 256;

/// One linear motion target plus requested feedrate
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoveStep {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub e: f64,
    /// Requested feedrate (mm/s)
    pub feed: f64,
}

impl MoveStep {
    /// Position target as `[x, y, z, e]`
    pub fn target(&self) -> [f64; 4] {
        [self.x, self.y, self.z, self.e]
    }
}

/// Feed selection for the generated sequence
///
/// An explicit choice, not an implicit fallback: either every step runs
/// at the peak velocity reachable within one oscillation segment, or
/// vertical travel is governed by a fixed descent speed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeedPolicy {
    /// Peak oscillation velocity: `elevated_accel * t_seg`
    PeakOscillation,
    /// Fixed descent speed in mm/s (canonically `dz / dt`)
    FixedDescent(f64),
}

/// An immutable, pre-generated move sequence
///
/// Generated once per run and consumed front-to-back through an index
/// cursor held by the runner; never mutated after generation.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveSequence {
    steps: Vec<MoveStep, MAX_PROBE_STEPS>,
}

impl MoveSequence {
    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check for an empty sequence
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Access a step by index
    pub fn get(&self, index: usize) -> Option<&MoveStep> {
        self.steps.get(index)
    }

    /// All steps in execution order
    pub fn steps(&self) -> &[MoveStep] {
        &self.steps
    }
}

/// Generate the move sequence for one probe run
///
/// - `n_steps = floor(dt * freq)`; zero steps is a configuration error.
/// - `z_i = start.z + i * dz / n_steps` (inclusive of the start).
/// - `e_i = start.e + incr * (-1)^i`.
/// - X and Y are held at the start position.
pub fn generate(
    config: &ProbeConfig,
    start: [f64; 4],
    policy: FeedPolicy,
) -> Result<MoveSequence, ProbeError> {
    let n_steps = config.step_count();
    if n_steps == 0 {
        return Err(ProbeError::InvalidConfig(ConfigError::NoSteps));
    }
    if n_steps > MAX_PROBE_STEPS {
        return Err(ProbeError::InvalidConfig(ConfigError::TooManySteps));
    }

    let feed = match policy {
        FeedPolicy::PeakOscillation => config.elevated_accel() * config.segment_time(),
        FeedPolicy::FixedDescent(speed) => speed,
    };

    let dz_step = config.dz / n_steps as f64;
    let mut steps = Vec::new();
    for i in 0..n_steps {
        let swing = if i % 2 == 0 { config.incr } else { -config.incr };
        let step = MoveStep {
            x: start[0],
            y: start[1],
            z: start[2] + i as f64 * dz_step,
            e: start[3] + swing,
            feed,
        };
        if steps.push(step).is_err() {
            return Err(ProbeError::InvalidConfig(ConfigError::TooManySteps));
        }
    }

    Ok(MoveSequence { steps })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const START: [f64; 4] = [0.0, 0.0, 0.0, 0.0];

    #[test]
    fn test_default_config_sequence() {
        let config = ProbeConfig::default();
        let seq = generate(&config, START, FeedPolicy::PeakOscillation).unwrap();

        // 3 seconds at 50 Hz
        assert_eq!(seq.len(), 150);

        // Z is non-decreasing from 0 toward 0.01
        assert_eq!(seq.get(0).unwrap().z, 0.0);
        for pair in seq.steps().windows(2) {
            assert!(pair[1].z >= pair[0].z);
        }
        assert!(seq.get(149).unwrap().z <= 0.01);

        // E alternates +0.1, -0.1, +0.1, ...
        assert_eq!(seq.get(0).unwrap().e, 0.1);
        assert_eq!(seq.get(1).unwrap().e, -0.1);
        assert_eq!(seq.get(2).unwrap().e, 0.1);
    }

    #[test]
    fn test_xy_held_constant() {
        let config = ProbeConfig::default();
        let start = [12.5, -3.0, 1.0, 42.0];
        let seq = generate(&config, start, FeedPolicy::PeakOscillation).unwrap();
        for step in seq.steps() {
            assert_eq!(step.x, 12.5);
            assert_eq!(step.y, -3.0);
        }
    }

    #[test]
    fn test_peak_oscillation_feed() {
        let config = ProbeConfig::default();
        let seq = generate(&config, START, FeedPolicy::PeakOscillation).unwrap();
        // elevated_accel * t_seg = 50 * 75 / 50
        assert!((seq.get(0).unwrap().feed - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_descent_feed() {
        let config = ProbeConfig::default();
        let speed = config.descent_speed();
        let seq = generate(&config, START, FeedPolicy::FixedDescent(speed)).unwrap();
        for step in seq.steps() {
            assert_eq!(step.feed, speed);
        }
    }

    #[test]
    fn test_no_steps_rejected() {
        let config = ProbeConfig {
            freq: 0.2,
            dt: 1.0,
            ..Default::default()
        };
        let result = generate(&config, START, FeedPolicy::PeakOscillation);
        assert_eq!(result, Err(ProbeError::InvalidConfig(ConfigError::NoSteps)));
    }

    #[test]
    fn test_too_many_steps_rejected() {
        let config = ProbeConfig {
            freq: 50.0,
            dt: 10.0,
            ..Default::default()
        };
        let result = generate(&config, START, FeedPolicy::PeakOscillation);
        assert_eq!(
            result,
            Err(ProbeError::InvalidConfig(ConfigError::TooManySteps))
        );
    }

    proptest! {
        #[test]
        fn prop_length_matches_floor(freq in 1.0f64..80.0, dt in 0.1f64..3.0) {
            let config = ProbeConfig { freq, dt, ..Default::default() };
            prop_assume!(config.step_count() >= 1);
            prop_assume!(config.step_count() <= MAX_PROBE_STEPS);
            let seq = generate(&config, START, FeedPolicy::PeakOscillation).unwrap();
            prop_assert_eq!(seq.len(), (dt * freq) as usize);
        }

        #[test]
        fn prop_z_monotone_e_alternating(
            freq in 1.0f64..80.0,
            dt in 0.1f64..3.0,
            dz in 0.001f64..1.0,
            incr in 0.01f64..1.0,
            z0 in -5.0f64..5.0,
            e0 in -10.0f64..10.0,
        ) {
            let config = ProbeConfig { freq, dt, dz, incr, ..Default::default() };
            prop_assume!(config.step_count() >= 2);
            prop_assume!(config.step_count() <= MAX_PROBE_STEPS);
            let seq = generate(&config, [0.0, 0.0, z0, e0], FeedPolicy::PeakOscillation).unwrap();
            for pair in seq.steps().windows(2) {
                prop_assert!(pair[1].z >= pair[0].z);
            }
            for (i, step) in seq.steps().iter().enumerate() {
                let expected = if i % 2 == 0 { e0 + incr } else { e0 - incr };
                prop_assert_eq!(step.e, expected);
            }
        }

        #[test]
        fn prop_feed_positive(freq in 1.0f64..80.0, accel_per_hz in 1.0f64..200.0) {
            let config = ProbeConfig { freq, accel_per_hz, ..Default::default() };
            prop_assume!(config.step_count() >= 1);
            prop_assume!(config.step_count() <= MAX_PROBE_STEPS);
            let seq = generate(&config, START, FeedPolicy::PeakOscillation).unwrap();
            prop_assert!(seq.get(0).unwrap().feed > 0.0);
        }
    }
}
