//! Probing state machine and its collaborators
//!
//! - [`sequence`]: move sequence generation (the oscillation pattern)
//! - [`accel`]: scoped acceleration override
//! - [`poller`]: rate-limited endstop polling
//! - [`position`]: contact position resolution
//! - [`runner`]: the execution loop tying it all together

pub mod accel;
pub mod poller;
pub mod position;
pub mod runner;
pub mod sequence;

pub use accel::AccelSnapshot;
pub use poller::ContactPoller;
pub use position::ContactPosition;
pub use runner::{CancelToken, ProbePhase, ProbeResult, ProbeRunner};
pub use sequence::{FeedPolicy, MoveSequence, MoveStep, MAX_PROBE_STEPS};

use crate::traits::MotionError;

/// Configuration errors detected at sequence generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `dt * freq < 1`: not even one oscillation step fits
    NoSteps,
    /// Step count exceeds [`MAX_PROBE_STEPS`]
    TooManySteps,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::NoSteps => {
                write!(f, "dt * freq below 1, no oscillation step fits")
            }
            ConfigError::TooManySteps => {
                write!(f, "step count exceeds sequence capacity")
            }
        }
    }
}

/// Errors that abort a probe run
///
/// Terminal outcomes (contact, timeout, exhaustion, cancellation) are
/// not errors; they are reported as [`ProbeResult`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeError {
    /// Parameters cannot produce a sequence; raised before any motion
    /// or limit override, so there is nothing to restore.
    InvalidConfig(ConfigError),
    /// Controller refused a queued move mid-run. The acceleration
    /// override is restored before this propagates.
    MotionRejected(MotionError),
}

impl From<MotionError> for ProbeError {
    fn from(err: MotionError) -> Self {
        ProbeError::MotionRejected(err)
    }
}

impl core::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ProbeError::InvalidConfig(err) => write!(f, "invalid probe config: {}", err),
            ProbeError::MotionRejected(err) => write!(f, "probe aborted: {}", err),
        }
    }
}
