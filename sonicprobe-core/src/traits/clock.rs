//! Monotonic time source trait

/// Trait for a monotonic clock
///
/// Used for the probe deadline and the endstop poll cadence. The epoch
/// is arbitrary; only differences are meaningful.
pub trait Clock {
    /// Current monotonic time in seconds
    fn monotonic(&self) -> f64;
}
