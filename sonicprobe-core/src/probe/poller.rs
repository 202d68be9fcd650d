//! Rate-limited endstop polling
//!
//! A high-frequency oscillation can issue hundreds of moves per second;
//! the endstop must not be queried at that rate. The poller decouples
//! sensor query cost from move cadence: queries happen at most once per
//! `check_dt` of elapsed run time.

use crate::traits::EndstopSensor;

/// Check whether a poll is due
///
/// True when at least `check_dt` has passed since the last poll.
pub fn should_poll(elapsed: f64, last_poll: f64, check_dt: f64) -> bool {
    elapsed - last_poll >= check_dt
}

/// Rate-limited wrapper around the endstop query
#[derive(Debug, Clone)]
pub struct ContactPoller {
    check_dt: f64,
    last_poll: f64,
}

impl ContactPoller {
    /// Create a poller with the given minimum poll interval (seconds)
    pub fn new(check_dt: f64) -> Self {
        Self {
            check_dt,
            last_poll: 0.0,
        }
    }

    /// Check whether a poll is due at the given elapsed run time
    pub fn due(&self, elapsed: f64) -> bool {
        should_poll(elapsed, self.last_poll, self.check_dt)
    }

    /// Query the sensor and record the poll time
    ///
    /// Returns the raw trigger state.
    pub fn poll<S: EndstopSensor>(
        &mut self,
        sensor: &mut S,
        elapsed: f64,
        query_time: f64,
    ) -> bool {
        self.last_poll = elapsed;
        sensor.query_endstop(query_time)
    }
}
