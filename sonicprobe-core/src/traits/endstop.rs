//! Endstop sensor trait

/// Trait for a binary contact/limit sensor
pub trait EndstopSensor {
    /// Query the trigger state at the given print time
    ///
    /// Returns the raw trigger state; debouncing and inversion are the
    /// implementation's concern. Takes `&mut self` because a query may
    /// involve an MCU round trip.
    fn query_endstop(&mut self, print_time: f64) -> bool;
}
