//! Host-side simulation of the probe hardware traits
//!
//! Implements the `sonicprobe-core` traits against an in-memory machine
//! model so the probing loop can be exercised without hardware. Time is
//! fully deterministic: queuing a move advances a shared manual clock by
//! the modeled queue time, so runs behave identically on every host.

use std::cell::Cell;
use std::rc::Rc;

use sonicprobe_core::traits::{
    AccelLimits, Clock, CommandDispatcher, EndstopSensor, Kinematics, MotionController,
    MotionError, Stepper,
};
use tracing::{debug, info};

/// Cloneable handle to a shared, manually advanced clock
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    now: Rc<Cell<f64>>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `dt` seconds
    pub fn advance(&self, dt: f64) {
        self.now.set(self.now.get() + dt);
    }
}

impl Clock for SimClock {
    fn monotonic(&self) -> f64 {
        self.now.get()
    }
}

/// Simulated axis actuator
#[derive(Debug)]
pub struct SimStepper {
    name: &'static str,
    commanded: f64,
}

impl Stepper for SimStepper {
    fn name(&self) -> &str {
        self.name
    }

    fn commanded_position(&self) -> f64 {
        self.commanded
    }
}

/// Identity Cartesian kinematics over three actuators
#[derive(Debug)]
pub struct SimKinematics {
    steppers: [SimStepper; 3],
}

impl SimKinematics {
    fn new() -> Self {
        Self {
            steppers: [
                SimStepper {
                    name: "stepper_x",
                    commanded: 0.0,
                },
                SimStepper {
                    name: "stepper_y",
                    commanded: 0.0,
                },
                SimStepper {
                    name: "stepper_z",
                    commanded: 0.0,
                },
            ],
        }
    }
}

impl Kinematics for SimKinematics {
    fn stepper_count(&self) -> usize {
        self.steppers.len()
    }

    fn stepper(&self, index: usize) -> &dyn Stepper {
        &self.steppers[index]
    }

    fn calc_position(&self, joint_positions: &[f64]) -> [f64; 3] {
        [joint_positions[0], joint_positions[1], joint_positions[2]]
    }
}

/// Simulated toolhead
///
/// Records every issued move and limit write, models queue backpressure
/// as `move_time` seconds of clock advance per accepted move, and can be
/// scripted to reject moves after a given count.
#[derive(Debug)]
pub struct SimToolhead {
    clock: SimClock,
    position: [f64; 4],
    limits: AccelLimits,
    kin: SimKinematics,
    /// Modeled time for the queue to accept one move (seconds)
    pub move_time: f64,
    /// Reject moves once this many have been accepted
    pub reject_after: Option<usize>,
    /// Every accepted `(target, feed)` in order
    pub issued: Vec<([f64; 4], f64)>,
    /// Every limit write in order (override plus restore)
    pub limit_writes: Vec<AccelLimits>,
    /// Number of step generation flushes
    pub flush_count: usize,
}

impl SimToolhead {
    pub fn new(clock: SimClock) -> Self {
        Self {
            clock,
            position: [0.0; 4],
            limits: AccelLimits {
                max_accel: 3000.0,
                max_accel_to_decel: 1500.0,
            },
            kin: SimKinematics::new(),
            move_time: 0.02,
            reject_after: None,
            issued: Vec::new(),
            limit_writes: Vec::new(),
            flush_count: 0,
        }
    }
}

impl MotionController for SimToolhead {
    type Kin = SimKinematics;

    fn position(&self) -> [f64; 4] {
        self.position
    }

    fn queue_move(&mut self, target: [f64; 4], feed: f64) -> Result<(), MotionError> {
        if let Some(limit) = self.reject_after {
            if self.issued.len() >= limit {
                debug!(moves = self.issued.len(), "rejecting move");
                return Err(MotionError::Rejected);
            }
        }
        self.position = target;
        for (stepper, joint) in self.kin.steppers.iter_mut().zip(target.iter()) {
            stepper.commanded = *joint;
        }
        self.issued.push((target, feed));
        self.clock.advance(self.move_time);
        Ok(())
    }

    fn accel_limits(&self) -> AccelLimits {
        self.limits
    }

    fn set_accel_limits(&mut self, limits: AccelLimits) {
        debug!(
            max_accel = limits.max_accel,
            max_accel_to_decel = limits.max_accel_to_decel,
            "acceleration limits set"
        );
        self.limits = limits;
        self.limit_writes.push(limits);
    }

    fn last_move_time(&self) -> f64 {
        self.clock.monotonic()
    }

    fn flush_step_generation(&mut self) {
        self.flush_count += 1;
    }

    fn kinematics(&self) -> &SimKinematics {
        &self.kin
    }
}

/// Trigger behavior for the simulated endstop
#[derive(Debug, Clone, Copy)]
pub enum TriggerMode {
    /// Never triggers
    Never,
    /// Triggers at and after the given print time
    AtTime(f64),
    /// Triggers at and after the nth query (0-based)
    AtQuery(usize),
}

/// Simulated endstop with scripted trigger behavior
///
/// Records the print time of every query so tests can assert the poll
/// cadence.
#[derive(Debug)]
pub struct SimEndstop {
    mode: TriggerMode,
    /// Print time of every query, in order
    pub queries: Vec<f64>,
}

impl SimEndstop {
    pub fn never() -> Self {
        Self {
            mode: TriggerMode::Never,
            queries: Vec::new(),
        }
    }

    pub fn at_time(print_time: f64) -> Self {
        Self {
            mode: TriggerMode::AtTime(print_time),
            queries: Vec::new(),
        }
    }

    pub fn at_query(n: usize) -> Self {
        Self {
            mode: TriggerMode::AtQuery(n),
            queries: Vec::new(),
        }
    }
}

impl EndstopSensor for SimEndstop {
    fn query_endstop(&mut self, print_time: f64) -> bool {
        let index = self.queries.len();
        self.queries.push(print_time);
        match self.mode {
            TriggerMode::Never => false,
            TriggerMode::AtTime(t) => print_time >= t,
            TriggerMode::AtQuery(n) => index >= n,
        }
    }
}

/// Dispatcher that logs messages and keeps them for assertions
#[derive(Debug, Default)]
pub struct ConsoleDispatcher {
    pub messages: Vec<String>,
}

impl CommandDispatcher for ConsoleDispatcher {
    fn respond_info(&mut self, msg: std::fmt::Arguments<'_>) {
        let text = msg.to_string();
        info!("{text}");
        self.messages.push(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_handles_share_state() {
        let clock = SimClock::new();
        let handle = clock.clone();
        clock.advance(1.5);
        assert_eq!(handle.monotonic(), 1.5);
    }

    #[test]
    fn test_toolhead_tracks_moves() {
        let clock = SimClock::new();
        let mut toolhead = SimToolhead::new(clock.clone());
        toolhead.queue_move([1.0, 2.0, 3.0, 4.0], 75.0).unwrap();

        assert_eq!(toolhead.position(), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(toolhead.issued.len(), 1);
        assert_eq!(clock.monotonic(), toolhead.move_time);
        assert_eq!(toolhead.kinematics().stepper(2).commanded_position(), 3.0);
    }

    #[test]
    fn test_endstop_at_time() {
        let mut endstop = SimEndstop::at_time(1.0);
        assert!(!endstop.query_endstop(0.5));
        assert!(endstop.query_endstop(1.0));
        assert_eq!(endstop.queries, vec![0.5, 1.0]);
    }

    #[test]
    fn test_stepper_names() {
        let kin = SimKinematics::new();
        assert_eq!(kin.stepper(0).name(), "stepper_x");
        assert_eq!(kin.stepper(2).name(), "stepper_z");
    }
}
