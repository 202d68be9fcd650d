//! Probe execution loop
//!
//! Drives a generated move sequence against the motion controller, one
//! step at a time, while watching three other conditions: the wall-clock
//! deadline, the endstop (on the poller's cadence), and an external
//! cancellation flag. The loop is fully sequential; issuing a move is
//! the only operation that may block, and it only blocks on queue
//! backpressure, never on physical completion.

use core::sync::atomic::{AtomicBool, Ordering};

use super::accel::AccelSnapshot;
use super::poller::ContactPoller;
use super::position::{self, ContactPosition};
use super::sequence::{self, FeedPolicy, MoveSequence};
use super::ProbeError;
use crate::config::ProbeConfig;
use crate::traits::{Clock, CommandDispatcher, EndstopSensor, MotionController};

/// Probe run phases
///
/// `Idle -> Running -> {ContactDetected, TimedOut, Exhausted, Cancelled}
/// -> Idle`. All four terminal phases are normal outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbePhase {
    /// No run in progress
    Idle,
    /// Sequence executing
    Running,
    /// Endstop triggered
    ContactDetected,
    /// Deadline elapsed before the sequence completed
    TimedOut,
    /// Sequence completed without contact
    Exhausted,
    /// External stop honored
    Cancelled,
}

impl ProbePhase {
    /// Check if this phase ends a run
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProbePhase::ContactDetected
                | ProbePhase::TimedOut
                | ProbePhase::Exhausted
                | ProbePhase::Cancelled
        )
    }
}

/// Outcome of a completed probe run
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeResult {
    /// Endstop triggered; both position views captured at that instant
    Contact(ContactPosition),
    /// Deadline elapsed before the sequence completed
    Timeout,
    /// Sequence completed without contact
    Exhausted,
    /// Run stopped by external request
    Cancelled,
}

impl ProbeResult {
    fn phase(&self) -> ProbePhase {
        match self {
            ProbeResult::Contact(_) => ProbePhase::ContactDetected,
            ProbeResult::Timeout => ProbePhase::TimedOut,
            ProbeResult::Exhausted => ProbePhase::Exhausted,
            ProbeResult::Cancelled => ProbePhase::Cancelled,
        }
    }
}

/// Shared cancellation flag
///
/// Owned by the host, observed by the run loop once per iteration
/// boundary. Non-preemptive: an in-flight move issuance is never
/// interrupted. The host clears the token before reusing it.
#[derive(Debug, Default)]
pub struct CancelToken {
    flag: AtomicBool,
}

impl CancelToken {
    /// Create a cleared token
    pub const fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// Raise the stop request
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Check whether a stop has been requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Clear the flag for the next run
    pub fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// The probing state machine
///
/// One runner drives one run at a time; holding `&mut self` for the
/// whole run makes reentrancy unrepresentable, so only one run can hold
/// the acceleration override.
#[derive(Debug)]
pub struct ProbeRunner<'a> {
    config: ProbeConfig,
    cancel: &'a CancelToken,
    phase: ProbePhase,
}

impl<'a> ProbeRunner<'a> {
    /// Create a runner for the given config and cancellation token
    pub fn new(config: ProbeConfig, cancel: &'a CancelToken) -> Self {
        Self {
            config,
            cancel,
            phase: ProbePhase::Idle,
        }
    }

    /// Current phase
    pub fn phase(&self) -> ProbePhase {
        self.phase
    }

    /// Execute one probe run
    ///
    /// Generates the sequence (rejecting bad configs before any state is
    /// mutated), applies the acceleration override, drives the loop, and
    /// restores the override on every exit path; a mid-run controller
    /// rejection propagates only after restoration.
    pub fn run<M, S, C, D>(
        &mut self,
        controller: &mut M,
        endstop: &mut S,
        clock: &C,
        dispatch: &mut D,
        policy: FeedPolicy,
    ) -> Result<ProbeResult, ProbeError>
    where
        M: MotionController,
        S: EndstopSensor,
        C: Clock,
        D: CommandDispatcher,
    {
        let sequence = sequence::generate(&self.config, controller.position(), policy)?;

        let snapshot = AccelSnapshot::begin(controller, &self.config);
        self.phase = ProbePhase::Running;
        let outcome = self.drive(controller, endstop, clock, &sequence);
        snapshot.end(controller);

        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                self.phase = ProbePhase::Idle;
                return Err(err);
            }
        };
        self.phase = result.phase();
        self.report(dispatch, &result);
        self.phase = ProbePhase::Idle;
        Ok(result)
    }

    /// The iteration loop
    ///
    /// Tie-breaks: a completed sequence beats the deadline (completion is
    /// the expected path), and a touch beats the deadline (timing is only
    /// a safety bound).
    fn drive<M, S, C>(
        &mut self,
        controller: &mut M,
        endstop: &mut S,
        clock: &C,
        sequence: &MoveSequence,
    ) -> Result<ProbeResult, ProbeError>
    where
        M: MotionController,
        S: EndstopSensor,
        C: Clock,
    {
        let start_time = clock.monotonic();
        let mut poller = ContactPoller::new(self.config.check_dt);
        let mut cursor = 0usize;

        loop {
            if self.cancel.is_cancelled() {
                return Ok(ProbeResult::Cancelled);
            }

            let Some(step) = sequence.get(cursor) else {
                return Ok(ProbeResult::Exhausted);
            };
            controller.queue_move(step.target(), step.feed)?;
            cursor += 1;

            let elapsed = clock.monotonic() - start_time;
            if poller.due(elapsed)
                && poller.poll(endstop, elapsed, controller.last_move_time())
            {
                return Ok(ProbeResult::Contact(position::resolve(controller)));
            }
            if cursor == sequence.len() {
                return Ok(ProbeResult::Exhausted);
            }
            if elapsed > self.config.dt {
                return Ok(ProbeResult::Timeout);
            }
        }
    }

    fn report<D: CommandDispatcher>(&self, dispatch: &mut D, result: &ProbeResult) {
        match result {
            ProbeResult::Contact(pos) => {
                let [x, y, z] = pos.kinematic_pos;
                dispatch.respond_info(format_args!(
                    "Endstop hit: X={:.6} Y={:.6} Z={:.6}",
                    x, y, z
                ));
            }
            ProbeResult::Exhausted => {
                dispatch.respond_info(format_args!("Probe finished: no contact"));
            }
            ProbeResult::Timeout => {
                dispatch.respond_info(format_args!("Probe finished: deadline elapsed"));
            }
            ProbeResult::Cancelled => {
                dispatch.respond_info(format_args!("Probe stopped"));
            }
        }
    }
}
