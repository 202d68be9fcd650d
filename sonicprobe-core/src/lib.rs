//! Board-agnostic core logic for the Sonicprobe vibration probe
//!
//! This crate contains all probing logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (motion controller, kinematics, endstop)
//! - Probe configuration types
//! - Move sequence generation (the oscillation pattern)
//! - The probing state machine and execution loop
//! - Acceleration override with guaranteed restoration
//! - Contact position resolution
//!
//! The technique: instead of touching off with a static Z probe, the
//! extruder is oscillated at a fixed frequency while the carriage creeps
//! toward the bed. Contact shows up on a binary endstop, which is polled
//! on its own cadence between move issuances.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod command;
pub mod config;
pub mod probe;
pub mod traits;
