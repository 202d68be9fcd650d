//! Contact position resolution
//!
//! At the instant contact is detected, before any further motion is
//! issued, the probe captures both views of the position: the logical
//! toolhead position and the kinematic position derived from the
//! actuators' commanded positions after a step generation flush.

use heapless::Vec;

use crate::traits::{Kinematics, MotionController};

/// Maximum axis actuators sampled for the kinematic snapshot
pub const MAX_STEPPERS: usize = 8;

/// Both views of the position at the moment of contact
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ContactPosition {
    /// Logical toolhead position `[x, y, z, e]`
    pub toolhead_pos: [f64; 4],
    /// Cartesian position computed from commanded stepper positions
    pub kinematic_pos: [f64; 3],
}

/// Capture the contact position from the motion controller
///
/// Flushes buffered step generation so queued micro-moves are committed
/// to the stepper model before the joint positions are sampled.
pub fn resolve<M: MotionController>(controller: &mut M) -> ContactPosition {
    let toolhead_pos = controller.position();
    controller.flush_step_generation();

    let kin = controller.kinematics();
    let mut joints: Vec<f64, MAX_STEPPERS> = Vec::new();
    let count = kin.stepper_count().min(MAX_STEPPERS);
    for i in 0..count {
        let _ = joints.push(kin.stepper(i).commanded_position());
    }
    let kinematic_pos = kin.calc_position(&joints);

    ContactPosition {
        toolhead_pos,
        kinematic_pos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::runner::tests::MockToolhead;
    use crate::traits::MotionController;

    #[test]
    fn test_resolve_flushes_before_sampling() {
        let mut toolhead = MockToolhead::new();
        toolhead.queue_move([1.0, 2.0, 3.0, 4.0], 10.0).unwrap();

        let pos = resolve(&mut toolhead);

        assert_eq!(toolhead.flush_count, 1);
        assert_eq!(pos.toolhead_pos, [1.0, 2.0, 3.0, 4.0]);
        // Mock kinematics is an identity Cartesian mapping
        assert_eq!(pos.kinematic_pos, [1.0, 2.0, 3.0]);
    }
}
