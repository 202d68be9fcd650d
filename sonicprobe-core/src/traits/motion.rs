//! Motion controller, kinematics, and stepper traits
//!
//! These abstract over the toolhead of the host firmware: the component
//! that owns the logical position, the motion queue, and the kinematic
//! model mapping actuator positions to Cartesian space.

/// Acceleration limits of the motion controller
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelLimits {
    /// Maximum acceleration (mm/s^2)
    pub max_accel: f64,
    /// Accel-to-decel transition limit (mm/s^2)
    pub max_accel_to_decel: f64,
}

impl AccelLimits {
    /// Create limits with both values set to the same acceleration
    pub fn uniform(accel: f64) -> Self {
        Self {
            max_accel: accel,
            max_accel_to_decel: accel,
        }
    }
}

/// Errors that can occur when issuing motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionError {
    /// Controller refused to queue the move
    Rejected,
    /// Controller is shut down
    Shutdown,
}

impl core::fmt::Display for MotionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MotionError::Rejected => write!(f, "motion controller rejected move"),
            MotionError::Shutdown => write!(f, "motion controller is shut down"),
        }
    }
}

/// Trait for a single axis actuator
pub trait Stepper {
    /// Actuator name (e.g. "stepper_x")
    fn name(&self) -> &str;

    /// Last commanded position in joint space
    fn commanded_position(&self) -> f64;
}

/// Trait for the kinematic model of the machine
///
/// Maps actuator (joint) positions to Cartesian machine position.
pub trait Kinematics {
    /// Number of axis actuators
    fn stepper_count(&self) -> usize;

    /// Access an actuator by index
    ///
    /// Index must be below [`Kinematics::stepper_count`].
    fn stepper(&self, index: usize) -> &dyn Stepper;

    /// Convert a joint-space snapshot to Cartesian position
    ///
    /// `joint_positions[i]` is the commanded position of actuator `i`.
    fn calc_position(&self, joint_positions: &[f64]) -> [f64; 3];
}

/// Trait for the motion controller (toolhead)
///
/// `queue_move` is the only operation that may block: it suspends until
/// the controller accepts the move into its pipeline, but does not wait
/// for physical completion.
pub trait MotionController {
    /// Kinematic model type
    type Kin: Kinematics;

    /// Current logical position `[x, y, z, e]`
    fn position(&self) -> [f64; 4];

    /// Queue a linear move to `target` at `feed` mm/s
    ///
    /// A rejection is fatal to the caller; the controller performs no
    /// retries on its behalf.
    fn queue_move(&mut self, target: [f64; 4], feed: f64) -> Result<(), MotionError>;

    /// Read the current acceleration limits
    fn accel_limits(&self) -> AccelLimits;

    /// Replace the acceleration limits
    fn set_accel_limits(&mut self, limits: AccelLimits);

    /// Print time of the most recently queued move
    fn last_move_time(&self) -> f64;

    /// Force buffered step generation to be committed to the stepper model
    fn flush_step_generation(&mut self);

    /// Access the kinematic model
    fn kinematics(&self) -> &Self::Kin;
}
