//! Hardware abstraction traits
//!
//! These traits define the interface between the probing logic and
//! host-provided services. The probe core is injected with concrete
//! implementations at construction; it never looks services up by name.

pub mod clock;
pub mod dispatch;
pub mod endstop;
pub mod motion;

pub use clock::Clock;
pub use dispatch::CommandDispatcher;
pub use endstop::EndstopSensor;
pub use motion::{AccelLimits, Kinematics, MotionController, MotionError, Stepper};
