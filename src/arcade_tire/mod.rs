//! arcade_tire - engine-agnostic raycast-wheel force helpers (pure types + models)

pub mod types;
pub mod curve;
pub mod suspension;
pub mod lateral;
pub mod longitudinal;
pub mod kinematics;

pub use types::*;
pub use curve::{Curve, CurveKey, GripCurve, Interpolation, TorqueCurve};
pub use suspension::compute_suspension_force;
pub use lateral::compute_lateral_force;
pub use longitudinal::{compute_accel_force, compute_brake_force};
pub use kinematics::WheelState;
