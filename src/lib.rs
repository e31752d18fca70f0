//! Arcade raycast-wheel vehicle dynamics.
//!
//! Each wheel is a ray cast from its mount toward the ground. Spring/damper
//! suspension, slip-cancelling lateral grip, curve-driven propulsion and braking
//! are computed from the hit and the chassis velocity, then applied to one rigid
//! body at four points. The host integrator, ray queries and input are supplied
//! through the traits in [`host`]; [`physics`] wires them to rapier3d.

pub mod arcade_tire;
pub mod debug_builders;
pub mod drive_train;
pub mod error;
pub mod host;
pub mod physics;
pub mod state;
pub mod vehicle;
pub mod vehicle_frame;

pub use drive_train::DriveType;
pub use error::ConfigError;
pub use vehicle::{Vehicle, VehicleConfig, VehicleCurves, WheelMount};
pub use vehicle_frame::{AppliedForce, TickForces, VehicleFrame};
