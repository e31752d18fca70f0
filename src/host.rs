//! Capabilities the vehicle core borrows from its host. The core never looks
//! these up globally; a host hands them to `VehicleFrame` every tick.
//!
//! Reads (`ChassisState`, `Raycaster`) are split from writes (`ForceSink`) so a
//! host can raycast against the same body set it later applies forces to.

use nalgebra::Isometry3;

use crate::arcade_tire::{LayerMask, Pos3, RaycastResult, Vec3};

/// Read-only view of the chassis rigid body.
pub trait ChassisState {
    /// World pose of the chassis frame.
    fn pose(&self) -> Isometry3<f32>;

    /// Linear velocity of the body.
    fn linear_velocity(&self) -> Vec3;

    /// World velocity of a point rigidly attached to the body.
    fn point_velocity(&self, world_point: &Pos3) -> Vec3;
}

/// Accepts forces for the current step. Forces accumulate until the host
/// integrates; they never change already-sampled velocities.
pub trait ForceSink {
    fn apply_force_at_point(&mut self, force: Vec3, world_point: Pos3);
}

/// Scene ray query.
pub trait Raycaster {
    fn cast(&self, origin: Pos3, dir: Vec3, max_distance: f32, filter: LayerMask) -> RaycastResult;
}

/// Driver controls. Axes are expected in -1..1.
pub trait InputSource {
    fn vertical(&self) -> f32;
    fn horizontal(&self) -> f32;
    fn is_pressed(&self, button: &str) -> bool;
}

impl<T: ChassisState + ?Sized> ChassisState for &T {
    fn pose(&self) -> Isometry3<f32> { (**self).pose() }
    fn linear_velocity(&self) -> Vec3 { (**self).linear_velocity() }
    fn point_velocity(&self, world_point: &Pos3) -> Vec3 { (**self).point_velocity(world_point) }
}

impl<T: Raycaster + ?Sized> Raycaster for &T {
    fn cast(&self, origin: Pos3, dir: Vec3, max_distance: f32, filter: LayerMask) -> RaycastResult {
        (**self).cast(origin, dir, max_distance, filter)
    }
}

impl<T: InputSource + ?Sized> InputSource for &T {
    fn vertical(&self) -> f32 { (**self).vertical() }
    fn horizontal(&self) -> f32 { (**self).horizontal() }
    fn is_pressed(&self, button: &str) -> bool { (**self).is_pressed(button) }
}
