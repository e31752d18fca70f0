// ==============================================================================
// kinematics.rs — WHEEL POSE + BASIS (WORLD SPACE)
// ------------------------------------------------------------------------------
// Chassis-local convention (right-handed, Y up):
//   up      = +Y
//   forward = +Z
//   right   = -X   (+X is left)
//
// A wheel's world pose is chassis_pose * (mount offset, mount yaw). Front wheels
// carry a yaw about their local up axis; rear wheels carry identity. Positive
// yaw turns the wheel toward the chassis right.
//
// WheelState is the per-tick snapshot the force models read: world position,
// the three basis vectors and the contact point velocity (sampled before any of
// this tick's forces are integrated).
// ==============================================================================

use nalgebra::{Isometry3, UnitQuaternion, Vector3};

use super::types::{Pos3, Vec3, WheelId};

pub fn local_up() -> Vec3 { Vector3::new(0.0, 1.0, 0.0) }
pub fn local_forward() -> Vec3 { Vector3::new(0.0, 0.0, 1.0) }
pub fn local_right() -> Vec3 { Vector3::new(-1.0, 0.0, 0.0) }

/// Local rotation for a wheel yawed by `angle` radians (positive = right).
/// Replaces any other local rotation the mount had.
#[inline]
pub fn steer_rotation(angle: f32) -> UnitQuaternion<f32> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -angle)
}

/// Signed yaw (radians, positive = right) encoded in a steer rotation.
#[inline]
pub fn steer_yaw(rotation: &UnitQuaternion<f32>) -> f32 {
    let fwd = rotation * local_forward();
    fwd.dot(&local_right()).atan2(fwd.dot(&local_forward()))
}

/// Chassis speed along its own forward axis (signed).
#[inline]
pub fn forward_speed(chassis_pose: &Isometry3<f32>, linvel: Vec3) -> f32 {
    (chassis_pose.rotation * local_forward()).dot(&linvel)
}

/// World pose of a wheel mount.
#[inline]
pub fn wheel_pose(
    chassis_pose: &Isometry3<f32>,
    offset: Pos3,
    local_rotation: UnitQuaternion<f32>,
) -> Isometry3<f32> {
    chassis_pose * Isometry3::from_parts(offset.coords.into(), local_rotation)
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WheelState {
    pub wheel: WheelId,
    pub position: Pos3,
    pub up: Vec3,
    pub right: Vec3,
    pub forward: Vec3,
    pub point_vel: Vec3,
}

impl WheelState {
    pub fn from_pose(wheel: WheelId, pose: &Isometry3<f32>, point_vel: Vec3) -> Self {
        Self {
            wheel,
            position: Pos3::from(pose.translation.vector),
            up: pose.rotation * local_up(),
            right: pose.rotation * local_right(),
            forward: pose.rotation * local_forward(),
            point_vel,
        }
    }

    /// Ray cast direction for this wheel: straight down its own strut.
    pub fn ray_dir(&self) -> Vec3 {
        -self.up
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Translation3;

    #[test]
    fn basis_is_right_handed_and_orthonormal() {
        let up = local_up();
        let fwd = local_forward();
        let right = local_right();
        assert_relative_eq!(up.dot(&fwd), 0.0);
        assert_relative_eq!(up.dot(&right), 0.0);
        // right = forward x up in a right-handed frame
        assert_relative_eq!(fwd.cross(&up), right);
    }

    #[test]
    fn positive_yaw_turns_right() {
        let rot = steer_rotation(30f32.to_radians());
        let fwd = rot * local_forward();
        assert!(fwd.dot(&local_right()) > 0.0);
        assert_relative_eq!(steer_yaw(&rot).to_degrees(), 30.0, epsilon = 1e-4);
        assert_relative_eq!(steer_yaw(&steer_rotation(-0.2)), -0.2, epsilon = 1e-6);
    }

    #[test]
    fn wheel_pose_follows_chassis() {
        let chassis = Isometry3::from_parts(
            Translation3::new(10.0, 2.0, -4.0),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), std::f32::consts::FRAC_PI_2),
        );
        let pose = wheel_pose(&chassis, Pos3::new(0.0, -0.1, 1.0), UnitQuaternion::identity());
        let state = WheelState::from_pose(WheelId::FL, &pose, Vec3::zeros());

        // chassis forward (+Z) yawed 90deg about +Y points along +X
        assert_relative_eq!(state.forward, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(state.position, Pos3::new(11.0, 1.9, -4.0), epsilon = 1e-5);
        assert_relative_eq!(state.ray_dir(), Vec3::new(0.0, -1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn forward_speed_is_signed() {
        let pose = Isometry3::identity();
        assert_relative_eq!(forward_speed(&pose, Vec3::new(3.0, 0.0, 7.0)), 7.0);
        assert_relative_eq!(forward_speed(&pose, Vec3::new(0.0, 0.0, -2.0)), -2.0);
    }
}
