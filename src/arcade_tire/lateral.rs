// ==============================================================================
// lateral.rs — SLIP-CANCELLING LATERAL GRIP
// ------------------------------------------------------------------------------
// Arcade pseudo-friction, keyed by raw slip velocity (not slip ratio/angle):
//
//   steer_vel   = dot(wheel_right, point_vel)         (lateral slip, m/s)
//   grip        = grip_curve(steer_vel)               (front/back curve per axle)
//   dv          = -steer_vel * grip                   (velocity change wanted)
//   accel       = dv / fixed_dt                       (removed within one step)
//   force       = wheel_right * wheel_mass * accel
//
// The grip curve decides how much of the slip is removed at a given slip speed,
// so it has to be authored in m/s, not in normalized slip.
// ==============================================================================

use super::curve::GripCurve;
use super::types::Vec3;

/// Lateral slip velocity of the contact point.
#[inline]
pub fn slip_velocity(wheel_right: Vec3, point_vel: Vec3) -> f32 {
    wheel_right.dot(&point_vel)
}

/// Force opposing lateral slip, world space.
#[inline]
pub fn compute_lateral_force(
    wheel_right: Vec3,
    point_vel: Vec3,
    grip_curve: &GripCurve,
    wheel_mass: f32,
    fixed_dt: f32,
) -> Vec3 {
    let steer_vel = slip_velocity(wheel_right, point_vel);
    let grip = grip_curve.evaluate(steer_vel);

    let target_vel_change = -steer_vel * grip;
    let target_accel = target_vel_change / fixed_dt;

    wheel_right * (wheel_mass * target_accel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arcade_tire::curve::Curve;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 50.0;

    fn right() -> Vec3 {
        Vec3::new(-1.0, 0.0, 0.0)
    }

    fn curves() -> Vec<GripCurve> {
        vec![
            Curve::constant(1.0),
            Curve::constant(0.0),
            Curve::linear("falloff", &[(-20.0, 0.1), (0.0, 1.0), (20.0, 0.1)]).unwrap(),
            Curve::smooth("peaky", &[(-8.0, 0.3), (-2.0, 0.9), (0.0, 0.6), (2.0, 0.9), (8.0, 0.3)]).unwrap(),
        ]
    }

    #[test]
    fn no_slip_means_no_force() {
        // forward motion only: nothing along the lateral axis
        let vel = Vec3::new(0.0, -0.4, 12.0);
        for c in curves() {
            let f = compute_lateral_force(right(), vel, &c, 0.25, DT);
            assert_relative_eq!(f.norm(), 0.0);
        }
    }

    #[test]
    fn opposes_slip_for_any_non_negative_grip() {
        for c in curves() {
            for slip in [-15.0_f32, -3.0, -0.1, 0.1, 2.5, 11.0] {
                let vel = right() * slip + Vec3::new(0.0, 0.0, 5.0);
                let f = compute_lateral_force(right(), vel, &c, 0.25, DT);
                assert!(
                    f.dot(&right()) * slip <= 0.0,
                    "slip {slip} produced {f:?}"
                );
            }
        }
    }

    #[test]
    fn full_grip_cancels_slip_in_one_step() {
        let mass = 0.25;
        let vel = right() * 2.0;
        let f = compute_lateral_force(right(), vel, &Curve::constant(1.0), mass, DT);
        // impulse over one step equals the lateral momentum of the wheel share
        let impulse = f * DT;
        assert_relative_eq!(impulse, -right() * 2.0 * mass, epsilon = 1e-5);
    }

    #[test]
    fn grip_fraction_scales_force() {
        let vel = right() * 4.0;
        let half = compute_lateral_force(right(), vel, &Curve::constant(0.5), 1.0, DT);
        let full = compute_lateral_force(right(), vel, &Curve::constant(1.0), 1.0, DT);
        assert_relative_eq!(half * 2.0, full, epsilon = 1e-4);
    }

    #[test]
    fn curve_is_keyed_by_signed_slip() {
        // only negative slip gets grip
        let one_sided = Curve::linear("one-sided", &[(-1.0, 1.0), (0.0, 0.0)]).unwrap();
        let pos = compute_lateral_force(right(), right() * 3.0, &one_sided, 1.0, DT);
        let neg = compute_lateral_force(right(), right() * -3.0, &one_sided, 1.0, DT);
        assert_relative_eq!(pos.norm(), 0.0);
        assert!(neg.dot(&right()) > 0.0);
    }
}
