// ==============================================================================
// suspension.rs — RAYCAST SPRING/DAMPER
// ------------------------------------------------------------------------------
//   offset          = rest_height - hit_distance   (> 0 when compressed)
//   target_velocity = dot(wheel_up, point_vel)     (velocity along the strut)
//   magnitude       = offset * strength - target_velocity * damping
//   force           = wheel_up * magnitude
//
// No clamping: an over-extended wheel that still hits pulls the chassis down,
// and a wheel whose ray misses never gets here (caller skips it).
// ==============================================================================

use super::types::Vec3;

/// Spring/damper force along `wheel_up`, world space.
#[inline]
pub fn compute_suspension_force(
    wheel_up: Vec3,
    point_vel: Vec3,
    hit_distance: f32,
    rest_height: f32,
    strength: f32,
    damping: f32,
) -> Vec3 {
    let offset = rest_height - hit_distance;
    let target_velocity = wheel_up.dot(&point_vel);
    let magnitude = offset * strength - target_velocity * damping;

    wheel_up * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn up() -> Vec3 {
        Vec3::new(0.0, 1.0, 0.0)
    }

    #[test]
    fn at_rest_height_with_no_motion_is_zero() {
        let f = compute_suspension_force(up(), Vec3::zeros(), 0.5, 0.5, 10.0, 5.0);
        assert_eq!(f, Vec3::zeros());
    }

    #[test]
    fn compressed_wheel_pushes_along_up() {
        let f = compute_suspension_force(up(), Vec3::zeros(), 0.3, 0.5, 10.0, 5.0);
        assert_relative_eq!(f, Vec3::new(0.0, 2.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn linear_in_offset() {
        let base = compute_suspension_force(up(), Vec3::zeros(), 0.4, 0.5, 10.0, 5.0).y;
        for i in 1..=5 {
            let hit = 0.5 - 0.1 * i as f32;
            let f = compute_suspension_force(up(), Vec3::zeros(), hit, 0.5, 10.0, 5.0).y;
            assert_relative_eq!(f, base * i as f32, epsilon = 1e-4);
        }
    }

    #[test]
    fn linear_in_strut_velocity() {
        let vel = |v: f32| Vec3::new(0.3, v, -0.2); // off-axis parts must not matter
        let base = compute_suspension_force(up(), vel(1.0), 0.5, 0.5, 10.0, 5.0).y;
        assert_relative_eq!(base, -5.0, epsilon = 1e-5);
        for i in -3..=3 {
            let f = compute_suspension_force(up(), vel(i as f32), 0.5, 0.5, 10.0, 5.0).y;
            assert_relative_eq!(f, base * i as f32, epsilon = 1e-4);
        }
    }

    #[test]
    fn follows_tilted_strut() {
        let tilted = Vec3::new(1.0, 1.0, 0.0).normalize();
        let f = compute_suspension_force(tilted, Vec3::zeros(), 0.3, 0.5, 10.0, 5.0);
        assert_relative_eq!(f, tilted * 2.0, epsilon = 1e-5);
    }

    #[test]
    fn extended_wheel_pulls_down() {
        let f = compute_suspension_force(up(), Vec3::zeros(), 0.9, 0.5, 10.0, 5.0);
        assert!(f.y < 0.0);
    }
}
