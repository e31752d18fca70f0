// ==============================================================================
// longitudinal.rs — LONGITUDINAL (ENGINE + BRAKE) FORCE MODEL
// ==============================================================================
// Both forces read the chassis forward speed (not per-wheel speed) and share the
// torque curve, keyed by normalized speed:
//
//   norm_speed = clamp(|forward_speed| / max_speed, 0, 1)
//
// Acceleration (driven wheels only):
//   - zero input -> exactly zero (no rolling resistance, no engine braking)
//   - force = wheel_forward * torque(norm_speed) * input * accel_scale
//
// Brake (every grounded wheel, gated by the brake button):
//   - stationary -> exactly zero (braking never reverses a stopped car)
//   - force = wheel_forward * sign(forward_speed) * torque(norm_speed) * -brake_scale
//
// Important properties:
// - No wheel angular velocity state is tracked.
// - max_speed <= 0 is not guarded; NaN/inf flow through to the force.
// ===============================================================================

use super::curve::TorqueCurve;
use super::types::Vec3;

/// |forward_speed| / max_speed clamped to 0..1.
#[inline]
pub fn normalized_speed(forward_speed: f32, max_speed: f32) -> f32 {
    (forward_speed.abs() / max_speed).clamp(0.0, 1.0)
}

pub fn compute_accel_force(
    wheel_forward: Vec3,
    accel_input: f32,
    forward_speed: f32,
    max_speed: f32,
    torque_curve: &TorqueCurve,
    accel_scale: f32,
) -> Vec3 {
    if accel_input.abs() == 0.0 {
        return Vec3::zeros();
    }

    let norm_speed = normalized_speed(forward_speed, max_speed);
    let torque = torque_curve.evaluate(norm_speed) * accel_input;

    wheel_forward * (torque * accel_scale)
}

pub fn compute_brake_force(
    wheel_forward: Vec3,
    forward_speed: f32,
    max_speed: f32,
    torque_curve: &TorqueCurve,
    brake_scale: f32,
) -> Vec3 {
    let norm_speed = normalized_speed(forward_speed, max_speed);

    if norm_speed == 0.0 {
        return Vec3::zeros();
    }

    let torque = torque_curve.evaluate(norm_speed);

    wheel_forward * (forward_speed.signum() * torque * -brake_scale)
}
