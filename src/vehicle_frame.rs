// ==============================================================================
// vehicle_frame.rs — PER-TICK FORCE ORCHESTRATION
// ------------------------------------------------------------------------------
// One tick, in order:
//   1) sample controls once (vertical, horizontal, brake button)
//   2) yaw both front mounts to horizontal * max_steer_angle
//   3) every suspended wheel: raycast down its strut; on hit
//        suspension + lateral -> one force at the wheel position
//        brake held           -> brake force at the same position
//   4) every driven wheel: raycast again; on hit
//        drive force at the wheel position
//
// A miss contributes nothing for that wheel; no error, no virtual max length.
// Wheels don't interact, so the order of pushes carries no meaning.
//
// compute() only reads the chassis and returns TickForces; apply_to() hands
// them to a ForceSink. Point velocities are therefore all sampled before any of
// this tick's forces reach the body.
// ==============================================================================

use nalgebra::Isometry3;
use tracing::trace;

use crate::arcade_tire::kinematics::{forward_speed, wheel_pose};
use crate::arcade_tire::{
    compute_accel_force, compute_brake_force, compute_lateral_force, compute_suspension_force,
    ForceKind, Pos3, Vec3, WheelId, WheelState,
};
use crate::debug_builders::ForceTrace;
use crate::host::{ChassisState, ForceSink, InputSource, Raycaster};
use crate::state::ControlSample;
use crate::vehicle::{Vehicle, WheelMount};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AppliedForce {
    pub wheel: WheelId,
    pub point: Pos3,
    pub force: Vec3,
}

/// Everything one tick wants applied to the chassis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickForces {
    pub applied: Vec<AppliedForce>,
    /// Suspension ray hit, indexed by `WheelId as usize`.
    pub grounded: [bool; 4],
}

impl TickForces {
    fn push(&mut self, wheel: WheelId, point: Pos3, force: Vec3) {
        self.applied.push(AppliedForce { wheel, point, force });
    }

    pub fn apply_to(&self, sink: &mut impl ForceSink) {
        for f in &self.applied {
            sink.apply_force_at_point(f.force, f.point);
        }
    }

    pub fn net_force(&self) -> Vec3 {
        self.applied.iter().fold(Vec3::zeros(), |acc, f| acc + f.force)
    }

    /// Sum of everything applied at one wheel.
    pub fn force_on(&self, wheel: WheelId) -> Vec3 {
        self.applied
            .iter()
            .filter(|f| f.wheel == wheel)
            .fold(Vec3::zeros(), |acc, f| acc + f.force)
    }

    pub fn grounded_count(&self) -> usize {
        self.grounded.iter().filter(|g| **g).count()
    }
}

fn wheel_state(mount: &WheelMount, chassis_pose: &Isometry3<f32>, chassis: &impl ChassisState) -> WheelState {
    let pose = wheel_pose(chassis_pose, mount.offset, mount.local_rotation);
    let position = Pos3::from(pose.translation.vector);
    WheelState::from_pose(mount.id, &pose, chassis.point_velocity(&position))
}

pub struct VehicleFrame {
    vehicle: Vehicle,
    fixed_dt: f32,
    control: ControlSample,
}

impl VehicleFrame {
    /// `fixed_dt` is the integrator step the lateral model cancels slip over.
    pub fn new(vehicle: Vehicle, fixed_dt: f32) -> Self {
        Self {
            vehicle,
            fixed_dt,
            control: ControlSample::default(),
        }
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Controls sampled by the last tick.
    pub fn control(&self) -> ControlSample {
        self.control
    }

    /// Yaw of the steered wheels (radians, positive = right).
    pub fn steer_angle(&self) -> f32 {
        self.vehicle.mount(WheelId::FL).steer_angle()
    }

    /// Overwrite the local rotation of every steered mount with a pure yaw.
    pub fn steer_wheels(&mut self, horizontal: f32) {
        let angle = horizontal * self.vehicle.config.max_steer_angle;
        for m in self.vehicle.mounts_mut().iter_mut().filter(|m| m.role.steered) {
            m.set_steer_angle(angle);
        }
    }

    fn cast(
        &self,
        state: &WheelState,
        rays: &impl Raycaster,
        trace: &mut impl ForceTrace,
    ) -> Option<f32> {
        let cfg = &self.vehicle.config;
        let dir = state.ray_dir();
        let hit = rays.cast(state.position, dir, cfg.ray_distance, cfg.ray_mask);
        trace.on_ray(state.wheel, state.position, dir, cfg.ray_distance, &hit);

        let distance = hit.contact_distance();
        if distance.is_none() {
            trace!(wheel = %state.wheel, "wheel ray missed");
        }
        distance
    }

    /// Run one tick against a read-only chassis and return the forces to apply.
    pub fn compute(
        &mut self,
        input: &impl InputSource,
        chassis: &impl ChassisState,
        rays: &impl Raycaster,
        trace: &mut impl ForceTrace,
    ) -> TickForces {
        self.control = ControlSample::read(input, self.vehicle.config.brake_button);
        self.steer_wheels(self.control.steer);

        let control = self.control;
        let cfg = self.vehicle.config;
        let curves = &self.vehicle.curves;

        let pose = chassis.pose();
        let speed = forward_speed(&pose, chassis.linear_velocity());

        let mut out = TickForces::default();

        // ------------------------------------------------------------
        // Suspension + lateral grip (+ brake), all suspended wheels
        // ------------------------------------------------------------
        for mount in self.vehicle.suspended_wheels() {
            let state = wheel_state(mount, &pose, chassis);
            let Some(hit_distance) = self.cast(&state, rays, trace) else { continue };

            out.grounded[mount.id as usize] = true;
            trace.on_wheel_basis(&state);

            let suspension = compute_suspension_force(
                state.up,
                state.point_vel,
                hit_distance,
                cfg.rest_height,
                cfg.spring_strength,
                cfg.spring_damping,
            );
            let lateral = compute_lateral_force(
                state.right,
                state.point_vel,
                curves.grip_for(mount.id),
                cfg.wheel_mass,
                self.fixed_dt,
            );

            trace.on_force(mount.id, ForceKind::Suspension, state.position, suspension);
            trace.on_force(mount.id, ForceKind::Lateral, state.position, lateral);
            trace!(wheel = %mount.id, hit_distance, ?suspension, ?lateral, "contact");

            out.push(mount.id, state.position, suspension + lateral);

            if control.brake {
                let brake = compute_brake_force(
                    state.forward,
                    speed,
                    cfg.max_speed,
                    &curves.torque,
                    cfg.brake_scale,
                );
                trace.on_force(mount.id, ForceKind::Brake, state.position, brake);
                out.push(mount.id, state.position, brake);
            }
        }

        // ------------------------------------------------------------
        // Propulsion, driven wheels only
        // ------------------------------------------------------------
        for &id in self.vehicle.driven_wheels() {
            let state = wheel_state(self.vehicle.mount(id), &pose, chassis);
            if self.cast(&state, rays, trace).is_none() {
                continue;
            }

            let drive = compute_accel_force(
                state.forward,
                control.accel,
                speed,
                cfg.max_speed,
                &curves.torque,
                cfg.accel_scale,
            );

            // no input: nothing to apply
            if drive == Vec3::zeros() {
                continue;
            }

            trace.on_force(id, ForceKind::Drive, state.position, drive);
            out.push(id, state.position, drive);
        }

        out
    }

    /// compute() + apply for hosts whose body can be read and written through
    /// one handle.
    pub fn step<B: ChassisState + ForceSink>(
        &mut self,
        input: &impl InputSource,
        body: &mut B,
        rays: &impl Raycaster,
        trace: &mut impl ForceTrace,
    ) -> TickForces {
        let forces = self.compute(input, &*body, rays, trace);
        forces.apply_to(body);
        forces
    }
}
