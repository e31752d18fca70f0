// src/physics.rs
//
// rapier3d host for the vehicle core: owns the world, spawns chassis bodies and
// runs the fixed step. Per vehicle, per step:
//   reset user forces -> compute() against a read-only body -> apply -> integrate

use rapier3d::prelude::*;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::arcade_tire::kinematics::forward_speed;
use crate::arcade_tire::{p3, v3, LayerMask, Pos3, RaycastResult, Vec3};
use crate::debug_builders::DebugOverlay;
use crate::error::ConfigError;
use crate::host::{ChassisState, ForceSink, Raycaster};
use crate::state::{InputState, Snapshot, VehicleSnapshot};
use crate::vehicle::{Vehicle, VehicleConfig, VehicleCurves, WheelMount};
use crate::vehicle_frame::{TickForces, VehicleFrame};

/// Layer 0: anything a wheel ray may land on.
pub const GROUP_GROUND: Group = Group::from_bits_truncate(0b0001);
/// Layer 1: vehicle chassis.
pub const GROUP_CHASSIS: Group = Group::from_bits_truncate(0b0010);

/// Host-side chassis parameters (the core never sees these).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChassisConfig {
    pub mass: f32,                  // kg
    pub half_extents: [f32; 3],     // [hx, hy, hz] meters
    pub com_offset: [f32; 3],       // local collider offset
    pub linear_damping: f32,
    pub angular_damping: f32,

    // --- Wheel mounts ---
    pub half_track: f32,            // meters, centreline to wheel
    pub half_wheelbase: f32,        // meters, centre to axle
    pub mount_height: f32,          // meters, below chassis origin when negative

    pub spawn_height: f32,          // meters
}

pub const ARCADE_CHASSIS: ChassisConfig = ChassisConfig {
    mass: 1.0,
    half_extents: [0.5, 0.15, 1.0],
    com_offset: [0.0, 0.0, 0.0],
    linear_damping: 0.05,
    angular_damping: 0.5,

    half_track: 0.45,
    half_wheelbase: 0.8,
    mount_height: -0.1,

    spawn_height: 0.8,
};

impl ChassisConfig {
    pub fn wheel_mounts(&self) -> [WheelMount; 4] {
        WheelMount::standard_layout(self.half_track, self.half_wheelbase, self.mount_height)
    }
}

/// Ray filter for a wheel mask: the ray belongs to every group and only
/// accepts colliders whose membership intersects the mask.
pub fn ray_groups(mask: LayerMask) -> InteractionGroups {
    InteractionGroups::new(Group::ALL, Group::from_bits_truncate(mask.bits()))
}

// ============================================================================
// Capability adapters
// ============================================================================

impl ChassisState for RigidBody {
    fn pose(&self) -> Isometry<Real> {
        *self.position()
    }

    fn linear_velocity(&self) -> Vec3 {
        *self.linvel()
    }

    fn point_velocity(&self, world_point: &Pos3) -> Vec3 {
        self.velocity_at_point(world_point)
    }
}

impl ForceSink for RigidBody {
    fn apply_force_at_point(&mut self, force: Vec3, world_point: Pos3) {
        self.add_force_at_point(force, world_point, true);
    }
}

/// Scene queries for one vehicle; its own body is excluded.
pub struct RapierRaycaster<'a> {
    pub query: &'a QueryPipeline,
    pub bodies: &'a RigidBodySet,
    pub colliders: &'a ColliderSet,
    pub exclude: RigidBodyHandle,
}

impl Raycaster for RapierRaycaster<'_> {
    fn cast(&self, origin: Pos3, dir: Vec3, max_distance: f32, filter: LayerMask) -> RaycastResult {
        let ray = Ray::new(origin, dir);
        let filter = QueryFilter::default()
            .groups(ray_groups(filter))
            .exclude_rigid_body(self.exclude);

        match self.query.cast_ray(self.bodies, self.colliders, &ray, max_distance, true, filter) {
            Some((_collider, toi)) => RaycastResult::hit_at(toi, ray.point_at(toi)),
            None => RaycastResult::miss(),
        }
    }
}

// ============================================================================
// World
// ============================================================================

pub struct VehicleEntry {
    pub body: RigidBodyHandle,
    pub frame: VehicleFrame,
    pub input: InputState,
    pub last_forces: TickForces,
}

pub struct PhysicsWorld {
    pub gravity: Vector<Real>,
    pub dt: Real,
    pub tick: u64,
    pub pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub joints: ImpulseJointSet,
    pub multibody_joints: MultibodyJointSet,
    pub ccd: CCDSolver,
    pub query_pipeline: QueryPipeline,
    pub vehicles: HashMap<String, VehicleEntry>, // id -> vehicle
    pub debug_overlay: DebugOverlay,
}

impl PhysicsWorld {
    /// Empty world with a large flat ground whose top face is y = 0.
    pub fn new(dt: Real) -> Self {
        let gravity = vector![0.0, -9.81, 0.0];

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        let ground_rb = RigidBodyBuilder::fixed()
            .translation(vector![0.0, -1.0, 0.0])
            .build();
        let ground_handle = bodies.insert(ground_rb);

        let ground_collider = ColliderBuilder::cuboid(500.0, 1.0, 500.0)
            .collision_groups(InteractionGroups::new(GROUP_GROUND, GROUP_CHASSIS))
            .friction(1.2)
            .restitution(0.0)
            .build();
        colliders.insert_with_parent(ground_collider, ground_handle, &mut bodies);

        info!(bodies = bodies.len(), colliders = colliders.len(), "ground inserted");

        Self {
            gravity,
            dt,
            tick: 0,
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders,
            joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            vehicles: HashMap::new(),
            debug_overlay: DebugOverlay::default(),
        }
    }

    /// Validate the configuration, build the chassis body and register the
    /// vehicle under `id`. An existing vehicle with the same id is replaced.
    pub fn spawn_vehicle(
        &mut self,
        id: &str,
        position: [f32; 3],
        config: VehicleConfig,
        curves: VehicleCurves,
        chassis: &ChassisConfig,
    ) -> Result<RigidBodyHandle, ConfigError> {
        config.validate()?;
        if !(self.dt > 0.0) {
            return Err(ConfigError::NonPositive { field: "fixed_dt", value: self.dt });
        }
        if !(chassis.mass > 0.0) {
            return Err(ConfigError::NonPositive { field: "chassis.mass", value: chassis.mass });
        }

        let vehicle = Vehicle::new(config, curves, chassis.wheel_mounts())?;

        if let Some(old) = self.vehicles.remove(id) {
            self.remove_body(old.body);
        }

        let rb = RigidBodyBuilder::dynamic()
            .translation(vector![position[0], position[1], position[2]])
            .linear_damping(chassis.linear_damping)
            .angular_damping(chassis.angular_damping)
            .ccd_enabled(true)
            .build();

        let [hx, hy, hz] = chassis.half_extents;
        let [cx, cy, cz] = chassis.com_offset;
        let collider = ColliderBuilder::cuboid(hx, hy, hz)
            .translation(vector![cx, cy, cz])
            .collision_groups(InteractionGroups::new(GROUP_CHASSIS, GROUP_GROUND))
            .mass(chassis.mass)
            .friction(0.0)
            .restitution(0.0)
            .build();

        let handle = self.bodies.insert(rb);
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);

        self.vehicles.insert(
            id.to_string(),
            VehicleEntry {
                body: handle,
                frame: VehicleFrame::new(vehicle, self.dt),
                input: InputState::new(),
                last_forces: TickForces::default(),
            },
        );

        info!(
            id,
            drive = config.drive_type.as_str(),
            x = position[0],
            y = position[1],
            z = position[2],
            "vehicle spawned"
        );

        Ok(handle)
    }

    pub fn despawn_vehicle(&mut self, id: &str) -> Result<(), ConfigError> {
        let entry = self
            .vehicles
            .remove(id)
            .ok_or_else(|| ConfigError::UnknownVehicle { id: id.to_string() })?;
        self.remove_body(entry.body);
        Ok(())
    }

    fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Controls the next step will sample for `id`.
    pub fn input_mut(&mut self, id: &str) -> Result<&mut InputState, ConfigError> {
        self.vehicles
            .get_mut(id)
            .map(|v| &mut v.input)
            .ok_or_else(|| ConfigError::UnknownVehicle { id: id.to_string() })
    }

    pub fn set_input(&mut self, id: &str, input: InputState) -> Result<(), ConfigError> {
        *self.input_mut(id)? = input;
        Ok(())
    }

    fn apply_vehicle_forces(&mut self) {
        self.query_pipeline.update(&self.colliders);

        for entry in self.vehicles.values_mut() {
            // user forces persist in rapier until reset
            let Some(body) = self.bodies.get_mut(entry.body) else { continue };
            body.reset_forces(false);

            let Some(body) = self.bodies.get(entry.body) else { continue };
            let rays = RapierRaycaster {
                query: &self.query_pipeline,
                bodies: &self.bodies,
                colliders: &self.colliders,
                exclude: entry.body,
            };
            let forces = entry.frame.compute(&entry.input, body, &rays, &mut self.debug_overlay);

            if let Some(body) = self.bodies.get_mut(entry.body) {
                forces.apply_to(body);
            }
            entry.last_forces = forces;
        }
    }

    pub fn step(&mut self) {
        self.debug_overlay.clear();

        let hooks = ();
        let events = ();

        self.apply_vehicle_forces();

        self.pipeline.step(
            &self.gravity,
            &IntegrationParameters {
                dt: self.dt,
                ..IntegrationParameters::default()
            },
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            Some(&mut self.query_pipeline),
            &hooks,
            &events,
        );

        self.reset_exploded_bodies();
        self.tick += 1;
    }

    fn reset_exploded_bodies(&mut self) {
        for (handle, body) in self.bodies.iter_mut() {
            let pos = *body.translation();

            let bad = !pos.x.is_finite() || !pos.y.is_finite() || !pos.z.is_finite()
                || pos.x.abs() > 1_000.0 || pos.y.abs() > 1_000.0 || pos.z.abs() > 1_000.0;

            if bad {
                let reset = vector![0.0, 1.0, 0.0];
                body.set_translation(reset, true);
                body.set_rotation(Rotation::identity(), true);
                body.set_linvel(vector![0.0, 0.0, 0.0], true);
                body.set_angvel(vector![0.0, 0.0, 0.0], true);
                body.reset_forces(true);

                warn!(?handle, from = ?pos, "reset exploding body");
            }
        }
    }

    pub fn vehicle_snapshot(&self, id: &str) -> Result<VehicleSnapshot, ConfigError> {
        let unknown = || ConfigError::UnknownVehicle { id: id.to_string() };
        let entry = self.vehicles.get(id).ok_or_else(unknown)?;
        let body = self.bodies.get(entry.body).ok_or_else(unknown)?;

        Ok(VehicleSnapshot {
            id: id.to_string(),
            tick: self.tick,
            position: p3(Pos3::from(*body.translation())),
            velocity: v3(*body.linvel()),
            forward_speed: forward_speed(body.position(), *body.linvel()),
            steer_angle: entry.frame.steer_angle(),
            grounded_wheels: entry.last_forces.grounded_count(),
        })
    }

    /// All vehicles, sorted by id.
    pub fn snapshot(&self) -> Snapshot {
        let mut ids: Vec<&String> = self.vehicles.keys().collect();
        ids.sort();

        Snapshot {
            tick: self.tick,
            vehicles: ids
                .into_iter()
                .filter_map(|id| self.vehicle_snapshot(id).ok())
                .collect(),
        }
    }
}
