use nalgebra::UnitQuaternion;
use serde::Serialize;
use tracing::debug;

use crate::arcade_tire::kinematics::{steer_rotation, steer_yaw};
use crate::arcade_tire::{Curve, GripCurve, LayerMask, Pos3, TorqueCurve, WheelId, WheelRole};
use crate::drive_train::DriveType;
use crate::error::ConfigError;

/// Button that gates braking unless a config says otherwise.
pub const DEFAULT_BRAKE_BUTTON: &str = "Jump";

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct VehicleConfig {
    pub drive_type: DriveType,

    // --- Suspension ---
    pub rest_height: f32,      // m, ray distance at which the spring is neutral
    pub spring_strength: f32,  // force per metre of offset
    pub spring_damping: f32,   // force per m/s along the strut

    // --- Steering / grip ---
    pub wheel_mass: f32,       // mass share each wheel's grip force acts on
    pub max_steer_angle: f32,  // radians

    // --- Acceleration / braking ---
    pub max_speed: f32,        // m/s, normalizes the torque curve input
    pub accel_scale: f32,
    pub brake_scale: f32,

    // --- Wheel rays ---
    pub ray_distance: f32,     // m
    pub ray_mask: LayerMask,

    pub brake_button: &'static str,
}

pub const ARCADE_4WD: VehicleConfig = VehicleConfig {
    drive_type: DriveType::FourWheelDrive,

    rest_height: 0.5,
    spring_strength: 10.0,
    spring_damping: 5.0,

    wheel_mass: 0.25,
    max_steer_angle: 0.52,     // radians (~30 degrees)

    max_speed: 20.0,
    accel_scale: 5.0,
    brake_scale: 5.0,

    ray_distance: 1.0,
    ray_mask: LayerMask::layer(0),

    brake_button: DEFAULT_BRAKE_BUTTON,
};

pub const HOT_HATCH_FWD: VehicleConfig = VehicleConfig {
    drive_type: DriveType::FrontWheelDrive,
    max_steer_angle: 0.6,      // radians (~34 degrees)
    accel_scale: 7.0,
    ..ARCADE_4WD
};

pub const ROADSTER_BWD: VehicleConfig = VehicleConfig {
    drive_type: DriveType::BackWheelDrive,
    spring_strength: 12.0,
    spring_damping: 4.0,
    max_speed: 28.0,
    accel_scale: 8.0,
    ..ARCADE_4WD
};

impl Default for VehicleConfig {
    fn default() -> Self {
        ARCADE_4WD
    }
}

impl VehicleConfig {
    /// Pick the preset matching a drive type.
    pub fn preset(drive_type: DriveType) -> Self {
        match drive_type {
            DriveType::FrontWheelDrive => HOT_HATCH_FWD,
            DriveType::BackWheelDrive => ROADSTER_BWD,
            DriveType::FourWheelDrive => ARCADE_4WD,
        }
    }

    /// Reject values the force models would turn into NaN/inf. The force path
    /// itself never calls this.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("rest_height", self.rest_height),
            ("spring_strength", self.spring_strength),
            ("spring_damping", self.spring_damping),
            ("wheel_mass", self.wheel_mass),
            ("max_steer_angle", self.max_steer_angle),
            ("max_speed", self.max_speed),
            ("accel_scale", self.accel_scale),
            ("brake_scale", self.brake_scale),
            ("ray_distance", self.ray_distance),
        ];
        if let Some(&(field, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFinite { field });
        }

        for (field, value) in [("max_speed", self.max_speed), ("ray_distance", self.ray_distance)] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        Ok(())
    }
}

/// The three response curves. Read-only once the vehicle exists.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleCurves {
    pub front_grip: GripCurve,
    pub back_grip: GripCurve,
    pub torque: TorqueCurve,
}

impl VehicleCurves {
    /// Front tyres bite harder than the rear at high slip so the back steps out.
    pub fn arcade() -> Result<Self, ConfigError> {
        Ok(Self {
            front_grip: Curve::smooth(
                "front_grip",
                &[(-20.0, 0.35), (-6.0, 0.8), (0.0, 1.0), (6.0, 0.8), (20.0, 0.35)],
            )?,
            back_grip: Curve::smooth(
                "back_grip",
                &[(-20.0, 0.15), (-6.0, 0.6), (0.0, 1.0), (6.0, 0.6), (20.0, 0.15)],
            )?,
            torque: Curve::linear("torque", &[(0.0, 1.0), (0.5, 0.8), (1.0, 0.0)])?,
        })
    }

    /// Grip curve for a wheel, chosen by axle.
    pub fn grip_for(&self, wheel: WheelId) -> &GripCurve {
        if wheel.is_back() { &self.back_grip } else { &self.front_grip }
    }
}

/// A wheel attachment point on the chassis.
#[derive(Clone, Debug, PartialEq)]
pub struct WheelMount {
    pub id: WheelId,
    pub offset: Pos3,                       // chassis local
    pub local_rotation: UnitQuaternion<f32>,
    pub role: WheelRole,
}

impl WheelMount {
    pub fn new(id: WheelId, offset: Pos3) -> Self {
        Self {
            id,
            offset,
            local_rotation: UnitQuaternion::identity(),
            role: WheelRole::default(),
        }
    }

    /// Four mounts on a rectangle: +Z is the front axle, +X the left side.
    pub fn standard_layout(half_track: f32, half_wheelbase: f32, height: f32) -> [WheelMount; 4] {
        WheelId::ALL.map(|id| {
            let x = if id.is_left() { half_track } else { -half_track };
            let z = if id.is_front() { half_wheelbase } else { -half_wheelbase };
            WheelMount::new(id, Pos3::new(x, height, z))
        })
    }

    /// Current yaw about the mount's local up axis (radians, positive = right).
    pub fn steer_angle(&self) -> f32 {
        steer_yaw(&self.local_rotation)
    }

    pub(crate) fn set_steer_angle(&mut self, angle: f32) {
        self.local_rotation = steer_rotation(angle);
    }
}

/// Immutable vehicle description: config, curves and the four mounts with
/// their roles resolved.
#[derive(Clone, Debug)]
pub struct Vehicle {
    pub config: VehicleConfig,
    pub curves: VehicleCurves,
    mounts: [WheelMount; 4],
    driven: &'static [WheelId],
}

impl Vehicle {
    /// Mounts may arrive in any order; they are stored FL, FR, BL, BR and their
    /// roles are overwritten from identity + drive type. Each of the four
    /// wheel ids must appear exactly once.
    pub fn new(
        config: VehicleConfig,
        curves: VehicleCurves,
        mounts: [WheelMount; 4],
    ) -> Result<Self, ConfigError> {
        let drive = config.drive_type;

        let mut ordered = mounts;
        ordered.sort_by_key(|m| m.id as u8);

        // four slots, four ids: any gap shows up as a repeated neighbour
        if let Some(pair) = ordered.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(ConfigError::DuplicateWheel { id: pair[0].id });
        }

        for m in ordered.iter_mut() {
            m.role = WheelRole {
                steered: m.id.is_front(),
                suspended: true,
                driven: drive.drives(m.id),
            };
        }

        debug!(
            drive = drive.as_str(),
            driven = ?drive.driven_wheels(),
            torque_domain = ?curves.torque.domain(),
            "vehicle built"
        );

        Ok(Self { config, curves, mounts: ordered, driven: drive.driven_wheels() })
    }

    pub fn mounts(&self) -> &[WheelMount; 4] {
        &self.mounts
    }

    pub fn mount(&self, id: WheelId) -> &WheelMount {
        &self.mounts[id as usize]
    }

    pub(crate) fn mounts_mut(&mut self) -> &mut [WheelMount; 4] {
        &mut self.mounts
    }

    /// Wheels that get spring, grip and brake forces.
    pub fn suspended_wheels(&self) -> impl Iterator<Item = &WheelMount> {
        self.mounts.iter().filter(|m| m.role.suspended)
    }

    /// Wheels that get propulsion, cached from the drive type at build time.
    pub fn driven_wheels(&self) -> &'static [WheelId] {
        self.driven
    }
}
