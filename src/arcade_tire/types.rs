//! Core shared types for `arcade_tire` (engine-agnostic).
// arcade_tire/types.rs
use std::fmt;

use nalgebra::{Point3, Vector3};
use serde::Serialize;

pub type Vec3 = Vector3<f32>;
pub type Pos3 = Point3<f32>;

#[inline]
pub fn v3(v: Vec3) -> [f32; 3] { [v.x, v.y, v.z] }
#[inline]
pub fn p3(p: Pos3) -> [f32; 3] { [p.x, p.y, p.z] }

// ============================================
// Wheel identification
// ============================================

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum WheelId { FL, FR, BL, BR }

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum Axle { Front, Back }

impl WheelId {
    /// Fixed iteration order used everywhere a wheel list is built.
    pub const ALL: [WheelId; 4] = [WheelId::FL, WheelId::FR, WheelId::BL, WheelId::BR];

    pub fn as_str(&self) -> &'static str {
        match self {
            WheelId::FL => "FL",
            WheelId::FR => "FR",
            WheelId::BL => "BL",
            WheelId::BR => "BR",
        }
    }

    pub fn axle(&self) -> Axle {
        match self {
            WheelId::FL | WheelId::FR => Axle::Front,
            WheelId::BL | WheelId::BR => Axle::Back,
        }
    }

    pub fn is_front(&self) -> bool {
        self.axle() == Axle::Front
    }

    pub fn is_back(&self) -> bool {
        self.axle() == Axle::Back
    }

    pub fn is_left(&self) -> bool {
        matches!(self, WheelId::FL | WheelId::BL)
    }
}

impl fmt::Display for WheelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================
// Roles
// ============================================

/// What a wheel takes part in each tick. Assigned once at construction from
/// the wheel's identity and the drive type, never inferred from names.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct WheelRole {
    pub steered: bool,   // yawed by horizontal input
    pub suspended: bool, // spring/damper + lateral grip + brake
    pub driven: bool,    // receives propulsion
}

/// Which force model produced a vector (trace/debug only).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ForceKind {
    Suspension,
    Lateral,
    Brake,
    Drive,
}

// ============================================
// Ray queries
// ============================================

/// Collision filter for wheel rays. Bit `n` set means layer `n` is hit.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    pub const fn layer(n: u32) -> LayerMask {
        LayerMask(1 << n)
    }

    pub const fn with(self, n: u32) -> LayerMask {
        LayerMask(self.0 | (1 << n))
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, n: u32) -> bool {
        self.0 & (1 << n) != 0
    }
}

/// One ray query answer. Produced fresh per wheel per tick, never cached.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RaycastResult {
    pub hit: bool,
    pub distance: f32,
    pub point: Option<Pos3>,
}

impl RaycastResult {
    pub fn miss() -> Self {
        Self { hit: false, distance: 0.0, point: None }
    }

    pub fn hit_at(distance: f32, point: Pos3) -> Self {
        Self { hit: true, distance, point: Some(point) }
    }

    /// Hit distance, `None` on a miss.
    pub fn contact_distance(&self) -> Option<f32> {
        self.hit.then_some(self.distance)
    }
}
