// ==============================================================================
// debug_builders.rs — FORCE TRACE HOOK + DEBUG OVERLAY PRIMITIVES
// ------------------------------------------------------------------------------
// ForceTrace is the observability hook handed to VehicleFrame each tick:
// - on_ray():         every wheel ray (hit or miss)
// - on_force():       every force vector a model produced, before it is applied
// - on_wheel_basis(): world basis of every grounded suspended wheel
//
// NoTrace drops everything. DebugOverlay records serializable primitives:
// - DebugRay: wheel raycasts (green hit / red miss)
// - DebugForce: per-model force lines, coloured by ForceKind
// - DebugBasis: wheel right/up/forward axes
//
// This file is purely visualization scaffolding and must not feed back into the
// force model.
// ==============================================================================

use serde::Serialize;

use crate::arcade_tire::{p3, v3, ForceKind, Pos3, RaycastResult, Vec3, WheelId, WheelState};

pub trait ForceTrace {
    fn on_ray(&mut self, _wheel: WheelId, _origin: Pos3, _dir: Vec3, _max_distance: f32, _result: &RaycastResult) {}

    fn on_force(&mut self, _wheel: WheelId, _kind: ForceKind, _at: Pos3, _force: Vec3) {}

    fn on_wheel_basis(&mut self, _state: &WheelState) {}
}

/// Discards every trace event.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoTrace;

impl ForceTrace for NoTrace {}

impl<T: ForceTrace + ?Sized> ForceTrace for &mut T {
    fn on_ray(&mut self, wheel: WheelId, origin: Pos3, dir: Vec3, max_distance: f32, result: &RaycastResult) {
        (**self).on_ray(wheel, origin, dir, max_distance, result)
    }

    fn on_force(&mut self, wheel: WheelId, kind: ForceKind, at: Pos3, force: Vec3) {
        (**self).on_force(wheel, kind, at, force)
    }

    fn on_wheel_basis(&mut self, state: &WheelState) {
        (**self).on_wheel_basis(state)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct DebugRay {
    pub wheel: WheelId,
    pub origin: [f32; 3],
    pub direction: [f32; 3],
    pub length: f32,
    pub hit: Option<[f32; 3]>,
    pub color: [f32; 3],
}

#[derive(Clone, Debug, Serialize)]
pub struct DebugForce {
    pub wheel: WheelId,
    pub kind: ForceKind,
    pub origin: [f32; 3],
    pub force: [f32; 3],
    pub magnitude: f32,
    pub color: [f32; 3],
}

#[derive(Clone, Debug, Serialize)]
pub struct DebugBasis {
    pub wheel: WheelId,
    pub origin: [f32; 3],
    pub right: [f32; 3],
    pub up: [f32; 3],
    pub forward: [f32; 3],
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct DebugOverlay {
    pub rays: Vec<DebugRay>,
    pub forces: Vec<DebugForce>,
    pub bases: Vec<DebugBasis>,
}

fn force_color(kind: ForceKind) -> [f32; 3] {
    match kind {
        ForceKind::Suspension => [1.0, 1.0, 1.0], // white
        ForceKind::Lateral => [1.0, 0.9, 0.1],    // yellow
        ForceKind::Brake => [1.0, 0.1, 0.1],      // red
        ForceKind::Drive => [0.1, 0.9, 1.0],      // cyan
    }
}

impl DebugOverlay {
    pub fn clear(&mut self) {
        self.rays.clear();
        self.forces.clear();
        self.bases.clear();
    }

    pub fn forces_of(&self, kind: ForceKind) -> impl Iterator<Item = &DebugForce> + '_ {
        self.forces.iter().filter(move |f| f.kind == kind)
    }
}

impl ForceTrace for DebugOverlay {
    fn on_ray(&mut self, wheel: WheelId, origin: Pos3, dir: Vec3, max_distance: f32, result: &RaycastResult) {
        let (length, color) = if result.hit {
            (result.distance, [0.0, 1.0, 0.0]) // grounded
        } else {
            (max_distance, [1.0, 0.0, 0.0]) // airborne
        };

        self.rays.push(DebugRay {
            wheel,
            origin: p3(origin),
            direction: v3(dir),
            length,
            hit: result.point.map(p3),
            color,
        });
    }

    fn on_force(&mut self, wheel: WheelId, kind: ForceKind, at: Pos3, force: Vec3) {
        self.forces.push(DebugForce {
            wheel,
            kind,
            origin: p3(at),
            force: v3(force),
            magnitude: force.norm(),
            color: force_color(kind),
        });
    }

    fn on_wheel_basis(&mut self, state: &WheelState) {
        self.bases.push(DebugBasis {
            wheel: state.wheel,
            origin: p3(state.position),
            right: v3(state.right),
            up: v3(state.up),
            forward: v3(state.forward),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_records_and_clears() {
        let mut overlay = DebugOverlay::default();
        let origin = Pos3::new(1.0, 0.5, 0.0);
        let down = Vec3::new(0.0, -1.0, 0.0);

        overlay.on_ray(WheelId::FL, origin, down, 1.0, &RaycastResult::hit_at(0.4, Pos3::new(1.0, 0.1, 0.0)));
        overlay.on_ray(WheelId::FR, origin, down, 1.0, &RaycastResult::miss());
        overlay.on_force(WheelId::FL, ForceKind::Brake, origin, Vec3::new(0.0, 0.0, -3.0));

        assert_eq!(overlay.rays.len(), 2);
        assert_eq!(overlay.rays[0].length, 0.4);
        assert_eq!(overlay.rays[1].length, 1.0);
        assert!(overlay.rays[1].hit.is_none());
        assert_eq!(overlay.forces_of(ForceKind::Brake).count(), 1);
        assert_eq!(overlay.forces[0].magnitude, 3.0);

        let json = serde_json::to_string(&overlay).unwrap();
        assert!(json.contains("\"brake\""));

        overlay.clear();
        assert!(overlay.rays.is_empty() && overlay.forces.is_empty());
    }
}
