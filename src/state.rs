use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::host::InputSource;

/// Latest controls for one vehicle. Axes are clamped to -1..1 on write.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputState {
    pub vertical: f32,   // throttle: -1 (reverse) .. 1 (forward)
    pub horizontal: f32, // steer: -1 (left) .. 1 (right)
    pub buttons: HashMap<String, bool>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_axes(&mut self, vertical: f32, horizontal: f32) {
        self.vertical = vertical.clamp(-1.0, 1.0);
        self.horizontal = horizontal.clamp(-1.0, 1.0);
    }

    pub fn set_button(&mut self, name: &str, pressed: bool) {
        self.buttons.insert(name.to_string(), pressed);
    }
}

impl InputSource for InputState {
    fn vertical(&self) -> f32 {
        self.vertical
    }

    fn horizontal(&self) -> f32 {
        self.horizontal
    }

    fn is_pressed(&self, button: &str) -> bool {
        self.buttons.get(button).copied().unwrap_or(false)
    }
}

/// Controls sampled once at the start of a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ControlSample {
    pub accel: f32,
    pub steer: f32,
    pub brake: bool,
}

impl ControlSample {
    pub fn read(input: &impl InputSource, brake_button: &str) -> Self {
        Self {
            accel: input.vertical(),
            steer: input.horizontal(),
            brake: input.is_pressed(brake_button),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VehicleSnapshot {
    pub id: String,
    pub tick: u64,
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub forward_speed: f32,
    pub steer_angle: f32, // radians, front wheels
    pub grounded_wheels: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub vehicles: Vec<VehicleSnapshot>,
}
