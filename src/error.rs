//! Configuration errors. Only raised while a vehicle is being built; the per-tick
//! force path is infallible.

use thiserror::Error;

use crate::arcade_tire::WheelId;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("curve `{name}` has no control points")]
    EmptyCurve { name: String },

    #[error("curve `{name}` key {index} is not finite")]
    NonFiniteKey { name: String, index: usize },

    #[error("curve `{name}` has two keys at input {input}")]
    DuplicateKey { name: String, input: f32 },

    #[error("`{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("`{field}` is not finite")]
    NonFinite { field: &'static str },

    #[error("wheel `{id}` is mounted more than once")]
    DuplicateWheel { id: WheelId },

    #[error("no vehicle registered as `{id}`")]
    UnknownVehicle { id: String },
}
