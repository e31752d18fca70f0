// ==============================================================================
// drive_train.rs — DRIVEN WHEEL SELECTION
// ------------------------------------------------------------------------------
// Static lookup, resolved once when a vehicle is built:
//   FrontWheelDrive -> FL, FR
//   BackWheelDrive  -> BL, BR
//   FourWheelDrive  -> FL, FR, BL, BR
// Raw values that don't name a drive type fall back to four-wheel drive.
// Suspension, lateral grip and braking always use all four wheels; only
// propulsion is limited to the driven set.
// ==============================================================================

use serde::Serialize;

use crate::arcade_tire::WheelId;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize)]
pub enum DriveType {
    FrontWheelDrive,
    BackWheelDrive,
    #[default]
    FourWheelDrive,
}

const FRONT_PAIR: [WheelId; 2] = [WheelId::FL, WheelId::FR];
const BACK_PAIR: [WheelId; 2] = [WheelId::BL, WheelId::BR];

impl DriveType {
    /// Map a raw discriminant (0 = FWD, 1 = BWD, 2 = 4WD). Anything else is 4WD.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => DriveType::FrontWheelDrive,
            1 => DriveType::BackWheelDrive,
            _ => DriveType::FourWheelDrive,
        }
    }

    /// Parse a user-facing name. Unknown names are 4WD.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "fwd" | "front" | "frontwheeldrive" => DriveType::FrontWheelDrive,
            "bwd" | "rwd" | "back" | "rear" | "backwheeldrive" => DriveType::BackWheelDrive,
            _ => DriveType::FourWheelDrive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DriveType::FrontWheelDrive => "FWD",
            DriveType::BackWheelDrive => "BWD",
            DriveType::FourWheelDrive => "4WD",
        }
    }

    /// Wheels that receive propulsion. Always a full axle pair or all four.
    pub fn driven_wheels(&self) -> &'static [WheelId] {
        match self {
            DriveType::FrontWheelDrive => &FRONT_PAIR,
            DriveType::BackWheelDrive => &BACK_PAIR,
            DriveType::FourWheelDrive => &WheelId::ALL,
        }
    }

    pub fn drives(&self, wheel: WheelId) -> bool {
        self.driven_wheels().contains(&wheel)
    }
}
