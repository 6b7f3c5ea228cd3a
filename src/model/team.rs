use serde::{Deserialize, Serialize};

/// Hue/saturation/value triple as the bulb understands it.
/// Hue is in degrees (0-360), saturation and value are percentages (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsv {
    pub hue: u16,
    pub saturation: u8,
    pub value: u8,
}

impl Hsv {
    pub const fn new(hue: u16, saturation: u8, value: u8) -> Self {
        Self { hue, saturation, value }
    }

    /// Check the triple is within the ranges a bulb accepts.
    pub fn validate(&self) -> Result<(), String> {
        if self.hue > 360 {
            return Err(format!("hue {} is above 360", self.hue));
        }
        if self.saturation > 100 {
            return Err(format!("saturation {} is above 100", self.saturation));
        }
        if self.value > 100 {
            return Err(format!("value {} is above 100", self.value));
        }
        Ok(())
    }
}

/// A monitored team. Built once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamConfig {
    /// Short tag used in log lines, e.g. "RAVENS".
    pub label: String,
    pub name: String,
    /// ESPN team id, e.g. "33".
    pub team_id: String,
    /// ESPN sport path, e.g. "football/nfl".
    pub sport_path: String,
    pub color: Hsv,
}
