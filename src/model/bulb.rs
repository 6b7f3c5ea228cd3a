use crate::model::team::Hsv;

/// Raw state read back from a light. Fields the device did not populate are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightReading {
    pub is_on: bool,
    pub hsv: Option<Hsv>,
    pub color_temp: Option<u16>,
    pub brightness: Option<u8>,
}

/// How an on-state bulb was lit when captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appearance {
    Hsv(Hsv),
    ColorTemp(u16),
    /// On, but the device reported neither a color nor a temperature.
    Unknown,
}

/// Snapshot of a bulb taken before an intervention. Deliberately not `Clone`:
/// it is handed to restore by value and is gone afterwards.
#[derive(Debug, PartialEq, Eq)]
pub enum BulbState {
    Off,
    On {
        appearance: Appearance,
        brightness: Option<u8>,
    },
}

impl From<LightReading> for BulbState {
    fn from(reading: LightReading) -> Self {
        if !reading.is_on {
            return BulbState::Off;
        }
        // HSV wins when a device reports both
        let appearance = match (reading.hsv, reading.color_temp) {
            (Some(hsv), _) => Appearance::Hsv(hsv),
            (None, Some(kelvin)) => Appearance::ColorTemp(kelvin),
            (None, None) => Appearance::Unknown,
        };
        BulbState::On {
            appearance,
            brightness: reading.brightness,
        }
    }
}
