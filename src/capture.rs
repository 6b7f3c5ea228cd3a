use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::error::DeviceResult;
use crate::light::LightDevice;
use crate::model::bulb::{Appearance, BulbState};

/// Snapshots a light before an intervention and puts it back afterwards.
#[derive(Clone)]
pub struct StateCapture {
    light: Arc<dyn LightDevice>,
}

impl StateCapture {
    pub fn new(light: Arc<dyn LightDevice>) -> Self {
        Self { light }
    }

    /// Read the light's current appearance. `None` when the device has no light
    /// capability or cannot be read; the failure is logged.
    #[instrument(level = "info", skip(self))]
    pub async fn capture(&self) -> Option<BulbState> {
        let reading = async {
            self.light.refresh().await?;
            self.light.read_state().await
        };
        match reading.await {
            Ok(reading) => {
                let state = BulbState::from(reading);
                info!(state = ?state, "Captured light state");
                Some(state)
            }
            Err(e) => {
                error!(error = %e, "Failed to capture light state");
                None
            }
        }
    }

    /// Put the light back the way `snapshot` found it. Never fails: this runs on cleanup
    /// paths, so errors are logged and dropped.
    #[instrument(level = "info", skip(self, snapshot))]
    pub async fn restore(&self, snapshot: Option<BulbState>) {
        let Some(state) = snapshot else {
            warn!("No captured light state; leaving light as is");
            return;
        };
        match self.apply(&state).await {
            Ok(()) => info!(state = ?state, "Restored light state"),
            Err(e) => error!(error = %e, state = ?state, "Failed to restore light state"),
        }
    }

    async fn apply(&self, state: &BulbState) -> DeviceResult<()> {
        match *state {
            BulbState::Off => self.light.turn_off().await,
            BulbState::On {
                appearance,
                brightness,
            } => {
                self.light.turn_on().await?;
                match appearance {
                    Appearance::Hsv(mut hsv) => {
                        // On these bulbs brightness is the value channel
                        if let Some(b) = brightness {
                            hsv.value = b;
                        }
                        self.light.set_hsv(hsv).await
                    }
                    Appearance::ColorTemp(kelvin) => self.light.set_color_temp(kelvin, brightness).await,
                    Appearance::Unknown => Ok(()),
                }
            }
        }
    }
}
