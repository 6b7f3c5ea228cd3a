use futures::future::BoxFuture;

use crate::error::DeviceResult;
use crate::model::bulb::LightReading;
use crate::model::team::Hsv;

/// A network light. One handle is shared by every team; commands from overlapping
/// interventions interleave and the last one wins.
pub trait LightDevice: Send + Sync {
    /// Reconnect and reload device info. Fails with `DeviceError::NoLightModule`
    /// when the device has no light capability.
    fn refresh(&self) -> BoxFuture<'_, DeviceResult<()>>;
    fn turn_on(&self) -> BoxFuture<'_, DeviceResult<()>>;
    fn turn_off(&self) -> BoxFuture<'_, DeviceResult<()>>;
    /// Switch to color mode. Also powers the light on.
    fn set_hsv(&self, hsv: Hsv) -> BoxFuture<'_, DeviceResult<()>>;
    /// Switch to white mode. Also powers the light on.
    fn set_color_temp(&self, kelvin: u16, brightness: Option<u8>) -> BoxFuture<'_, DeviceResult<()>>;
    fn read_state(&self) -> BoxFuture<'_, DeviceResult<LightReading>>;
}
