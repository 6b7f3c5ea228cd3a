use serde::Deserialize;

/// Reply to `{"system":{"get_sysinfo":{}}}`.
#[derive(Debug, Deserialize)]
pub struct SysinfoResponse {
    pub system: SystemBlock,
}

#[derive(Debug, Deserialize)]
pub struct SystemBlock {
    pub get_sysinfo: Sysinfo,
}

#[derive(Debug, Deserialize)]
pub struct Sysinfo {
    #[serde(default)]
    pub err_code: i64,
    pub err_msg: Option<String>,
    pub alias: Option<String>,
    pub model: Option<String>,
    #[serde(default)]
    pub is_color: u8,
    #[serde(default)]
    pub is_variable_color_temp: u8,
    /// Absent on plugs and switches.
    pub light_state: Option<LightState>,
}

#[derive(Debug, Deserialize)]
pub struct LightState {
    #[serde(default)]
    pub on_off: u8,
    #[serde(flatten)]
    pub channels: Channels,
    /// Populated instead of the top-level channels while the bulb is off.
    pub dft_on_state: Option<Channels>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Channels {
    pub hue: Option<u16>,
    pub saturation: Option<u8>,
    pub color_temp: Option<u16>,
    pub brightness: Option<u8>,
}

/// Reply to a `transition_light_state` command.
#[derive(Debug, Deserialize)]
pub struct TransitionResponse {
    #[serde(rename = "smartlife.iot.smartbulb.lightingservice")]
    pub service: TransitionBlock,
}

#[derive(Debug, Deserialize)]
pub struct TransitionBlock {
    pub transition_light_state: CommandStatus,
}

#[derive(Debug, Deserialize)]
pub struct CommandStatus {
    #[serde(default)]
    pub err_code: i64,
    pub err_msg: Option<String>,
}
