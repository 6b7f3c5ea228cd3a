use std::time::Duration;

use futures::future::BoxFuture;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, instrument};

use crate::error::{DeviceError, DeviceResult};
use crate::light::LightDevice;
use crate::model::bulb::LightReading;
use crate::model::kasa::{Sysinfo, SysinfoResponse, TransitionResponse};
use crate::model::team::Hsv;

const INITIAL_KEY: u8 = 171;
const MAX_REPLY_BYTES: usize = 64 * 1024;
const LIGHTING_SERVICE: &str = "smartlife.iot.smartbulb.lightingservice";

/// TP-Link Kasa smart bulb spoken to over the legacy IOT protocol (TCP, XOR autokey cipher).
/// Every command opens a fresh connection, so the handle holds no socket state.
#[derive(Debug, Clone)]
pub struct KasaBulb {
    host: String,
    port: u16,
    timeout: Duration,
}

impl KasaBulb {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Send one request and return the decrypted reply bytes.
    async fn exchange(&self, request: &serde_json::Value) -> DeviceResult<Vec<u8>> {
        let frame = encrypt(&serde_json::to_vec(request)?);
        let io = async {
            let mut stream = TcpStream::connect((self.host.as_str(), self.port)).await?;
            stream.write_all(&frame).await?;
            let len = stream.read_u32().await? as usize;
            if len > MAX_REPLY_BYTES {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("reply of {len} bytes exceeds limit"),
                ));
            }
            let mut buf = vec![0u8; len];
            stream.read_exact(&mut buf).await?;
            Ok(decrypt(&buf))
        };
        tokio::time::timeout(self.timeout, io)
            .await
            .map_err(|_| DeviceError::Timeout(self.timeout))?
            .map_err(DeviceError::from)
    }

    async fn sysinfo(&self) -> DeviceResult<Sysinfo> {
        let reply = self.exchange(&json!({ "system": { "get_sysinfo": {} } })).await?;
        let info = serde_json::from_slice::<SysinfoResponse>(&reply)?.system.get_sysinfo;
        if info.err_code != 0 {
            return Err(DeviceError::Rejected {
                code: info.err_code,
                message: info.err_msg.unwrap_or_default(),
            });
        }
        Ok(info)
    }

    #[instrument(level = "debug", skip(self), fields(host = %self.host))]
    async fn transition(&self, state: serde_json::Value) -> DeviceResult<()> {
        let mut request = serde_json::Map::new();
        request.insert(
            LIGHTING_SERVICE.to_string(),
            json!({ "transition_light_state": state }),
        );
        let reply = self.exchange(&serde_json::Value::Object(request)).await?;
        let status = serde_json::from_slice::<TransitionResponse>(&reply)?
            .service
            .transition_light_state;
        if status.err_code != 0 {
            return Err(DeviceError::Rejected {
                code: status.err_code,
                message: status.err_msg.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

impl LightDevice for KasaBulb {
    fn refresh(&self) -> BoxFuture<'_, DeviceResult<()>> {
        Box::pin(async move {
            let info = self.sysinfo().await?;
            if info.light_state.is_none() {
                return Err(DeviceError::NoLightModule);
            }
            debug!(alias = ?info.alias, model = ?info.model, "Refreshed bulb");
            Ok(())
        })
    }

    fn turn_on(&self) -> BoxFuture<'_, DeviceResult<()>> {
        // ignore_default 0 lets the bulb come back in its last color
        Box::pin(self.transition(json!({ "on_off": 1, "ignore_default": 0 })))
    }

    fn turn_off(&self) -> BoxFuture<'_, DeviceResult<()>> {
        Box::pin(self.transition(json!({ "on_off": 0, "ignore_default": 1 })))
    }

    fn set_hsv(&self, hsv: Hsv) -> BoxFuture<'_, DeviceResult<()>> {
        Box::pin(self.transition(json!({
            "on_off": 1,
            "ignore_default": 1,
            "hue": hsv.hue,
            "saturation": hsv.saturation,
            "brightness": hsv.value,
            "color_temp": 0,
        })))
    }

    fn set_color_temp(&self, kelvin: u16, brightness: Option<u8>) -> BoxFuture<'_, DeviceResult<()>> {
        let mut state = json!({ "on_off": 1, "ignore_default": 1, "color_temp": kelvin });
        if let Some(b) = brightness {
            state["brightness"] = json!(b);
        }
        Box::pin(self.transition(state))
    }

    fn read_state(&self) -> BoxFuture<'_, DeviceResult<LightReading>> {
        Box::pin(async move {
            let info = self.sysinfo().await?;
            reading_from_sysinfo(&info)
        })
    }
}

/// Turn a sysinfo reply into a reading. While the bulb is off the channel values live in
/// `dft_on_state`. Fixed-white and color-only bulbs may still echo a `color_temp`; it only
/// counts when the bulb reports a variable color temperature.
pub fn reading_from_sysinfo(info: &Sysinfo) -> DeviceResult<LightReading> {
    let state = info.light_state.as_ref().ok_or(DeviceError::NoLightModule)?;
    let is_on = state.on_off != 0;
    let channels = match (&state.dft_on_state, is_on) {
        (Some(default_on), false) => default_on,
        _ => &state.channels,
    };

    let color_temp = channels
        .color_temp
        .filter(|k| *k > 0 && info.is_variable_color_temp != 0);
    let hsv = match (info.is_color != 0, color_temp, channels.hue, channels.saturation) {
        (true, None, Some(hue), Some(saturation)) => Some(Hsv::new(
            hue,
            saturation,
            channels.brightness.unwrap_or(100),
        )),
        _ => None,
    };

    Ok(LightReading {
        is_on,
        hsv,
        color_temp,
        brightness: channels.brightness,
    })
}

/// Frame a payload: 4-byte big-endian length, then the XOR autokey ciphertext.
pub fn encrypt(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 4);
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    let mut key = INITIAL_KEY;
    for &byte in payload {
        key ^= byte;
        out.push(key);
    }
    out
}

/// Decrypt a ciphertext body (without its length prefix).
pub fn decrypt(cipher: &[u8]) -> Vec<u8> {
    let mut key = INITIAL_KEY;
    cipher
        .iter()
        .map(|&c| {
            let plain = key ^ c;
            key = c;
            plain
        })
        .collect()
}
