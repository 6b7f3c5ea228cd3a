use std::path::PathBuf;

use thiserror::Error;

/// Result alias for schedule/score provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Result alias for light device commands.
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Errors raised while fetching or decoding game data.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] ureq::Error),
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no competition data in response")]
    MissingCompetition,
    #[error("invalid event date: {0}")]
    InvalidDate(String),
    #[error("fetch task failed: {0}")]
    Join(String),
}

/// Errors raised by a light device.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("device did not answer within {0:?}")]
    Timeout(std::time::Duration),
    #[error("malformed device payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("device does not appear to be a light")]
    NoLightModule,
    #[error("device rejected command (err_code {code}): {message}")]
    Rejected { code: i64, message: String },
}

/// Startup configuration errors. These are the only fatal errors in the process.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown timezone: {0}")]
    Timezone(String),
    #[error("team {label} has an invalid color: {reason}")]
    InvalidColor { label: String, reason: String },
    #[error("timing.{field} = {value} is longer than a year")]
    InvalidTiming { field: &'static str, value: u64 },
    #[error("no teams configured")]
    NoTeams,
    #[error("unknown mode: {0}")]
    Mode(String),
}
