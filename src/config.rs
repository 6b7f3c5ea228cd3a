use std::path::Path;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::model::team::{Hsv, TeamConfig};
use crate::timing::Timing;

pub const DEFAULT_ESPN_BASE_URL: &str = "http://site.api.espn.com/apis/site/v2/sports";
pub const KASA_PORT: u16 = 9999;

/// What the process does once started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Watch every team's schedule forever.
    #[default]
    Monitor,
    /// Run one color-and-flash cycle for the first team, then exit.
    FlashTest,
}

impl std::str::FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monitor" => Ok(Mode::Monitor),
            "flash-test" | "test" => Ok(Mode::FlashTest),
            other => Err(ConfigError::Mode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulbConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    KASA_PORT
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mode: Mode,
    pub bulb: BulbConfig,
    pub espn_base_url: String,
    /// IANA zone used when logging kickoff times.
    pub display_timezone: String,
    pub timing: Timing,
    pub teams: Vec<TeamConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Monitor,
            bulb: BulbConfig {
                host: "192.168.1.222".to_string(),
                port: KASA_PORT,
            },
            espn_base_url: DEFAULT_ESPN_BASE_URL.to_string(),
            display_timezone: "America/New_York".to_string(),
            timing: Timing::default(),
            teams: default_teams(),
        }
    }
}

fn default_teams() -> Vec<TeamConfig> {
    vec![
        TeamConfig {
            label: "RAVENS".to_string(),
            name: "Baltimore Ravens".to_string(),
            team_id: "33".to_string(),
            sport_path: "football/nfl".to_string(),
            color: Hsv::new(280, 100, 100),
        },
        TeamConfig {
            label: "BUCKEYES".to_string(),
            name: "Ohio State Buckeyes".to_string(),
            team_id: "194".to_string(),
            sport_path: "football/college-football".to_string(),
            color: Hsv::new(348, 94, 73),
        },
    ]
}

impl Config {
    /// Load from the environment: `GAME_LIGHT_CONFIG` names a JSON file (defaults otherwise),
    /// `BULB_HOST` and `GAME_LIGHT_MODE` override single fields.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var("GAME_LIGHT_CONFIG").ok();
        let host = std::env::var("BULB_HOST").ok();
        let mode = std::env::var("GAME_LIGHT_MODE").ok();
        Self::from_sources(path.as_deref().map(Path::new), host, mode.as_deref())
    }

    pub fn from_sources(
        path: Option<&Path>,
        host_override: Option<String>,
        mode_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let body = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                info!(path = %path.display(), "Loaded config file");
                Self::from_json(&body)?
            }
            None => Self::default(),
        };

        if let Some(host) = host_override.filter(|h| !h.trim().is_empty()) {
            config.bulb.host = host;
        }
        if let Some(mode) = mode_override {
            config.mode = mode.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON config body without touching the environment.
    pub fn from_json(body: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(body)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.teams.is_empty() {
            return Err(ConfigError::NoTeams);
        }
        for team in &self.teams {
            team.color.validate().map_err(|reason| ConfigError::InvalidColor {
                label: team.label.clone(),
                reason,
            })?;
        }
        self.timing
            .validate()
            .map_err(|(field, value)| ConfigError::InvalidTiming { field, value })?;
        self.timezone()?;
        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.display_timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::Timezone(self.display_timezone.clone()))
    }
}
