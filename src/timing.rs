use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Source of wall-clock time for schedulers.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Upper bound for any configured interval. Keeps date arithmetic far from chrono's range.
pub const MAX_INTERVAL_SECS: u64 = 366 * 24 * 60 * 60;

/// Intervals used by the scheduler and watcher. All values can be overridden in config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// How long before kickoff the team color goes on.
    pub lead_secs: u64,
    /// Games that kicked off within this window are still current.
    pub lookback_secs: u64,
    /// Sleep when the schedule has nothing.
    pub idle_secs: u64,
    /// Sleep after an intervention or a skipped game.
    pub cooldown_secs: u64,
    /// Delay between score polls.
    pub poll_secs: u64,
    /// Delay after a summary without a competition block.
    pub missing_data_secs: u64,
    /// Pause between the off and on halves of a flash.
    pub flash_pause_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            lead_secs: 5 * 60,
            lookback_secs: 6 * 60 * 60,
            idle_secs: 24 * 60 * 60,
            cooldown_secs: 60 * 60,
            poll_secs: 30,
            missing_data_secs: 60,
            flash_pause_ms: 500,
            request_timeout_secs: 10,
        }
    }
}

impl Timing {
    /// First interval above [`MAX_INTERVAL_SECS`], as `(field, value)`.
    pub fn validate(&self) -> Result<(), (&'static str, u64)> {
        let secs = [
            ("lead_secs", self.lead_secs),
            ("lookback_secs", self.lookback_secs),
            ("idle_secs", self.idle_secs),
            ("cooldown_secs", self.cooldown_secs),
            ("poll_secs", self.poll_secs),
            ("missing_data_secs", self.missing_data_secs),
            ("request_timeout_secs", self.request_timeout_secs),
        ];
        if let Some(&bad) = secs.iter().find(|(_, value)| *value > MAX_INTERVAL_SECS) {
            return Err(bad);
        }
        if self.flash_pause_ms > MAX_INTERVAL_SECS * 1000 {
            return Err(("flash_pause_ms", self.flash_pause_ms));
        }
        Ok(())
    }

    pub fn lead(&self) -> TimeDelta {
        delta_secs(self.lead_secs)
    }

    pub fn lookback(&self) -> TimeDelta {
        delta_secs(self.lookback_secs)
    }

    pub fn idle(&self) -> Duration {
        Duration::from_secs(self.idle_secs)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    pub fn poll(&self) -> Duration {
        Duration::from_secs(self.poll_secs)
    }

    pub fn missing_data(&self) -> Duration {
        Duration::from_secs(self.missing_data_secs)
    }

    pub fn flash_pause(&self) -> Duration {
        Duration::from_millis(self.flash_pause_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn delta_secs(secs: u64) -> TimeDelta {
    TimeDelta::try_seconds(i64::try_from(secs).unwrap_or(i64::MAX)).unwrap_or(TimeDelta::MAX)
}

/// The moment an intervention should begin for a game kicking off at `kickoff`.
pub fn trigger_time(kickoff: DateTime<Utc>, lead: TimeDelta) -> DateTime<Utc> {
    kickoff - lead
}

/// Time left until `target`, or `None` if it is not strictly in the future.
pub fn until(target: DateTime<Utc>, now: DateTime<Utc>) -> Option<Duration> {
    (target - now).to_std().ok().filter(|d| !d.is_zero())
}
