use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::error::{DeviceError, DeviceResult, ProviderError};
use crate::light::LightDevice;
use crate::model::game::GameSummary;
use crate::model::team::TeamConfig;
use crate::provider::GameInfoProvider;
use crate::timing::Timing;

/// Last known cumulative score for one watch session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreTracker {
    last: u32,
}

impl ScoreTracker {
    pub fn new(baseline: u32) -> Self {
        Self { last: baseline }
    }

    pub fn score(&self) -> u32 {
        self.last
    }

    /// Record a cumulative score. Returns the number of new points, if any.
    /// A lower score is a provider glitch and is ignored.
    pub fn observe(&mut self, score: u32) -> Option<u32> {
        if score > self.last {
            let delta = score - self.last;
            self.last = score;
            Some(delta)
        } else {
            if score < self.last {
                warn!(score, last = self.last, "Ignoring score decrease");
            }
            None
        }
    }
}

/// Polls one game until the provider says it is over, flashing the light for each score.
#[derive(Clone)]
pub struct ScoreWatcher {
    team: Arc<TeamConfig>,
    provider: Arc<dyn GameInfoProvider>,
    light: Arc<dyn LightDevice>,
    timing: Timing,
}

impl ScoreWatcher {
    pub fn new(
        team: Arc<TeamConfig>,
        provider: Arc<dyn GameInfoProvider>,
        light: Arc<dyn LightDevice>,
        timing: Timing,
    ) -> Self {
        Self {
            team,
            provider,
            light,
            timing,
        }
    }

    /// Watch `game_id` until it completes and return the final score. Poll failures are
    /// logged and retried; there is no overall timeout.
    #[instrument(level = "info", skip(self), fields(team = %self.team.label))]
    pub async fn watch(&self, game_id: &str, baseline: u32) -> u32 {
        info!("Monitoring game");
        let mut tracker = ScoreTracker::new(baseline);

        loop {
            let delay = match self.provider.game_summary(&self.team, game_id).await {
                Ok(summary) => {
                    self.record(&summary, &mut tracker).await;
                    if summary.completed {
                        info!(score = tracker.score(), "Provider reports game is final");
                        return tracker.score();
                    }
                    info!(
                        status = summary.detail.as_deref().unwrap_or("In Progress"),
                        score = tracker.score(),
                        "Game in progress"
                    );
                    self.timing.poll()
                }
                Err(ProviderError::MissingCompetition) => {
                    warn!("No competition data in summary; backing off");
                    self.timing.missing_data()
                }
                Err(e) => {
                    warn!(error = %e, "Failed to check game status");
                    self.timing.poll()
                }
            };
            sleep(delay).await;
        }
    }

    async fn record(&self, summary: &GameSummary, tracker: &mut ScoreTracker) {
        match summary.score_for(&self.team.team_id) {
            Some(Some(score)) => {
                if let Some(points) = tracker.observe(score) {
                    info!(points, score, "Team scored");
                    flash(
                        self.light.as_ref(),
                        &self.team,
                        i64::from(points),
                        self.timing.flash_pause(),
                    )
                    .await;
                }
            }
            Some(None) => warn!("Ignoring non-numeric score"),
            None => warn!(team_id = %self.team.team_id, "Team not listed among competitors"),
        }
    }
}

/// Blink the light `points` times: off, pause, on, pause. The bulb is left on in whatever
/// color it had. If the sequence fails part way the team color is reapplied on a
/// best-effort basis.
#[instrument(level = "info", skip(light, team), fields(team = %team.label))]
pub async fn flash(light: &dyn LightDevice, team: &TeamConfig, points: i64, pause: Duration) {
    if points <= 0 {
        warn!("Refusing to flash for non-positive points");
        return;
    }

    match flash_sequence(light, points, pause).await {
        Ok(()) => {}
        Err(DeviceError::NoLightModule) => {
            error!("Device does not appear to be a light; not flashing");
        }
        Err(e) => {
            error!(error = %e, "Flash sequence failed");
            if let Err(recovery) = light.set_hsv(team.color).await {
                warn!(error = %recovery, "Could not reapply team color after failed flash");
            }
        }
    }
}

async fn flash_sequence(light: &dyn LightDevice, points: i64, pause: Duration) -> DeviceResult<()> {
    light.refresh().await?;
    for _ in 0..points {
        light.turn_off().await?;
        sleep(pause).await;
        light.turn_on().await?;
        sleep(pause).await;
    }
    Ok(())
}
