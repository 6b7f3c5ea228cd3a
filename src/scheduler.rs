use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use futures::FutureExt;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::capture::StateCapture;
use crate::light::LightDevice;
use crate::model::game::GameInfo;
use crate::model::team::TeamConfig;
use crate::provider::GameInfoProvider;
use crate::timing::{self, Clock, Timing};
use crate::watcher::ScoreWatcher;

/// What to do about the game a schedule query returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Nothing on the schedule.
    Idle,
    /// Trigger time is ahead; sleep `wait` first.
    Wait { game: GameInfo, wait: Duration },
    /// Trigger time has passed and the game is live.
    EngageNow { game: GameInfo },
    /// Trigger time has passed and the game is already over.
    Skip { game: GameInfo },
}

/// Decide how to handle `game` at `now`.
pub fn plan(game: Option<GameInfo>, now: DateTime<Utc>, timing: &Timing) -> Plan {
    let Some(game) = game else {
        return Plan::Idle;
    };
    let trigger = timing::trigger_time(game.kickoff, timing.lead());
    match timing::until(trigger, now) {
        Some(wait) => Plan::Wait { game, wait },
        None if !game.completed => Plan::EngageNow { game },
        None => Plan::Skip { game },
    }
}

/// Result of one scheduler iteration, after its trailing sleep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    Idle,
    Skipped { game_id: String },
    /// `final_score` is `None` if the watcher aborted before the game ended.
    Engaged { game_id: String, final_score: Option<u32> },
}

/// Shared collaborators every scheduler needs.
#[derive(Clone)]
pub struct Services {
    pub provider: Arc<dyn GameInfoProvider>,
    pub light: Arc<dyn LightDevice>,
    pub clock: Arc<dyn Clock>,
}

/// Control loop for one team: find the next game, color the light around it, repeat.
pub struct TeamScheduler {
    team: Arc<TeamConfig>,
    services: Services,
    timing: Timing,
    display_tz: Tz,
}

impl TeamScheduler {
    pub fn new(team: Arc<TeamConfig>, services: Services, timing: Timing, display_tz: Tz) -> Self {
        Self {
            team,
            services,
            timing,
            display_tz,
        }
    }

    /// Run forever.
    pub async fn run(self) {
        info!(team = %self.team.label, "Starting light automation");
        loop {
            self.tick().await;
        }
    }

    /// One iteration: query, decide, act, then sleep the idle or cooldown interval.
    #[instrument(level = "info", skip(self), fields(team = %self.team.label))]
    pub async fn tick(&self) -> Tick {
        let game = self.next_game().await;
        let tick = match plan(game, self.services.clock.now(), &self.timing) {
            Plan::Idle => {
                info!(hours = self.timing.idle().as_secs() / 3600, "No upcoming games found; sleeping");
                sleep(self.timing.idle()).await;
                return Tick::Idle;
            }
            Plan::Wait { mut game, mut wait } => loop {
                self.log_target(&game);
                info!(minutes = wait.as_secs() / 60, "Waiting until kickoff trigger");
                sleep(wait).await;
                match self.recheck().await {
                    Some(Plan::Wait { game: next, wait: next_wait }) => {
                        info!(game_id = %next.id, "Trigger moved; waiting again");
                        game = next;
                        wait = next_wait;
                    }
                    Some(Plan::EngageNow { game: fresh }) => break self.engage(&fresh).await,
                    Some(Plan::Skip { game: fresh }) => {
                        info!(game_id = %fresh.id, "Game finished while waiting; skipping");
                        break Tick::Skipped { game_id: fresh.id };
                    }
                    Some(Plan::Idle) => {
                        info!(game_id = %game.id, "Game no longer on the schedule; skipping");
                        break Tick::Skipped { game_id: game.id };
                    }
                    None => break self.engage(&game).await,
                }
            },
            Plan::EngageNow { game } => {
                self.log_target(&game);
                info!("Game in progress; turning team color on immediately");
                self.engage(&game).await
            }
            Plan::Skip { game } => {
                self.log_target(&game);
                info!("Found a game, but it is final; skipping");
                Tick::Skipped { game_id: game.id }
            }
        };
        sleep(self.timing.cooldown()).await;
        tick
    }

    /// Schedule query. Failures count as "no game".
    async fn next_game(&self) -> Option<GameInfo> {
        let now = self.services.clock.now();
        match self.services.provider.next_game(&self.team, now).await {
            Ok(game) => game,
            Err(e) => {
                error!(error = %e, "Error fetching schedule");
                None
            }
        }
    }

    /// After a long sleep, query the schedule again and plan from the fresh answer.
    /// `None` when the query failed, in which case the caller keeps the game it planned.
    async fn recheck(&self) -> Option<Plan> {
        let now = self.services.clock.now();
        match self.services.provider.next_game(&self.team, now).await {
            Ok(fresh) => Some(plan(fresh, self.services.clock.now(), &self.timing)),
            Err(e) => {
                warn!(error = %e, "Could not re-check schedule after waiting; proceeding");
                None
            }
        }
    }

    /// Capture, color, watch, restore. The restore runs however the watch ends.
    #[instrument(level = "info", skip(self, game), fields(game_id = %game.id))]
    async fn engage(&self, game: &GameInfo) -> Tick {
        let capture = StateCapture::new(Arc::clone(&self.services.light));
        let snapshot = capture.capture().await;

        self.apply_team_color().await;

        let watcher = ScoreWatcher::new(
            Arc::clone(&self.team),
            Arc::clone(&self.services.provider),
            Arc::clone(&self.services.light),
            self.timing,
        );
        let outcome = AssertUnwindSafe(watcher.watch(&game.id, 0)).catch_unwind().await;

        capture.restore(snapshot).await;

        let final_score = match outcome {
            Ok(score) => Some(score),
            Err(_) => {
                error!("Score watcher aborted; light state was restored");
                None
            }
        };
        Tick::Engaged {
            game_id: game.id.clone(),
            final_score,
        }
    }

    async fn apply_team_color(&self) {
        let light = &self.services.light;
        let result = async {
            light.refresh().await?;
            light.turn_on().await?;
            light.set_hsv(self.team.color).await
        }
        .await;
        match result {
            Ok(()) => info!(color = ?self.team.color, "Game time; team color set"),
            Err(e) => error!(error = %e, "Failed to set team color"),
        }
    }

    fn log_target(&self, game: &GameInfo) {
        let local = game.kickoff.with_timezone(&self.display_tz);
        info!(
            game = %game.name,
            game_id = %game.id,
            kickoff = %local.format("%a %b %e, %Y %-I:%M %p %Z"),
            completed = game.completed,
            "Target game"
        );
    }
}
