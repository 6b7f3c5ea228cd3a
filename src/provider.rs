use chrono::{DateTime, Utc};
use futures::future::BoxFuture;

use crate::error::ProviderResult;
use crate::model::game::{GameInfo, GameSummary};
use crate::model::team::TeamConfig;

/// Source of schedule and live score data.
pub trait GameInfoProvider: Send + Sync {
    /// The nearest game for `team` that kicked off less than the lookback horizon before `now`,
    /// or any later one. `None` when the schedule has nothing relevant.
    fn next_game<'a>(
        &'a self,
        team: &'a TeamConfig,
        now: DateTime<Utc>,
    ) -> BoxFuture<'a, ProviderResult<Option<GameInfo>>>;

    /// Live summary for one game.
    fn game_summary<'a>(
        &'a self,
        team: &'a TeamConfig,
        game_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<GameSummary>>;
}
