use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// The next relevant game for a team, as of one schedule query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameInfo {
    pub kickoff: DateTime<Utc>,
    pub name: String,
    pub id: String,
    pub completed: bool,
}

/// Live snapshot of one game.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameSummary {
    pub completed: bool,
    /// Provider status text such as "3rd Quarter" or "Final".
    pub detail: Option<String>,
    /// Cumulative score per competitor team id. `None` when the provider sent something
    /// that is not a number.
    pub scores: HashMap<String, Option<u32>>,
}

impl GameSummary {
    /// Score reading for one team, if the team is listed at all.
    pub fn score_for(&self, team_id: &str) -> Option<Option<u32>> {
        self.scores.get(team_id).copied()
    }
}
