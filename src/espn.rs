use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use futures::future::BoxFuture;
use tracing::{debug, info_span, instrument, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::model::espn::{ScheduleDocument, SummaryDocument};
use crate::model::game::{GameInfo, GameSummary};
use crate::model::team::TeamConfig;
use crate::provider::GameInfoProvider;

/// ESPN site API client. Blocking `ureq` calls run on tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct EspnClient {
    agent: ureq::Agent,
    base_url: String,
    lookback: TimeDelta,
}

impl EspnClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration, lookback: TimeDelta) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            lookback,
        }
    }

    pub fn schedule_url(&self, team: &TeamConfig) -> String {
        format!("{}/{}/teams/{}/schedule", self.base_url, team.sport_path, team.team_id)
    }

    pub fn summary_url(&self, team: &TeamConfig, game_id: &str) -> String {
        format!("{}/{}/summary?event={}", self.base_url, team.sport_path, game_id)
    }

    /// GET `url` on the blocking pool and return the body.
    async fn fetch(&self, url: String) -> ProviderResult<String> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || -> ProviderResult<String> {
            let response = {
                let _span = info_span!("espn_fetch", url = %url).entered();
                agent.get(&url).call()?
            };
            let mut body_reader = response.into_body();
            let body = body_reader.read_to_string()?;
            Ok(body)
        })
        .await
        .map_err(|e| ProviderError::Join(e.to_string()))?
    }
}

impl GameInfoProvider for EspnClient {
    fn next_game<'a>(
        &'a self,
        team: &'a TeamConfig,
        now: DateTime<Utc>,
    ) -> BoxFuture<'a, ProviderResult<Option<GameInfo>>> {
        Box::pin(async move {
            let body = self.fetch(self.schedule_url(team)).await?;
            parse_schedule(&body, now, self.lookback)
        })
    }

    fn game_summary<'a>(
        &'a self,
        team: &'a TeamConfig,
        game_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<GameSummary>> {
        Box::pin(async move {
            let body = self.fetch(self.summary_url(team, game_id)).await?;
            parse_summary(&body)
        })
    }
}

/// Pick the earliest event that kicked off after `now - lookback` from a schedule body.
/// Events without competitions, ids or a readable date are skipped.
#[instrument(level = "debug", skip(body), fields(bytes = body.len()))]
pub fn parse_schedule(
    body: &str,
    now: DateTime<Utc>,
    lookback: TimeDelta,
) -> ProviderResult<Option<GameInfo>> {
    let doc: ScheduleDocument = serde_json::from_str(body)?;
    let horizon = now - lookback;

    let mut best: Option<GameInfo> = None;
    for event in doc.events {
        let Some(competition) = event.competitions.first() else {
            continue;
        };
        let Some(id) = event.id else {
            continue;
        };
        let kickoff = match event.date.as_deref().map(parse_event_date) {
            Some(Ok(dt)) => dt,
            Some(Err(e)) => {
                warn!(error = %e, game_id = %id, "Skipping event with unreadable date");
                continue;
            }
            None => continue,
        };
        if kickoff <= horizon {
            continue;
        }
        if best.as_ref().is_some_and(|b| b.kickoff <= kickoff) {
            continue;
        }
        best = Some(GameInfo {
            kickoff,
            name: event.name.unwrap_or_else(|| "Unknown Game".to_string()),
            id,
            completed: competition.completed(),
        });
    }

    debug!(found = best.is_some(), "Parsed schedule");
    Ok(best)
}

/// Read completion, status detail and competitor scores from a summary body.
pub fn parse_summary(body: &str) -> ProviderResult<GameSummary> {
    let doc: SummaryDocument = serde_json::from_str(body)?;
    let competition = doc
        .header
        .and_then(|h| h.competitions.into_iter().next())
        .ok_or(ProviderError::MissingCompetition)?;

    let scores: HashMap<String, Option<u32>> = competition
        .competitors
        .iter()
        .filter_map(|c| c.id.clone().map(|id| (id, c.points())))
        .collect();

    Ok(GameSummary {
        completed: competition.completed(),
        detail: competition.detail().map(str::to_string),
        scores,
    })
}

/// ESPN dates are usually minute precision ("2024-09-06T00:20Z"), which is not RFC 3339.
pub fn parse_event_date(value: &str) -> ProviderResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%MZ")
                .map(|naive| chrono::TimeZone::from_utc_datetime(&Utc, &naive))
        })
        .map_err(|_| ProviderError::InvalidDate(value.to_string()))
}
