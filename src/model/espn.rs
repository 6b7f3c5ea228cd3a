use serde::Deserialize;

/// `GET .../teams/{id}/schedule`
#[derive(Debug, Deserialize)]
pub struct ScheduleDocument {
    #[serde(default)]
    pub events: Vec<ScheduleEvent>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleEvent {
    pub id: Option<String>,
    pub date: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub competitions: Vec<Competition>,
}

/// `GET .../summary?event={id}`
#[derive(Debug, Deserialize)]
pub struct SummaryDocument {
    #[serde(default)]
    pub header: Option<SummaryHeader>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryHeader {
    #[serde(default)]
    pub competitions: Vec<Competition>,
}

/// Shared by both endpoints. The schedule endpoint sends scores as objects,
/// the summary endpoint as strings, so `score` stays untyped here.
#[derive(Debug, Deserialize)]
pub struct Competition {
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub competitors: Vec<Competitor>,
}

#[derive(Debug, Deserialize)]
pub struct Status {
    #[serde(rename = "type", default)]
    pub status_type: Option<StatusType>,
}

#[derive(Debug, Deserialize)]
pub struct StatusType {
    #[serde(default)]
    pub completed: bool,
    pub detail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Competitor {
    pub id: Option<String>,
    #[serde(default)]
    pub score: Option<serde_json::Value>,
}

impl Competition {
    pub fn completed(&self) -> bool {
        self.status
            .as_ref()
            .and_then(|s| s.status_type.as_ref())
            .map(|t| t.completed)
            .unwrap_or(false)
    }

    pub fn detail(&self) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|s| s.status_type.as_ref())
            .and_then(|t| t.detail.as_deref())
    }
}

impl Competitor {
    /// Cumulative score as a number. Accepts "14", 14 and {"value": 14.0, "displayValue": "14"}.
    /// A missing score counts as 0; anything else unreadable is `None`.
    pub fn points(&self) -> Option<u32> {
        match &self.score {
            None | Some(serde_json::Value::Null) => Some(0),
            Some(value) => score_value(value),
        }
    }
}

fn score_value(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::String(s) => s.trim().parse::<u32>().ok(),
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64))
            .and_then(|v| u32::try_from(v).ok()),
        serde_json::Value::Object(map) => map
            .get("value")
            .and_then(score_value)
            .or_else(|| map.get("displayValue").and_then(score_value)),
        _ => None,
    }
}
