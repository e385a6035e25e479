// GitHub API response types.
// Defines the public event record and rate limit snapshot.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry from a user's public event feed.
///
/// Only the type tag and timestamp are typed; every other field GitHub sends
/// (`id`, `actor`, `repo`, `payload`, ...) is carried through untouched so the
/// JSON endpoint can hand back the upstream shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "type")]
    pub event_type: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl EventRecord {
    /// UTC calendar date the event happened on.
    pub fn date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    /// Upstream event id, if present.
    pub fn id(&self) -> Option<&str> {
        self.rest.get("id").and_then(Value::as_str)
    }

    /// `owner/name` of the repository the event belongs to.
    pub fn repo_name(&self) -> Option<&str> {
        self.rest
            .get("repo")
            .and_then(|repo| repo.get("name"))
            .and_then(Value::as_str)
    }

    /// Login of the acting user.
    pub fn actor_login(&self) -> Option<&str> {
        self.rest
            .get("actor")
            .and_then(|actor| actor.get("login"))
            .and_then(Value::as_str)
    }
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}

impl RateLimit {
    /// Reset time formatted for humans, or "unknown" if GitHub never told us.
    pub fn reset_display(&self) -> String {
        if self.reset == 0 {
            return "unknown".to_string();
        }
        DateTime::from_timestamp(self.reset as i64, 0)
            .map(|dt| dt.format("%H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}
