use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::de::optional_string_id;

/// Response of `POST issue/{key}/worklog`.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Worklog {
    #[serde(default, deserialize_with = "optional_string_id")]
    pub id: Option<String>,
    pub comment: Option<String>,
    pub started: Option<String>,
    pub time_spent: Option<String>,
    pub time_spent_seconds: Option<u64>,
}

/// Body of `POST issue/{key}/worklog`.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WorklogCreate {
    pub comment: String,
    pub started: String,
    pub time_spent: String,
}

impl WorklogCreate {
    pub fn new(time_spent: &str, comment: Option<&str>, started: DateTime<Utc>) -> Self {
        Self {
            comment: comment.unwrap_or_default().to_string(),
            started: format_started(started),
            time_spent: time_spent.to_string(),
        }
    }
}

/// JIRA expects `2013-04-01T09:30:00.000+0000`, not RFC 3339.
pub fn format_started(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string()
}
