use serde::Deserialize;

use super::de::string_id;

/// Entry of `GET issuetype`.
#[derive(Debug, Deserialize, Clone)]
pub struct IssueType {
    #[serde(deserialize_with = "string_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subtask: bool,
    pub description: Option<String>,
}
