use serde::Deserialize;

/// Response of `GET serverInfo`; only used to prove the connection works.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub base_url: Option<String>,
    pub version: Option<String>,
    pub server_title: Option<String>,
}
