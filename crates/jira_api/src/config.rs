use std::time::Duration;

pub const DEFAULT_API_PATH: &str = "/rest/api/2/";
pub const DEFAULT_USER_AGENT: &str = "jira-time-logger";
pub const DEFAULT_TIMEOUT_MS: u64 = 8_000;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Connection settings for a JIRA server using static basic-auth credentials.
#[derive(Clone)]
pub struct JiraConfig {
    pub base_url: String,
    pub api_path: String,
    pub username: String,
    pub password: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl JiraConfig {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_path: DEFAULT_API_PATH.to_string(),
            username: username.into(),
            password: password.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    pub fn with_api_path(mut self, api_path: impl Into<String>) -> Self {
        self.api_path = api_path.into();
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    pub fn with_timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    pub fn with_connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = duration;
        self
    }

    /// `https://jira.example.com` + `/rest/api/2/` with exactly one slash at each seam.
    pub fn api_root(&self) -> String {
        let path = self.api_path.trim_matches('/');
        if path.is_empty() {
            format!("{}/", self.base_url.trim_end_matches('/'))
        } else {
            format!("{}/{}/", self.base_url.trim_end_matches('/'), path)
        }
    }
}

impl std::fmt::Debug for JiraConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraConfig")
            .field("base_url", &self.base_url)
            .field("api_path", &self.api_path)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
