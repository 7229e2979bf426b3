//! Persistent time-logger configuration model and file-backed manager.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use jira_api::config::{DEFAULT_API_PATH, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_MS};
use jira_api::JiraConfig;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AppError, Result};

const USER_AGENT: &str = concat!("jira-time-logger/", env!("CARGO_PKG_VERSION"));

static URL_BASE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://.+$").expect("invalid url regex"));

fn default_url_api() -> String {
    DEFAULT_API_PATH.to_string()
}

fn default_main_task_close_transition() -> String {
    "Resolve Issue".to_string()
}

fn default_sub_task_close_transition() -> String {
    "Close Issue".to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_max_logs() -> usize {
    10
}

/// Connection and workflow settings for the JIRA server (the `jira` section on disk).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct JiraSettings {
    pub url_base: String,
    #[serde(default = "default_url_api")]
    pub url_api: String,
    pub username: String,
    /// Base64-obfuscated on disk; use [`JiraSettings::password`] to read it.
    #[serde(rename = "password")]
    pub encoded_password: String,
    #[serde(default = "default_main_task_close_transition")]
    pub main_task_close_transition: String,
    #[serde(default = "default_sub_task_close_transition")]
    pub sub_task_close_transition: String,
    pub sub_task_type_exclusions: Vec<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for JiraSettings {
    fn default() -> Self {
        Self {
            url_base: String::new(),
            url_api: default_url_api(),
            username: String::new(),
            encoded_password: String::new(),
            main_task_close_transition: default_main_task_close_transition(),
            sub_task_close_transition: default_sub_task_close_transition(),
            sub_task_type_exclusions: Vec::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl JiraSettings {
    /// Decoded password; an undecodable value is treated as unset.
    pub fn password(&self) -> String {
        BASE64_STANDARD
            .decode(self.encoded_password.trim())
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .unwrap_or_default()
    }

    pub fn set_password(&mut self, password: &str) {
        self.encoded_password = BASE64_STANDARD.encode(password);
    }
}

/// Local application settings (the `jtl` section on disk).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default = "default_max_logs")]
    pub max_logs: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            max_logs: default_max_logs(),
        }
    }
}

/// Represents the configuration persisted on disk. Missing keys take their defaults.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub jira: JiraSettings,
    pub jtl: AppSettings,
}

impl Config {
    /// True when every setting needed to reach the server is present.
    pub fn ready(&self) -> bool {
        let jira = &self.jira;
        !jira.url_base.trim().is_empty()
            && !jira.url_api.trim().is_empty()
            && !jira.username.trim().is_empty()
            && !jira.password().is_empty()
    }

    /// Checks the settings a user can get wrong, collecting every problem.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        if !URL_BASE_REGEX.is_match(self.jira.url_base.trim()) {
            problems.push(format!(
                "'{}' does not appear to be a valid URL (make sure it starts http(s))",
                self.jira.url_base
            ));
        }
        if self.jira.username.trim().is_empty() {
            problems.push("Username cannot be blank".to_string());
        }
        if self.jira.password().is_empty() {
            problems.push("Password cannot be blank".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::Config(problems.join("\n")))
        }
    }

    /// Client settings; connecting never takes longer than the whole request may.
    pub fn tracker_config(&self) -> JiraConfig {
        let timeout = Duration::from_millis(self.jira.timeout_ms.max(1));
        let connect_timeout = timeout.min(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));
        JiraConfig::new(
            self.jira.url_base.trim(),
            self.jira.username.trim(),
            self.jira.password(),
        )
        .with_api_path(self.jira.url_api.trim())
        .with_user_agent(USER_AGENT)
        .with_timeout(timeout)
        .with_connect_timeout(connect_timeout)
    }
}

/// Manages loading and saving of the configuration as JSON in the platform config directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Creates a manager bound to the platform-specific app config path.
    pub fn new() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("uk.co", "aaronbaker", "jira-time-logger")
            .ok_or_else(|| AppError::Config("could not determine config directory".to_string()))?;
        Ok(Self::at(dirs.config_dir().join("config.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads config from disk, falling back to defaults on read/parse errors.
    pub fn load(&self) -> Config {
        if !self.path.exists() {
            return Config::default();
        }
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                warn!("Failed to read {}: {}", self.path.display(), err);
                return Config::default();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|err| {
            warn!("Ignoring invalid config at {}: {}", self.path.display(), err);
            Config::default()
        })
    }

    /// Persists config to disk, creating parent directories when needed.
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(config)
            .map_err(|err| AppError::Config(err.to_string()))?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
