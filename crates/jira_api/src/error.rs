//! Error model used by JIRA API client operations.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackerError>;

/// Represents the failure conditions of a JIRA REST exchange: HTTP errors with the server's messages, rejected credentials, timeouts, connection problems, undecodable payloads and bad client configuration.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("http {status}: {message}")]
    Http { status: StatusCode, message: String },
    #[error("authentication error: {0}")]
    Authentication(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
    #[error("unexpected error: {0}")]
    Other(String),
}

impl TrackerError {
    /// Builds an HTTP error, preferring the messages JIRA puts in its error body.
    pub fn http(status: StatusCode, body: &str) -> Self {
        let message = extract_error_messages(body).unwrap_or_else(|| body.trim().to_string());
        TrackerError::Http { status, message }
    }

    /// True for failures caused by the transport rather than by the server's answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, TrackerError::Timeout(_) | TrackerError::Network(_))
    }
}

impl From<reqwest::Error> for TrackerError {
    /// Converts reqwest errors into semantic TrackerError variants.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TrackerError::Timeout(err.to_string())
        } else if err.is_status() {
            let status = err.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            TrackerError::Http {
                status,
                message: err.to_string(),
            }
        } else if err.is_connect() {
            TrackerError::Network(err.to_string())
        } else if err.is_decode() {
            TrackerError::Serialization(err.to_string())
        } else {
            TrackerError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Serialization(err.to_string())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    error_messages: Vec<String>,
    #[serde(default)]
    errors: serde_json::Map<String, serde_json::Value>,
}

/// Flattens `{"errorMessages": [...], "errors": {"field": "msg"}}` into one line.
fn extract_error_messages(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let mut messages = parsed.error_messages;
    for (field, value) in parsed.errors {
        match value.as_str() {
            Some(text) => messages.push(format!("{field}: {text}")),
            None => messages.push(format!("{field}: {value}")),
        }
    }
    if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_uses_jira_error_messages() {
        let body = r#"{"errorMessages":["Issue does not exist"],"errors":{"timeSpent":"Invalid time duration entered."}}"#;
        let err = TrackerError::http(StatusCode::BAD_REQUEST, body);
        assert_eq!(
            err.to_string(),
            "http 400 Bad Request: Issue does not exist; timeSpent: Invalid time duration entered."
        );
    }

    #[test]
    fn http_error_falls_back_to_raw_body() {
        let err = TrackerError::http(StatusCode::BAD_GATEWAY, "  upstream down \n");
        match err {
            TrackerError::Http { status, message } => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn only_timeouts_and_network_errors_are_transport_failures() {
        assert!(TrackerError::Timeout("8s".into()).is_transport());
        assert!(TrackerError::Network("refused".into()).is_transport());
        assert!(!TrackerError::Authentication("401".into()).is_transport());
    }
}
