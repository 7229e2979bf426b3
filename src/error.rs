//! Error taxonomy of the time logger.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Input rejected before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("'{0}' does not appear to be a valid JIRA time phrase")]
    InvalidDuration(String),
    #[error("'{0}' does not appear to be a valid JIRA issue key")]
    InvalidIssueKey(String),
    #[error("There is no time to log")]
    NothingToLog,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", join_messages(.0))]
    Validation(Vec<ValidationError>),
    /// A work-log or subtask request did not return an identifier.
    #[error("{0}")]
    Submission(String),
    #[error("Could not load subtask types from JIRA!")]
    SubtaskTypesUnavailable,
    #[error("JIRA is not configured; run `jtl configure` first")]
    ConfigNotReady,
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Tracker(#[from] jira_api::TrackerError),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(vec![err])
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
