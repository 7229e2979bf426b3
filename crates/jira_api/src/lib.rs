//! Typed JIRA REST API client crate used by the time logger.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::JiraClient;
pub use config::JiraConfig;
pub use error::{Result, TrackerError};
pub use models::{
    CreatedIssue, Issue, IssueCreateRequest, IssueFields, IssueType, ServerInfo, Transition,
    TransitionDestination, TransitionList, Worklog, WorklogCreate,
};
