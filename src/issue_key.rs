use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

// JIRA lets administrators raise the default 10-letter project key limit.
static ISSUE_KEY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+-[0-9]+$").expect("invalid issue key regex"));

/// An issue key such as `ABC-123`, always uppercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IssueKey(String);

impl IssueKey {
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let trimmed = text.trim();
        if !ISSUE_KEY_REGEX.is_match(trimmed) {
            return Err(ValidationError::InvalidIssueKey(text.to_string()));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Project part of the key: `ABC` for `ABC-123`.
    pub fn project(&self) -> &str {
        self.0.split_once('-').map(|(project, _)| project).unwrap_or(&self.0)
    }
}

impl FromStr for IssueKey {
    type Err = ValidationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IssueKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
