//! Conversion between JIRA duration phrases (`1d 2h 3m`) and [`Duration`].

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::duration::Duration;
use crate::error::ValidationError;

pub const PHRASE_PATTERN: &str = r"^([0-9]+[dD] ?)?([0-9]+[hH] ?)?([0-9]+[mM])?$";

static PHRASE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(PHRASE_PATTERN).expect("invalid phrase regex"));

const HOURS_PER_DAY: u32 = 24;

/// Parses a duration phrase. Days become 24 hours each; minutes are kept as written.
///
/// The empty string matches the grammar and parses to zero.
pub fn parse_phrase(text: &str) -> Result<Duration, ValidationError> {
    let invalid = || ValidationError::InvalidDuration(text.to_string());
    let captures = PHRASE_REGEX.captures(text).ok_or_else(invalid)?;

    let number = |index: usize| -> Result<u32, ValidationError> {
        match captures.get(index) {
            Some(group) => group
                .as_str()
                .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == ' ')
                .parse::<u32>()
                .map_err(|_| invalid()),
            None => Ok(0),
        }
    };

    let days = number(1)?;
    let hours = number(2)?;
    let minutes = number(3)?;

    let hour = days
        .checked_mul(HOURS_PER_DAY)
        .and_then(|day_hours| day_hours.checked_add(hours))
        .ok_or_else(invalid)?;

    Ok(Duration::new(hour, minutes, 0))
}

/// Formats as `Xh Ym`, or `Ym` when there are no hours. Seconds are dropped.
pub fn format_duration(time: &Duration) -> String {
    if time.hour > 0 {
        format!("{}h {}m", time.hour, time.min)
    } else {
        format!("{}m", time.min)
    }
}

/// A validated duration phrase, ready to be sent as a work-log `timeSpent`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DurationPhrase(String);

impl DurationPhrase {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_duration(&self) -> Duration {
        // validated on construction
        parse_phrase(&self.0).unwrap_or_default()
    }
}

impl FromStr for DurationPhrase {
    type Err = ValidationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidDuration(text.to_string()));
        }
        parse_phrase(trimmed)?;
        Ok(Self(trimmed.to_string()))
    }
}

impl From<Duration> for DurationPhrase {
    fn from(time: Duration) -> Self {
        Self(format_duration(&time))
    }
}

impl fmt::Display for DurationPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
