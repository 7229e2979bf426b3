//! User-facing activity log: the outcomes the workflow reports, newest first.

use chrono::{DateTime, Local};
use log::{error, info, warn};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        })
    }
}

/// Receives the messages the workflow wants the user to see.
pub trait ActivitySink: Send + Sync {
    fn log(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }
}

impl<S: ActivitySink + ?Sized> ActivitySink for Arc<S> {
    fn log(&self, level: Level, message: &str) {
        (**self).log(level, message);
    }
}

#[derive(Clone, Debug)]
pub struct ActivityEntry {
    pub level: Level,
    pub message: String,
    pub logged_at: DateTime<Local>,
}

impl fmt::Display for ActivityEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.logged_at.format("%H:%M:%S"),
            self.level,
            self.message
        )
    }
}

/// Keeps the most recent `max_logs` entries and mirrors each one to the `log` facade.
pub struct ActivityLog {
    max_logs: usize,
    entries: Mutex<VecDeque<ActivityEntry>>,
}

impl ActivityLog {
    pub fn new(max_logs: usize) -> Self {
        Self {
            max_logs: max_logs.max(1),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// Entries, newest first.
    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .cloned()
            .collect()
    }
}

impl ActivitySink for ActivityLog {
    fn log(&self, level: Level, message: &str) {
        let message = message.replace('\n', "; ");
        match level {
            Level::Info => info!("{}", message),
            Level::Warn => warn!("{}", message),
            Level::Error => error!("{}", message),
        }

        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.push_front(ActivityEntry {
            level,
            message,
            logged_at: Local::now(),
        });
        entries.truncate(self.max_logs);
    }
}
