//! Log-time workflow: resolves the target issue, submits the work log, optionally
//! closes the issue and keeps the session totals.

use log::debug;

use crate::activity::ActivitySink;
use crate::clock::Clock;
use crate::duration::{Duration, RoundTo};
use crate::error::{AppError, Result, ValidationError};
use crate::issue_key::IssueKey;
use crate::phrase::{format_duration, DurationPhrase};
use crate::tracker::TrackerApi;

const LOG_MAX_SUMMARY_LENGTH: usize = 20;
const TIME_HOUR_LIMIT: u32 = 10;

/// Transition names used to close a logged issue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloseTransitions {
    pub main_task: String,
    pub sub_task: String,
}

impl Default for CloseTransitions {
    fn default() -> Self {
        Self {
            main_task: "Resolve Issue".to_string(),
            sub_task: "Close Issue".to_string(),
        }
    }
}

/// A validated log-time request.
#[derive(Clone, Debug)]
pub struct LogRequest {
    pub time: DurationPhrase,
    pub issue: IssueKey,
    /// Subtask type name; `None` logs against the issue itself.
    pub subtask: Option<String>,
    pub close: bool,
    pub description: Option<String>,
    /// Summary already shown for the issue, used in the success message.
    pub summary: Option<String>,
}

impl LogRequest {
    pub fn new(time: DurationPhrase, issue: IssueKey) -> Self {
        Self {
            time,
            issue,
            subtask: None,
            close: false,
            description: None,
            summary: None,
        }
    }

    pub fn with_subtask(mut self, subtask: impl Into<String>) -> Self {
        self.subtask = Some(subtask.into());
        self
    }

    pub fn with_close(mut self, close: bool) -> Self {
        self.close = close;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}

/// Raw user input for a submission.
#[derive(Clone, Debug, Default)]
pub struct LogForm {
    pub issue: String,
    /// Manual duration phrase; `None` logs the clock's time.
    pub manual_time: Option<String>,
    pub subtask: Option<String>,
    pub close: bool,
    pub description: Option<String>,
    pub summary: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    TransitionNotFound,
    TransitionFailed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogOutcome {
    pub logged: Duration,
    /// Issue the work log was recorded against.
    pub target: IssueKey,
    pub worklog_id: String,
    pub close: Option<CloseOutcome>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResetReport {
    pub dropped: Duration,
    /// The clock ran long enough that this is probably a new working day.
    pub looks_like_new_day: bool,
}

fn truncate_summary(summary: &str) -> String {
    if summary.chars().count() > LOG_MAX_SUMMARY_LENGTH {
        let head: String = summary.chars().take(LOG_MAX_SUMMARY_LENGTH).collect();
        format!("{head}...")
    } else {
        summary.to_string()
    }
}

/// Summary suffix for a success message, unless the summary is empty, already
/// truncated or just repeats the key.
fn summary_note(summary: Option<&str>, issue: &IssueKey) -> Option<String> {
    let summary = summary?.trim();
    if summary.is_empty() || summary.contains(issue.as_str()) || summary.contains("...") {
        return None;
    }
    Some(truncate_summary(summary))
}

pub struct TimeLogger<T, S> {
    tracker: T,
    activity: S,
    clock: Clock,
    logged_total: Duration,
    close: CloseTransitions,
}

impl<T: TrackerApi, S: ActivitySink> TimeLogger<T, S> {
    pub fn new(tracker: T, activity: S, close: CloseTransitions) -> Self {
        Self {
            tracker,
            activity,
            clock: Clock::new(),
            logged_total: Duration::ZERO,
            close,
        }
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    pub fn activity(&self) -> &S {
        &self.activity
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn logged_total(&self) -> Duration {
        self.logged_total
    }

    /// Logged total plus the unlogged clock time, seconds ignored.
    pub fn day_grand_total(&self) -> Duration {
        let unlogged = self.clock.get_time(None);
        let mut total = self.logged_total + Duration::new(unlogged.hour, unlogged.min, 0);
        total.sec = 0;
        total
    }

    /// Validates the form, logs the resulting time and settles the clock.
    ///
    /// Every validation problem is reported at once. A manual entry is deducted from
    /// the clock afterwards; the clock's own time is reset instead.
    pub async fn submit(&mut self, form: &LogForm) -> Result<LogOutcome> {
        let mut problems = Vec::new();

        let issue = IssueKey::parse(&form.issue).map_err(|err| problems.push(err)).ok();

        let time = match form.manual_time.as_deref() {
            Some(manual) => manual.parse::<DurationPhrase>().map_err(|err| problems.push(err)).ok(),
            None => Some(DurationPhrase::from(self.clock.get_time(Some(RoundTo::Minute)))),
        };
        if time.as_ref().is_some_and(|time| time.to_duration().is_zero()) {
            problems.push(ValidationError::NothingToLog);
        }

        let (Some(issue), Some(time), true) = (issue, time, problems.is_empty()) else {
            let err = AppError::Validation(problems);
            self.activity.error(&err.to_string());
            return Err(err);
        };

        let mut request = LogRequest::new(time, issue).with_close(form.close);
        if let Some(subtask) = form.subtask.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            request = request.with_subtask(subtask);
        }
        if let Some(description) = form.description.as_deref() {
            request = request.with_description(description);
        }
        if let Some(summary) = form.summary.as_deref() {
            request = request.with_summary(summary);
        }

        let outcome = self.log_time(&request).await?;
        if form.manual_time.is_some() {
            self.deduct_time(&outcome.logged);
        } else {
            self.clock.reset();
        }
        Ok(outcome)
    }

    /// Logs `request.time` against the issue or its subtask, then optionally closes it.
    ///
    /// Nothing is added to the logged total unless the work log was accepted. A failed
    /// close is only a warning.
    pub async fn log_time(&mut self, request: &LogRequest) -> Result<LogOutcome> {
        let time = &request.time;
        let issue = &request.issue;

        let Some(subtask_type) = request.subtask.as_deref() else {
            let worklog_id = self.submit_worklog(request, issue).await?;

            let mut notification = format!("{time} was successfully logged against {issue}");
            if let Some(note) = summary_note(request.summary.as_deref(), issue) {
                notification.push_str(&format!(" ({note})"));
            }
            self.activity.info(&notification);

            let close = if request.close {
                let transition = self.close.main_task.clone();
                Some(self.resolve_close_issue(issue, &transition).await)
            } else {
                None
            };
            return Ok(self.record(request, issue.clone(), worklog_id, close));
        };

        let main_issue = match self.tracker.get_parent(issue).await {
            Some(parent) => {
                let Ok(parent_key) = IssueKey::parse(&parent.key) else {
                    return Err(self.fail(format!(
                        "Failed to log {time} against {issue}: JIRA returned an unusable parent key '{}'",
                        parent.key
                    )));
                };
                let mut notification = format!("{issue} is a sub-task of {parent_key}");
                if let Some(summary) = parent.summary.as_deref().filter(|s| !s.is_empty()) {
                    notification.push_str(&format!(" ({})", truncate_summary(summary)));
                }
                self.activity.info(&notification);
                parent_key
            }
            None => issue.clone(),
        };

        let subtask = match self.tracker.get_issue_subtask(&main_issue, subtask_type).await {
            Some(existing) => existing,
            None => {
                let Some(created) = self.tracker.create_subtask(&main_issue, subtask_type).await else {
                    return Err(self.fail(format!(
                        "Failed to log {time} against {issue}: no subtask key was returned by JIRA!"
                    )));
                };
                self.activity.info(&format!(
                    "{subtask_type} sub-task ({created}) was created against {main_issue}"
                ));
                created
            }
        };

        let worklog_id = self.submit_worklog(request, &subtask).await?;
        self.activity.info(&format!(
            "{time} was successfully logged against {subtask_type} of {main_issue}"
        ));

        let close = if request.close {
            let transition = self.close.sub_task.clone();
            Some(self.resolve_close_issue(&subtask, &transition).await)
        } else {
            None
        };
        Ok(self.record(request, subtask, worklog_id, close))
    }

    /// Applies the named transition to `issue`. Failures are reported but never fatal.
    pub async fn resolve_close_issue(&self, issue: &IssueKey, transition: &str) -> CloseOutcome {
        let Some(transition_id) = self.tracker.get_transition_id(issue, transition).await else {
            self.activity.warn(&format!(
                "Could not find {transition} transition in JIRA!\nIt's likely that the issue is already resolved/closed."
            ));
            return CloseOutcome::TransitionNotFound;
        };

        if !self.tracker.transition_issue(issue, &transition_id).await {
            self.activity.warn(&format!("Could not resolve/close {issue} in JIRA!"));
            return CloseOutcome::TransitionFailed;
        }

        self.activity.info(&format!("{issue} was successfully resolved/closed"));
        CloseOutcome::Closed
    }

    pub fn add_to_logged_total(&mut self, time: Duration) {
        self.logged_total = self.logged_total + time;
    }

    /// Zeroes the logged total and returns what was dropped.
    pub fn reset_logged_total(&mut self) -> Duration {
        let dropped = std::mem::take(&mut self.logged_total);
        if dropped.min > 0 || dropped.hour > 0 {
            self.activity.info(&format!(
                "The total logged time has been reset ({} dropped)",
                format_duration(&dropped)
            ));
        }
        dropped
    }

    /// Restarts the clock from zero.
    pub fn reset_time(&self) -> ResetReport {
        let dropped = self.clock.get_time(None);
        self.clock.restart();
        if dropped.min > 0 || dropped.hour > 0 {
            self.activity.info(&format!(
                "The accrued time has been reset ({} dropped)",
                format_duration(&dropped)
            ));
        }
        ResetReport {
            dropped,
            looks_like_new_day: dropped.hour >= TIME_HOUR_LIMIT,
        }
    }

    pub fn deduct_time(&self, time: &Duration) {
        self.clock.deduct(time);
    }

    async fn submit_worklog(&self, request: &LogRequest, target: &IssueKey) -> Result<String> {
        let description = request.description.as_deref().filter(|text| !text.trim().is_empty());
        match self.tracker.log_time(&request.time, target, description).await {
            Some(id) => Ok(id),
            None => Err(self.fail(format!(
                "Failed to log {} against {}: no work log was returned by JIRA!",
                request.time, request.issue
            ))),
        }
    }

    fn fail(&self, message: String) -> AppError {
        self.activity.error(&message);
        AppError::Submission(message)
    }

    fn record(
        &mut self,
        request: &LogRequest,
        target: IssueKey,
        worklog_id: String,
        close: Option<CloseOutcome>,
    ) -> LogOutcome {
        let logged = request.time.to_duration();
        self.add_to_logged_total(logged);
        debug!("Work log {} recorded against {}", worklog_id, target);
        LogOutcome {
            logged,
            target,
            worklog_id,
            close,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::Level;
    use crate::tracker::{IssueSummary, TypeFilter, TypeMap};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeTracker {
        calls: Mutex<Vec<String>>,
        parent: Option<IssueSummary>,
        existing_subtask: Option<&'static str>,
        created_subtask: Option<&'static str>,
        worklog_id: Option<&'static str>,
        transition_id: Option<&'static str>,
        transition_ok: bool,
    }

    impl FakeTracker {
        fn accepting() -> Self {
            Self {
                worklog_id: Some("10001"),
                transition_id: Some("5"),
                transition_ok: true,
                ..Self::default()
            }
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn key(text: &str) -> IssueKey {
        IssueKey::parse(text).unwrap()
    }

    #[async_trait]
    impl TrackerApi for FakeTracker {
        async fn test_connection(&self) -> bool {
            self.record("test_connection".into());
            true
        }

        async fn get_issue_summary(&self, issue: &IssueKey) -> Option<IssueSummary> {
            self.record(format!("get_issue_summary {issue}"));
            None
        }

        async fn get_parent(&self, issue: &IssueKey) -> Option<IssueSummary> {
            self.record(format!("get_parent {issue}"));
            self.parent.clone()
        }

        async fn get_issue_subtask(&self, issue: &IssueKey, type_name: &str) -> Option<IssueKey> {
            self.record(format!("get_issue_subtask {issue} {type_name}"));
            self.existing_subtask.map(key)
        }

        async fn create_subtask(&self, parent: &IssueKey, type_name: &str) -> Option<IssueKey> {
            self.record(format!("create_subtask {parent} {type_name}"));
            self.created_subtask.map(key)
        }

        async fn log_time(
            &self,
            time: &DurationPhrase,
            issue: &IssueKey,
            description: Option<&str>,
        ) -> Option<String> {
            match description {
                Some(text) => self.record(format!("log_time {time} {issue} {text}")),
                None => self.record(format!("log_time {time} {issue}")),
            }
            self.worklog_id.map(str::to_string)
        }

        async fn get_transition_id(&self, issue: &IssueKey, transition: &str) -> Option<String> {
            self.record(format!("get_transition_id {issue} {transition}"));
            self.transition_id.map(str::to_string)
        }

        async fn transition_issue(&self, issue: &IssueKey, transition_id: &str) -> bool {
            self.record(format!("transition_issue {issue} {transition_id}"));
            self.transition_ok
        }

        async fn fetch_issue_types(&self, filter: TypeFilter) -> Option<TypeMap> {
            self.record(format!("fetch_issue_types {filter:?}"));
            None
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        entries: Mutex<Vec<(Level, String)>>,
    }

    impl ActivitySink for RecordingSink {
        fn log(&self, level: Level, message: &str) {
            self.entries.lock().unwrap().push((level, message.to_string()));
        }
    }

    impl RecordingSink {
        fn messages(&self, level: Level) -> Vec<String> {
            self.entries
                .lock()
                .unwrap()
                .iter()
                .filter(|(entry_level, _)| *entry_level == level)
                .map(|(_, message)| message.clone())
                .collect()
        }
    }

    fn logger(tracker: FakeTracker) -> TimeLogger<FakeTracker, RecordingSink> {
        TimeLogger::new(tracker, RecordingSink::default(), CloseTransitions::default())
    }

    fn request(time: &str, issue: &str) -> LogRequest {
        LogRequest::new(time.parse().unwrap(), key(issue))
    }

    #[tokio::test]
    async fn logs_main_issue_and_adds_to_total() {
        let mut logger = logger(FakeTracker::accepting());

        let outcome = logger.log_time(&request("1h", "ABC-1")).await.unwrap();

        assert_eq!(logger.tracker().calls(), vec!["log_time 1h ABC-1"]);
        assert_eq!(outcome.target, key("ABC-1"));
        assert_eq!(outcome.worklog_id, "10001");
        assert_eq!(outcome.close, None);
        assert_eq!(logger.logged_total(), Duration::new(1, 0, 0));
        assert_eq!(
            logger.activity().messages(Level::Info),
            vec!["1h was successfully logged against ABC-1"]
        );
    }

    #[tokio::test]
    async fn creates_missing_subtask_before_logging() {
        let mut logger = logger(FakeTracker {
            created_subtask: Some("ABC-7"),
            ..FakeTracker::accepting()
        });

        let outcome = logger
            .log_time(&request("30m", "ABC-1").with_subtask("Triaging"))
            .await
            .unwrap();

        assert_eq!(
            logger.tracker().calls(),
            vec![
                "get_parent ABC-1",
                "get_issue_subtask ABC-1 Triaging",
                "create_subtask ABC-1 Triaging",
                "log_time 30m ABC-7",
            ]
        );
        assert_eq!(outcome.target, key("ABC-7"));
        assert_eq!(
            logger.activity().messages(Level::Info),
            vec![
                "Triaging sub-task (ABC-7) was created against ABC-1",
                "30m was successfully logged against Triaging of ABC-1",
            ]
        );
    }

    #[tokio::test]
    async fn reuses_existing_subtask_of_parent() {
        let mut logger = logger(FakeTracker {
            parent: Some(IssueSummary {
                key: "ABC-1".into(),
                summary: Some("A rather long parent issue summary".into()),
                description: None,
            }),
            existing_subtask: Some("ABC-3"),
            ..FakeTracker::accepting()
        });

        let outcome = logger
            .log_time(&request("1h", "ABC-2").with_subtask("Code Review"))
            .await
            .unwrap();

        assert_eq!(
            logger.tracker().calls(),
            vec!["get_parent ABC-2", "get_issue_subtask ABC-1 Code Review", "log_time 1h ABC-3"]
        );
        assert_eq!(outcome.target, key("ABC-3"));
        assert_eq!(
            logger.activity().messages(Level::Info)[0],
            "ABC-2 is a sub-task of ABC-1 (A rather long parent...)"
        );
    }

    #[tokio::test]
    async fn unusable_parent_key_is_reported() {
        let mut logger = logger(FakeTracker {
            parent: Some(IssueSummary {
                key: "not a key".into(),
                summary: None,
                description: None,
            }),
            existing_subtask: Some("ABC-3"),
            ..FakeTracker::accepting()
        });

        let err = logger
            .log_time(&request("1h", "ABC-2").with_subtask("Triaging"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Submission(_)));
        assert_eq!(logger.tracker().calls(), vec!["get_parent ABC-2"]);
        assert_eq!(logger.logged_total(), Duration::ZERO);
        assert_eq!(
            logger.activity().messages(Level::Error),
            vec!["Failed to log 1h against ABC-2: JIRA returned an unusable parent key 'not a key'"]
        );
    }

    #[tokio::test]
    async fn failed_subtask_creation_aborts_without_logging() {
        let mut logger = logger(FakeTracker::accepting());

        let err = logger
            .log_time(&request("1h", "ABC-1").with_subtask("Triaging"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Submission(_)));
        assert!(!logger.tracker().calls().iter().any(|call| call.starts_with("log_time")));
        assert_eq!(logger.logged_total(), Duration::ZERO);
        assert_eq!(
            logger.activity().messages(Level::Error),
            vec!["Failed to log 1h against ABC-1: no subtask key was returned by JIRA!"]
        );
    }

    #[tokio::test]
    async fn rejected_work_log_leaves_total_unchanged() {
        let mut logger = logger(FakeTracker::default());

        let err = logger.log_time(&request("2h", "ABC-1").with_close(true)).await.unwrap_err();

        assert!(matches!(err, AppError::Submission(_)));
        assert_eq!(logger.tracker().calls(), vec!["log_time 2h ABC-1"]);
        assert_eq!(logger.logged_total(), Duration::ZERO);
    }

    #[tokio::test]
    async fn missing_close_transition_still_counts_the_log() {
        let mut logger = logger(FakeTracker {
            transition_id: None,
            ..FakeTracker::accepting()
        });

        let outcome = logger.log_time(&request("45m", "ABC-1").with_close(true)).await.unwrap();

        assert_eq!(outcome.close, Some(CloseOutcome::TransitionNotFound));
        assert_eq!(logger.logged_total(), Duration::new(0, 45, 0));
        assert_eq!(logger.activity().messages(Level::Warn).len(), 1);
        assert!(logger.activity().messages(Level::Warn)[0].contains("Resolve Issue"));
    }

    #[tokio::test]
    async fn failed_transition_is_a_warning() {
        let mut logger = logger(FakeTracker {
            transition_ok: false,
            ..FakeTracker::accepting()
        });

        let outcome = logger.log_time(&request("1h", "ABC-1").with_close(true)).await.unwrap();

        assert_eq!(outcome.close, Some(CloseOutcome::TransitionFailed));
        assert_eq!(logger.logged_total(), Duration::new(1, 0, 0));
        assert_eq!(
            logger.activity().messages(Level::Warn),
            vec!["Could not resolve/close ABC-1 in JIRA!"]
        );
    }

    #[tokio::test]
    async fn subtask_close_uses_subtask_transition() {
        let mut logger = logger(FakeTracker {
            existing_subtask: Some("ABC-3"),
            ..FakeTracker::accepting()
        });

        let outcome = logger
            .log_time(&request("1h", "ABC-1").with_subtask("Triaging").with_close(true))
            .await
            .unwrap();

        assert_eq!(outcome.close, Some(CloseOutcome::Closed));
        let calls = logger.tracker().calls();
        assert!(calls.contains(&"get_transition_id ABC-3 Close Issue".to_string()));
        assert!(calls.contains(&"transition_issue ABC-3 5".to_string()));
    }

    #[tokio::test]
    async fn logging_never_fetches_issue_types() {
        let mut logger = logger(FakeTracker {
            created_subtask: Some("ABC-9"),
            ..FakeTracker::accepting()
        });

        logger
            .log_time(&request("1h", "ABC-1").with_subtask("Triaging").with_close(true))
            .await
            .unwrap();

        assert!(!logger.tracker().calls().iter().any(|call| call.starts_with("fetch_issue_types")));
    }

    #[tokio::test]
    async fn summary_is_truncated_once() {
        let mut logger = logger(FakeTracker::accepting());

        logger
            .log_time(&request("1h", "ABC-1").with_summary("Investigate flaky login tests"))
            .await
            .unwrap();
        logger
            .log_time(&request("1h", "ABC-1").with_summary("Investigate flaky l..."))
            .await
            .unwrap();

        assert_eq!(
            logger.activity().messages(Level::Info),
            vec![
                "1h was successfully logged against ABC-1 (Investigate flaky lo...)",
                "1h was successfully logged against ABC-1",
            ]
        );
    }

    #[tokio::test]
    async fn submit_collects_every_validation_problem() {
        let mut logger = logger(FakeTracker::accepting());
        let form = LogForm {
            issue: "abc".into(),
            manual_time: Some("1x".into()),
            ..LogForm::default()
        };

        let err = logger.submit(&form).await.unwrap_err();

        match err {
            AppError::Validation(problems) => assert_eq!(problems.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(logger.tracker().calls().is_empty());
        assert_eq!(logger.activity().messages(Level::Error).len(), 1);
    }

    #[tokio::test]
    async fn submit_rejects_an_idle_clock() {
        let mut logger = logger(FakeTracker::accepting());
        let form = LogForm {
            issue: "ABC-1".into(),
            ..LogForm::default()
        };

        let err = logger.submit(&form).await.unwrap_err();

        match err {
            AppError::Validation(problems) => assert_eq!(problems, vec![ValidationError::NothingToLog]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn submit_logs_rounded_clock_time_and_resets_it() {
        let mut logger = logger(FakeTracker::accepting());
        logger.clock().set_time(Duration::new(1, 5, 40));
        let form = LogForm {
            issue: " abc-1 ".into(),
            ..LogForm::default()
        };

        let outcome = logger.submit(&form).await.unwrap();

        assert_eq!(logger.tracker().calls(), vec!["log_time 1h 6m ABC-1"]);
        assert_eq!(outcome.logged, Duration::new(1, 6, 0));
        assert_eq!(logger.clock().get_time(None), Duration::ZERO);
    }

    #[tokio::test]
    async fn submit_trims_subtask_type_and_keeps_description() {
        let mut logger = logger(FakeTracker {
            existing_subtask: Some("ABC-3"),
            ..FakeTracker::accepting()
        });
        let form = LogForm {
            issue: "ABC-1".into(),
            manual_time: Some("15m".into()),
            subtask: Some("  Triaging ".into()),
            description: Some("standup notes".into()),
            ..LogForm::default()
        };

        logger.submit(&form).await.unwrap();

        assert_eq!(
            logger.tracker().calls(),
            vec![
                "get_parent ABC-1",
                "get_issue_subtask ABC-1 Triaging",
                "log_time 15m ABC-3 standup notes",
            ]
        );
    }

    #[tokio::test]
    async fn blank_subtask_type_logs_against_the_issue() {
        let mut logger = logger(FakeTracker::accepting());
        let form = LogForm {
            issue: "ABC-1".into(),
            manual_time: Some("15m".into()),
            subtask: Some("   ".into()),
            ..LogForm::default()
        };

        logger.submit(&form).await.unwrap();

        assert_eq!(logger.tracker().calls(), vec!["log_time 15m ABC-1"]);
    }

    #[tokio::test]
    async fn submit_deducts_manual_time_from_clock() {
        let mut logger = logger(FakeTracker::accepting());
        logger.clock().set_time(Duration::new(2, 10, 0));
        let form = LogForm {
            issue: "ABC-1".into(),
            manual_time: Some("1h 30m".into()),
            ..LogForm::default()
        };

        logger.submit(&form).await.unwrap();

        assert_eq!(logger.clock().get_time(None), Duration::new(0, 40, 0));
        assert_eq!(logger.logged_total(), Duration::new(1, 30, 0));
    }

    #[tokio::test]
    async fn reset_time_reports_dropped_time_and_new_day() {
        let logger = logger(FakeTracker::accepting());
        logger.clock().set_time(Duration::new(11, 2, 0));

        let report = logger.reset_time();

        assert_eq!(report.dropped, Duration::new(11, 2, 0));
        assert!(report.looks_like_new_day);
        assert_eq!(logger.clock().get_time(None), Duration::ZERO);
        assert_eq!(
            logger.activity().messages(Level::Info),
            vec!["The accrued time has been reset (11h 2m dropped)"]
        );
    }

    #[test]
    fn logged_and_grand_totals_carry_minutes() {
        let mut logger = logger(FakeTracker::accepting());
        logger.add_to_logged_total(Duration::new(1, 40, 0));
        logger.add_to_logged_total(Duration::new(0, 30, 0));
        assert_eq!(logger.logged_total(), Duration::new(2, 10, 0));

        logger.clock().set_time(Duration::new(0, 55, 20));
        assert_eq!(logger.day_grand_total(), Duration::new(3, 5, 0));

        assert_eq!(logger.reset_logged_total(), Duration::new(2, 10, 0));
        assert_eq!(logger.logged_total(), Duration::ZERO);
    }
}
