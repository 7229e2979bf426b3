//! Application context: the one place that wires config, tracker, activity log and workflow.

use jira_api::JiraClient;
use log::info;
use std::sync::Arc;

use crate::activity::{ActivityLog, ActivitySink};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::tracker::{Tracker, TrackerApi, TypeMap};
use crate::workflow::{CloseTransitions, TimeLogger};

pub type AppLogger = TimeLogger<Tracker, Arc<ActivityLog>>;

pub struct AppContext {
    config: Config,
    activity: Arc<ActivityLog>,
    logger: AppLogger,
}

impl AppContext {
    pub fn from_config(config: Config) -> Result<Self> {
        let client = JiraClient::new(config.tracker_config())?;
        let tracker = Tracker::new(client, config.jira.sub_task_type_exclusions.clone());
        let activity = Arc::new(ActivityLog::new(config.jtl.max_logs));
        let close = CloseTransitions {
            main_task: config.jira.main_task_close_transition.clone(),
            sub_task: config.jira.sub_task_close_transition.clone(),
        };
        let logger = TimeLogger::new(tracker, Arc::clone(&activity), close);
        Ok(Self {
            config,
            activity,
            logger,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn logger(&self) -> &AppLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut AppLogger {
        &mut self.logger
    }

    /// Checks that the settings are complete and the server accepts them.
    pub async fn check_config(&self) -> Result<()> {
        if !self.config.ready() {
            return Err(AppError::ConfigNotReady);
        }
        self.config.validate()?;
        if !self.logger.tracker().test_connection().await {
            let message = format!(
                "Could not connect to JIRA at {}; check the URL and credentials",
                self.config.jira.url_base
            );
            self.activity.error(&message);
            return Err(AppError::Config(message));
        }
        info!("Connected to {}", self.config.jira.url_base);
        Ok(())
    }

    /// Subtask types offered for logging, minus configured exclusions.
    pub async fn load_subtask_types(&self) -> Result<TypeMap> {
        match self.logger.tracker().subtask_types().await {
            Some(types) => Ok(types),
            None => {
                let err = AppError::SubtaskTypesUnavailable;
                self.activity.error(&err.to_string());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::Level;
    use mockito::Server;

    fn config_for(url: &str) -> Config {
        let mut config = Config::default();
        config.jira.url_base = url.to_string();
        config.jira.username = "aaron".to_string();
        config.jira.set_password("secret");
        config.jira.sub_task_type_exclusions = vec!["Sub-task".to_string()];
        config
    }

    #[tokio::test]
    async fn unconfigured_context_is_not_ready() {
        let context = AppContext::from_config(Config::default()).unwrap();
        assert!(matches!(context.check_config().await, Err(AppError::ConfigNotReady)));
    }

    #[tokio::test]
    async fn check_config_tests_the_connection() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/api/2/serverInfo")
            .with_status(200)
            .with_body(r#"{"version":"9.4.0"}"#)
            .create_async()
            .await;
        let context = AppContext::from_config(config_for(&server.url())).unwrap();

        context.check_config().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_credentials_fail_the_check() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/rest/api/2/serverInfo")
            .with_status(401)
            .create_async()
            .await;
        let context = AppContext::from_config(config_for(&server.url())).unwrap();

        assert!(matches!(context.check_config().await, Err(AppError::Config(_))));
        assert_eq!(context.activity().entries()[0].level, Level::Error);
    }

    #[tokio::test]
    async fn subtask_types_exclude_configured_names() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/rest/api/2/issuetype")
            .with_status(200)
            .with_body(
                r#"[{"id":"5","name":"Sub-task","subtask":true},{"id":"7","name":"Triaging","subtask":true},{"id":"1","name":"Bug","subtask":false}]"#,
            )
            .create_async()
            .await;
        let context = AppContext::from_config(config_for(&server.url())).unwrap();

        let types = context.load_subtask_types().await.unwrap();
        assert_eq!(types.values().collect::<Vec<_>>(), vec!["Triaging"]);
    }

    #[tokio::test]
    async fn missing_subtask_types_are_reported() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/rest/api/2/issuetype")
            .with_status(503)
            .create_async()
            .await;
        let context = AppContext::from_config(config_for(&server.url())).unwrap();

        let err = context.load_subtask_types().await.unwrap_err();
        assert!(matches!(err, AppError::SubtaskTypesUnavailable));
        assert_eq!(
            context.activity().entries()[0].message,
            "Could not load subtask types from JIRA!"
        );
    }
}
