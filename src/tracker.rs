//! Session-level view of the tracker: the handful of operations the workflow needs,
//! with expected failures reported as `None`/`false` and lookups cached per session.

use async_trait::async_trait;
use jira_api::{IssueCreateRequest, IssueType, JiraClient, TrackerError};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use crate::issue_key::IssueKey;
use crate::phrase::DurationPhrase;

/// Issue type id to name.
pub type TypeMap = BTreeMap<String, String>;

/// Which part of the issue type catalog to return.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeFilter {
    /// Standard (non-subtask) types.
    NoSubtasks,
    /// Subtask types, minus configured exclusions.
    SubtasksOnly,
    /// Everything except excluded subtask types.
    All,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IssueTypeCatalog {
    pub standard: TypeMap,
    pub subtasks: TypeMap,
    pub all: TypeMap,
}

impl IssueTypeCatalog {
    pub fn build(types: &[IssueType], exclusions: &[String]) -> Self {
        let mut catalog = Self::default();
        for kind in types {
            if kind.subtask {
                if exclusions.iter().any(|excluded| excluded == &kind.name) {
                    continue;
                }
                catalog.subtasks.insert(kind.id.clone(), kind.name.clone());
            } else {
                catalog.standard.insert(kind.id.clone(), kind.name.clone());
            }
            catalog.all.insert(kind.id.clone(), kind.name.clone());
        }
        catalog
    }

    pub fn view(&self, filter: TypeFilter) -> &TypeMap {
        match filter {
            TypeFilter::NoSubtasks => &self.standard,
            TypeFilter::SubtasksOnly => &self.subtasks,
            TypeFilter::All => &self.all,
        }
    }
}

/// Key and summary of an issue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssueSummary {
    pub key: String,
    pub summary: Option<String>,
    pub description: Option<String>,
}

impl From<&jira_api::Issue> for IssueSummary {
    fn from(issue: &jira_api::Issue) -> Self {
        Self {
            key: issue.key.clone(),
            summary: issue.fields.summary.clone(),
            description: issue.fields.description.clone(),
        }
    }
}

/// Operations the time-logging workflow performs against the tracker.
///
/// Implementations never fail loudly: transport, authentication and decoding problems
/// all come back as `None` or `false`.
#[async_trait]
pub trait TrackerApi: Send + Sync {
    async fn test_connection(&self) -> bool;

    async fn get_issue_summary(&self, issue: &IssueKey) -> Option<IssueSummary>;

    /// Parent of a subtask; `None` for top-level issues and on failure.
    async fn get_parent(&self, issue: &IssueKey) -> Option<IssueSummary>;

    /// First subtask of `issue` whose type is named `type_name`.
    async fn get_issue_subtask(&self, issue: &IssueKey, type_name: &str) -> Option<IssueKey>;

    async fn create_subtask(&self, parent: &IssueKey, type_name: &str) -> Option<IssueKey>;

    /// Returns the new work-log id.
    async fn log_time(
        &self,
        time: &DurationPhrase,
        issue: &IssueKey,
        description: Option<&str>,
    ) -> Option<String>;

    async fn get_transition_id(&self, issue: &IssueKey, transition: &str) -> Option<String>;

    async fn transition_issue(&self, issue: &IssueKey, transition_id: &str) -> bool;

    async fn fetch_issue_types(&self, filter: TypeFilter) -> Option<TypeMap>;

    async fn subtask_types(&self) -> Option<TypeMap> {
        self.fetch_issue_types(TypeFilter::SubtasksOnly).await
    }
}

/// [`TrackerApi`] over the JIRA REST client.
pub struct Tracker {
    client: JiraClient,
    exclusions: Vec<String>,
    issue_types: Mutex<Option<IssueTypeCatalog>>,
    transitions: Mutex<HashMap<(String, String), String>>,
}

impl Tracker {
    pub fn new(client: JiraClient, subtask_type_exclusions: Vec<String>) -> Self {
        Self {
            client,
            exclusions: subtask_type_exclusions,
            issue_types: Mutex::new(None),
            transitions: Mutex::new(HashMap::new()),
        }
    }

    fn issue_types(&self) -> MutexGuard<'_, Option<IssueTypeCatalog>> {
        self.issue_types.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn transitions(&self) -> MutexGuard<'_, HashMap<(String, String), String>> {
        self.transitions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn report(operation: &str, issue: &str, err: &TrackerError) {
    if err.is_transport() {
        warn!("{} for {} failed: transport error", operation, issue);
    } else {
        warn!("{} for {} failed", operation, issue);
    }
    debug!("{} failure details: {}", operation, err);
}

#[async_trait]
impl TrackerApi for Tracker {
    async fn test_connection(&self) -> bool {
        match self.client.server_info().await {
            Ok(info) => {
                debug!("Connected to JIRA {}", info.version.as_deref().unwrap_or("(unknown version)"));
                true
            }
            Err(err) => {
                report("Connection test", self.client.config().base_url.as_str(), &err);
                false
            }
        }
    }

    async fn get_issue_summary(&self, issue: &IssueKey) -> Option<IssueSummary> {
        match self.client.get_issue_summary(issue.as_str()).await {
            Ok(found) => Some(IssueSummary::from(&found)),
            Err(err) => {
                report("Issue lookup", issue.as_str(), &err);
                None
            }
        }
    }

    async fn get_parent(&self, issue: &IssueKey) -> Option<IssueSummary> {
        match self.client.get_issue_with_parent(issue.as_str()).await {
            Ok(found) => found.fields.parent.as_deref().map(IssueSummary::from),
            Err(err) => {
                report("Parent lookup", issue.as_str(), &err);
                None
            }
        }
    }

    async fn get_issue_subtask(&self, issue: &IssueKey, type_name: &str) -> Option<IssueKey> {
        let found = match self.client.get_issue_with_subtasks(issue.as_str()).await {
            Ok(found) => found,
            Err(err) => {
                report("Subtask lookup", issue.as_str(), &err);
                return None;
            }
        };
        found
            .fields
            .subtasks
            .iter()
            .find(|subtask| subtask.type_name() == Some(type_name))
            .and_then(|subtask| IssueKey::parse(&subtask.key).ok())
    }

    async fn create_subtask(&self, parent: &IssueKey, type_name: &str) -> Option<IssueKey> {
        let request = IssueCreateRequest::subtask(parent.project(), parent.as_str(), type_name);
        match self.client.create_issue(&request).await {
            Ok(created) => created.key.as_deref().and_then(|key| IssueKey::parse(key).ok()),
            Err(err) => {
                report("Subtask creation", parent.as_str(), &err);
                None
            }
        }
    }

    async fn log_time(
        &self,
        time: &DurationPhrase,
        issue: &IssueKey,
        description: Option<&str>,
    ) -> Option<String> {
        match self.client.add_worklog(issue.as_str(), time.as_str(), description).await {
            Ok(worklog) => worklog.id,
            Err(err) => {
                report("Work log", issue.as_str(), &err);
                None
            }
        }
    }

    async fn get_transition_id(&self, issue: &IssueKey, transition: &str) -> Option<String> {
        // Transitions are usually scoped to a project's workflow, so the prefix keys the cache.
        let cache_key = (issue.project().to_string(), transition.to_string());
        if let Some(id) = self.transitions().get(&cache_key) {
            return Some(id.clone());
        }

        let list = match self.client.get_transitions(issue.as_str()).await {
            Ok(list) => list,
            Err(err) => {
                report("Transition lookup", issue.as_str(), &err);
                return None;
            }
        };
        let id = list.id_for(transition)?.to_string();
        self.transitions().insert(cache_key, id.clone());
        Some(id)
    }

    async fn transition_issue(&self, issue: &IssueKey, transition_id: &str) -> bool {
        match self.client.execute_transition(issue.as_str(), transition_id).await {
            Ok(()) => true,
            Err(err) => {
                report("Transition", issue.as_str(), &err);
                false
            }
        }
    }

    async fn fetch_issue_types(&self, filter: TypeFilter) -> Option<TypeMap> {
        if let Some(catalog) = self.issue_types().as_ref() {
            return Some(catalog.view(filter).clone());
        }

        let types = match self.client.get_issue_types().await {
            Ok(types) if !types.is_empty() => types,
            Ok(_) => {
                warn!("JIRA returned no issue types");
                return None;
            }
            Err(err) => {
                report("Issue type lookup", "session", &err);
                return None;
            }
        };
        let catalog = IssueTypeCatalog::build(&types, &self.exclusions);
        let view = catalog.view(filter).clone();
        *self.issue_types() = Some(catalog);
        Some(view)
    }
}
