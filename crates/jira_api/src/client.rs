use crate::auth::basic_auth_header;
use crate::config::JiraConfig;
use crate::error::{Result, TrackerError};
use crate::models::{
    CreatedIssue, Issue, IssueCreateRequest, IssueType, ServerInfo, TransitionExecuteRequest,
    TransitionIdRef, TransitionList, Worklog, WorklogCreate,
};
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client as HttpClient, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

const ISSUE_SUMMARY_FIELDS: &str = "summary,description";
const ISSUE_PARENT_FIELDS: &str = "summary,parent";
const ISSUE_SUBTASK_FIELDS: &str = "summary,subtasks";

/// Thin JIRA REST client: one method per endpoint, each doing exactly one HTTP exchange.
#[derive(Clone)]
pub struct JiraClient {
    http: HttpClient,
    config: JiraConfig,
}

impl JiraClient {
    pub fn new(config: JiraConfig) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &JiraConfig {
        &self.config
    }

    pub async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.get_with_query(path, None).await
    }

    pub async fn get_with_query<T>(&self, path: &str, query: Option<&[(&str, &str)]>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!(method = "GET", path, "jira request");
        let mut request = self.http.get(self.url_for(path));
        if let Some(params) = query {
            request = request.query(params);
        }
        let response = request.send().await?;
        Self::parse_json(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_with_body(Method::POST, path, Some(body)).await
    }

    pub async fn send_with_body<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(method = %method, path, "jira request");
        let mut request = self.http.request(method, self.url_for(path));
        if let Some(payload) = body {
            request = request.json(payload);
        }
        let response = request.send().await?;
        Self::parse_json(response).await
    }

    pub async fn send_expect_empty<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        debug!(method = %method, path, "jira request");
        let mut request = self.http.request(method, self.url_for(path));
        if let Some(payload) = body {
            request = request.json(payload);
        }
        let response = request.send().await?;
        Self::ensure_success(response).await
    }

    fn url_for(&self, path: &str) -> String {
        let mut base = self.config.api_root();
        base.push_str(path.trim_start_matches('/'));
        base
    }

    async fn parse_json<T>(response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await?;
            serde_json::from_slice(&bytes).map_err(TrackerError::from)
        } else {
            Err(Self::failure(status, response).await)
        }
    }

    async fn ensure_success(response: Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::failure(status, response).await)
        }
    }

    async fn failure(status: StatusCode, response: Response) -> TrackerError {
        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            TrackerError::Authentication(format!("Access denied ({status})"))
        } else {
            TrackerError::http(status, &body)
        }
    }

    pub async fn server_info(&self) -> Result<ServerInfo> {
        self.get("serverInfo").await
    }

    /// Issue with `summary` and `description`.
    pub async fn get_issue_summary(&self, issue_key: &str) -> Result<Issue> {
        self.get_issue(issue_key, ISSUE_SUMMARY_FIELDS, None).await
    }

    /// Issue with its `parent` reference, if it has one.
    pub async fn get_issue_with_parent(&self, issue_key: &str) -> Result<Issue> {
        self.get_issue(issue_key, ISSUE_PARENT_FIELDS, None).await
    }

    /// Issue with its `subtasks`, each carrying its issue type.
    pub async fn get_issue_with_subtasks(&self, issue_key: &str) -> Result<Issue> {
        self.get_issue(issue_key, ISSUE_SUBTASK_FIELDS, Some("subtasks")).await
    }

    pub async fn get_issue(&self, issue_key: &str, fields: &str, expand: Option<&str>) -> Result<Issue> {
        let path = format!("issue/{issue_key}");
        match expand {
            Some(expand) => {
                self.get_with_query(&path, Some(&[("fields", fields), ("expand", expand)]))
                    .await
            }
            None => self.get_with_query(&path, Some(&[("fields", fields)])).await,
        }
    }

    pub async fn create_issue(&self, request: &IssueCreateRequest) -> Result<CreatedIssue> {
        self.post("issue", request).await
    }

    pub async fn add_worklog(
        &self,
        issue_key: &str,
        time_spent: &str,
        comment: Option<&str>,
    ) -> Result<Worklog> {
        let path = format!("issue/{issue_key}/worklog");
        let payload = WorklogCreate::new(time_spent, comment, Utc::now());
        self.post(&path, &payload).await
    }

    pub async fn get_transitions(&self, issue_key: &str) -> Result<TransitionList> {
        let path = format!("issue/{issue_key}/transitions");
        self.get(&path).await
    }

    pub async fn execute_transition(&self, issue_key: &str, transition_id: &str) -> Result<()> {
        let path = format!("issue/{issue_key}/transitions");
        let payload = TransitionExecuteRequest {
            transition: TransitionIdRef { id: transition_id },
        };
        self.send_expect_empty(Method::POST, &path, Some(&payload)).await
    }

    pub async fn get_issue_types(&self) -> Result<Vec<IssueType>> {
        self.get("issuetype").await
    }
}

fn build_http_client(config: &JiraConfig) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();

    let mut auth_value = header_value(basic_auth_header(&config.username, &config.password))?;
    auth_value.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth_value);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, header_value(config.user_agent.clone())?);

    HttpClient::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()
        .map_err(|err| TrackerError::InvalidConfig(err.to_string()))
}

fn header_value(value: String) -> Result<HeaderValue> {
    HeaderValue::from_str(&value).map_err(|err| TrackerError::InvalidConfig(err.to_string()))
}
