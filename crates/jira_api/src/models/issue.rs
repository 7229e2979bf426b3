use serde::{Deserialize, Serialize};

use super::de::optional_string_id;
use super::IssueType;

/// An issue as returned by `GET issue/{key}`. Only the fields the time logger asks for are modelled.
#[derive(Debug, Deserialize, Clone)]
pub struct Issue {
    #[serde(default, deserialize_with = "optional_string_id")]
    pub id: Option<String>,
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct IssueFields {
    pub summary: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub parent: Option<Box<Issue>>,
    #[serde(default)]
    pub subtasks: Vec<Issue>,
    #[serde(default)]
    pub issuetype: Option<IssueType>,
}

impl Issue {
    pub fn type_name(&self) -> Option<&str> {
        self.fields.issuetype.as_ref().map(|kind| kind.name.as_str())
    }
}

/// Response of `POST issue`.
#[derive(Debug, Deserialize, Clone)]
pub struct CreatedIssue {
    #[serde(default, deserialize_with = "optional_string_id")]
    pub id: Option<String>,
    pub key: Option<String>,
}

/// Body of `POST issue` for a subtask of `parent_key`.
#[derive(Debug, Serialize)]
pub struct IssueCreateRequest {
    fields: IssueCreateFields,
}

#[derive(Debug, Serialize)]
struct IssueCreateFields {
    project: KeyRef,
    parent: KeyRef,
    summary: String,
    description: String,
    issuetype: NameRef,
}

#[derive(Debug, Serialize)]
struct KeyRef {
    key: String,
}

#[derive(Debug, Serialize)]
struct NameRef {
    name: String,
}

impl IssueCreateRequest {
    /// Summary and description are both `"<type> <parent>"`.
    pub fn subtask(project_key: &str, parent_key: &str, type_name: &str) -> Self {
        let text = format!("{type_name} {parent_key}");
        Self {
            fields: IssueCreateFields {
                project: KeyRef {
                    key: project_key.to_string(),
                },
                parent: KeyRef {
                    key: parent_key.to_string(),
                },
                summary: text.clone(),
                description: text,
                issuetype: NameRef {
                    name: type_name.to_string(),
                },
            },
        }
    }
}
