use serde::{Deserialize, Serialize};

use super::de::{optional_string_id, string_id};

/// Response of `GET issue/{key}/transitions`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TransitionList {
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

impl TransitionList {
    /// Id of the first transition whose name matches exactly.
    pub fn id_for(&self, name: &str) -> Option<&str> {
        self.transitions
            .iter()
            .find(|transition| transition.name == name)
            .map(|transition| transition.id.as_str())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Transition {
    #[serde(deserialize_with = "string_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub to: Option<TransitionDestination>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TransitionDestination {
    #[serde(default, deserialize_with = "optional_string_id")]
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Body of `POST issue/{key}/transitions`.
#[derive(Debug, Serialize)]
pub(crate) struct TransitionExecuteRequest<'a> {
    pub transition: TransitionIdRef<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TransitionIdRef<'a> {
    pub id: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_for_matches_exact_name() {
        let list: TransitionList = serde_json::from_value(json!({
            "transitions": [
                {"id": "11", "name": "Start Progress"},
                {"id": 21, "name": "Resolve Issue", "to": {"id": "5", "name": "Resolved"}}
            ]
        }))
        .unwrap();
        assert_eq!(list.id_for("Resolve Issue"), Some("21"));
        assert_eq!(list.id_for("resolve issue"), None);
    }

    #[test]
    fn numeric_destination_id_decodes() {
        let list: TransitionList = serde_json::from_value(json!({
            "transitions": [{"id": "31", "name": "Close Issue", "to": {"id": 6, "name": "Closed"}}]
        }))
        .unwrap();
        let to = list.transitions[0].to.as_ref().unwrap();
        assert_eq!(to.id.as_deref(), Some("6"));
        assert_eq!(list.id_for("Close Issue"), Some("31"));
    }

    #[test]
    fn missing_transitions_array_is_empty() {
        let list: TransitionList = serde_json::from_value(json!({})).unwrap();
        assert!(list.transitions.is_empty());
    }
}
