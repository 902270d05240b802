use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Save,
    ListPages,
    GetConfig,
    SetConfig,
    Ping,
    ValidateWorkspace,
}

impl FromStr for Action {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "save" => Ok(Action::Save),
            "listPages" => Ok(Action::ListPages),
            "getConfig" => Ok(Action::GetConfig),
            "setConfig" => Ok(Action::SetConfig),
            "ping" => Ok(Action::Ping),
            "validateWorkspace" => Ok(Action::ValidateWorkspace),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::Save => write!(f, "save"),
            Action::ListPages => write!(f, "listPages"),
            Action::GetConfig => write!(f, "getConfig"),
            Action::SetConfig => write!(f, "setConfig"),
            Action::Ping => write!(f, "ping"),
            Action::ValidateWorkspace => write!(f, "validateWorkspace"),
        }
    }
}

/// Where new content goes relative to what a note already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Append,
    Prepend,
}

impl From<&str> for Position {
    // anything but "prepend" appends
    fn from(s: &str) -> Self {
        match s {
            "prepend" => Position::Prepend,
            _ => Position::Append,
        }
    }
}

impl Position {
    /// Joins `content` onto `existing` with a newline, or returns `content` alone
    /// when there is nothing to join onto.
    pub fn combine(self, existing: &str, content: &str) -> String {
        if existing.is_empty() {
            return content.to_string();
        }
        match self {
            Position::Append => format!("{}\n{}", existing, content),
            Position::Prepend => format!("{}\n{}", content, existing),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct SaveRequest {
    pub folder: Option<String>,
    pub filename: Option<String>,
    pub content: Option<String>,
    pub position: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct SetConfigRequest {
    pub key: Option<String>,
    pub value: Value,
}

#[derive(Serialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_path: Option<String>,
    /// Same value as `workspace_path`, under the name the extension reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_journals: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_pages: Option<bool>,
}

impl Response {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn with_workspace_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.graph_path = Some(path.clone());
        self.workspace_path = Some(path);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_append_and_prepend_join_with_newline() {
        assert_eq!("A\nB", Position::Append.combine("A", "B"));
        assert_eq!("B\nA", Position::Prepend.combine("A", "B"));
    }

    #[test]
    fn test_empty_existing_content_gets_no_separator() {
        assert_eq!("B", Position::Append.combine("", "B"));
        assert_eq!("B", Position::Prepend.combine("", "B"));
    }

    #[test]
    fn test_unrecognized_position_appends() {
        assert_eq!(Position::Prepend, Position::from("prepend"));
        assert_eq!(Position::Append, Position::from("append"));
        assert_eq!(Position::Append, Position::from("top"));
    }

    #[test]
    fn test_action_names_round_trip() {
        for name in ["save", "listPages", "getConfig", "setConfig", "ping", "validateWorkspace"] {
            let action: Action = name.parse().unwrap();
            assert_eq!(name, action.to_string());
        }
        assert!("Save".parse::<Action>().is_err());
    }

    #[test]
    fn test_response_omits_unset_fields() {
        let response = Response::ok().with_workspace_path("/notes");
        assert_eq!(
            json!({ "success": true, "workspacePath": "/notes", "graphPath": "/notes" }),
            serde_json::to_value(&response).unwrap()
        );

        assert_eq!(
            json!({ "success": false, "error": "boom" }),
            serde_json::to_value(Response::failure("boom")).unwrap()
        );
    }

    #[test]
    fn test_set_config_value_defaults_to_null() {
        let request: SetConfigRequest =
            serde_json::from_value(json!({ "action": "setConfig", "key": "theme" })).unwrap();
        assert_eq!(Some("theme".to_string()), request.key);
        assert_eq!(Value::Null, request.value);
    }
}
