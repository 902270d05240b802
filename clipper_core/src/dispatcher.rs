use crate::config_store::ConfigStore;
use crate::errors::HostError;
use crate::host_config::{DEFAULT_FOLDER, HostConfig};
use crate::types::{Action, Position, Response, SaveRequest, SetConfigRequest};
use crate::workspace::Workspace;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Turns one decoded request into one response. Holds no state between requests.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    store: ConfigStore,
}

impl Dispatcher {
    pub fn new(config: &HostConfig) -> Self {
        Self {
            store: ConfigStore::new(config),
        }
    }

    /// Runs the request, folding any failure into a `success: false` response.
    pub fn handle_message(&self, message: &Value) -> Response {
        match self.dispatch(message) {
            Ok(response) => response,
            Err(e) => {
                warn!("Request failed: {}", e);
                Response::failure(e.to_string())
            }
        }
    }

    pub fn dispatch(&self, message: &Value) -> Result<Response, HostError> {
        let raw_action = message.get("action");
        let action = match raw_action.and_then(Value::as_str).map(str::parse::<Action>) {
            Some(Ok(action)) => action,
            _ => return Err(HostError::UnknownAction(describe_action(raw_action))),
        };
        debug!("Dispatching {}", action);

        match action {
            Action::Save => self.save(parse_request(message)?),
            Action::ListPages => {
                let pages = self.workspace()?.list_pages()?;
                Ok(Response {
                    pages: Some(pages),
                    ..Response::ok()
                })
            }
            Action::GetConfig => {
                let workspace = self.workspace()?;
                // the stored settings are not echoed back, only the resolved root
                Ok(Response {
                    config: Some(Map::new()),
                    ..Response::ok().with_workspace_path(display(&workspace))
                })
            }
            Action::SetConfig => self.set_config(parse_request(message)?),
            Action::Ping => {
                let workspace = self.workspace()?;
                Ok(Response {
                    message: Some("pong".to_string()),
                    ..Response::ok().with_workspace_path(display(&workspace))
                })
            }
            Action::ValidateWorkspace => {
                let workspace = self.workspace()?;
                let layout = workspace.inspect();
                Ok(Response {
                    valid: Some(layout.is_valid()),
                    has_journals: Some(layout.has_journals),
                    has_pages: Some(layout.has_pages),
                    ..Response::ok().with_workspace_path(display(&workspace))
                })
            }
        }
    }

    fn save(&self, request: SaveRequest) -> Result<Response, HostError> {
        let (filename, content) = match (non_empty(request.filename), non_empty(request.content)) {
            (Some(filename), Some(content)) => (filename, content),
            _ => return Err(HostError::invalid_argument("Missing filename or content")),
        };
        let folder = request.folder.unwrap_or_else(|| DEFAULT_FOLDER.to_string());
        let position = request
            .position
            .as_deref()
            .map(Position::from)
            .unwrap_or_default();

        let path = self
            .workspace()?
            .save_content(&folder, &filename, &content, position)?;
        info!("Saved clip to {}", path.display());

        Ok(Response {
            path: Some(path.to_string_lossy().into_owned()),
            ..Response::ok()
        })
    }

    fn set_config(&self, request: SetConfigRequest) -> Result<Response, HostError> {
        let key = request
            .key
            .ok_or_else(|| HostError::invalid_argument("Missing key"))?;

        self.store.set_value(&key, request.value)?;
        info!("Config key {} updated", key);
        Ok(Response::ok())
    }

    fn workspace(&self) -> Result<Workspace, HostError> {
        Ok(Workspace::new(self.store.workspace_path()?))
    }
}

fn parse_request<T: DeserializeOwned>(message: &Value) -> Result<T, HostError> {
    T::deserialize(message).map_err(|e| HostError::invalid_argument(format!("Invalid request: {}", e)))
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

fn describe_action(action: Option<&Value>) -> String {
    match action {
        Some(Value::String(name)) => name.clone(),
        Some(other) => other.to_string(),
        None => "null".to_string(),
    }
}

fn display(workspace: &Workspace) -> String {
    workspace.root().to_string_lossy().into_owned()
}
