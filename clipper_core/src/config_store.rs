use crate::errors::HostError;
use crate::host_config::HostConfig;
use crate::paths::expand_path;
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

/// The user's settings file. Nothing is cached: every call goes to disk, so a
/// write is visible to the next request and to the next process.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_file: PathBuf,
    default_workspace_path: String,
    workspace_path_key: String,
}

impl ConfigStore {
    pub fn new(config: &HostConfig) -> Self {
        Self {
            config_file: config.config_file.clone(),
            default_workspace_path: config.default_workspace_path.clone(),
            workspace_path_key: config.workspace_path_key.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn config_file(&self) -> &std::path::Path {
        &self.config_file
    }

    /// Reads the stored settings. A missing file is an empty mapping.
    pub fn load(&self) -> Result<Map<String, Value>, HostError> {
        let contents = match fs::read_to_string(&self.config_file) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(HostError::io(&self.config_file, e)),
        };

        serde_json::from_str(&contents)
            .map_err(|e| HostError::malformed_config(&self.config_file, e))
    }

    /// Resolves the workspace root: the stored value if there is one, the default
    /// otherwise. A blank string counts as no value. Both are expanded to an
    /// absolute path.
    pub fn workspace_path(&self) -> Result<PathBuf, HostError> {
        let config = self.load()?;

        let raw = match config.get(&self.workspace_path_key) {
            None | Some(Value::Null) => self.default_workspace_path.as_str(),
            Some(Value::String(path)) if path.trim().is_empty() => {
                self.default_workspace_path.as_str()
            }
            Some(Value::String(path)) => path.as_str(),
            Some(other) => {
                return Err(HostError::malformed_config(
                    &self.config_file,
                    format!("{} must be a string, found {}", self.workspace_path_key, other),
                ));
            }
        };

        let resolved = expand_path(raw);
        debug!("Workspace path {:?} resolved to {}", raw, resolved.display());
        Ok(resolved)
    }

    /// Sets `key` to `value` and rewrites the whole file, pretty-printed.
    pub fn set_value(&self, key: &str, value: Value) -> Result<(), HostError> {
        if let Some(parent) = self.config_file.parent() {
            fs::create_dir_all(parent).map_err(|e| HostError::io(parent, e))?;
        }

        let mut config = self.load()?;
        config.insert(key.to_string(), value);

        let json = serde_json::to_string_pretty(&config)
            .map_err(|e| HostError::malformed_config(&self.config_file, e))?;
        let mut file =
            fs::File::create(&self.config_file).map_err(|e| HostError::io(&self.config_file, e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| HostError::io(&self.config_file, e))?;

        debug!("Config key {} written to {}", key, self.config_file.display());
        Ok(())
    }
}
