use std::path::{Path, PathBuf};

/// Name the extension uses to launch the host.
pub const NATIVE_HOST_NAME: &str = "com.logseq.clipper";
pub const NATIVE_HOST_DESCRIPTION: &str = "Logseq Web Clipper native messaging host";

/// Per-user config directory, `~/.config/<name>` on every platform.
pub const CONFIG_DIR_NAME: &str = "logseq-clipper";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_DIR_NAME: &str = "logs";

/// Config key holding the workspace (graph) root.
pub const WORKSPACE_PATH_KEY: &str = "graphPath";
pub const DEFAULT_WORKSPACE_PATH: &str = "~/Documents/logseq";

/// Folder a `save` writes into when the request names none.
pub const DEFAULT_FOLDER: &str = "journals";
pub const JOURNALS_FOLDER: &str = "journals";
pub const PAGES_FOLDER: &str = "pages";

/// Everything the host would otherwise read from process-wide state.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// JSON file holding user settings.
    pub config_file: PathBuf,
    /// Workspace root used when the config file names none. Expanded on use.
    pub default_workspace_path: String,
    /// Key of the workspace root inside the config file.
    pub workspace_path_key: String,
    /// Directory for the host's own log files.
    pub log_dir: PathBuf,
}

impl Default for HostConfig {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::with_config_dir(home.join(".config").join(CONFIG_DIR_NAME))
    }
}

impl HostConfig {
    /// Builds a config that keeps its settings and logs under `config_dir`.
    pub fn with_config_dir(config_dir: impl AsRef<Path>) -> Self {
        let config_dir = config_dir.as_ref();
        Self {
            config_file: config_dir.join(CONFIG_FILE_NAME),
            default_workspace_path: DEFAULT_WORKSPACE_PATH.to_string(),
            workspace_path_key: WORKSPACE_PATH_KEY.to_string(),
            log_dir: config_dir.join(LOG_DIR_NAME),
        }
    }
}
