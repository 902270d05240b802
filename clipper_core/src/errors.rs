use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    /// A file or directory the request depends on does not exist.
    #[error("Not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// The host process may not read or write the path.
    #[error("Permission denied: {}", .path.display())]
    PermissionDenied { path: PathBuf },

    /// The request is missing a field, has a field of the wrong type, or names a
    /// location outside the workspace.
    #[error("{0}")]
    InvalidArgument(String),

    /// The request names an action this host does not implement.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// The config file exists but does not hold a usable JSON object.
    #[error("Malformed config file {}: {reason}", .path.display())]
    MalformedConfig { path: PathBuf, reason: String },

    /// Any other file system failure.
    #[error("File system error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HostError {
    /// Classifies an I/O error raised while working on `path`.
    pub fn io(path: impl AsRef<Path>, err: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => HostError::NotFound { path },
            io::ErrorKind::PermissionDenied => HostError::PermissionDenied { path },
            _ => HostError::Io { path, source: err },
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        HostError::InvalidArgument(msg.into())
    }

    pub fn malformed_config(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        HostError::MalformedConfig {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
