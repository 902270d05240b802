use crate::errors::HostError;
use crate::host_config::{JOURNALS_FOLDER, PAGES_FOLDER};
use crate::page_name::{PAGE_EXTENSION, page_name_from_stem};
use crate::types::Position;
use path_absolutize::Absolutize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Which of the standard folders a workspace root contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkspaceLayout {
    pub has_journals: bool,
    pub has_pages: bool,
}

impl WorkspaceLayout {
    pub fn is_valid(&self) -> bool {
        self.has_journals || self.has_pages
    }
}

/// Note files under a workspace root.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of the pages stored directly under `<root>/pages`, sorted.
    pub fn list_pages(&self) -> Result<Vec<String>, HostError> {
        let pages_dir = self.root.join(PAGES_FOLDER);
        if !pages_dir.is_dir() {
            debug!("No pages directory at {}", pages_dir.display());
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&pages_dir).map_err(|e| HostError::io(&pages_dir, e))?;
        let mut pages = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| HostError::io(&pages_dir, e))?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != PAGE_EXTENSION) {
                continue;
            }
            match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(stem) => pages.push(page_name_from_stem(stem)),
                None => debug!("Skipping page with non UTF-8 name: {}", path.display()),
            }
        }

        pages.sort();
        Ok(pages)
    }

    /// Adds `content` to `<root>/<folder>/<filename>` and returns the path written.
    pub fn save_content(
        &self,
        folder: &str,
        filename: &str,
        content: &str,
        position: Position,
    ) -> Result<PathBuf, HostError> {
        let file_path = self.resolve(folder, filename)?;

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).map_err(|e| HostError::io(parent, e))?;
        }

        let existing = match fs::read_to_string(&file_path) {
            Ok(existing) => existing,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(HostError::io(&file_path, e)),
        };

        let new_content = position.combine(&existing, content);
        fs::write(&file_path, new_content).map_err(|e| HostError::io(&file_path, e))?;

        debug!(
            "Wrote {} bytes ({:?}) to {}",
            content.len(),
            position,
            file_path.display()
        );
        Ok(file_path)
    }

    /// Absolute path of `folder/filename`, refusing anything outside the root.
    pub fn resolve(&self, folder: &str, filename: &str) -> Result<PathBuf, HostError> {
        let relative = Path::new(folder).join(filename);
        if relative.is_absolute() || relative.has_root() {
            return Err(HostError::invalid_argument(format!(
                "Path must be relative to the workspace: {}",
                relative.display()
            )));
        }

        match relative.absolutize_virtually(&self.root) {
            Ok(resolved) if *resolved != *self.root => Ok(resolved.into_owned()),
            _ => Err(HostError::invalid_argument(format!(
                "Path escapes the workspace: {}",
                relative.display()
            ))),
        }
    }

    pub fn inspect(&self) -> WorkspaceLayout {
        WorkspaceLayout {
            has_journals: self.root.join(JOURNALS_FOLDER).is_dir(),
            has_pages: self.root.join(PAGES_FOLDER).is_dir(),
        }
    }
}
