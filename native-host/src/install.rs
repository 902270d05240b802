use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use clipper_core::host_config::{NATIVE_HOST_DESCRIPTION, NATIVE_HOST_NAME};
use colored::Colorize;
use std::path::{Path, PathBuf};
use utils::messaging::manifest::{Browser, HostManifest, default_manifest_dir};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BrowserArg {
    Chrome,
    Chromium,
    Firefox,
}

impl From<BrowserArg> for Browser {
    fn from(arg: BrowserArg) -> Self {
        match arg {
            BrowserArg::Chrome => Browser::Chrome,
            BrowserArg::Chromium => Browser::Chromium,
            BrowserArg::Firefox => Browser::Firefox,
        }
    }
}

/// Registers the running executable as the clipper's native host.
pub fn install_manifest(browser: Browser, extension_id: &str, dir: Option<PathBuf>) -> Result<PathBuf> {
    let executable = std::env::current_exe().context("Could not locate the host executable")?;
    let Some(dir) = dir.or_else(|| default_manifest_dir(browser)) else {
        bail!(
            "No manifest directory is known for {:?} on this platform, pass --dir",
            browser
        );
    };

    let manifest = HostManifest::new(
        browser,
        NATIVE_HOST_NAME,
        NATIVE_HOST_DESCRIPTION,
        executable,
        extension_id,
    );
    manifest
        .write_to(&dir)
        .with_context(|| format!("Failed to write manifest into {}", dir.display()))
}

pub fn print_installed(path: &Path) {
    println!("{} {}", "Manifest written to".green(), path.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_manifest_points_at_current_executable() -> Result<()> {
        let dir = tempdir()?;

        let written = install_manifest(Browser::Chrome, "abcdef", Some(dir.path().to_path_buf()))?;

        assert_eq!(dir.path().join("com.logseq.clipper.json"), written);
        let manifest: Value = serde_json::from_str(&fs::read_to_string(&written)?)?;
        assert_eq!(
            std::env::current_exe()?.to_string_lossy(),
            manifest["path"].as_str().unwrap()
        );
        assert_eq!("chrome-extension://abcdef/", manifest["allowed_origins"][0]);
        Ok(())
    }
}
