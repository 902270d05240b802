use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Browser {
    Chrome,
    Chromium,
    Firefox,
}

/// Manifest a browser reads to locate and authorize a native messaging host.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HostManifest {
    pub name: String,
    pub description: String,
    pub path: PathBuf,
    #[serde(rename = "type")]
    pub transport: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_extensions: Option<Vec<String>>,
}

impl HostManifest {
    pub fn new(
        browser: Browser,
        name: impl Into<String>,
        description: impl Into<String>,
        path: impl Into<PathBuf>,
        extension_id: &str,
    ) -> Self {
        // Chromium browsers authorize by origin, Firefox by add-on id
        let (allowed_origins, allowed_extensions) = match browser {
            Browser::Chrome | Browser::Chromium => (
                Some(vec![format!("chrome-extension://{}/", extension_id)]),
                None,
            ),
            Browser::Firefox => (None, Some(vec![extension_id.to_string()])),
        };

        Self {
            name: name.into(),
            description: description.into(),
            path: path.into(),
            transport: "stdio".to_string(),
            allowed_origins,
            allowed_extensions,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.name)
    }

    /// Writes the manifest as `<dir>/<name>.json`, creating `dir` if needed.
    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;

        let manifest_path = dir.join(self.file_name());
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let mut file = File::create(&manifest_path)?;
        file.write_all(json.as_bytes())?;

        Ok(manifest_path)
    }
}

/// Per-user directory the browser scans for host manifests.
///
/// Windows locates manifests through the registry, so there is no directory to
/// return there.
pub fn default_manifest_dir(browser: Browser) -> Option<PathBuf> {
    let home = dirs::home_dir()?;

    #[cfg(target_os = "macos")]
    {
        let support = home.join("Library").join("Application Support");
        Some(match browser {
            Browser::Chrome => support.join("Google").join("Chrome"),
            Browser::Chromium => support.join("Chromium"),
            Browser::Firefox => support.join("Mozilla"),
        }
        .join("NativeMessagingHosts"))
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        Some(match browser {
            Browser::Chrome => home.join(".config").join("google-chrome").join("NativeMessagingHosts"),
            Browser::Chromium => home.join(".config").join("chromium").join("NativeMessagingHosts"),
            Browser::Firefox => home.join(".mozilla").join("native-messaging-hosts"),
        })
    }

    #[cfg(not(unix))]
    {
        let _ = (home, browser);
        None
    }
}
