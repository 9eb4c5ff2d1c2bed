use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::LaunchError;

/// Launcher settings, loadable from a JSON file.
///
/// Every field has a default, so a partial file only overrides what it names:
///
/// ```json
/// {
///   "versionCheckURL": "https://example.com/app/build",
///   "artifactURL": "https://example.com/app/download",
///   "entryPointIdentifier": "launch"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Application name used to derive the working directory.
    pub app_name: String,
    /// Endpoint returning the latest version number as its first line.
    #[serde(alias = "versionCheckURL")]
    pub version_check_url: String,
    /// Endpoint serving the artifact binary.
    #[serde(alias = "artifactURL")]
    pub artifact_url: String,
    /// Passed as the first argument to the artifact, ahead of forwarded arguments.
    #[serde(alias = "entryPointIdentifier")]
    pub entry_point: Option<String>,
    /// File name of the artifact inside the working directory.
    pub artifact_name: String,
    /// File name of the version marker inside the working directory.
    pub marker_name: String,
    /// Overrides the per-OS working directory.
    pub working_dir: Option<PathBuf>,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    /// Attempts made when fetching the latest version.
    pub retry_count: u32,
    pub retry_delay_secs: u64,
    /// HTTP/HTTPS proxy. Falls back to `HTTP_PROXY` / `HTTPS_PROXY`.
    pub proxy: Option<String>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            app_name: "Spoutcraft".to_owned(),
            version_check_url: "http://get.spout.org/SpoutcraftLauncher/build".to_owned(),
            artifact_url: "http://get.spout.org/SpoutcraftLauncher".to_owned(),
            entry_point: None,
            artifact_name: format!("Spoutcraft-Launcher{}", std::env::consts::EXE_SUFFIX),
            marker_name: "launcherVersion".to_owned(),
            working_dir: None,
            connect_timeout_secs: 10,
            read_timeout_secs: 30,
            retry_count: 1,
            retry_delay_secs: 3,
            proxy: proxy_from_env(),
        }
    }
}

impl LauncherConfig {
    /// Load a configuration file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, LaunchError> {
        let raw = std::fs::read_to_string(path).map_err(|source| LaunchError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| LaunchError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check that every configured URL parses.
    pub fn validate(&self) -> Result<(), LaunchError> {
        parse_url("version check URL", &self.version_check_url)?;
        parse_url("artifact URL", &self.artifact_url)?;
        if let Some(proxy) = &self.proxy {
            parse_url("proxy URL", proxy)?;
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, LaunchError> {
    Url::parse(value).map_err(|source| LaunchError::InvalidUrl {
        field,
        value: value.to_owned(),
        source,
    })
}

fn proxy_from_env() -> Option<String> {
    std::env::var("HTTP_PROXY")
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var("HTTPS_PROXY").ok().filter(|s| !s.is_empty()))
}
