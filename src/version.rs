use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::LaunchError;

/// Outcome of comparing the installed version against the latest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateDecision {
    /// The installed version is older than the latest.
    Required,
    /// The installed version is the latest, or newer.
    UpToDate,
    /// At least one side is not an integer, so no comparison is possible.
    Indeterminate,
}

/// Compare two integer version strings. Surrounding whitespace is ignored.
pub fn check_update(current: &str, latest: &str) -> UpdateDecision {
    match (current.trim().parse::<i64>(), latest.trim().parse::<i64>()) {
        (Ok(current), Ok(latest)) if current < latest => UpdateDecision::Required,
        (Ok(_), Ok(_)) => UpdateDecision::UpToDate,
        _ => UpdateDecision::Indeterminate,
    }
}

/// Single-line file recording the version of the installed artifact.
#[derive(Debug, Clone)]
pub struct VersionMarker {
    path: PathBuf,
}

impl VersionMarker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Return the first line of the marker.
    ///
    /// `None` when the file is missing, empty or unreadable.
    pub fn read(&self) -> Option<String> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), "error reading version marker: {e}");
                return None;
            }
        };

        let line = raw.lines().next()?;
        if line.is_empty() {
            debug!(path = %self.path.display(), "version marker is empty");
            return None;
        }
        Some(line.to_owned())
    }

    /// Overwrite the marker with exactly `version`.
    pub fn write(&self, version: &str) -> Result<(), LaunchError> {
        std::fs::write(&self.path, version).map_err(|e| LaunchError::io(&self.path, e))
    }
}
