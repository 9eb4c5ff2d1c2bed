use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::LaunchError;

/// Operating system families that get distinct working directory layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Linux,
    Solaris,
    Windows,
    MacOs,
    Unknown,
}

impl OsFamily {
    /// Classify an OS name by substring, case-insensitively.
    ///
    /// Checked in order: `win`, `mac`, `solaris`/`sunos`, `linux`/`unix`.
    pub fn classify(os_name: &str) -> Self {
        let name = os_name.to_lowercase();
        if name.contains("win") {
            OsFamily::Windows
        } else if name.contains("mac") {
            OsFamily::MacOs
        } else if name.contains("solaris") || name.contains("sunos") {
            OsFamily::Solaris
        } else if name.contains("linux") || name.contains("unix") {
            OsFamily::Linux
        } else {
            OsFamily::Unknown
        }
    }

    /// The family of the platform this binary was built for.
    pub fn current() -> Self {
        Self::classify(std::env::consts::OS)
    }
}

/// Compute the working directory for `app_name` without touching the filesystem.
///
/// `app_data` is only consulted on Windows, where it takes the place of the
/// home directory when present.
pub fn working_directory_for(
    os: OsFamily,
    home: &Path,
    app_data: Option<&Path>,
    app_name: &str,
) -> PathBuf {
    let hidden = format!(".{app_name}");
    match os {
        OsFamily::Linux | OsFamily::Solaris => home.join(hidden),
        OsFamily::Windows => match app_data {
            Some(app_data) => app_data.join(hidden),
            None => home.join(hidden),
        },
        OsFamily::MacOs => home
            .join("Library")
            .join("Application Support")
            .join(app_name),
        OsFamily::Unknown => home.join(app_name),
    }
}

/// Compute the working directory for the given environment and create it.
pub fn resolve_working_dir_in(
    os: OsFamily,
    home: &Path,
    app_data: Option<&Path>,
    app_name: &str,
) -> Result<PathBuf, LaunchError> {
    let dir = working_directory_for(os, home, app_data, app_name);
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Resolve and create the working directory for the running platform.
///
/// The home directory falls back to `.` when it cannot be determined.
pub fn resolve_working_dir(app_name: &str) -> Result<PathBuf, LaunchError> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let app_data = std::env::var_os("APPDATA")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    resolve_working_dir_in(OsFamily::current(), &home, app_data.as_deref(), app_name)
}

/// Create `dir` and its parents if missing.
pub fn ensure_dir(dir: &Path) -> Result<(), LaunchError> {
    if dir.is_dir() {
        return Ok(());
    }
    debug!(path = %dir.display(), "creating working directory");
    std::fs::create_dir_all(dir).map_err(|source| LaunchError::WorkingDirectory {
        path: dir.to_path_buf(),
        source,
    })
}
