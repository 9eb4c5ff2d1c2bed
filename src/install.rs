use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::downloader::Downloader;
use crate::error::LaunchError;
use crate::version::{check_update, UpdateDecision, VersionMarker};

/// What the update sequence did to the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallAction {
    /// No artifact existed; it was downloaded.
    Installed,
    /// The artifact was stale and was replaced.
    Updated { from: String },
    /// The artifact is current; nothing was downloaded.
    UpToDate,
    /// The version marker was missing and the artifact was downloaded again.
    Repaired,
    /// The cached artifact is used as is because no update could be decided or fetched.
    Kept,
}

/// Result of [`Install::ensure_artifact`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Path of the artifact to launch.
    pub artifact: PathBuf,
    pub action: InstallAction,
    /// Version recorded in the marker after the sequence, if any.
    pub version: Option<String>,
}

/// Keeps the artifact in a working directory in step with the remote version.
pub struct Install {
    version_check_url: String,
    artifact_url: String,
    artifact_path: PathBuf,
    marker: VersionMarker,
    /// Downloader used for HTTP operations.
    pub downloader: Downloader,
}

impl Install {
    /// Create an `Install` for `artifact_name` and `marker_name` inside `working_dir`.
    pub fn new(
        working_dir: &Path,
        artifact_name: &str,
        marker_name: &str,
        version_check_url: &str,
        artifact_url: &str,
    ) -> Self {
        Self {
            version_check_url: version_check_url.to_owned(),
            artifact_url: artifact_url.to_owned(),
            artifact_path: working_dir.join(artifact_name),
            marker: VersionMarker::new(working_dir.join(marker_name)),
            downloader: Downloader::new(),
        }
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    pub fn marker(&self) -> &VersionMarker {
        &self.marker
    }

    /// Make sure an artifact is present and as current as can be determined.
    ///
    /// Fails only when there is nothing to launch: no cached artifact and either
    /// no remote version or a failed download.
    pub async fn ensure_artifact(&self) -> Result<InstallReport, LaunchError> {
        let current = self.marker.read();
        let latest = self.downloader.latest_version(&self.version_check_url).await;
        debug!(?current, ?latest, "versions resolved");

        let mut action = if !self.artifact_path.exists() {
            let Some(latest) = latest.as_deref() else {
                error!("{}", LaunchError::LatestVersionUnavailable);
                return Err(LaunchError::LatestVersionUnavailable);
            };
            self.downloader
                .download(&self.artifact_url, &self.artifact_path)
                .await?;
            self.record_version(latest);
            InstallAction::Installed
        } else {
            self.refresh(current.as_deref(), latest.as_deref()).await
        };

        if !self.marker.exists() {
            action = self.repair(latest.as_deref()).await?;
        }

        Ok(InstallReport {
            artifact: self.artifact_path.clone(),
            action,
            version: self.marker.read(),
        })
    }

    /// Replace an existing artifact if the remote version is newer.
    async fn refresh(&self, current: Option<&str>, latest: Option<&str>) -> InstallAction {
        let (Some(current), Some(latest)) = (current, latest) else {
            return InstallAction::Kept;
        };

        match check_update(current, latest) {
            UpdateDecision::UpToDate => InstallAction::UpToDate,
            UpdateDecision::Indeterminate => {
                warn!(current, latest, "cannot compare versions, keeping cached artifact");
                InstallAction::Kept
            }
            UpdateDecision::Required => {
                info!(current, latest, "update available");
                match self
                    .downloader
                    .download(&self.artifact_url, &self.artifact_path)
                    .await
                {
                    Ok(_) => {
                        self.record_version(latest);
                        InstallAction::Updated {
                            from: current.to_owned(),
                        }
                    }
                    Err(e) => {
                        warn!("error downloading update, keeping cached artifact: {e}");
                        InstallAction::Kept
                    }
                }
            }
        }
    }

    /// Download the artifact again because the marker went missing.
    async fn repair(&self, latest: Option<&str>) -> Result<InstallAction, LaunchError> {
        info!(marker = %self.marker.path().display(), "version marker missing, downloading artifact again");
        if let Err(e) = self
            .downloader
            .download(&self.artifact_url, &self.artifact_path)
            .await
        {
            if !self.artifact_path.exists() {
                return Err(e);
            }
            warn!("error downloading artifact, keeping cached copy: {e}");
            return Ok(InstallAction::Kept);
        }

        match latest {
            Some(latest) => self.record_version(latest),
            None => warn!("latest version unknown, version marker not written"),
        }
        Ok(InstallAction::Repaired)
    }

    fn record_version(&self, version: &str) {
        if let Err(e) = self.marker.write(version) {
            warn!("error writing version marker: {e}");
        }
    }
}
