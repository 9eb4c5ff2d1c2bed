use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitStatus;

use crate::config::LauncherConfig;
use crate::downloader::Downloader;
use crate::error::LaunchError;
use crate::install::{Install, InstallReport};
use crate::launch::launch;
use crate::progress::{default_progress_fn, ProgressFn};
use crate::workdir::{ensure_dir, resolve_working_dir};

// ──────────────────────────────────────────────────────────────────────────────
// Launcher
// ──────────────────────────────────────────────────────────────────────────────

/// Top-level entry-point with a chainable builder API.
///
/// # Example
/// ```rust,no_run
/// use bootstrap_launcher::Launcher;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let args: Vec<std::ffi::OsString> = std::env::args_os().skip(1).collect();
///     let launcher = Launcher::new()
///         .set_version_url("https://example.com/app/build")
///         .set_artifact_url("https://example.com/app/download");
///     let report = launcher.prepare().await.unwrap();
///     launcher.launch(&report, &args).await.unwrap();
/// }
/// ```
pub struct Launcher {
    config: LauncherConfig,
    progress: Option<ProgressFn>,
}

impl Launcher {
    /// Create a new `Launcher` with the default configuration.
    pub fn new() -> Self {
        Self::with_config(LauncherConfig::default())
    }

    /// Create a `Launcher` from an explicit configuration.
    pub fn with_config(config: LauncherConfig) -> Self {
        Self {
            config,
            progress: Some(default_progress_fn()),
        }
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Set the application name used for the working directory (builder).
    pub fn set_app_name(mut self, name: &str) -> Self {
        self.config.app_name = name.to_owned();
        self
    }

    /// Use `dir` instead of the per-OS working directory (builder).
    pub fn set_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.working_dir = Some(dir.into());
        self
    }

    /// Set the version check endpoint (builder).
    pub fn set_version_url(mut self, url: &str) -> Self {
        self.config.version_check_url = url.to_owned();
        self
    }

    /// Set the artifact download endpoint (builder).
    pub fn set_artifact_url(mut self, url: &str) -> Self {
        self.config.artifact_url = url.to_owned();
        self
    }

    /// Set the first argument passed to the artifact (builder).
    pub fn set_entry_point(mut self, entry_point: &str) -> Self {
        self.config.entry_point = Some(entry_point.to_owned());
        self
    }

    /// Override the progress callback (builder).
    pub fn set_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Disable progress output (builder).
    pub fn no_progress(mut self) -> Self {
        self.progress = None;
        self
    }

    /// Set the number of attempts when fetching the latest version (builder).
    pub fn set_retry_count(mut self, count: u32) -> Self {
        self.config.retry_count = count;
        self
    }

    /// Set the retry delay in seconds (builder).
    pub fn set_retry_delay_secs(mut self, secs: u64) -> Self {
        self.config.retry_delay_secs = secs;
        self
    }

    /// Set an explicit HTTP/HTTPS proxy URL (builder).
    pub fn set_proxy(mut self, proxy: &str) -> Self {
        self.config.proxy = Some(proxy.to_owned());
        self
    }

    /// Connect directly, ignoring any proxy from the environment (builder).
    pub fn no_proxy(mut self) -> Self {
        self.config.proxy = None;
        self
    }

    /// Resolve the working directory and bring the artifact up to date.
    ///
    /// Configuration is validated before any filesystem or network access.
    pub async fn prepare(&self) -> Result<InstallReport, LaunchError> {
        self.config.validate()?;

        let working_dir = match &self.config.working_dir {
            Some(dir) => {
                ensure_dir(dir)?;
                dir.clone()
            }
            None => resolve_working_dir(&self.config.app_name)?,
        };
        tracing::debug!(path = %working_dir.display(), "working directory");

        let mut install = Install::new(
            &working_dir,
            &self.config.artifact_name,
            &self.config.marker_name,
            &self.config.version_check_url,
            &self.config.artifact_url,
        );
        install.downloader = Downloader::with_config(
            self.config.retry_count,
            self.config.retry_delay(),
            self.config.connect_timeout(),
            self.config.read_timeout(),
            self.config.proxy.clone(),
            self.progress.clone(),
        );
        install.ensure_artifact().await
    }

    /// Hand off to the prepared artifact, forwarding `args`.
    pub async fn launch(
        &self,
        report: &InstallReport,
        args: &[OsString],
    ) -> Result<ExitStatus, LaunchError> {
        launch(&report.artifact, self.config.entry_point.as_deref(), args).await
    }

    /// [`prepare`](Self::prepare) then [`launch`](Self::launch).
    pub async fn run(&self, args: &[OsString]) -> Result<ExitStatus, LaunchError> {
        let report = self.prepare().await?;
        self.launch(&report, args).await
    }
}

impl Default for Launcher {
    fn default() -> Self {
        Self::new()
    }
}
