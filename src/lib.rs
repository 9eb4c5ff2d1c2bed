//! # bootstrap-launcher
//!
//! Keeps a downloaded executable in step with a remote version number and
//! hands off execution to it.
//!
//! Each run resolves a per-OS working directory, compares the version recorded
//! in a local marker file with the one reported by a version endpoint, downloads
//! the artifact when it is missing or stale, and then runs it with the original
//! command-line arguments.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bootstrap_launcher::Launcher;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let args: Vec<std::ffi::OsString> = std::env::args_os().skip(1).collect();
//!     let status = Launcher::new()
//!         .set_app_name("MyApp")
//!         .set_version_url("https://example.com/myapp/build")
//!         .set_artifact_url("https://example.com/myapp/download")
//!         .run(&args)
//!         .await
//!         .unwrap();
//!     std::process::exit(status.code().unwrap_or(1));
//! }
//! ```

pub mod api;
pub mod config;
pub mod downloader;
pub mod error;
pub mod install;
pub mod launch;
pub mod progress;
pub mod version;
pub mod workdir;

pub use api::Launcher;
pub use config::LauncherConfig;
pub use downloader::Downloader;
pub use error::{ErrorKind, LaunchError};
pub use install::{Install, InstallAction, InstallReport};
pub use version::{check_update, UpdateDecision, VersionMarker};
pub use workdir::OsFamily;
