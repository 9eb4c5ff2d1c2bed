use std::ffi::OsString;
use std::path::Path;
use std::process::ExitStatus;

use tokio::process::Command;
use tracing::{info, warn};

use crate::error::LaunchError;

/// Run the artifact and wait for it to exit.
///
/// The artifact receives `entry_point` (when set) followed by `args`. If it
/// cannot be started that way, a second attempt is made with no arguments,
/// unless the failure was a missing file, which no argument list can fix.
/// The retry helps when the argument list itself is rejected, for example
/// an oversized argument failing with `E2BIG`.
pub async fn launch(
    artifact: &Path,
    entry_point: Option<&str>,
    args: &[OsString],
) -> Result<ExitStatus, LaunchError> {
    let mut full_args: Vec<OsString> = Vec::with_capacity(args.len() + 1);
    if let Some(entry_point) = entry_point {
        full_args.push(entry_point.into());
    }
    full_args.extend(args.iter().cloned());

    info!(artifact = %artifact.display(), args = ?full_args, "launching");
    match Command::new(artifact).args(&full_args).status().await {
        Ok(status) => Ok(status),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => Err(LaunchError::Launch {
            path: artifact.to_path_buf(),
            source,
        }),
        Err(e) => {
            warn!(artifact = %artifact.display(), "error launching with arguments, retrying without: {e}");
            Command::new(artifact)
                .status()
                .await
                .map_err(|source| LaunchError::Launch {
                    path: artifact.to_path_buf(),
                    source,
                })
        }
    }
}

/// Exit code to report for a finished artifact. A signal-terminated child maps to 1.
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
