//! Command-line entry point: update the artifact, then run it.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use bootstrap_launcher::launch::exit_code;
use bootstrap_launcher::progress::log_progress_fn;
use bootstrap_launcher::{LaunchError, Launcher, LauncherConfig};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Keeps a downloaded launcher up to date and runs it.
///
/// Everything after `--` is forwarded to the artifact verbatim. Without the
/// separator, leading arguments matching the options below (including
/// `--help` and `--version`) are taken by the launcher itself.
#[derive(Parser)]
#[command(
    name = "bootstrap-launcher",
    version,
    about,
    after_help = "Use `--` to pass arguments to the artifact unchanged: bootstrap-launcher -- --version"
)]
struct Cli {
    /// Path to a JSON configuration file.
    #[arg(long, env = "BOOTSTRAP_LAUNCHER_CONFIG")]
    config: Option<PathBuf>,

    /// Use this directory instead of the per-OS working directory.
    #[arg(long, env = "BOOTSTRAP_LAUNCHER_WORKING_DIR")]
    working_dir: Option<PathBuf>,

    /// Endpoint returning the latest version number.
    #[arg(long, env = "BOOTSTRAP_LAUNCHER_VERSION_URL")]
    version_url: Option<String>,

    /// Endpoint serving the artifact.
    #[arg(long, env = "BOOTSTRAP_LAUNCHER_ARTIFACT_URL")]
    artifact_url: Option<String>,

    /// First argument passed to the artifact.
    #[arg(long, env = "BOOTSTRAP_LAUNCHER_ENTRY_POINT")]
    entry_point: Option<String>,

    /// Log download completion instead of drawing a progress bar.
    #[arg(long, env = "BOOTSTRAP_LAUNCHER_NO_PROGRESS")]
    no_progress: bool,

    /// Arguments forwarded to the artifact. Put them after `--`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<OsString>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr so the artifact owns stdout.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bootstrap_launcher=info")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => exit(code),
        Err(e) => {
            error!("{e}");
            exit(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<i32, LaunchError> {
    let mut config = match &cli.config {
        Some(path) => LauncherConfig::from_file(path)?,
        None => LauncherConfig::default(),
    };
    if let Some(dir) = cli.working_dir {
        config.working_dir = Some(dir);
    }
    if let Some(url) = cli.version_url {
        config.version_check_url = url;
    }
    if let Some(url) = cli.artifact_url {
        config.artifact_url = url;
    }
    if let Some(entry_point) = cli.entry_point {
        config.entry_point = Some(entry_point);
    }

    let mut launcher = Launcher::with_config(config);
    if cli.no_progress {
        launcher = launcher.set_progress(log_progress_fn());
    }

    let status = launcher.run(&cli.args).await?;
    Ok(exit_code(status))
}

fn exit(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arguments_after_separator_are_forwarded_verbatim() {
        let cli = Cli::try_parse_from([
            "bootstrap-launcher",
            "--no-progress",
            "--",
            "--config",
            "x",
            "--version",
        ])
        .expect("parse");

        assert!(cli.no_progress);
        assert_eq!(cli.config, None);
        assert_eq!(cli.args, ["--config", "x", "--version"]);
    }

    #[test]
    fn test_plain_arguments_are_forwarded() {
        let cli = Cli::try_parse_from(["bootstrap-launcher", "play", "--fullscreen"]).expect("parse");

        assert_eq!(cli.args, ["play", "--fullscreen"]);
    }
}
