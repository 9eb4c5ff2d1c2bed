use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Broad failure classes, each mapped to its own process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid URLs or an unreadable configuration file. Raised before any I/O.
    Configuration,
    /// Working directory, artifact or marker file could not be written.
    Filesystem,
    /// Version check or download failed and no cached artifact can stand in.
    Network,
    /// The artifact could not be started.
    Launch,
}

impl ErrorKind {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Configuration => 2,
            ErrorKind::Filesystem => 3,
            ErrorKind::Network => 4,
            ErrorKind::Launch => 5,
        }
    }
}

/// Errors produced while resolving, updating and launching the artifact.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("invalid {field} `{value}`: {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("error reading configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error parsing configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("The working directory could not be created: {path}")]
    WorkingDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to process the latest version of the launcher")]
    LatestVersionUnavailable,

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request to {url} failed with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("download of {url} was truncated: received {received} of {expected} bytes")]
    Truncated {
        url: String,
        received: u64,
        expected: u64,
    },

    #[error("version endpoint {url} returned an empty response")]
    EmptyVersion { url: String },

    #[error("version endpoint {url} returned `{value}`, which is not an integer version")]
    InvalidVersion { url: String, value: String },

    #[error("artifact {path} could not be launched: {source}")]
    Launch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LaunchError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LaunchError::InvalidUrl { .. }
            | LaunchError::ConfigRead { .. }
            | LaunchError::ConfigParse { .. } => ErrorKind::Configuration,
            LaunchError::WorkingDirectory { .. } | LaunchError::Io { .. } => {
                ErrorKind::Filesystem
            }
            LaunchError::LatestVersionUnavailable
            | LaunchError::Http(_)
            | LaunchError::HttpStatus { .. }
            | LaunchError::Truncated { .. }
            | LaunchError::EmptyVersion { .. }
            | LaunchError::InvalidVersion { .. } => ErrorKind::Network,
            LaunchError::Launch { .. } => ErrorKind::Launch,
        }
    }

    /// Exit code the binary terminates with for this error.
    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}
