use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{Client, Proxy};
use tracing::{debug, info, warn};

use crate::error::LaunchError;
use crate::progress::ProgressFn;

const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Queries the version endpoint and downloads the artifact.
pub struct Downloader {
    /// Number of attempts when fetching the latest version.
    pub retry_count: u32,
    /// Delay between attempts.
    pub retry_delay: Duration,
    /// Timeout for establishing a connection.
    pub connect_timeout: Duration,
    /// Timeout for each read from an open connection.
    pub read_timeout: Duration,
    /// Optional HTTP proxy URL.
    pub proxy: Option<String>,
    /// Optional progress callback.
    pub progress: Option<ProgressFn>,
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Downloader {
    /// Create a downloader with default settings: one attempt, 10s connect, 30s read.
    pub fn new() -> Self {
        Self {
            retry_count: 1,
            retry_delay: Duration::from_secs(3),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            proxy: None,
            progress: None,
        }
    }

    /// Create a downloader with explicit configuration.
    pub fn with_config(
        retry_count: u32,
        retry_delay: Duration,
        connect_timeout: Duration,
        read_timeout: Duration,
        proxy: Option<String>,
        progress: Option<ProgressFn>,
    ) -> Self {
        Self {
            retry_count,
            retry_delay,
            connect_timeout,
            read_timeout,
            proxy,
            progress,
        }
    }

    /// Build an HTTP client, optionally with proxy support.
    fn build_client(&self) -> Result<Client, reqwest::Error> {
        let mut builder = Client::builder()
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.read_timeout)
            .user_agent(concat!("bootstrap-launcher/", env!("CARGO_PKG_VERSION")));
        builder = match &self.proxy {
            Some(proxy_url) => builder.proxy(Proxy::all(proxy_url)?),
            None => builder.no_proxy(),
        };
        builder.build()
    }

    /// Fetch the latest version from `url`.
    ///
    /// Only an integer first line counts as a version. Failures are logged
    /// and reported as `None`; they never propagate.
    pub async fn latest_version(&self, url: &str) -> Option<String> {
        let attempts = self.retry_count.max(1);
        for attempt in 1..=attempts {
            match self.get_latest_version(url).await {
                Ok(v) => {
                    debug!(%url, version = %v, "latest version");
                    return Some(v);
                }
                Err(e) => {
                    warn!(%url, attempt, "unable to fetch latest version: {e}");
                    if attempt < attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }
        None
    }

    async fn get_latest_version(&self, url: &str) -> Result<String, LaunchError> {
        let client = self.build_client()?;
        let resp = client.get(url).send().await?;

        if !resp.status().is_success() {
            return Err(LaunchError::HttpStatus {
                url: url.to_owned(),
                status: resp.status(),
            });
        }

        let body = resp.text().await?;
        let line = body.lines().next().unwrap_or_default().trim();
        if line.is_empty() {
            return Err(LaunchError::EmptyVersion {
                url: url.to_owned(),
            });
        }
        if line.parse::<i64>().is_err() {
            return Err(LaunchError::InvalidVersion {
                url: url.to_owned(),
                value: line.chars().take(64).collect(),
            });
        }
        Ok(line.to_owned())
    }

    /// Stream `url` into `dest`, replacing any existing file.
    ///
    /// Bytes land in a sibling `.part` file first and are renamed over `dest`
    /// only once the whole body has arrived, so a failed transfer leaves the
    /// previous `dest` untouched. Returns the number of bytes written.
    pub async fn download(&self, url: &str, dest: &Path) -> Result<u64, LaunchError> {
        let part = part_path(dest);
        let downloaded = match self.download_raw(url, &part).await {
            Ok(n) => n,
            Err(e) => {
                if part.exists() {
                    if let Err(cleanup) = std::fs::remove_file(&part) {
                        warn!(path = %part.display(), "error removing partial download: {cleanup}");
                    }
                }
                return Err(e);
            }
        };

        make_executable(&part)?;
        std::fs::rename(&part, dest).map_err(|e| LaunchError::io(dest, e))?;
        info!(%url, dest = %dest.display(), bytes = downloaded, "artifact downloaded");
        Ok(downloaded)
    }

    async fn download_raw(&self, url: &str, dest_path: &Path) -> Result<u64, LaunchError> {
        let client = self.build_client()?;
        let resp = client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(LaunchError::HttpStatus {
                url: url.to_owned(),
                status: resp.status(),
            });
        }

        let expected = resp.content_length();
        let total = expected.unwrap_or(0);
        let mut downloaded: u64 = 0;
        let mut stream = resp.bytes_stream();
        let file = std::fs::File::create(dest_path).map_err(|e| LaunchError::io(dest_path, e))?;
        let mut file = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);

        let start = std::time::Instant::now();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            downloaded += chunk.len() as u64;

            file.write_all(&chunk)
                .map_err(|e| LaunchError::io(dest_path, e))?;

            if let Some(progress) = &self.progress {
                progress(url, downloaded, total, mib_per_sec(downloaded, start), false);
            }
        }

        file.flush().map_err(|e| LaunchError::io(dest_path, e))?;

        if let Some(expected) = expected {
            if downloaded < expected {
                return Err(LaunchError::Truncated {
                    url: url.to_owned(),
                    received: downloaded,
                    expected,
                });
            }
        }

        if let Some(progress) = &self.progress {
            progress(url, downloaded, total, mib_per_sec(downloaded, start), true);
        }

        Ok(downloaded)
    }
}

fn mib_per_sec(downloaded: u64, start: std::time::Instant) -> f64 {
    let elapsed = start.elapsed().as_secs_f64();
    if elapsed > 0.0 {
        (downloaded as f64) / (1024.0 * 1024.0) / elapsed
    } else {
        0.0
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

fn make_executable(path: &Path) -> Result<(), LaunchError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .map_err(|e| LaunchError::io(path, e))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
