use std::sync::{Arc, Mutex};

use indicatif::{ProgressBar, ProgressStyle};

/// Callback type for reporting download progress.
/// Arguments: source URL, bytes downloaded, total bytes (0 if unknown), MiB/s, is_complete
pub type ProgressFn = Arc<dyn Fn(&str, u64, u64, f64, bool) + Send + Sync>;

/// Returns the default progress function, drawing a progress bar on stderr.
pub fn default_progress_fn() -> ProgressFn {
    let bars = DownloadBars::new(styled_bar);
    Arc::new(move |src: &str, current: u64, total: u64, _mib_per_sec: f64, complete: bool| {
        bars.report(src, current, total, complete);
    })
}

/// Returns a progress function that emits a `tracing` event when a download completes.
pub fn log_progress_fn() -> ProgressFn {
    Arc::new(|src: &str, current: u64, _total: u64, mib_per_sec: f64, complete: bool| {
        if complete {
            tracing::info!(
                "downloaded {} ({:.2} MiB at {:.2} MiB/s)",
                src,
                current as f64 / (1024.0 * 1024.0),
                mib_per_sec
            );
        }
    })
}

fn styled_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template(
            "{msg} [{bar:30}] {bytes}/{total_bytes} ({binary_bytes_per_sec})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> "),
    );
    bar
}

/// One bar per download.
///
/// A bar is dropped when its download completes. A download that stops
/// without completing is detected when the next one reports a position below
/// the current bar's, and its bar is cleared before a new one starts.
struct DownloadBars {
    active: Mutex<Option<ProgressBar>>,
    new_bar: fn() -> ProgressBar,
}

impl DownloadBars {
    fn new(new_bar: fn() -> ProgressBar) -> Self {
        Self {
            active: Mutex::new(None),
            new_bar,
        }
    }

    fn report(&self, src: &str, current: u64, total: u64, complete: bool) {
        let Ok(mut active) = self.active.lock() else {
            return;
        };

        if active.as_ref().is_some_and(|bar| current < bar.position()) {
            if let Some(stale) = active.take() {
                stale.finish_and_clear();
            }
        }

        let bar = active.get_or_insert_with(|| {
            let bar = (self.new_bar)();
            bar.set_message(format!("downloading {}", file_name(src)));
            bar
        });
        if total > 0 && bar.length() != Some(total) {
            bar.set_length(total);
        }
        bar.set_position(current);

        if complete {
            bar.finish_and_clear();
            *active = None;
        }
    }

    #[cfg(test)]
    fn active_position(&self) -> Option<u64> {
        self.active
            .lock()
            .ok()
            .and_then(|active| active.as_ref().map(ProgressBar::position))
    }
}

fn file_name(url: &str) -> &str {
    url.rsplit('/').find(|s| !s.is_empty()).unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_download_releases_its_bar() {
        let bars = DownloadBars::new(ProgressBar::hidden);

        bars.report("http://host/artifact", 100, 200, false);
        assert_eq!(bars.active_position(), Some(100));

        bars.report("http://host/artifact", 200, 200, true);
        assert_eq!(bars.active_position(), None);
    }

    #[test]
    fn test_interrupted_download_is_replaced_by_a_fresh_bar() {
        let bars = DownloadBars::new(ProgressBar::hidden);

        bars.report("http://host/artifact", 150, 400, false);
        // Next download starts over without the first one completing.
        bars.report("http://host/artifact", 10, 400, false);
        assert_eq!(bars.active_position(), Some(10));

        bars.report("http://host/artifact", 400, 400, true);
        assert_eq!(bars.active_position(), None);
    }

    #[test]
    fn test_file_name_is_last_path_segment() {
        assert_eq!(file_name("http://host/a/artifact"), "artifact");
        assert_eq!(file_name("http://host/a/artifact/"), "artifact");
    }
}
