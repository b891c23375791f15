//! Progress display for batch extraction.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::path::Path;
use std::time::Duration;
use unarc_core::ProgressCallback;

/// Spinner showing the archive being extracted and the last entry written.
///
/// Only used when stdout is a terminal. Cleared on drop.
pub struct CliProgress {
    bar: ProgressBar,
    entries: u64,
}

impl CliProgress {
    /// Creates a progress display for `total` archives.
    #[must_use]
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} [{pos}/{len}] {prefix} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar, entries: 0 }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stdout().is_term()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for CliProgress {
    fn on_archive_start(&mut self, path: &Path, current: usize, _total: usize) {
        self.entries = 0;
        self.bar.set_position(current.saturating_sub(1) as u64);
        self.bar.set_prefix(path.display().to_string());
        self.bar.set_message("");
    }

    fn on_entry(&mut self, name: &str) {
        self.entries += 1;
        self.bar.set_message(format!("{} {name}", self.entries));
    }

    fn on_archive_complete(&mut self, _path: &Path, _succeeded: bool) {
        self.bar.inc(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_callback() {
        let mut progress = CliProgress::new(2);

        progress.on_archive_start(Path::new("a.zip"), 1, 2);
        progress.on_entry("データ.txt");
        progress.on_entry("写真/");
        assert_eq!(progress.entries, 2);
        progress.on_archive_complete(Path::new("a.zip"), true);

        progress.on_archive_start(Path::new("b.zip"), 2, 2);
        assert_eq!(progress.entries, 0);
        assert_eq!(progress.bar.position(), 1);
    }
}
