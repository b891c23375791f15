//! Extraction operation reporting.

use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use crate::ExtractionError;
use crate::Result;
use crate::registry::Strategy;

/// Why an entry was left out of an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The name decodes under neither Shift-JIS tier.
    UndecodableName,
    /// The recoded name escapes the destination directory.
    UnsafePath,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UndecodableName => "undecodable name",
            Self::UnsafePath => "unsafe path",
        })
    }
}

/// An entry that was not written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Entry name, recoded when possible, otherwise escaped raw bytes.
    pub name: String,
    /// Skip category.
    pub kind: SkipReason,
    /// Error message that caused the skip.
    pub reason: String,
}

/// Report of a single archive extraction.
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    /// Archive that was extracted.
    pub archive: PathBuf,

    /// Directory the entries were written under.
    pub destination: PathBuf,

    /// Strategy the archive was extracted with.
    pub strategy: Strategy,

    /// Number of files written. Not tracked for bulk extraction.
    pub files_extracted: usize,

    /// Number of directories created, including the destination.
    pub directories_created: usize,

    /// Number of writes that replaced a file written earlier in the same
    /// archive.
    pub files_overwritten: usize,

    /// Total bytes written to disk. Not tracked for bulk extraction.
    pub bytes_written: u64,

    /// Entries left out, in archive order.
    pub skipped: Vec<SkippedEntry>,

    /// Duration of the extraction.
    pub duration: Duration,
}

impl ExtractionReport {
    /// Creates an empty report for `archive`.
    #[must_use]
    pub fn new(archive: &Path, destination: &Path, strategy: Strategy) -> Self {
        Self {
            archive: archive.to_path_buf(),
            destination: destination.to_path_buf(),
            strategy,
            files_extracted: 0,
            directories_created: 0,
            files_overwritten: 0,
            bytes_written: 0,
            skipped: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    /// Records a skipped entry.
    pub fn add_skipped(&mut self, name: impl Into<String>, kind: SkipReason, reason: &ExtractionError) {
        self.skipped.push(SkippedEntry {
            name: name.into(),
            kind,
            reason: reason.to_string(),
        });
    }

    /// Returns total number of items written.
    #[must_use]
    pub const fn total_items(&self) -> usize {
        self.files_extracted + self.directories_created
    }

    /// Returns whether any entry was skipped.
    #[must_use]
    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Result of one archive in a batch.
#[derive(Debug)]
pub struct ArchiveOutcome {
    /// Archive path as given.
    pub path: PathBuf,
    /// Report or the error that ended this archive.
    pub result: Result<ExtractionReport>,
}

/// Results of a batch extraction, one outcome per attempted archive.
///
/// Under `BatchPolicy::FailFast` archives after the first failure are not
/// attempted and have no outcome.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Outcomes in input order.
    pub outcomes: Vec<ArchiveOutcome>,
    /// Number of archives that were requested.
    pub requested: usize,
}

impl BatchReport {
    /// Successful reports in input order.
    pub fn succeeded(&self) -> impl Iterator<Item = &ExtractionReport> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Failed archives with their errors, in input order.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &ExtractionError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.path.as_path(), e)))
    }

    /// Returns `true` if every requested archive was extracted.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcomes.len() == self.requested && self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Returns `true` if at least one archive was attempted and none
    /// succeeded.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(|o| o.result.is_err())
    }

    /// Number of requested archives that were never attempted.
    #[must_use]
    pub const fn not_attempted(&self) -> usize {
        self.requested.saturating_sub(self.outcomes.len())
    }
}

/// Callback trait for progress reporting during extraction.
///
/// The trait requires `Send` to allow use in multi-threaded contexts.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use unarc_core::ProgressCallback;
///
/// struct Printer;
///
/// impl ProgressCallback for Printer {
///     fn on_archive_start(&mut self, path: &Path, current: usize, total: usize) {
///         println!("[{current}/{total}] {}", path.display());
///     }
///
///     fn on_entry(&mut self, name: &str) {
///         println!("  {name}");
///     }
///
///     fn on_archive_complete(&mut self, _path: &Path, _succeeded: bool) {}
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called before an archive is opened.
    ///
    /// `current` is 1-indexed.
    fn on_archive_start(&mut self, path: &Path, current: usize, total: usize);

    /// Called after an entry was written, with its recoded name.
    fn on_entry(&mut self, name: &str);

    /// Called when an archive is finished, successfully or not.
    fn on_archive_complete(&mut self, path: &Path, succeeded: bool);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_archive_start(&mut self, _path: &Path, _current: usize, _total: usize) {}

    fn on_entry(&mut self, _name: &str) {}

    fn on_archive_complete(&mut self, _path: &Path, _succeeded: bool) {}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn report(name: &str) -> ExtractionReport {
        ExtractionReport::new(
            Path::new(name),
            &crate::registry::destination_for(Path::new(name)),
            Strategy::PerEntry,
        )
    }

    #[test]
    fn test_new_report() {
        let report = report("a.zip");
        assert_eq!(report.destination, PathBuf::from("a"));
        assert_eq!(report.total_items(), 0);
        assert!(!report.has_skipped());
    }

    #[test]
    fn test_add_skipped() {
        let mut report = report("a.zip");
        let err = ExtractionError::UnsafeEntryPath {
            name: "../x".into(),
        };
        report.add_skipped("../x", SkipReason::UnsafePath, &err);
        assert!(report.has_skipped());
        assert_eq!(report.skipped[0].kind, SkipReason::UnsafePath);
        assert!(report.skipped[0].reason.contains("../x"));
    }

    #[test]
    fn test_batch_mixed() {
        let batch = BatchReport {
            outcomes: vec![
                ArchiveOutcome {
                    path: "a.zip".into(),
                    result: Ok(report("a.zip")),
                },
                ArchiveOutcome {
                    path: "b.zip".into(),
                    result: Err(ExtractionError::read("b.zip", "truncated")),
                },
            ],
            requested: 2,
        };
        assert!(!batch.is_success());
        assert!(!batch.all_failed());
        assert_eq!(batch.succeeded().count(), 1);
        let failures: Vec<_> = batch.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, Path::new("b.zip"));
    }

    #[test]
    fn test_batch_not_attempted() {
        let batch = BatchReport {
            outcomes: vec![ArchiveOutcome {
                path: "a.zip".into(),
                result: Err(ExtractionError::read("a.zip", "truncated")),
            }],
            requested: 3,
        };
        assert!(batch.all_failed());
        assert_eq!(batch.not_attempted(), 2);
    }

    #[test]
    fn test_empty_batch() {
        let batch = BatchReport::default();
        assert!(batch.is_success());
        assert!(!batch.all_failed());
    }
}
