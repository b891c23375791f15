//! High-level public API for archive extraction.

use std::path::Path;

use crate::BatchReport;
use crate::ExtractionConfig;
use crate::ExtractionReport;
use crate::Extractor;
use crate::Result;

/// Extracts an archive next to itself with the built-in handlers.
///
/// The archive `dir/photos.zip` is extracted into `dir/photos`.
///
/// # Errors
///
/// Returns an error if:
/// - The extension has no handler
/// - The archive cannot be opened or read
/// - A directory or file cannot be written
/// - An entry name is undecodable under `DecodeErrorPolicy::Abort`
///
/// # Examples
///
/// ```no_run
/// use unarc_core::ExtractionConfig;
/// use unarc_core::extract_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = extract_archive("photos.zip", &ExtractionConfig::default())?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract_archive<P: AsRef<Path>>(
    archive_path: P,
    config: &ExtractionConfig,
) -> Result<ExtractionReport> {
    Extractor::new(*config).extract(archive_path.as_ref())
}

/// Extracts several archives in order.
///
/// Failures are isolated or stop the batch according to
/// `config.batch_policy`.
///
/// # Examples
///
/// ```no_run
/// use unarc_core::ExtractionConfig;
/// use unarc_core::extract_all;
///
/// let batch = extract_all(&["a.zip", "b.7z"], &ExtractionConfig::default());
/// for (path, err) in batch.failures() {
///     eprintln!("{}: {err}", path.display());
/// }
/// ```
pub fn extract_all<P: AsRef<Path>>(archives: &[P], config: &ExtractionConfig) -> BatchReport {
    Extractor::new(*config).extract_all(archives)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ExtractionError;
    use crate::test_utils::LegacyZipBuilder;
    use tempfile::TempDir;

    #[test]
    fn test_extract_archive() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("archive.zip");
        LegacyZipBuilder::new()
            .file(b"\x83\x66\x81\x5B\x83\x5E.txt", b"hello")
            .write_to(&path);

        let report = extract_archive(&path, &ExtractionConfig::default()).unwrap();

        assert_eq!(report.files_extracted, 1);
        let content = std::fs::read(temp.path().join("archive/データ.txt")).unwrap();
        assert_eq!(content, b"hello");
    }

    #[test]
    fn test_extract_archive_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.zip");

        let err = extract_archive(&path, &ExtractionConfig::default()).unwrap_err();

        assert!(matches!(err, ExtractionError::ArchiveOpen { .. }));
        assert!(!temp.path().join("missing").exists());
    }

    #[test]
    fn test_extract_all_empty() {
        let batch = extract_all::<&str>(&[], &ExtractionConfig::default());
        assert!(batch.is_success());
    }
}
