//! Core extraction engine.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::BatchPolicy;
use crate::DecodeErrorPolicy;
use crate::ExtractionConfig;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::Result;
use crate::formats::ArchiveReader;
use crate::formats::BulkFormat;
use crate::recode::ShiftJisTier;
use crate::recode::recode_with_tier;
use crate::registry::Handler;
use crate::registry::HandlerRegistry;
use crate::registry::Strategy;
use crate::registry::destination_for;
use crate::report::ArchiveOutcome;
use crate::report::BatchReport;
use crate::report::NoopProgress;
use crate::report::ProgressCallback;
use crate::report::SkipReason;

use super::dest::DirCache;
use super::dest::EntryPath;
use super::dest::resolve_entry_path;

/// Extracts archives next to themselves.
///
/// Each archive is extracted into the directory named like the archive
/// without its extension. The handler is resolved and the archive opened
/// before anything is written, so an unsupported or unreadable archive
/// leaves the filesystem untouched.
///
/// # Examples
///
/// ```no_run
/// use unarc_core::ExtractionConfig;
/// use unarc_core::Extractor;
///
/// let extractor = Extractor::new(ExtractionConfig::default());
/// let report = extractor.extract("downloads/資料.zip".as_ref())?;
/// println!("{} files in {}", report.files_extracted, report.destination.display());
/// # Ok::<(), unarc_core::ExtractionError>(())
/// ```
#[derive(Debug)]
pub struct Extractor {
    registry: HandlerRegistry,
    config: ExtractionConfig,
}

impl Extractor {
    /// Creates an extractor over the built-in handler registry.
    #[must_use]
    pub fn new(config: ExtractionConfig) -> Self {
        Self::with_registry(HandlerRegistry::builtin(), config)
    }

    /// Creates an extractor over a custom registry.
    #[must_use]
    pub const fn with_registry(registry: HandlerRegistry, config: ExtractionConfig) -> Self {
        Self { registry, config }
    }

    /// Handler registry in use.
    #[must_use]
    pub const fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extracts a single archive.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedArchiveType` or `ArchiveOpen` before any
    /// filesystem change. Read, filesystem and (under
    /// `DecodeErrorPolicy::Abort`) decode errors end the archive and leave
    /// entries written so far in place.
    pub fn extract(&self, archive: &Path) -> Result<ExtractionReport> {
        self.extract_with_progress(archive, &mut NoopProgress)
    }

    /// Like [`extract`](Self::extract), reporting progress.
    ///
    /// # Errors
    ///
    /// See [`extract`](Self::extract).
    pub fn extract_with_progress(
        &self,
        archive: &Path,
        progress: &mut dyn ProgressCallback,
    ) -> Result<ExtractionReport> {
        progress.on_archive_start(archive, 1, 1);
        let result = self.run(archive, progress);
        progress.on_archive_complete(archive, result.is_ok());
        result
    }

    /// Extracts every archive in order, isolating failures according to
    /// `BatchPolicy`.
    pub fn extract_all<P: AsRef<Path>>(&self, archives: &[P]) -> BatchReport {
        self.extract_all_with_progress(archives, &mut NoopProgress)
    }

    /// Like [`extract_all`](Self::extract_all), reporting progress.
    pub fn extract_all_with_progress<P: AsRef<Path>>(
        &self,
        archives: &[P],
        progress: &mut dyn ProgressCallback,
    ) -> BatchReport {
        let total = archives.len();
        let mut batch = BatchReport {
            outcomes: Vec::with_capacity(total),
            requested: total,
        };

        for (index, archive) in archives.iter().enumerate() {
            let path = archive.as_ref();
            progress.on_archive_start(path, index + 1, total);
            let result = self.run(path, progress);
            progress.on_archive_complete(path, result.is_ok());

            let failed = match &result {
                Ok(_) => false,
                Err(err) => {
                    warn!(archive = %path.display(), error = %err, "archive failed");
                    true
                }
            };
            batch.outcomes.push(ArchiveOutcome {
                path: path.to_path_buf(),
                result,
            });

            if failed && self.config.batch_policy == BatchPolicy::FailFast {
                info!(remaining = total - index - 1, "stopping batch after failure");
                break;
            }
        }
        batch
    }

    fn run(&self, archive: &Path, progress: &mut dyn ProgressCallback) -> Result<ExtractionReport> {
        let started = Instant::now();
        let destination = destination_for(archive);
        let handler = self.registry.handler_for_path(archive)?;
        info!(
            archive = %archive.display(),
            format = handler.name(),
            strategy = %handler.strategy(),
            "extracting"
        );

        let mut report = match handler {
            Handler::PerEntry(format) => {
                let reader = format.open(archive)?;
                self.extract_entries(archive, &destination, reader, progress)?
            }
            Handler::Bulk(format) => {
                format.probe(archive)?;
                Self::extract_bulk(archive, &destination, &**format)?
            }
        };

        report.duration = started.elapsed();
        info!(
            archive = %archive.display(),
            files = report.files_extracted,
            directories = report.directories_created,
            skipped = report.skipped.len(),
            "extracted"
        );
        Ok(report)
    }

    fn extract_entries(
        &self,
        archive: &Path,
        destination: &Path,
        mut reader: Box<dyn ArchiveReader>,
        progress: &mut dyn ProgressCallback,
    ) -> Result<ExtractionReport> {
        let mut report = ExtractionReport::new(archive, destination, Strategy::PerEntry);
        let mut dirs = DirCache::new();
        let mut written = HashSet::new();
        report.directories_created += dirs.ensure_dir(destination)?;

        while let Some(entry) = reader.next_entry()? {
            let recoded = match recode_with_tier(&entry.name) {
                Ok(recoded) => recoded,
                Err(err) => {
                    let err = ExtractionError::from(err);
                    if self.config.on_decode_error == DecodeErrorPolicy::Abort {
                        return Err(err);
                    }
                    let raw = entry.name.display_raw();
                    warn!(archive = %archive.display(), raw = %raw, "skipping entry: {err}");
                    report.add_skipped(raw, SkipReason::UndecodableName, &err);
                    continue;
                }
            };
            debug!(
                raw = %entry.name.display_raw(),
                name = %recoded.name,
                tier = recoded.tier.map_or("unicode", ShiftJisTier::name),
                "recoded entry"
            );
            if recoded.tier == Some(ShiftJisTier::Jisx0213) {
                warn!(name = %recoded.name, "name decoded as Shift_JISX0213");
            }

            let target = match resolve_entry_path(
                destination,
                &recoded.name,
                entry.is_dir,
                self.config.allow_unsafe_paths,
            ) {
                Ok(target) => target,
                Err(err) => {
                    warn!(archive = %archive.display(), "skipping entry: {err}");
                    report.add_skipped(recoded.name, SkipReason::UnsafePath, &err);
                    continue;
                }
            };

            match target {
                EntryPath::Directory(path) => {
                    report.directories_created += dirs.ensure_dir(&path)?;
                }
                EntryPath::File(path) => {
                    let content = reader.read_current()?;
                    report.directories_created += dirs.ensure_parent(&path)?;
                    fs::write(&path, &content).map_err(|e| ExtractionError::filesystem(&path, e))?;
                    debug!(path = %path.display(), bytes = content.len(), "wrote entry");

                    if !written.insert(path.clone()) {
                        debug!(path = %path.display(), "overwrote earlier entry");
                        report.files_overwritten += 1;
                    }
                    report.files_extracted += 1;
                    report.bytes_written += content.len() as u64;
                    progress.on_entry(&recoded.name);
                }
            }
        }

        Ok(report)
    }

    fn extract_bulk(
        archive: &Path,
        destination: &Path,
        format: &dyn BulkFormat,
    ) -> Result<ExtractionReport> {
        let mut report = ExtractionReport::new(archive, destination, Strategy::Bulk);
        report.directories_created += DirCache::new().ensure_dir(destination)?;
        format.extract_to(archive, destination)?;
        Ok(report)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::formats::ArchiveEntry;
    use crate::formats::EntryFormat;
    use crate::recode::RawName;
    use tempfile::TempDir;

    /// Serves a fixed list of entries from memory.
    struct MemoryFormat(Vec<(RawName, bool, &'static [u8])>);

    struct MemoryReader {
        entries: Vec<(RawName, bool, &'static [u8])>,
        pos: usize,
    }

    impl EntryFormat for MemoryFormat {
        fn name(&self) -> &'static str {
            "memory"
        }

        fn open(&self, _path: &Path) -> Result<Box<dyn ArchiveReader>> {
            Ok(Box::new(MemoryReader {
                entries: self.0.clone(),
                pos: 0,
            }))
        }
    }

    impl ArchiveReader for MemoryReader {
        fn next_entry(&mut self) -> Result<Option<ArchiveEntry>> {
            let entry = self.entries.get(self.pos).map(|(name, is_dir, data)| ArchiveEntry {
                name: name.clone(),
                is_dir: *is_dir,
                size: data.len() as u64,
            });
            self.pos += 1;
            Ok(entry)
        }

        fn read_current(&mut self) -> Result<Vec<u8>> {
            Ok(self.entries[self.pos - 1].2.to_vec())
        }
    }

    fn extractor(entries: Vec<(RawName, bool, &'static [u8])>, config: ExtractionConfig) -> Extractor {
        let registry =
            HandlerRegistry::empty().register(".mem", Handler::per_entry(MemoryFormat(entries)));
        Extractor::with_registry(registry, config)
    }

    fn bytes(raw: &[u8]) -> RawName {
        RawName::Bytes(raw.to_vec())
    }

    #[test]
    fn test_recodes_and_writes() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("archive.mem");
        let extractor = extractor(
            vec![(bytes(b"\x83\x66\x81\x5B\x83\x5E.txt"), false, b"hello")],
            ExtractionConfig::default(),
        );

        let report = extractor.extract(&archive).unwrap();

        let written = temp.path().join("archive").join("データ.txt");
        assert_eq!(fs::read(written).unwrap(), b"hello");
        assert_eq!(report.files_extracted, 1);
        assert_eq!(report.directories_created, 1);
        assert_eq!(report.bytes_written, 5);
        assert_eq!(report.strategy, Strategy::PerEntry);
    }

    #[test]
    fn test_directory_entries_create_dirs() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("a.mem");
        let extractor = extractor(
            vec![
                (bytes(b"\x8E\xCA\x90\x5E/"), false, b""),
                (RawName::Unicode("flagged".into()), true, b""),
            ],
            ExtractionConfig::default(),
        );

        let report = extractor.extract(&archive).unwrap();

        assert!(temp.path().join("a").join("写真").is_dir());
        assert!(temp.path().join("a").join("flagged").is_dir());
        assert_eq!(report.files_extracted, 0);
        assert_eq!(report.directories_created, 3);
    }

    #[test]
    fn test_undecodable_name_is_skipped() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("a.mem");
        let extractor = extractor(
            vec![
                (bytes(b"bad\xFD.txt"), false, b"x"),
                (bytes(b"ok.txt"), false, b"y"),
            ],
            ExtractionConfig::default(),
        );

        let report = extractor.extract(&archive).unwrap();

        assert_eq!(report.files_extracted, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].kind, SkipReason::UndecodableName);
        assert_eq!(report.skipped[0].name, "bad\\xFD.txt");
        assert!(temp.path().join("a").join("ok.txt").exists());
    }

    #[test]
    fn test_undecodable_name_aborts() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("a.mem");
        let extractor = extractor(
            vec![(bytes(b"bad\xFD.txt"), false, b"x")],
            ExtractionConfig::default().with_decode_error_policy(DecodeErrorPolicy::Abort),
        );

        let err = extractor.extract(&archive).unwrap_err();
        assert!(matches!(err, ExtractionError::FilenameDecode(_)));
    }

    #[test]
    fn test_unsafe_path_is_skipped() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("a.mem");
        let extractor = extractor(
            vec![(bytes(b"../escape.txt"), false, b"x")],
            ExtractionConfig::default(),
        );

        let report = extractor.extract(&archive).unwrap();

        assert_eq!(report.skipped[0].kind, SkipReason::UnsafePath);
        assert!(!temp.path().join("escape.txt").exists());
    }

    #[test]
    fn test_collision_last_write_wins() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("a.mem");
        let extractor = extractor(
            vec![
                (bytes(b"\x83\x66\x81\x5B\x83\x5E.txt"), false, b"first"),
                (RawName::Unicode("データ.txt".into()), false, b"second"),
            ],
            ExtractionConfig::default(),
        );

        let report = extractor.extract(&archive).unwrap();

        let written = temp.path().join("a").join("データ.txt");
        assert_eq!(fs::read(written).unwrap(), b"second");
        assert_eq!(report.files_extracted, 2);
        assert_eq!(report.files_overwritten, 1);
    }

    #[test]
    fn test_unsupported_leaves_no_trace() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("data.xyz");
        fs::write(&archive, b"whatever").unwrap();

        let err = Extractor::default().extract(&archive).unwrap_err();

        assert!(matches!(err, ExtractionError::UnsupportedArchiveType { .. }));
        assert!(!temp.path().join("data").exists());
    }

    #[test]
    fn test_fail_fast_stops_batch() {
        let temp = TempDir::new().unwrap();
        let extractor = extractor(
            vec![(bytes(b"a.txt"), false, b"a")],
            ExtractionConfig::default().with_batch_policy(BatchPolicy::FailFast),
        );
        let archives = [
            temp.path().join("bad.xyz"),
            temp.path().join("good.mem"),
        ];

        let batch = extractor.extract_all(&archives);

        assert_eq!(batch.outcomes.len(), 1);
        assert_eq!(batch.not_attempted(), 1);
        assert!(!temp.path().join("good").exists());
    }

    #[test]
    fn test_isolate_continues_batch() {
        let temp = TempDir::new().unwrap();
        let extractor = extractor(
            vec![(bytes(b"a.txt"), false, b"a")],
            ExtractionConfig::default(),
        );
        let archives = [
            temp.path().join("bad.xyz"),
            temp.path().join("good.mem"),
        ];

        let batch = extractor.extract_all(&archives);

        assert_eq!(batch.outcomes.len(), 2);
        assert_eq!(batch.failures().count(), 1);
        assert!(temp.path().join("good").join("a.txt").exists());
    }

    #[test]
    fn test_progress_callbacks() {
        #[derive(Default)]
        struct Recorder(Vec<String>);

        impl ProgressCallback for Recorder {
            fn on_archive_start(&mut self, _path: &Path, current: usize, total: usize) {
                self.0.push(format!("start {current}/{total}"));
            }

            fn on_entry(&mut self, name: &str) {
                self.0.push(format!("entry {name}"));
            }

            fn on_archive_complete(&mut self, _path: &Path, succeeded: bool) {
                self.0.push(format!("done {succeeded}"));
            }
        }

        let temp = TempDir::new().unwrap();
        let extractor = extractor(
            vec![(bytes(b"a.txt"), false, b"a")],
            ExtractionConfig::default(),
        );
        let mut recorder = Recorder::default();
        extractor
            .extract_with_progress(&temp.path().join("x.mem"), &mut recorder)
            .unwrap();

        assert_eq!(recorder.0, ["start 1/1", "entry a.txt", "done true"]);
    }
}
