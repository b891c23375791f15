//! Capabilities an archive backend can offer.
//!
//! A format either exposes its entries one at a time ([`EntryFormat`]) or
//! can only extract everything in one call ([`BulkFormat`]). The registry
//! binds each extension to exactly one of the two.

use std::path::Path;

use crate::Result;
use crate::recode::RawName;

/// A single record inside an opened archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Name as stored by the archive, before recoding.
    pub name: RawName,
    /// Directory flag reported by the backend, when it is encoding-safe.
    pub is_dir: bool,
    /// Uncompressed size in bytes.
    pub size: u64,
}

/// Opens archives of one format for entry-by-entry access.
pub trait EntryFormat: Send + Sync {
    /// Format name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Opens the archive at `path`.
    ///
    /// The returned reader owns the file handle and releases it on drop.
    fn open(&self, path: &Path) -> Result<Box<dyn ArchiveReader>>;
}

/// Forward cursor over the entries of an opened archive.
pub trait ArchiveReader {
    /// Advances to the next entry in the archive's native order.
    ///
    /// Content of the previous entry that was never read is skipped.
    fn next_entry(&mut self) -> Result<Option<ArchiveEntry>>;

    /// Reads the full decompressed content of the entry last returned by
    /// [`next_entry`](Self::next_entry).
    fn read_current(&mut self) -> Result<Vec<u8>>;

    /// Collects all remaining entries without reading their content.
    fn list_entries(&mut self) -> Result<Vec<ArchiveEntry>> {
        let mut entries = Vec::new();
        while let Some(entry) = self.next_entry()? {
            entries.push(entry);
        }
        Ok(entries)
    }
}

/// Extracts whole archives of one format in a single call.
pub trait BulkFormat: Send + Sync {
    /// Format name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Checks that `archive` can be opened, without writing anything.
    ///
    /// Called before the destination directory is created so that an
    /// unreadable archive leaves no trace on disk.
    fn probe(&self, archive: &Path) -> Result<()> {
        std::fs::File::open(archive)
            .map(drop)
            .map_err(|e| crate::ExtractionError::open(archive, e))
    }

    /// Extracts every entry of `archive` under `dest`.
    ///
    /// `dest` exists when this is called. Entry names are written as the
    /// backend decodes them.
    fn extract_to(&self, archive: &Path, dest: &Path) -> Result<()>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct Fixed {
        entries: Vec<ArchiveEntry>,
        pos: usize,
    }

    impl ArchiveReader for Fixed {
        fn next_entry(&mut self) -> Result<Option<ArchiveEntry>> {
            let entry = self.entries.get(self.pos).cloned();
            self.pos += 1;
            Ok(entry)
        }

        fn read_current(&mut self) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_list_entries_drains_cursor() {
        let entry = ArchiveEntry {
            name: RawName::Unicode("a.txt".into()),
            is_dir: false,
            size: 1,
        };
        let mut reader = Fixed {
            entries: vec![entry.clone(), entry],
            pos: 0,
        };
        assert_eq!(reader.list_entries().unwrap().len(), 2);
        assert!(reader.next_entry().unwrap().is_none());
    }
}
