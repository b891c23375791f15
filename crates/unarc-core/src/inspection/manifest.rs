//! Archive manifest types.

use std::path::PathBuf;

use crate::FilenameDecodeError;
use crate::recode::ShiftJisTier;

/// One entry as seen by the recoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Stored name, with undecoded bytes escaped.
    pub raw: String,
    /// Recovered name or the decode failure.
    pub name: Result<String, FilenameDecodeError>,
    /// Tier that decoded the name, `None` for Unicode names and failures.
    pub tier: Option<ShiftJisTier>,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

/// Listing of a per-entry archive.
#[derive(Debug, Clone)]
pub struct ArchiveManifest {
    /// Archive path.
    pub archive: PathBuf,
    /// Backend format name.
    pub format: &'static str,
    /// Entries in archive order.
    pub entries: Vec<ManifestEntry>,
    /// Sum of entry sizes.
    pub total_size: u64,
}

impl ArchiveManifest {
    /// Creates an empty manifest.
    #[must_use]
    pub const fn new(archive: PathBuf, format: &'static str) -> Self {
        Self {
            archive,
            format,
            entries: Vec::new(),
            total_size: 0,
        }
    }

    /// Appends an entry.
    pub fn add_entry(&mut self, entry: ManifestEntry) {
        self.total_size = self.total_size.saturating_add(entry.size);
        self.entries.push(entry);
    }

    /// Number of entries.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.entries.len()
    }

    /// Number of entries whose names cannot be recovered.
    #[must_use]
    pub fn undecodable(&self) -> usize {
        self.entries.iter().filter(|e| e.name.is_err()).count()
    }
}
