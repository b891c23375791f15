//! ZIP archive format handler.
//!
//! Entries are read one at a time through the `zip` crate. The crate
//! decodes names without the UTF-8 flag as code page 437; the handler
//! detects that case and hands the original bytes to the recoder instead.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use zip::ZipArchive;

use crate::ExtractionError;
use crate::Result;
use crate::recode::RawName;
use crate::recode::cp437;

use super::traits::ArchiveEntry;
use super::traits::ArchiveReader;
use super::traits::EntryFormat;

/// ZIP archive handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipFormat;

impl EntryFormat for ZipFormat {
    fn name(&self) -> &'static str {
        "zip"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn ArchiveReader>> {
        let file = File::open(path).map_err(|e| ExtractionError::open(path, e))?;
        let archive =
            ZipArchive::new(BufReader::new(file)).map_err(|e| ExtractionError::open(path, e))?;
        Ok(Box::new(ZipReader {
            path: path.to_path_buf(),
            archive,
            next: 0,
        }))
    }
}

/// Cursor over the central directory of an opened ZIP file.
struct ZipReader {
    path: PathBuf,
    archive: ZipArchive<BufReader<File>>,
    next: usize,
}

impl ArchiveReader for ZipReader {
    fn next_entry(&mut self) -> Result<Option<ArchiveEntry>> {
        if self.next >= self.archive.len() {
            return Ok(None);
        }
        let index = self.next;
        self.next += 1;

        let file = self
            .archive
            .by_index_raw(index)
            .map_err(|e| ExtractionError::read(&self.path, e))?;

        // `is_dir` is decided from the recoded name: the crate checks for a
        // trailing backslash, which is also a valid Shift-JIS trail byte.
        Ok(Some(ArchiveEntry {
            name: raw_name(file.name(), file.name_raw()),
            is_dir: false,
            size: file.size(),
        }))
    }

    fn read_current(&mut self) -> Result<Vec<u8>> {
        let index = self
            .next
            .checked_sub(1)
            .ok_or_else(|| ExtractionError::read(&self.path, "no current entry"))?;

        let mut file = self
            .archive
            .by_index(index)
            .map_err(|e| ExtractionError::read(&self.path, e))?;
        let mut content = Vec::new();
        file.read_to_end(&mut content)
            .map_err(|e| ExtractionError::read(&self.path, e))?;
        Ok(content)
    }
}

/// Classifies a ZIP entry name.
///
/// - decoded equals raw: ASCII, or UTF-8 flagged
/// - decoded is the cp437 reading of raw: legacy bytes, recode them
/// - anything else came from the Info-ZIP Unicode Path extra field
fn raw_name(decoded: &str, raw: &[u8]) -> RawName {
    if decoded.as_bytes() != raw && cp437::decode(raw) == decoded {
        RawName::Bytes(raw.to_vec())
    } else {
        RawName::Unicode(decoded.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::LegacyZipBuilder;
    use tempfile::TempDir;

    const DATA_TXT: &[u8] = b"\x83\x66\x81\x5B\x83\x5E.txt";

    #[test]
    fn test_raw_name_classification() {
        assert_eq!(
            raw_name("a.txt", b"a.txt"),
            RawName::Unicode("a.txt".into())
        );
        assert_eq!(
            raw_name("データ.txt", "データ.txt".as_bytes()),
            RawName::Unicode("データ.txt".into())
        );
        assert_eq!(
            raw_name(&cp437::decode(DATA_TXT), DATA_TXT),
            RawName::Bytes(DATA_TXT.to_vec())
        );
        assert_eq!(
            raw_name("データ.txt", DATA_TXT),
            RawName::Unicode("データ.txt".into())
        );
    }

    #[test]
    fn test_reads_legacy_entries_in_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("legacy.zip");
        LegacyZipBuilder::new()
            .file(DATA_TXT, b"hello")
            .dir(b"sub/")
            .utf8_file("sub/b.txt", b"world")
            .write_to(&path);

        let mut reader = ZipFormat.open(&path).unwrap();

        let first = reader.next_entry().unwrap().unwrap();
        assert_eq!(first.name, RawName::Bytes(DATA_TXT.to_vec()));
        assert_eq!(first.size, 5);
        assert_eq!(reader.read_current().unwrap(), b"hello");

        let second = reader.next_entry().unwrap().unwrap();
        assert_eq!(second.name, RawName::Unicode("sub/".into()));

        let third = reader.next_entry().unwrap().unwrap();
        assert_eq!(third.name, RawName::Unicode("sub/b.txt".into()));
        assert_eq!(reader.read_current().unwrap(), b"world");

        assert!(reader.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_read_before_next_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.zip");
        LegacyZipBuilder::new().file(b"a.txt", b"a").write_to(&path);

        let mut reader = ZipFormat.open(&path).unwrap();
        assert!(matches!(
            reader.read_current(),
            Err(ExtractionError::ArchiveRead { .. })
        ));
    }

    #[test]
    fn test_open_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("b.zip");
        std::fs::write(&path, b"PK\x03\x04 not really a zip").unwrap();

        let result = ZipFormat.open(&path);
        assert!(matches!(result, Err(ExtractionError::ArchiveOpen { .. })));
    }

    #[test]
    fn test_open_missing() {
        let result = ZipFormat.open(Path::new("/nonexistent/missing.zip"));
        assert!(matches!(result, Err(ExtractionError::ArchiveOpen { .. })));
    }
}
