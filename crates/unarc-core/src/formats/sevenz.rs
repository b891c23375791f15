//! 7z archive format handler.
//!
//! 7z stores names as UTF-16, so there is nothing to recode. The archive is
//! extracted in one call through `sevenz_rust2::decompress_file`.
//!
//! # Limitations
//!
//! - Encrypted archives fail to open (an empty password is supplied)
//! - Entry-level progress is not reported

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use sevenz_rust2::Archive;
use sevenz_rust2::Password;

use crate::ExtractionError;
use crate::Result;

use super::traits::BulkFormat;

/// 7z archive handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SevenZFormat;

impl BulkFormat for SevenZFormat {
    fn name(&self) -> &'static str {
        "7z"
    }

    fn probe(&self, archive: &Path) -> Result<()> {
        let file = File::open(archive).map_err(|e| ExtractionError::open(archive, e))?;
        let mut reader = BufReader::new(file);
        Archive::read(&mut reader, &Password::empty())
            .map(drop)
            .map_err(|e| ExtractionError::open(archive, e.to_string()))
    }

    fn extract_to(&self, archive: &Path, dest: &Path) -> Result<()> {
        sevenz_rust2::decompress_file(archive, dest).map_err(|e| ExtractionError::read(archive, e))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_probe_rejects_garbage() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.7z");
        std::fs::write(&path, b"7z\xBC\xAF\x27\x1C truncated").unwrap();

        let result = SevenZFormat.probe(&path);
        assert!(matches!(result, Err(ExtractionError::ArchiveOpen { .. })));
    }

    #[test]
    fn test_probe_missing_file() {
        let result = SevenZFormat.probe(Path::new("/nonexistent/a.7z"));
        assert!(matches!(result, Err(ExtractionError::ArchiveOpen { .. })));
    }

    #[test]
    fn test_extract_garbage_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.7z");
        std::fs::write(&path, vec![0u8; 64]).unwrap();
        let dest = temp.path().join("out");
        std::fs::create_dir(&dest).unwrap();

        assert!(SevenZFormat.extract_to(&path, &dest).is_err());
    }
}
