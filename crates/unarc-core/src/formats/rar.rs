//! RAR archive format handler (feature `rar`).
//!
//! The `unrar` crate walks an archive as a typestate cursor: a header is
//! read, then its file is either read or skipped. [`RarReader`] keeps the
//! cursor in whichever state it was left so it fits [`ArchiveReader`].
//!
//! RAR stores wide-character names, so entries are passed to the recoder as
//! `RawName::Unicode`.

use std::mem;
use std::path::Path;
use std::path::PathBuf;

use unrar::CursorBeforeFile;
use unrar::CursorBeforeHeader;
use unrar::OpenArchive;
use unrar::Process;

use crate::ExtractionError;
use crate::Result;
use crate::recode::RawName;

use super::traits::ArchiveEntry;
use super::traits::ArchiveReader;
use super::traits::EntryFormat;

/// RAR archive handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct RarFormat;

impl EntryFormat for RarFormat {
    fn name(&self) -> &'static str {
        "rar"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn ArchiveReader>> {
        let archive = unrar::Archive::new(path)
            .open_for_processing()
            .map_err(|e| ExtractionError::open(path, e.to_string()))?;
        Ok(Box::new(RarReader {
            path: path.to_path_buf(),
            cursor: Cursor::BeforeHeader(archive),
        }))
    }
}

enum Cursor {
    BeforeHeader(OpenArchive<Process, CursorBeforeHeader>),
    BeforeFile(OpenArchive<Process, CursorBeforeFile>),
    Done,
}

struct RarReader {
    path: PathBuf,
    cursor: Cursor,
}

impl ArchiveReader for RarReader {
    fn next_entry(&mut self) -> Result<Option<ArchiveEntry>> {
        let archive = match mem::replace(&mut self.cursor, Cursor::Done) {
            Cursor::BeforeHeader(archive) => archive,
            Cursor::BeforeFile(pending) => pending
                .skip()
                .map_err(|e| ExtractionError::read(&self.path, e))?,
            Cursor::Done => return Ok(None),
        };

        let Some(header) = archive
            .read_header()
            .map_err(|e| ExtractionError::read(&self.path, e))?
        else {
            return Ok(None);
        };

        let file = header.entry();
        let mut name = file.filename.to_string_lossy().into_owned();
        if cfg!(windows) {
            name = name.replace('\\', "/");
        }
        let entry = ArchiveEntry {
            name: RawName::Unicode(name),
            is_dir: file.is_directory(),
            size: u64::try_from(file.unpacked_size).unwrap_or(u64::MAX),
        };
        self.cursor = Cursor::BeforeFile(header);
        Ok(Some(entry))
    }

    fn read_current(&mut self) -> Result<Vec<u8>> {
        match mem::replace(&mut self.cursor, Cursor::Done) {
            Cursor::BeforeFile(pending) => {
                let (content, rest) = pending
                    .read()
                    .map_err(|e| ExtractionError::read(&self.path, e))?;
                self.cursor = Cursor::BeforeHeader(rest);
                Ok(content)
            }
            other => {
                self.cursor = other;
                Err(ExtractionError::read(&self.path, "no current entry"))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.rar");
        std::fs::write(&path, b"Rar!\x1a\x07 truncated").unwrap();

        let result = RarFormat.open(&path);
        assert!(matches!(result, Err(ExtractionError::ArchiveOpen { .. })));
    }
}
