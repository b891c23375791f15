//! Error types for archive extraction operations.

use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Boxed cause reported by an archive backend.
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An entry name that decodes under neither Shift-JIS tier.
///
/// Carries the raw bytes so the offending entry can still be identified in
/// reports and log lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("filename is not valid Shift-JIS: {}", HexBytes(.raw))]
pub struct FilenameDecodeError {
    /// Raw name bytes as stored in the archive directory.
    pub raw: Vec<u8>,
}

impl FilenameDecodeError {
    /// Creates a decode error for the given raw name bytes.
    #[must_use]
    pub fn new(raw: impl Into<Vec<u8>>) -> Self {
        Self { raw: raw.into() }
    }
}

/// Displays a byte slice as printable ASCII with `\xNN` escapes.
pub struct HexBytes<'a>(pub &'a [u8]);

impl fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", char::from(b))?;
            } else {
                write!(f, "\\x{b:02X}")?;
            }
        }
        Ok(())
    }
}

/// Errors that can occur during archive extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The archive extension has no handler binding.
    #[error("unsupported archive type: '{extension}'")]
    UnsupportedArchiveType {
        /// Extension including the leading dot, empty if the name has none.
        extension: String,
    },

    /// The backend could not open or parse the archive.
    #[error("failed to open archive {}: {source}", .path.display())]
    ArchiveOpen {
        /// Archive path.
        path: PathBuf,
        /// Backend cause.
        #[source]
        source: BackendError,
    },

    /// An entry could not be read after the archive was opened.
    #[error("failed to read archive {}: {reason}", .path.display())]
    ArchiveRead {
        /// Archive path.
        path: PathBuf,
        /// Backend message.
        reason: String,
    },

    /// Neither Shift-JIS tier could decode an entry name.
    #[error(transparent)]
    FilenameDecode(#[from] FilenameDecodeError),

    /// A recoded entry name would escape the destination directory.
    #[error("entry path escapes destination: {name}")]
    UnsafeEntryPath {
        /// Recoded entry name.
        name: String,
    },

    /// Directory creation or file write failed.
    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        /// Path being created or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The format is extracted in bulk and cannot be enumerated.
    #[error("listing is not supported for '{extension}' archives")]
    ListingUnsupported {
        /// Extension including the leading dot.
        extension: String,
    },
}

impl ExtractionError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn filesystem(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Wraps a backend failure raised while opening `path`.
    pub fn open(path: impl AsRef<Path>, source: impl Into<BackendError>) -> Self {
        Self::ArchiveOpen {
            path: path.as_ref().to_path_buf(),
            source: source.into(),
        }
    }

    /// Wraps a backend failure raised while reading entries of `path`.
    pub fn read(path: impl AsRef<Path>, reason: impl fmt::Display) -> Self {
        Self::ArchiveRead {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Returns `true` if this error concerns a single entry.
    ///
    /// Entry-scoped errors can be skipped without abandoning the rest of the
    /// archive; everything else ends processing of the archive.
    ///
    /// # Examples
    ///
    /// ```
    /// use unarc_core::ExtractionError;
    /// use unarc_core::FilenameDecodeError;
    ///
    /// let err = ExtractionError::from(FilenameDecodeError::new(vec![0xFF]));
    /// assert!(err.is_entry_scoped());
    ///
    /// let err = ExtractionError::UnsupportedArchiveType {
    ///     extension: ".xyz".into(),
    /// };
    /// assert!(!err.is_entry_scoped());
    /// ```
    #[must_use]
    pub const fn is_entry_scoped(&self) -> bool {
        matches!(
            self,
            Self::FilenameDecode(_) | Self::UnsafeEntryPath { .. }
        )
    }

    /// Returns the filesystem or archive path attached to this error.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::ArchiveOpen { path, .. }
            | Self::ArchiveRead { path, .. }
            | Self::Filesystem { path, .. } => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_names_extension() {
        let err = ExtractionError::UnsupportedArchiveType {
            extension: ".xyz".into(),
        };
        assert_eq!(err.to_string(), "unsupported archive type: '.xyz'");
    }

    #[test]
    fn test_decode_error_display_escapes_bytes() {
        let err = FilenameDecodeError::new(vec![b'a', 0x83, b'.', 0xFF]);
        assert_eq!(
            err.to_string(),
            "filename is not valid Shift-JIS: a\\x83.\\xFF"
        );
    }

    #[test]
    fn test_open_error_keeps_source() {
        use std::error::Error;

        let io_err = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad header");
        let err = ExtractionError::open("b.zip", io_err);
        assert!(err.to_string().contains("b.zip"));
        assert!(err.to_string().contains("bad header"));
        assert!(err.source().is_some());
        assert_eq!(err.path(), Some(Path::new("b.zip")));
    }

    #[test]
    fn test_filesystem_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ExtractionError::filesystem("out/file.txt", io_err);
        assert!(err.to_string().contains("out/file.txt"));
        assert!(!err.is_entry_scoped());
    }

    #[test]
    fn test_entry_scoped() {
        let err = ExtractionError::UnsafeEntryPath {
            name: "../etc/passwd".into(),
        };
        assert!(err.is_entry_scoped());
        assert_eq!(err.path(), None);

        let err = ExtractionError::read("a.zip", "crc mismatch");
        assert!(!err.is_entry_scoped());
    }
}
