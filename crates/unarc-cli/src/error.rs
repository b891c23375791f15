//! Error conversion utilities for CLI.
//!
//! Converts unarc-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::path::Path;
use unarc_core::ExtractionError;
use unarc_core::HandlerRegistry;

/// Converts `ExtractionError` to a user-friendly anyhow error with context.
pub fn convert_extraction_error(err: &ExtractionError, archive: &Path) -> anyhow::Error {
    match err {
        ExtractionError::UnsupportedArchiveType { extension } => {
            let label = if extension.is_empty() {
                "no extension".to_string()
            } else {
                format!("'{extension}'")
            };
            anyhow!(
                "Archive type not supported: {} ({label})\n\
                 HINT: Supported extensions: {}. Extensions are case-sensitive.",
                archive.display(),
                supported_extensions()
            )
        }
        ExtractionError::ArchiveOpen { .. } => {
            anyhow!(
                "{err}\n\
                 HINT: The archive may be corrupted, truncated or encrypted."
            )
        }
        ExtractionError::ArchiveRead { .. } => {
            anyhow!(
                "{err}\n\
                 HINT: Entries written before the error were kept in place."
            )
        }
        ExtractionError::FilenameDecode(decode) => {
            anyhow!(
                "Cannot decode an entry name in '{}': {decode}\n\
                 HINT: Use --on-decode-error skip to extract the remaining entries.",
                archive.display()
            )
        }
        ExtractionError::UnsafeEntryPath { name } => {
            anyhow!(
                "Entry '{name}' in '{}' points outside the destination\n\
                 HINT: Use --allow-unsafe-paths only for archives from trusted sources.",
                archive.display()
            )
        }
        ExtractionError::Filesystem { path, source } => {
            anyhow!(
                "Cannot write '{}' while extracting '{}': {source}",
                path.display(),
                archive.display()
            )
        }
        ExtractionError::ListingUnsupported { extension } => {
            anyhow!(
                "Listing is not available for '{extension}' archives: {}\n\
                 HINT: Only per-entry formats can be listed. See `unarc formats`.",
                archive.display()
            )
        }
    }
}

/// Adds context to a core result about archive operations.
pub fn add_archive_context<T>(
    result: Result<T, ExtractionError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_extraction_error(&e, archive))
}

fn supported_extensions() -> String {
    HandlerRegistry::builtin()
        .extensions()
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use unarc_core::FilenameDecodeError;

    #[test]
    fn test_convert_unsupported_error() {
        let err = ExtractionError::UnsupportedArchiveType {
            extension: ".xyz".into(),
        };
        let converted = convert_extraction_error(&err, Path::new("data.xyz"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("data.xyz"));
        assert!(msg.contains(".zip"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_decode_error() {
        let err = ExtractionError::from(FilenameDecodeError::new(vec![0xFD]));
        let converted = convert_extraction_error(&err, Path::new("a.zip"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("\\xFD"));
        assert!(msg.contains("--on-decode-error"));
    }

    #[test]
    fn test_convert_open_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad header");
        let err = ExtractionError::open("b.zip", io_err);
        let converted = convert_extraction_error(&err, Path::new("b.zip"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("bad header"));
        assert!(msg.contains("corrupted"));
    }
}
