//! Archive listing implementation.

use std::path::Path;

use crate::ExtractionError;
use crate::Result;
use crate::recode::recode_with_tier;
use crate::registry::Handler;
use crate::registry::HandlerRegistry;
use crate::registry::extension_of;

use super::manifest::ArchiveManifest;
use super::manifest::ManifestEntry;

/// Lists archive contents without extracting, using the built-in registry.
///
/// # Errors
///
/// Returns `UnsupportedArchiveType` for unbound extensions,
/// `ListingUnsupported` for bulk formats, and open or read errors from the
/// backend. Undecodable names are reported per entry, not as errors.
pub fn list_archive<P: AsRef<Path>>(archive_path: P) -> Result<ArchiveManifest> {
    list_archive_with(&HandlerRegistry::builtin(), archive_path.as_ref())
}

/// Lists archive contents using `registry`.
///
/// # Errors
///
/// See [`list_archive`].
pub fn list_archive_with(registry: &HandlerRegistry, archive_path: &Path) -> Result<ArchiveManifest> {
    let extension = extension_of(archive_path);
    let format = match registry.handler_for(&extension)? {
        Handler::PerEntry(format) => format,
        Handler::Bulk(_) => return Err(ExtractionError::ListingUnsupported { extension }),
    };

    let mut reader = format.open(archive_path)?;
    let mut manifest = ArchiveManifest::new(archive_path.to_path_buf(), format.name());

    for entry in reader.list_entries()? {
        let recoded = recode_with_tier(&entry.name);
        let is_dir = entry.is_dir || recoded.as_ref().is_ok_and(|r| r.name.ends_with('/'));
        let (name, tier) = match recoded {
            Ok(recoded) => (Ok(recoded.name), recoded.tier),
            Err(err) => (Err(err), None),
        };
        manifest.add_entry(ManifestEntry {
            raw: entry.name.display_raw(),
            name,
            tier,
            size: entry.size,
            is_dir,
        });
    }

    Ok(manifest)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::recode::ShiftJisTier;
    use crate::test_utils::LegacyZipBuilder;
    use tempfile::TempDir;

    #[test]
    fn test_list_legacy_zip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.zip");
        LegacyZipBuilder::new()
            .dir(b"\x8E\xCA\x90\x5E/")
            .file(b"\x8E\xCA\x90\x5E/\x83\x5C.txt", b"12345")
            .file(b"bad\xFD", b"")
            .write_to(&path);

        let manifest = list_archive(&path).unwrap();

        assert_eq!(manifest.format, "zip");
        assert_eq!(manifest.total_entries(), 3);
        assert_eq!(manifest.total_size, 5);
        assert_eq!(manifest.undecodable(), 1);

        assert!(manifest.entries[0].is_dir);
        assert_eq!(manifest.entries[0].name.as_deref().unwrap(), "写真/");
        assert_eq!(manifest.entries[1].name.as_deref().unwrap(), "写真/ソ.txt");
        assert_eq!(manifest.entries[1].tier, Some(ShiftJisTier::Strict));
        assert!(!manifest.entries[1].is_dir);
        assert_eq!(manifest.entries[2].raw, "bad\\xFD");
    }

    #[test]
    fn test_list_bulk_format_unsupported() {
        let result = list_archive("a.tgz");
        assert!(matches!(
            result,
            Err(ExtractionError::ListingUnsupported { ref extension }) if extension == ".tgz"
        ));
    }

    #[test]
    fn test_list_unknown_extension() {
        let result = list_archive("a.xyz");
        assert!(matches!(
            result,
            Err(ExtractionError::UnsupportedArchiveType { .. })
        ));
    }
}
