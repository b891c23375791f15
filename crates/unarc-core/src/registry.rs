//! Extension to handler bindings.
//!
//! The registry is built once and then only consulted. Each binding carries
//! its strategy in the [`Handler`] variant, so the driver never has to ask
//! a backend what it can do.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;
use crate::formats::BulkFormat;
use crate::formats::CompressionCodec;
use crate::formats::EntryFormat;
use crate::formats::SevenZFormat;
use crate::formats::TarFormat;
use crate::formats::ZipFormat;

/// A registered archive handler and its extraction strategy.
pub enum Handler {
    /// Entries are enumerated and their names recoded one by one.
    PerEntry(Box<dyn EntryFormat>),
    /// The backend extracts the whole archive in one call.
    Bulk(Box<dyn BulkFormat>),
}

impl Handler {
    /// Binds a per-entry format.
    pub fn per_entry(format: impl EntryFormat + 'static) -> Self {
        Self::PerEntry(Box::new(format))
    }

    /// Binds a bulk format.
    pub fn bulk(format: impl BulkFormat + 'static) -> Self {
        Self::Bulk(Box::new(format))
    }

    /// Backend format name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PerEntry(format) => format.name(),
            Self::Bulk(format) => format.name(),
        }
    }

    /// Strategy of this handler.
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        match self {
            Self::PerEntry(_) => Strategy::PerEntry,
            Self::Bulk(_) => Strategy::Bulk,
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(self.strategy().as_str())
            .field(&self.name())
            .finish()
    }
}

/// How an archive is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Entry by entry with filename recovery.
    PerEntry,
    /// Whole archive in one backend call, names as the backend decodes them.
    Bulk,
}

impl Strategy {
    /// Short lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PerEntry => "per-entry",
            Self::Bulk => "bulk",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable mapping from archive extension to [`Handler`].
///
/// Extensions include the leading dot and are matched case-sensitively.
///
/// # Examples
///
/// ```
/// use unarc_core::HandlerRegistry;
/// use unarc_core::Strategy;
///
/// let registry = HandlerRegistry::builtin();
/// assert_eq!(registry.handler_for(".zip")?.strategy(), Strategy::PerEntry);
/// assert_eq!(registry.handler_for(".7z")?.strategy(), Strategy::Bulk);
/// assert!(registry.handler_for(".ZIP").is_err());
/// # Ok::<(), unarc_core::ExtractionError>(())
/// ```
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    handlers: BTreeMap<String, Handler>,
}

impl HandlerRegistry {
    /// Creates a registry with no bindings.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates the registry of built-in formats.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty()
            .register(".zip", Handler::per_entry(ZipFormat))
            .register(".7z", Handler::bulk(SevenZFormat))
            .register(".tar", Handler::bulk(TarFormat::plain()));
        for codec in CompressionCodec::ALL {
            registry = registry.register(
                codec.tar_extension(),
                Handler::bulk(TarFormat::compressed(codec)),
            );
        }
        #[cfg(feature = "rar")]
        {
            registry = registry.register(".rar", Handler::per_entry(crate::formats::RarFormat));
        }
        registry
    }

    /// Binds `extension` to `handler`, replacing any earlier binding.
    #[must_use]
    pub fn register(mut self, extension: impl Into<String>, handler: Handler) -> Self {
        self.handlers.insert(extension.into(), handler);
        self
    }

    /// Looks up the handler bound to `extension`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedArchiveType` if nothing is bound.
    pub fn handler_for(&self, extension: &str) -> Result<&Handler> {
        self.handlers
            .get(extension)
            .ok_or_else(|| ExtractionError::UnsupportedArchiveType {
                extension: extension.to_owned(),
            })
    }

    /// Looks up the handler for the extension of `path`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedArchiveType` if nothing is bound.
    pub fn handler_for_path(&self, path: &Path) -> Result<&Handler> {
        self.handler_for(&extension_of(path))
    }

    /// Bound extensions in sorted order.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Bindings in extension order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Handler)> {
        self.handlers.iter().map(|(ext, handler)| (ext.as_str(), handler))
    }
}

/// Returns the extension of `path` with its leading dot.
///
/// The extension is the suffix after the last `.` of the file name, so
/// `a.tar.gz` yields `.gz`. Returns an empty string when there is none.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use unarc_core::registry::extension_of;
///
/// assert_eq!(extension_of(Path::new("dir/archive.zip")), ".zip");
/// assert_eq!(extension_of(Path::new("README")), "");
/// ```
#[must_use]
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Returns the extraction destination for `archive`: the same path with
/// its extension removed.
#[must_use]
pub fn destination_for(archive: &Path) -> PathBuf {
    archive.with_extension("")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_bindings() {
        let registry = HandlerRegistry::builtin();
        assert_eq!(
            registry.handler_for(".zip").unwrap().strategy(),
            Strategy::PerEntry
        );
        for ext in [".7z", ".tar", ".tgz", ".tbz2", ".txz", ".tzst"] {
            assert_eq!(
                registry.handler_for(ext).unwrap().strategy(),
                Strategy::Bulk,
                "{ext}"
            );
        }
        assert_eq!(registry.handler_for(".tgz").unwrap().name(), "tar.gz");
    }

    #[cfg(feature = "rar")]
    #[test]
    fn test_rar_binding() {
        let registry = HandlerRegistry::builtin();
        assert_eq!(
            registry.handler_for(".rar").unwrap().strategy(),
            Strategy::PerEntry
        );
    }

    #[test]
    fn test_unknown_extension() {
        let registry = HandlerRegistry::builtin();
        let err = registry.handler_for(".xyz").unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::UnsupportedArchiveType { ref extension } if extension == ".xyz"
        ));
    }

    #[test]
    fn test_extension_is_case_sensitive() {
        let registry = HandlerRegistry::builtin();
        assert!(registry.handler_for(".Zip").is_err());
        assert!(registry.handler_for_path(Path::new("A.ZIP")).is_err());
    }

    #[test]
    fn test_register_overrides() {
        let registry = HandlerRegistry::empty()
            .register(".zip", Handler::bulk(SevenZFormat))
            .register(".zip", Handler::per_entry(ZipFormat));
        assert_eq!(
            registry.handler_for(".zip").unwrap().strategy(),
            Strategy::PerEntry
        );
        assert_eq!(registry.extensions().collect::<Vec<_>>(), [".zip"]);
    }

    #[test]
    fn test_extensions_sorted() {
        let registry = HandlerRegistry::builtin();
        let extensions: Vec<_> = registry.extensions().collect();
        let mut sorted = extensions.clone();
        sorted.sort_unstable();
        assert_eq!(extensions, sorted);
        assert!(extensions.contains(&".tzst"));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("archive.zip")), ".zip");
        assert_eq!(extension_of(Path::new("archive.tar.gz")), ".gz");
        assert_eq!(extension_of(Path::new("noext")), "");
        assert_eq!(extension_of(Path::new(".hidden")), "");
    }

    #[test]
    fn test_destination_for() {
        assert_eq!(
            destination_for(Path::new("/data/archive.zip")),
            PathBuf::from("/data/archive")
        );
        assert_eq!(
            destination_for(Path::new("photos.2024.zip")),
            PathBuf::from("photos.2024")
        );
    }

    #[test]
    fn test_handler_debug() {
        let handler = Handler::per_entry(ZipFormat);
        assert_eq!(format!("{handler:?}"), "per-entry(\"zip\")");
    }
}
