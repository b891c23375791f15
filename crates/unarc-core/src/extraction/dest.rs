//! Destination path handling for per-entry extraction.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;

/// Where a recoded entry lands under the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPath {
    /// A regular file to write.
    File(PathBuf),
    /// A directory to create.
    Directory(PathBuf),
}

impl EntryPath {
    /// The resolved filesystem path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        match self {
            Self::File(path) | Self::Directory(path) => path,
        }
    }
}

/// Maps a recoded entry name onto `dest`.
///
/// The name is split on `/`; empty and `.` segments are dropped. A trailing
/// `/` or `is_dir` makes the entry a directory. Unless `allow_unsafe` is
/// set, names with a `..` segment, a leading `/` or a drive or UNC prefix
/// fail with `UnsafeEntryPath`. A file entry that resolves to `dest` itself
/// is always rejected.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use unarc_core::extraction::EntryPath;
/// use unarc_core::extraction::resolve_entry_path;
///
/// let dest = Path::new("out");
/// assert_eq!(
///     resolve_entry_path(dest, "docs/データ.txt", false, false)?,
///     EntryPath::File(dest.join("docs").join("データ.txt")),
/// );
/// assert!(resolve_entry_path(dest, "../evil", false, false).is_err());
/// # Ok::<(), unarc_core::ExtractionError>(())
/// ```
pub fn resolve_entry_path(
    dest: &Path,
    name: &str,
    is_dir: bool,
    allow_unsafe: bool,
) -> Result<EntryPath> {
    let unsafe_path = || ExtractionError::UnsafeEntryPath {
        name: name.to_owned(),
    };

    let is_dir = is_dir || name.ends_with('/');
    let rooted = name.starts_with('/');
    if rooted && !allow_unsafe {
        return Err(unsafe_path());
    }

    let mut path = if rooted {
        PathBuf::from("/")
    } else {
        dest.to_path_buf()
    };
    let mut depth = 0usize;
    for segment in name.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        if !allow_unsafe && !is_plain_segment(segment) {
            return Err(unsafe_path());
        }
        path.push(segment);
        depth += 1;
    }

    if is_dir {
        Ok(EntryPath::Directory(path))
    } else if depth == 0 {
        Err(unsafe_path())
    } else {
        Ok(EntryPath::File(path))
    }
}

/// A segment is plain when the host platform reads it as a single normal
/// component. This also catches `\`-separated traversal on Windows.
fn is_plain_segment(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !has_drive_prefix(segment)
}

fn has_drive_prefix(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Cache of directories known to exist under a destination.
///
/// Avoids repeated `mkdir` calls for entries sharing a parent.
#[derive(Debug, Default)]
pub struct DirCache {
    known: HashSet<PathBuf>,
}

impl DirCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures `path` exists as a directory, creating missing ancestors.
    ///
    /// Returns the number of directories created. Existing directories are
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns `Filesystem` if a directory cannot be created or a
    /// non-directory is in the way.
    pub fn ensure_dir(&mut self, path: &Path) -> Result<usize> {
        let mut missing = Vec::new();
        let mut current = Some(path);
        while let Some(dir) = current {
            if dir.as_os_str().is_empty() || self.known.contains(dir) || dir.is_dir() {
                break;
            }
            missing.push(dir);
            current = dir.parent();
        }

        let mut created = 0;
        for dir in missing.iter().rev() {
            match fs::create_dir(dir) {
                Ok(()) => created += 1,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => {}
                Err(e) => return Err(ExtractionError::filesystem(dir, e)),
            }
        }

        let mut current = Some(path);
        while let Some(dir) = current {
            if dir.as_os_str().is_empty() || !self.known.insert(dir.to_path_buf()) {
                break;
            }
            current = dir.parent();
        }
        Ok(created)
    }

    /// Ensures the parent directory of `file` exists.
    ///
    /// # Errors
    ///
    /// See [`ensure_dir`](Self::ensure_dir).
    pub fn ensure_parent(&mut self, file: &Path) -> Result<usize> {
        match file.parent() {
            Some(parent) => self.ensure_dir(parent),
            None => Ok(0),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_file() {
        let dest = Path::new("out");
        assert_eq!(
            resolve_entry_path(dest, "a/b.txt", false, false).unwrap(),
            EntryPath::File(dest.join("a").join("b.txt"))
        );
    }

    #[test]
    fn test_resolve_directory_marker() {
        let dest = Path::new("out");
        assert_eq!(
            resolve_entry_path(dest, "写真/", false, false).unwrap(),
            EntryPath::Directory(dest.join("写真"))
        );
        assert_eq!(
            resolve_entry_path(dest, "写真", true, false).unwrap(),
            EntryPath::Directory(dest.join("写真"))
        );
    }

    #[test]
    fn test_resolve_drops_empty_and_dot_segments() {
        let dest = Path::new("out");
        assert_eq!(
            resolve_entry_path(dest, "./a//b.txt", false, false).unwrap(),
            EntryPath::File(dest.join("a").join("b.txt"))
        );
    }

    #[test]
    fn test_resolve_rejects_unsafe() {
        let dest = Path::new("out");
        for name in ["../x.txt", "a/../../x", "/etc/passwd", "C:/x.txt"] {
            let err = resolve_entry_path(dest, name, false, false).unwrap_err();
            assert!(
                matches!(err, ExtractionError::UnsafeEntryPath { .. }),
                "{name}"
            );
        }
    }

    #[test]
    fn test_resolve_allows_unsafe_when_enabled() {
        let dest = Path::new("out");
        assert_eq!(
            resolve_entry_path(dest, "../x.txt", false, true).unwrap(),
            EntryPath::File(dest.join("..").join("x.txt"))
        );
    }

    #[test]
    fn test_resolve_rejects_empty_file_name() {
        let dest = Path::new("out");
        assert!(resolve_entry_path(dest, "./", true, false).is_ok());
        assert!(resolve_entry_path(dest, ".", false, false).is_err());
    }

    #[test]
    fn test_dir_cache_counts_created() {
        let temp = TempDir::new().unwrap();
        let mut cache = DirCache::new();
        let nested = temp.path().join("a").join("b");

        assert_eq!(cache.ensure_dir(&nested).unwrap(), 2);
        assert!(nested.is_dir());
        assert_eq!(cache.ensure_dir(&nested).unwrap(), 0);
        assert_eq!(cache.ensure_dir(&temp.path().join("a")).unwrap(), 0);
    }

    #[test]
    fn test_dir_cache_existing_dir() {
        let temp = TempDir::new().unwrap();
        let mut cache = DirCache::new();
        assert_eq!(cache.ensure_dir(temp.path()).unwrap(), 0);
    }

    #[test]
    fn test_dir_cache_file_in_the_way() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let mut cache = DirCache::new();
        let err = cache.ensure_dir(&blocker.join("sub")).unwrap_err();
        assert!(matches!(err, ExtractionError::Filesystem { .. }));
    }

    #[test]
    fn test_ensure_parent() {
        let temp = TempDir::new().unwrap();
        let mut cache = DirCache::new();
        let file = temp.path().join("x").join("y.txt");
        assert_eq!(cache.ensure_parent(&file).unwrap(), 1);
        assert!(temp.path().join("x").is_dir());
    }
}
