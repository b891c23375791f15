//! Test utilities for building archives in memory.
//!
//! Most ZIP writers refuse to store a name without the UTF-8 flag unless it
//! is ASCII, so [`LegacyZipBuilder`] writes the format by hand to produce
//! archives the way Japanese Windows tools do.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;
use std::path::Path;

use crate::formats::compression::CompressionCodec;

/// Creates an in-memory TAR archive from a list of entries.
///
/// Each entry is a tuple of (path, content). Files are created with mode 0o644.
///
/// # Examples
///
/// ```
/// use unarc_core::test_utils::create_test_tar;
///
/// let tar_data = create_test_tar(&[("file.txt", b"hello"), ("dir/nested.txt", b"world")]);
/// ```
#[must_use]
pub fn create_test_tar(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut ar = tar::Builder::new(Vec::new());
    for &(path, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        ar.append_data(&mut header, path, data).unwrap();
    }
    ar.into_inner().unwrap()
}

/// Creates an in-memory ZIP archive with UTF-8 names.
///
/// Files are stored uncompressed with mode 0o644.
#[must_use]
pub fn create_test_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    use zip::write::SimpleFileOptions;
    use zip::write::ZipWriter;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored)
        .unix_permissions(0o644);

    for &(path, data) in entries {
        zip.start_file(path, options).unwrap();
        zip.write_all(data).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

/// Compresses `data` with `codec`.
#[must_use]
pub fn compress(codec: CompressionCodec, data: &[u8]) -> Vec<u8> {
    match codec {
        CompressionCodec::Gzip => {
            let mut encoder =
                flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionCodec::Bzip2 => {
            let mut encoder =
                bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionCodec::Xz => {
            let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionCodec::Zstd => zstd::encode_all(data, 3).unwrap(),
    }
}

/// Gzip shorthand for [`compress`].
#[must_use]
pub fn gzip(data: &[u8]) -> Vec<u8> {
    compress(CompressionCodec::Gzip, data)
}

const UTF8_FLAG: u16 = 0x0800;
const DOS_DIRECTORY: u32 = 0x10;
// 1980-01-01
const DOS_DATE: u16 = 0x0021;

struct LegacyEntry {
    name: Vec<u8>,
    data: Vec<u8>,
    flags: u16,
    external_attrs: u32,
}

/// Builder for stored ZIP archives with byte-exact entry names.
///
/// # Examples
///
/// ```
/// use unarc_core::test_utils::LegacyZipBuilder;
///
/// // "データ.txt" in Shift-JIS, UTF-8 flag clear
/// let zip_data = LegacyZipBuilder::new()
///     .file(b"\x83\x66\x81\x5B\x83\x5E.txt", b"content")
///     .utf8_file("plain.txt", b"content")
///     .build();
/// assert!(!zip_data.is_empty());
/// ```
#[derive(Default)]
pub struct LegacyZipBuilder {
    entries: Vec<LegacyEntry>,
}

impl LegacyZipBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file whose name is stored as raw bytes without the UTF-8 flag.
    #[must_use]
    pub fn file(mut self, name: &[u8], data: &[u8]) -> Self {
        self.entries.push(LegacyEntry {
            name: name.to_vec(),
            data: data.to_vec(),
            flags: 0,
            external_attrs: 0,
        });
        self
    }

    /// Adds a directory entry. `name` should end with `/`.
    #[must_use]
    pub fn dir(mut self, name: &[u8]) -> Self {
        self.entries.push(LegacyEntry {
            name: name.to_vec(),
            data: Vec::new(),
            flags: 0,
            external_attrs: DOS_DIRECTORY,
        });
        self
    }

    /// Adds a file with a UTF-8 name and the UTF-8 flag set.
    #[must_use]
    pub fn utf8_file(mut self, name: &str, data: &[u8]) -> Self {
        self.entries.push(LegacyEntry {
            name: name.as_bytes().to_vec(),
            data: data.to_vec(),
            flags: UTF8_FLAG,
            external_attrs: 0,
        });
        self
    }

    /// Serializes the archive.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut central = Vec::new();

        for entry in &self.entries {
            let mut crc = flate2::Crc::new();
            crc.update(&entry.data);
            let crc = crc.sum();
            let size = u32::try_from(entry.data.len()).unwrap();
            let name_len = u16::try_from(entry.name.len()).unwrap();
            let offset = u32::try_from(out.len()).unwrap();

            put_u32(&mut out, 0x0403_4b50);
            put_u16(&mut out, 20);
            put_u16(&mut out, entry.flags);
            put_u16(&mut out, 0);
            put_u16(&mut out, 0);
            put_u16(&mut out, DOS_DATE);
            put_u32(&mut out, crc);
            put_u32(&mut out, size);
            put_u32(&mut out, size);
            put_u16(&mut out, name_len);
            put_u16(&mut out, 0);
            out.extend_from_slice(&entry.name);
            out.extend_from_slice(&entry.data);

            put_u32(&mut central, 0x0201_4b50);
            put_u16(&mut central, 20);
            put_u16(&mut central, 20);
            put_u16(&mut central, entry.flags);
            put_u16(&mut central, 0);
            put_u16(&mut central, 0);
            put_u16(&mut central, DOS_DATE);
            put_u32(&mut central, crc);
            put_u32(&mut central, size);
            put_u32(&mut central, size);
            put_u16(&mut central, name_len);
            put_u16(&mut central, 0);
            put_u16(&mut central, 0);
            put_u16(&mut central, 0);
            put_u16(&mut central, 0);
            put_u32(&mut central, entry.external_attrs);
            put_u32(&mut central, offset);
            central.extend_from_slice(&entry.name);
        }

        let count = u16::try_from(self.entries.len()).unwrap();
        let central_offset = u32::try_from(out.len()).unwrap();
        let central_size = u32::try_from(central.len()).unwrap();
        out.extend_from_slice(&central);

        put_u32(&mut out, 0x0605_4b50);
        put_u16(&mut out, 0);
        put_u16(&mut out, 0);
        put_u16(&mut out, count);
        put_u16(&mut out, count);
        put_u32(&mut out, central_size);
        put_u32(&mut out, central_offset);
        put_u16(&mut out, 0);
        out
    }

    /// Serializes the archive to `path`.
    pub fn write_to(self, path: &Path) {
        std::fs::write(path, self.build()).unwrap();
    }
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_tar() {
        let tar_data = create_test_tar(&[("file.txt", b"hello")]);
        assert!(!tar_data.is_empty());
    }

    #[test]
    fn test_create_test_zip() {
        let zip_data = create_test_zip(&[("file.txt", b"hello")]);
        assert!(!zip_data.is_empty());
    }

    #[test]
    fn test_legacy_zip_is_readable() {
        let data = LegacyZipBuilder::new()
            .file(b"\x83\x5C.txt", b"so")
            .dir(b"d/")
            .build();
        let mut archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.by_index_raw(0).unwrap().name_raw(), b"\x83\x5C.txt");
    }

    #[test]
    fn test_compress_every_codec() {
        for codec in CompressionCodec::ALL {
            assert!(!compress(codec, b"data").is_empty(), "{}", codec.name());
        }
    }
}
