//! Compression codecs wrapped around TAR streams.
//!
//! # Supported Codecs
//!
//! - **Gzip** (`.tgz`)
//! - **Bzip2** (`.tbz2`)
//! - **Xz** (`.txz`)
//! - **Zstd** (`.tzst`)

use std::io;
use std::io::Read;

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use xz2::read::XzDecoder;

/// Compression codec applied to a TAR stream.
///
/// # Examples
///
/// ```
/// use unarc_core::formats::compression::CompressionCodec;
///
/// assert_eq!(CompressionCodec::Gzip.tar_extension(), ".tgz");
/// assert_eq!(CompressionCodec::Zstd.name(), "zstd");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
    /// Gzip compression (deflate algorithm).
    Gzip,

    /// Bzip2 compression (Burrows-Wheeler algorithm).
    Bzip2,

    /// Xz compression (LZMA2 algorithm).
    Xz,

    /// Zstd compression (Zstandard algorithm).
    Zstd,
}

impl CompressionCodec {
    /// Every codec, in registration order.
    pub const ALL: [Self; 4] = [Self::Gzip, Self::Bzip2, Self::Xz, Self::Zstd];

    /// Returns the single-suffix extension bound to this codec over TAR.
    #[must_use]
    pub const fn tar_extension(self) -> &'static str {
        match self {
            Self::Gzip => ".tgz",
            Self::Bzip2 => ".tbz2",
            Self::Xz => ".txz",
            Self::Zstd => ".tzst",
        }
    }

    /// Returns a human-readable name for this codec.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }

    /// Wraps `reader` in a streaming decoder for this codec.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the decoder cannot be initialized. Only zstd
    /// reads ahead at construction; the other codecs report bad input on the
    /// first read.
    pub fn decoder<'a, R: Read + 'a>(self, reader: R) -> io::Result<Box<dyn Read + 'a>> {
        Ok(match self {
            Self::Gzip => Box::new(GzDecoder::new(reader)),
            Self::Bzip2 => Box::new(BzDecoder::new(reader)),
            Self::Xz => Box::new(XzDecoder::new(reader)),
            Self::Zstd => Box::new(zstd::stream::read::Decoder::new(reader)?),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_tar_extension() {
        assert_eq!(CompressionCodec::Gzip.tar_extension(), ".tgz");
        assert_eq!(CompressionCodec::Bzip2.tar_extension(), ".tbz2");
        assert_eq!(CompressionCodec::Xz.tar_extension(), ".txz");
        assert_eq!(CompressionCodec::Zstd.tar_extension(), ".tzst");
    }

    #[test]
    fn test_codec_name() {
        assert_eq!(CompressionCodec::Gzip.name(), "gzip");
        assert_eq!(CompressionCodec::Bzip2.name(), "bzip2");
        assert_eq!(CompressionCodec::Xz.name(), "xz");
        assert_eq!(CompressionCodec::Zstd.name(), "zstd");
    }

    #[test]
    fn test_gzip_decoder_reads_stream() {
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(b"payload").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut decoder = CompressionCodec::Gzip.decoder(&compressed[..]).unwrap();
        let mut out = String::new();
        decoder.read_to_string(&mut out).unwrap();
        assert_eq!(out, "payload");
    }

    #[test]
    fn test_zstd_decoder_reads_stream() {
        let compressed = zstd::encode_all(&b"payload"[..], 3).unwrap();

        let mut decoder = CompressionCodec::Zstd.decoder(&compressed[..]).unwrap();
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"payload");
    }

    #[test]
    fn test_corrupt_gzip_fails_on_read() {
        let mut decoder = CompressionCodec::Gzip.decoder(&b"not gzip"[..]).unwrap();
        let mut out = Vec::new();
        assert!(decoder.read_to_end(&mut out).is_err());
    }
}
