//! TAR archive format handler, plain or compressed.
//!
//! TAR is extracted in bulk by the `tar` crate, which writes names as its
//! own header parsing yields them. Entries that would land outside the
//! destination are skipped by `tar::Archive::unpack`.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

use crate::ExtractionError;
use crate::Result;

use super::compression::CompressionCodec;
use super::traits::BulkFormat;

/// TAR handler with an optional outer compression codec.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TarFormat {
    codec: Option<CompressionCodec>,
}

impl TarFormat {
    /// Handler for uncompressed TAR.
    #[must_use]
    pub const fn plain() -> Self {
        Self { codec: None }
    }

    /// Handler for TAR wrapped in `codec`.
    #[must_use]
    pub const fn compressed(codec: CompressionCodec) -> Self {
        Self { codec: Some(codec) }
    }

    /// Returns the outer compression codec, if any.
    #[must_use]
    pub const fn codec(&self) -> Option<CompressionCodec> {
        self.codec
    }

    fn stream(&self, path: &Path) -> Result<tar::Archive<Box<dyn Read>>> {
        let file = File::open(path).map_err(|e| ExtractionError::open(path, e))?;
        let reader = BufReader::new(file);
        let stream: Box<dyn Read> = match self.codec {
            Some(codec) => codec
                .decoder(reader)
                .map_err(|e| ExtractionError::open(path, e))?,
            None => Box::new(reader),
        };
        Ok(tar::Archive::new(stream))
    }
}

impl BulkFormat for TarFormat {
    fn name(&self) -> &'static str {
        match self.codec {
            None => "tar",
            Some(CompressionCodec::Gzip) => "tar.gz",
            Some(CompressionCodec::Bzip2) => "tar.bz2",
            Some(CompressionCodec::Xz) => "tar.xz",
            Some(CompressionCodec::Zstd) => "tar.zst",
        }
    }

    fn probe(&self, archive: &Path) -> Result<()> {
        let mut reader = self.stream(archive)?;
        let mut entries = reader
            .entries()
            .map_err(|e| ExtractionError::open(archive, e))?;
        match entries.next() {
            Some(Err(e)) => Err(ExtractionError::open(archive, e)),
            Some(Ok(_)) | None => Ok(()),
        }
    }

    fn extract_to(&self, archive: &Path, dest: &Path) -> Result<()> {
        let mut reader = self.stream(archive)?;
        reader
            .unpack(dest)
            .map_err(|e| ExtractionError::read(archive, e))
    }
}
