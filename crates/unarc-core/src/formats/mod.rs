//! Archive format implementations.

pub mod compression;
#[cfg(feature = "rar")]
pub mod rar;
pub mod sevenz;
pub mod tar;
pub mod traits;
pub mod zip;

pub use compression::CompressionCodec;
#[cfg(feature = "rar")]
pub use rar::RarFormat;
pub use sevenz::SevenZFormat;
pub use tar::TarFormat;
pub use traits::ArchiveEntry;
pub use traits::ArchiveReader;
pub use traits::BulkFormat;
pub use traits::EntryFormat;
pub use zip::ZipFormat;
