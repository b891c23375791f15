//! Archive extraction with recovery of Shift-JIS entry names.
//!
//! Archives made by Japanese Windows tools often store entry names as
//! Shift-JIS bytes without marking them, and most readers then decode
//! those bytes as code page 437. `unarc-core` extracts such archives with
//! the names restored, and passes every other format through its regular
//! backend.
//!
//! - [`recode`] recovers a filename from its raw or cp437-decoded form
//! - [`HandlerRegistry`] binds archive extensions to format handlers
//! - [`Extractor`] drives extraction of one archive or a batch
//!
//! # Examples
//!
//! ```no_run
//! use unarc_core::ExtractionConfig;
//! use unarc_core::extract_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExtractionConfig::default();
//! let report = extract_archive("資料.zip", &config)?;
//! println!("Extracted {} files", report.files_extracted);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod inspection;
pub mod recode;
pub mod registry;
pub mod report;
#[doc(hidden)]
pub mod test_utils;

pub use api::extract_all;
pub use api::extract_archive;
pub use config::BatchPolicy;
pub use config::DecodeErrorPolicy;
pub use config::ExtractionConfig;
pub use error::ExtractionError;
pub use error::FilenameDecodeError;
pub use error::Result;
pub use extraction::Extractor;
pub use inspection::ArchiveManifest;
pub use inspection::ManifestEntry;
pub use inspection::list_archive;
pub use recode::RawName;
pub use recode::recode;
pub use registry::Handler;
pub use registry::HandlerRegistry;
pub use registry::Strategy;
pub use report::ArchiveOutcome;
pub use report::BatchReport;
pub use report::ExtractionReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use report::SkipReason;
pub use report::SkippedEntry;
