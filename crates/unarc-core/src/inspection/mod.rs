//! Archive inspection without extraction.
//!
//! Listing runs every entry name through the recoder exactly as extraction
//! would, so it doubles as a dry run of the filename recovery.
//!
//! # Examples
//!
//! ```no_run
//! use unarc_core::list_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manifest = list_archive("archive.zip")?;
//! for entry in &manifest.entries {
//!     match &entry.name {
//!         Ok(name) => println!("{name}"),
//!         Err(err) => println!("?? {err}"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod list;
mod manifest;

pub use list::list_archive;
pub use list::list_archive_with;
pub use manifest::ArchiveManifest;
pub use manifest::ManifestEntry;
