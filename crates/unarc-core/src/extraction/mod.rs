//! Archive extraction driver.
//!
//! [`Extractor`] resolves each archive's handler, then either walks its
//! entries through the filename recoder or hands the whole archive to a
//! bulk backend.

mod dest;
mod engine;

pub use dest::DirCache;
pub use dest::EntryPath;
pub use dest::resolve_entry_path;
pub use engine::Extractor;
