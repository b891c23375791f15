//! Subcommand implementations.

pub mod completion;
pub mod extract;
pub mod formats;
pub mod list;
