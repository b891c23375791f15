//! List command implementation

use crate::cli::ListArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use unarc_core::list_archive;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let manifest = add_archive_context(list_archive(&args.archive), &args.archive)?;
    formatter.format_manifest(&manifest, args.long)?;
    Ok(())
}
