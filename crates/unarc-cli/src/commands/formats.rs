//! Formats command implementation

use crate::output::OutputFormatter;
use anyhow::Result;
use unarc_core::HandlerRegistry;

pub fn execute(formatter: &dyn OutputFormatter) -> Result<()> {
    formatter.format_formats(&HandlerRegistry::builtin())
}
