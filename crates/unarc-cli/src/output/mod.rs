//! Output formatting module.

mod formatter;
mod human;
mod json;

pub use formatter::OutputFormatter;

use human::HumanFormatter;
use json::JsonFormatter;

/// Creates an output formatter based on CLI flags
pub fn create_formatter(json: bool, verbose: bool, quiet: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(HumanFormatter::new(verbose, quiet))
    }
}

/// One-line summary of a batch that did not fully succeed.
pub fn batch_failure_summary(batch: &unarc_core::BatchReport) -> String {
    let failed = batch.failures().count();
    let mut summary = format!("{failed} of {} archives failed", batch.requested);
    if batch.not_attempted() > 0 {
        summary.push_str(&format!(", {} not attempted", batch.not_attempted()));
    }
    summary
}
