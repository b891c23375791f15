//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use crate::error::convert_extraction_error;
use anyhow::Result;
use console::Term;
use console::style;
use unarc_core::ArchiveManifest;
use unarc_core::BatchReport;
use unarc_core::ExtractionReport;
use unarc_core::HandlerRegistry;
use unarc_core::Strategy;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn mark(&self, ok: bool) -> String {
        match (self.use_colors, ok) {
            (true, true) => style("✓").green().bold().to_string(),
            (true, false) => style("✗").red().bold().to_string(),
            (false, true) => "ok".to_string(),
            (false, false) => "failed".to_string(),
        }
    }

    fn write_report(&self, report: &ExtractionReport) {
        let _ = self.term.write_line(&format!(
            "{} {} -> {}",
            self.mark(true),
            report.archive.display(),
            report.destination.display()
        ));

        match report.strategy {
            Strategy::PerEntry => {
                let _ = self.term.write_line(&format!(
                    "  Files extracted: {}",
                    Self::format_number(report.files_extracted)
                ));
                let _ = self.term.write_line(&format!(
                    "  Directories:     {}",
                    Self::format_number(report.directories_created)
                ));
                let _ = self.term.write_line(&format!(
                    "  Total size:      {}",
                    Self::format_size(report.bytes_written)
                ));
                if report.files_overwritten > 0 {
                    let _ = self.term.write_line(&format!(
                        "  Overwritten:     {}",
                        Self::format_number(report.files_overwritten)
                    ));
                }
            }
            Strategy::Bulk => {
                let _ = self
                    .term
                    .write_line("  Extracted in bulk, names as stored by the backend");
            }
        }

        if report.has_skipped() {
            let _ = self.term.write_line(&format!(
                "  Skipped:         {}",
                Self::format_number(report.skipped.len())
            ));
            if self.verbose {
                for skipped in &report.skipped {
                    let _ = self.term.write_line(&format!(
                        "    {} ({}): {}",
                        skipped.name, skipped.kind, skipped.reason
                    ));
                }
            }
        }

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Duration: {:?}", report.duration));
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_batch_result(&self, batch: &BatchReport) -> Result<()> {
        for outcome in &batch.outcomes {
            match &outcome.result {
                Ok(report) => {
                    if !self.quiet {
                        self.write_report(report);
                    }
                }
                Err(err) => {
                    let converted = convert_extraction_error(err, &outcome.path);
                    let _ = self
                        .err_term
                        .write_line(&format!("{} {converted}", self.mark(false)));
                }
            }
        }

        if batch.requested > 1 && !self.quiet {
            let _ = self.term.write_line("");
            let _ = self.term.write_line(&format!(
                "{} of {} archives extracted",
                Self::format_number(batch.succeeded().count()),
                Self::format_number(batch.requested)
            ));
        }

        Ok(())
    }

    fn format_manifest(&self, manifest: &ArchiveManifest, long: bool) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if long {
            let _ = self.term.write_line(&format!(
                "Archive: {} ({})",
                manifest.archive.display(),
                manifest.format
            ));
            let _ = self.term.write_line("");
        }

        for entry in &manifest.entries {
            let shown = match &entry.name {
                Ok(name) => name.clone(),
                Err(_) if self.use_colors => style(&entry.raw).red().to_string(),
                Err(_) => entry.raw.clone(),
            };

            if long {
                let tier = match (&entry.name, entry.tier) {
                    (Err(_), _) => "undecodable",
                    (Ok(_), Some(tier)) => tier.name(),
                    (Ok(_), None) => "unicode",
                };
                let kind = if entry.is_dir { "d" } else { "-" };
                let _ = self.term.write_line(&format!(
                    "{kind} {:>10}  {tier:<14}  {shown}",
                    Self::format_size(entry.size)
                ));
                if self.verbose && entry.name.is_ok() && entry.tier.is_some() {
                    let _ = self.term.write_line(&format!("    raw: {}", entry.raw));
                }
            } else {
                let _ = self.term.write_line(&shown);
            }
        }

        if long {
            let _ = self.term.write_line("");
            let _ = self.term.write_line(&format!(
                "Total: {} entries, {}",
                Self::format_number(manifest.total_entries()),
                Self::format_size(manifest.total_size)
            ));
            if manifest.undecodable() > 0 {
                let _ = self.term.write_line(&format!(
                    "Undecodable names: {}",
                    Self::format_number(manifest.undecodable())
                ));
            }
        }

        Ok(())
    }

    fn format_formats(&self, registry: &HandlerRegistry) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for (extension, handler) in registry.iter() {
            let _ = self.term.write_line(&format!(
                "{extension:<8} {:<10} {}",
                handler.strategy(),
                handler.name()
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(HumanFormatter::format_size(0), "0 B");
        assert_eq!(HumanFormatter::format_size(1023), "1023 B");
        assert_eq!(HumanFormatter::format_size(1024), "1.0 KB");
        assert_eq!(HumanFormatter::format_size(1536), "1.5 KB");
        assert_eq!(HumanFormatter::format_size(1024 * 1024), "1.0 MB");
        assert_eq!(HumanFormatter::format_size(1024 * 1024 * 1024), "1.0 GB");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(HumanFormatter::format_number(0), "0");
        assert_eq!(HumanFormatter::format_number(999), "999");
        assert_eq!(HumanFormatter::format_number(1000), "1,000");
        assert_eq!(HumanFormatter::format_number(1_234_567), "1,234,567");
    }
}
