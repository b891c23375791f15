//! JSON output formatter for machine-readable results.

use super::batch_failure_summary;
use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use unarc_core::ArchiveManifest;
use unarc_core::BatchReport;
use unarc_core::ExtractionReport;
use unarc_core::HandlerRegistry;

pub struct JsonFormatter;

#[derive(Serialize)]
struct SkippedOutput {
    name: String,
    kind: String,
    reason: String,
}

#[derive(Serialize)]
struct ArchiveOutput {
    archive: String,
    succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<ReportOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct ReportOutput {
    destination: String,
    strategy: String,
    files_extracted: usize,
    directories_created: usize,
    files_overwritten: usize,
    bytes_written: u64,
    duration_ms: u128,
    skipped: Vec<SkippedOutput>,
}

impl From<&ExtractionReport> for ReportOutput {
    fn from(report: &ExtractionReport) -> Self {
        Self {
            destination: report.destination.display().to_string(),
            strategy: report.strategy.to_string(),
            files_extracted: report.files_extracted,
            directories_created: report.directories_created,
            files_overwritten: report.files_overwritten,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
            skipped: report
                .skipped
                .iter()
                .map(|s| SkippedOutput {
                    name: s.name.clone(),
                    kind: s.kind.to_string(),
                    reason: s.reason.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct BatchOutput {
    archives: Vec<ArchiveOutput>,
    succeeded: usize,
    failed: usize,
    not_attempted: usize,
}

impl From<&BatchReport> for BatchOutput {
    fn from(batch: &BatchReport) -> Self {
        let archives = batch
            .outcomes
            .iter()
            .map(|outcome| ArchiveOutput {
                archive: outcome.path.display().to_string(),
                succeeded: outcome.result.is_ok(),
                report: outcome.result.as_ref().ok().map(ReportOutput::from),
                error: outcome.result.as_ref().err().map(ToString::to_string),
            })
            .collect();
        Self {
            archives,
            succeeded: batch.succeeded().count(),
            failed: batch.failures().count(),
            not_attempted: batch.not_attempted(),
        }
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_batch_result(&self, batch: &BatchReport) -> Result<()> {
        let data = BatchOutput::from(batch);
        let output = if batch.is_success() {
            JsonOutput::success("extract", data)
        } else {
            JsonOutput::partial("extract", data, batch_failure_summary(batch))
        };
        Self::output(&output)
    }

    fn format_manifest(&self, manifest: &ArchiveManifest, _long: bool) -> Result<()> {
        #[derive(Serialize)]
        struct EntryOutput {
            raw: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            error: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            tier: Option<&'static str>,
            size: u64,
            is_dir: bool,
        }

        #[derive(Serialize)]
        struct ManifestOutput {
            archive: String,
            format: &'static str,
            total_entries: usize,
            total_size: u64,
            undecodable: usize,
            entries: Vec<EntryOutput>,
        }

        let data = ManifestOutput {
            archive: manifest.archive.display().to_string(),
            format: manifest.format,
            total_entries: manifest.total_entries(),
            total_size: manifest.total_size,
            undecodable: manifest.undecodable(),
            entries: manifest
                .entries
                .iter()
                .map(|e| EntryOutput {
                    raw: e.raw.clone(),
                    name: e.name.as_ref().ok().cloned(),
                    error: e.name.as_ref().err().map(ToString::to_string),
                    tier: e.tier.map(|t| t.name()),
                    size: e.size,
                    is_dir: e.is_dir,
                })
                .collect(),
        };

        Self::output(&JsonOutput::success("list", data))
    }

    fn format_formats(&self, registry: &HandlerRegistry) -> Result<()> {
        #[derive(Serialize)]
        struct FormatOutput {
            extension: String,
            strategy: String,
            format: &'static str,
        }

        let data: Vec<_> = registry
            .iter()
            .map(|(extension, handler)| FormatOutput {
                extension: extension.to_string(),
                strategy: handler.strategy().to_string(),
                format: handler.name(),
            })
            .collect();

        Self::output(&JsonOutput::success("formats", data))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::Path;
    use unarc_core::ArchiveOutcome;
    use unarc_core::ExtractionError;
    use unarc_core::Strategy;

    #[test]
    fn test_batch_output_structure() {
        let batch = BatchReport {
            outcomes: vec![
                ArchiveOutcome {
                    path: "a.zip".into(),
                    result: Ok(ExtractionReport::new(
                        Path::new("a.zip"),
                        Path::new("a"),
                        Strategy::PerEntry,
                    )),
                },
                ArchiveOutcome {
                    path: "b.xyz".into(),
                    result: Err(ExtractionError::UnsupportedArchiveType {
                        extension: ".xyz".into(),
                    }),
                },
            ],
            requested: 2,
        };

        let output = JsonOutput::partial("extract", BatchOutput::from(&batch), "1 of 2");
        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(json["status"], "error");
        assert_eq!(json["data"]["succeeded"], 1);
        assert_eq!(json["data"]["archives"][0]["report"]["strategy"], "per-entry");
        assert_eq!(json["data"]["archives"][1]["succeeded"], false);
        assert!(
            json["data"]["archives"][1]["error"]
                .as_str()
                .unwrap()
                .contains(".xyz")
        );
    }
}
