//! Output formatter trait for CLI results.

use anyhow::Result;
use serde::Serialize;
use unarc_core::ArchiveManifest;
use unarc_core::BatchReport;
use unarc_core::HandlerRegistry;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the outcome of an extraction batch
    fn format_batch_result(&self, batch: &BatchReport) -> Result<()>;

    /// Format an archive listing
    fn format_manifest(&self, manifest: &ArchiveManifest, long: bool) -> Result<()>;

    /// Format the registered extensions
    fn format_formats(&self, registry: &HandlerRegistry) -> Result<()>;
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    /// Error envelope that still carries partial results.
    pub fn partial(operation: impl Into<String>, data: T, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: Some(data),
            error: Some(error.into()),
        }
    }
}
