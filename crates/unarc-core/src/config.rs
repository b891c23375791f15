//! Extraction policy configuration.

/// What to do when one archive in a batch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Record the failure and continue with the next archive.
    #[default]
    Isolate,
    /// Stop the batch at the first failed archive.
    FailFast,
}

/// What to do when an entry name decodes under neither Shift-JIS tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeErrorPolicy {
    /// Skip the entry, record it in the report and continue.
    #[default]
    Skip,
    /// Fail the whole archive.
    Abort,
}

/// Configuration for an extraction run.
///
/// # Examples
///
/// ```
/// use unarc_core::BatchPolicy;
/// use unarc_core::DecodeErrorPolicy;
/// use unarc_core::ExtractionConfig;
///
/// let config = ExtractionConfig::default()
///     .with_batch_policy(BatchPolicy::FailFast)
///     .with_decode_error_policy(DecodeErrorPolicy::Abort);
/// assert!(!config.allow_unsafe_paths);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractionConfig {
    /// Failure isolation across archives.
    pub batch_policy: BatchPolicy,

    /// Handling of undecodable entry names.
    pub on_decode_error: DecodeErrorPolicy,

    /// Write entries whose recoded names contain `..`, a root or a drive
    /// prefix. Such entries are skipped when `false`.
    pub allow_unsafe_paths: bool,
}

impl ExtractionConfig {
    /// Sets the batch policy.
    #[must_use]
    pub const fn with_batch_policy(mut self, policy: BatchPolicy) -> Self {
        self.batch_policy = policy;
        self
    }

    /// Sets the decode error policy.
    #[must_use]
    pub const fn with_decode_error_policy(mut self, policy: DecodeErrorPolicy) -> Self {
        self.on_decode_error = policy;
        self
    }

    /// Allows or rejects entry names that escape the destination.
    #[must_use]
    pub const fn with_unsafe_paths(mut self, allow: bool) -> Self {
        self.allow_unsafe_paths = allow;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractionConfig::default();
        assert_eq!(config.batch_policy, BatchPolicy::Isolate);
        assert_eq!(config.on_decode_error, DecodeErrorPolicy::Skip);
        assert!(!config.allow_unsafe_paths);
    }

    #[test]
    fn test_builders() {
        let config = ExtractionConfig::default()
            .with_batch_policy(BatchPolicy::FailFast)
            .with_unsafe_paths(true);
        assert_eq!(config.batch_policy, BatchPolicy::FailFast);
        assert!(config.allow_unsafe_paths);
    }
}
