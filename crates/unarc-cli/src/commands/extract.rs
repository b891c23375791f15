//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::output::OutputFormatter;
use crate::output::batch_failure_summary;
use crate::progress::CliProgress;
use anyhow::Result;
use anyhow::bail;
use tracing::debug;
use unarc_core::BatchPolicy;
use unarc_core::ExtractionConfig;
use unarc_core::Extractor;

pub fn execute(args: &ExtractArgs, formatter: &dyn OutputFormatter, show_progress: bool) -> Result<()> {
    let config = build_config(args);
    debug!(?config, archives = args.archives.len(), "starting extraction");
    let extractor = Extractor::new(config);

    let batch = if show_progress {
        let mut progress = CliProgress::new(args.archives.len());
        extractor.extract_all_with_progress(&args.archives, &mut progress)
    } else {
        extractor.extract_all(&args.archives)
    };

    formatter.format_batch_result(&batch)?;

    if !batch.is_success() {
        bail!("{}", batch_failure_summary(&batch));
    }

    Ok(())
}

fn build_config(args: &ExtractArgs) -> ExtractionConfig {
    let batch_policy = if args.fail_fast {
        BatchPolicy::FailFast
    } else {
        BatchPolicy::Isolate
    };

    ExtractionConfig::default()
        .with_batch_policy(batch_policy)
        .with_decode_error_policy(args.on_decode_error.into())
        .with_unsafe_paths(args.allow_unsafe_paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::DecodeErrorArg;
    use unarc_core::DecodeErrorPolicy;

    #[test]
    fn test_build_config_defaults() {
        let args = ExtractArgs {
            archives: vec!["a.zip".into()],
            fail_fast: false,
            on_decode_error: DecodeErrorArg::Skip,
            allow_unsafe_paths: false,
        };
        let config = build_config(&args);
        assert_eq!(config.batch_policy, BatchPolicy::Isolate);
        assert_eq!(config.on_decode_error, DecodeErrorPolicy::Skip);
        assert!(!config.allow_unsafe_paths);
    }

    #[test]
    fn test_build_config_flags() {
        let args = ExtractArgs {
            archives: vec!["a.zip".into()],
            fail_fast: true,
            on_decode_error: DecodeErrorArg::Abort,
            allow_unsafe_paths: true,
        };
        let config = build_config(&args);
        assert_eq!(config.batch_policy, BatchPolicy::FailFast);
        assert_eq!(config.on_decode_error, DecodeErrorPolicy::Abort);
        assert!(config.allow_unsafe_paths);
    }
}
