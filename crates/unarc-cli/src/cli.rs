//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use clap_complete::Shell;
use std::path::PathBuf;
use unarc_core::DecodeErrorPolicy;

#[derive(Parser)]
#[command(name = "unarc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract archives next to themselves
    Extract(ExtractArgs),
    /// List archive entries with their recovered names
    List(ListArgs),
    /// Show supported archive extensions
    Formats,
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Archives to extract; each goes into a directory named after it
    #[arg(value_name = "ARCHIVE", required = true)]
    pub archives: Vec<PathBuf>,

    /// Stop at the first archive that fails
    #[arg(long)]
    pub fail_fast: bool,

    /// What to do with entries whose names cannot be decoded
    #[arg(long, value_enum, default_value_t = DecodeErrorArg::Skip)]
    pub on_decode_error: DecodeErrorArg,

    /// Write entries whose names point outside the destination
    #[arg(long)]
    pub allow_unsafe_paths: bool,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Show raw names, sizes and decoding tier
    #[arg(short, long)]
    pub long: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DecodeErrorArg {
    /// Skip the entry and keep extracting
    Skip,
    /// Fail the archive
    Abort,
}

impl From<DecodeErrorArg> for DecodeErrorPolicy {
    fn from(arg: DecodeErrorArg) -> Self {
        match arg {
            DecodeErrorArg::Skip => Self::Skip,
            DecodeErrorArg::Abort => Self::Abort,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_extract_args() {
        let cli = Cli::try_parse_from([
            "unarc",
            "extract",
            "a.zip",
            "b.zip",
            "--fail-fast",
            "--on-decode-error",
            "abort",
        ])
        .unwrap();
        let Commands::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.archives.len(), 2);
        assert!(args.fail_fast);
        assert_eq!(
            DecodeErrorPolicy::from(args.on_decode_error),
            DecodeErrorPolicy::Abort
        );
        assert!(!args.allow_unsafe_paths);
    }

    #[test]
    fn test_extract_requires_archive() {
        assert!(Cli::try_parse_from(["unarc", "extract"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["unarc", "-q", "-v", "formats"]).is_err());
    }
}
