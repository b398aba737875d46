//! CLI argument definitions.

use crate::config::{ResizeFilter, RetrievalMode};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Tell human-made images from AI-generated ones.
#[derive(Debug, Parser)]
#[command(name = "synthscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Image files or directories to classify.
    pub inputs: Vec<PathBuf>,

    /// Options shared by every classification.
    #[command(flatten)]
    pub classify: ClassifyArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify the image of one or more Instagram posts.
    Url {
        /// Post links (https://www.instagram.com/p/<shortcode>/).
        #[arg(required = true)]
        links: Vec<String>,
    },
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Manage the classifier model.
    Model {
        /// Model action to perform.
        #[command(subcommand)]
        action: ModelAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Model subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ModelAction {
    /// Load the model and run a test inference.
    Check,
}

/// Arguments for classification.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct ClassifyArgs {
    /// Path to ONNX model file (overrides config).
    #[arg(short, long, global = true, env = "SYNTHSCAN_MODEL")]
    pub model: Option<PathBuf>,

    /// ONNX Runtime intra-op threads.
    #[arg(long, global = true, env = "SYNTHSCAN_INTRA_THREADS")]
    pub intra_threads: Option<usize>,

    /// Darken images before inference (overrides config).
    #[arg(long, global = true, overrides_with = "no_darken")]
    pub darken: bool,

    /// Do not darken images before inference (overrides config).
    #[arg(long, global = true, overrides_with = "darken")]
    pub no_darken: bool,

    /// Resize filter used to reach the model input size.
    #[arg(long, global = true, value_enum, env = "SYNTHSCAN_RESIZE_FILTER")]
    pub resize_filter: Option<ResizeFilter>,

    /// How post images are fetched.
    #[arg(long, global = true, value_enum, env = "SYNTHSCAN_RETRIEVAL")]
    pub retrieval: Option<RetrievalMode>,

    /// Parent directory for staged downloads.
    #[arg(long, global = true, env = "SYNTHSCAN_STAGING_DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Number of posts resolved at once.
    #[arg(long, global = true, value_parser = clap::value_parser!(u16).range(1..=32),
          env = "SYNTHSCAN_CONCURRENCY")]
    pub concurrency: Option<u16>,

    /// Print one JSON envelope per result on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Include the fetched post image as base64 in JSON results (with --json).
    #[arg(long, global = true)]
    pub include_image: bool,

    /// Stop on first error.
    #[arg(long, global = true)]
    pub fail_fast: bool,

    /// Suppress progress output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace+ORT info, -vvv: trace+ORT debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ClassifyArgs {
    /// Darkening override from `--darken` / `--no-darken`, if either was given.
    pub const fn darken_override(&self) -> Option<bool> {
        if self.darken {
            Some(true)
        } else if self.no_darken {
            Some(false)
        } else {
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_simple() {
        let cli = Cli::try_parse_from(["synthscan", "photo.jpg"]).unwrap();
        assert_eq!(cli.inputs, vec![PathBuf::from("photo.jpg")]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_with_options() {
        let cli = Cli::try_parse_from([
            "synthscan",
            "photo.jpg",
            "-m",
            "/models/detector.onnx",
            "--no-darken",
            "--resize-filter",
            "lanczos3",
            "-q",
        ])
        .unwrap();
        assert_eq!(
            cli.classify.model,
            Some(PathBuf::from("/models/detector.onnx"))
        );
        assert_eq!(cli.classify.darken_override(), Some(false));
        assert_eq!(cli.classify.resize_filter, Some(ResizeFilter::Lanczos3));
        assert!(cli.classify.quiet);
    }

    #[test]
    fn test_darken_flags_last_wins() {
        let cli = Cli::try_parse_from(["synthscan", "a.png", "--no-darken", "--darken"]).unwrap();
        assert_eq!(cli.classify.darken_override(), Some(true));

        let cli = Cli::try_parse_from(["synthscan", "a.png"]).unwrap();
        assert_eq!(cli.classify.darken_override(), None);
    }

    #[test]
    fn test_cli_parse_url_subcommand_with_trailing_flags() {
        let cli = Cli::try_parse_from([
            "synthscan",
            "url",
            "https://www.instagram.com/p/ABC123/",
            "--json",
            "--retrieval",
            "staged",
        ])
        .unwrap();

        let Some(Command::Url { links }) = cli.command else {
            panic!("expected url subcommand");
        };
        assert_eq!(links, vec!["https://www.instagram.com/p/ABC123/".to_string()]);
        assert!(cli.classify.json);
        assert_eq!(cli.classify.retrieval, Some(RetrievalMode::Staged));
    }

    #[test]
    fn test_url_subcommand_requires_link() {
        assert!(Cli::try_parse_from(["synthscan", "url"]).is_err());
    }

    #[test]
    fn test_concurrency_range() {
        assert!(Cli::try_parse_from(["synthscan", "a.png", "--concurrency", "0"]).is_err());
        let cli = Cli::try_parse_from(["synthscan", "a.png", "--concurrency", "4"]).unwrap();
        assert_eq!(cli.classify.concurrency, Some(4));
    }

    #[test]
    fn test_cli_parse_config_subcommand() {
        let cli = Cli::try_parse_from(["synthscan", "config", "show"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_cli_parse_model_check() {
        let cli = Cli::try_parse_from(["synthscan", "model", "check"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Model {
                action: ModelAction::Check
            })
        ));
    }
}
