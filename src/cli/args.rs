//! Command line argument parsing for the comment-risk CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Default output file for labeled comments.
pub const DEFAULT_LABELED_OUTPUT: &str = "youtube_comments_filtered.csv";

/// Default file the classification report is saved to.
pub const DEFAULT_REPORT_FILE: &str = "classification_report.txt";

/// comment-risk - Keyword risk scoring and tier classification for comments
#[derive(Parser, Debug, Clone)]
#[command(name = "comment-risk")]
#[command(about = "Label comments with keyword risk tiers and train a text classifier on them")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct RiskArgs {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Pipeline configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "COMMENT_RISK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Keyword vocabulary file (JSON), overrides the configuration
    #[arg(long, value_name = "VOCABULARY_FILE", global = true)]
    pub vocabulary: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl RiskArgs {
    /// Get the effective verbosity level (0=quiet, 1=normal, 2=verbose, 3+=debug)
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Score a single text
    Score(ScoreArgs),

    /// Label every comment of a CSV file
    Label(LabelArgs),

    /// Train and evaluate the classifier on a labeled CSV file
    Train(TrainArgs),

    /// Label a CSV file, save it, then train and evaluate on the labels
    Run(RunArgs),
}

/// Arguments for scoring a text
#[derive(Parser, Debug, Clone)]
pub struct ScoreArgs {
    /// Text to score
    #[arg(value_name = "TEXT")]
    pub text: String,
}

/// Arguments for labeling a file
#[derive(Parser, Debug, Clone)]
pub struct LabelArgs {
    /// Input CSV file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output CSV file
    #[arg(short, long, value_name = "OUTPUT", default_value = DEFAULT_LABELED_OUTPUT)]
    pub output: PathBuf,
}

/// Arguments for training on a labeled file
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Labeled CSV file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// File the classification report is written to
    #[arg(long, value_name = "PATH", default_value = DEFAULT_REPORT_FILE)]
    pub report_file: PathBuf,
}

/// Arguments for the full pipeline
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Input CSV file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output CSV file for labeled comments
    #[arg(short, long, value_name = "OUTPUT", default_value = DEFAULT_LABELED_OUTPUT)]
    pub output: PathBuf,

    /// File the classification report is written to
    #[arg(long, value_name = "PATH", default_value = DEFAULT_REPORT_FILE)]
    pub report_file: PathBuf,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
