//! CLI argument definitions for the Ward Insights pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ward-insights",
    version,
    about = "Ward Insights - Hospital visit analytics pipeline",
    long_about = "Run the hospital visit analytics pipeline end to end.\n\n\
                  Generates or loads raw patient events, derives stay features and\n\
                  KPI summaries, and trains a readmission risk classifier."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline: acquire, preprocess, train.
    Run(RunArgs),

    /// Generate a synthetic patient-events CSV and exit.
    Generate(GenerateArgs),

    /// Display persisted artifacts from a previous run.
    Show(ShowArgs),

    /// Print the raw patient-events schema.
    Schema,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Root directory for all pipeline artifacts.
    #[arg(long = "data-dir", value_name = "DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Number of records to generate when no raw data exists.
    #[arg(long = "records", default_value_t = 2500)]
    pub records: usize,

    /// Seed for the synthetic generator.
    #[arg(long = "seed", default_value_t = 42)]
    pub seed: u64,

    /// Stop after preprocessing; skip model training.
    #[arg(long = "skip-training")]
    pub skip_training: bool,
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Path of the CSV file to write.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Number of records to generate.
    #[arg(long = "records", default_value_t = 2500)]
    pub records: usize,

    /// Seed for the synthetic generator.
    #[arg(long = "seed", default_value_t = 42)]
    pub seed: u64,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Root directory holding the pipeline artifacts.
    #[arg(long = "data-dir", value_name = "DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Probability at or above which a patient counts as high risk.
    #[arg(long = "risk-threshold", default_value_t = 0.65)]
    pub risk_threshold: f64,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
