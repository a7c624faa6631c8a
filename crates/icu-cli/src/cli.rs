//! CLI argument definitions for the label derivation driver.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "icu-labels",
    version,
    about = "Derive ICU benchmark labels from imputed and endpoint batches",
    long_about = "Derive per-timestep prediction labels for an ICU benchmark.\n\n\
                  Reads one batch of imputed variables and endpoints plus the static\n\
                  table, and writes mortality, organ failure, urine output, phenotype\n\
                  and remaining length-of-stay labels for every patient."
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

    /// Include patient identifiers in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Label one batch of patients.
    Batch(BatchArgs),

    /// List the label channels and their windows.
    Channels(ChannelsArgs),
}

#[derive(Parser)]
pub struct BatchArgs {
    /// Directory holding `batch_<idx>.parquet` imputed tables.
    #[arg(long = "imputed-dir", value_name = "DIR")]
    pub imputed_dir: PathBuf,

    /// Directory holding `batch_<idx>.parquet` endpoint tables.
    #[arg(long = "endpoint-dir", value_name = "DIR")]
    pub endpoint_dir: PathBuf,

    /// Static table (parquet or CSV) with discharge status and APACHE groups.
    #[arg(long = "static-table", value_name = "PATH")]
    pub static_table: PathBuf,

    /// Output directory for label batches.
    #[arg(long = "label-dir", value_name = "DIR")]
    pub label_dir: PathBuf,

    /// Index of the batch to process.
    #[arg(long = "batch-idx", value_name = "N")]
    pub batch_idx: usize,

    /// Label options (TOML); defaults apply to absent keys.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// APACHE II / IV group to phenotype bucket maps (TOML).
    #[arg(long = "severity-maps", value_name = "PATH")]
    pub severity_maps: Option<PathBuf>,

    /// Output file format.
    #[arg(long = "format", value_enum, default_value = "parquet")]
    pub format: OutputFormatArg,

    /// Override the configured window policy for failure transitions.
    #[arg(long = "window-policy", value_enum)]
    pub window_policy: Option<WindowPolicyArg>,

    /// Compute and report labels without touching the output directory.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct ChannelsArgs {
    /// Label options (TOML) whose windows should be shown.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Parquet,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum WindowPolicyArg {
    /// Positive when any step of the window is in failure.
    AnyFailure,
    /// Like any-failure, but steps already in failure are negative.
    OnsetOnly,
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
