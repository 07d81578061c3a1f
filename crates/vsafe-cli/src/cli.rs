//! CLI argument definitions for the `vsafe` reports.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

pub const DEFAULT_CHECKIN: &str = "data/consolidated_health_checkin.csv";
pub const DEFAULT_VACCINATIONS: &str = "data/consolidated_vaccinations.csv";
pub const DEFAULT_VISITS_CACHE: &str = "cache/hinteraction.bin";
pub const DEFAULT_HISTORY_CACHE: &str = "cache/healthlogs.bin";

#[derive(Parser)]
#[command(
    name = "vsafe",
    version,
    about = "Health-care interaction statistics from v-safe check-in exports",
    long_about = "Scan multi-gigabyte v-safe check-in exports and report how many subjects \
                  sought health care after vaccination.\n\n\
                  Full scans are cached as binary files, so later runs skip the scan. \
                  Delete a cache file to rebuild it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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

    /// Log subject identifiers instead of redacting them.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Rows between progress updates (0 disables progress output).
    #[arg(
        long = "progress-interval",
        value_name = "ROWS",
        default_value_t = 1_000_000,
        global = true
    )]
    pub progress_interval: u64,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the header row of each CSV file.
    Toc(TocArgs),

    /// Count subjects who reported each kind of health-care visit.
    Visits(VisitsArgs),

    /// Count visits reported after a subject blamed the vaccine.
    History(HistoryArgs),

    /// List the distinct values found in each column.
    Values(ValuesArgs),
}

#[derive(Args)]
pub struct TocArgs {
    /// CSV files to inspect.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Args)]
pub struct CheckinSource {
    /// Consolidated health check-in export.
    #[arg(long = "checkin", value_name = "CSV", default_value = DEFAULT_CHECKIN)]
    pub checkin: PathBuf,
}

#[derive(Args)]
pub struct VisitsArgs {
    #[command(flatten)]
    pub source: CheckinSource,

    /// Visit tally cache (created after the first full scan).
    #[arg(long = "cache", value_name = "PATH", default_value = DEFAULT_VISITS_CACHE)]
    pub cache: PathBuf,
}

#[derive(Args)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub source: CheckinSource,

    /// Consolidated vaccination export.
    #[arg(
        long = "vaccinations",
        value_name = "CSV",
        default_value = DEFAULT_VACCINATIONS
    )]
    pub vaccinations: PathBuf,

    /// Visit tally cache, shared with the `visits` command.
    #[arg(
        long = "visits-cache",
        value_name = "PATH",
        default_value = DEFAULT_VISITS_CACHE
    )]
    pub visits_cache: PathBuf,

    /// Subject history cache (created after the first full scan).
    #[arg(long = "cache", value_name = "PATH", default_value = DEFAULT_HISTORY_CACHE)]
    pub cache: PathBuf,
}

#[derive(Args)]
pub struct ValuesArgs {
    /// CSV file to scan.
    #[arg(value_name = "FILE", default_value = DEFAULT_CHECKIN)]
    pub file: PathBuf,

    /// Leading columns to leave out.
    #[arg(long = "skip-columns", value_name = "N", default_value_t = 6)]
    pub skip_columns: usize,

    /// Stop listing a column once it has more distinct values than this.
    #[arg(long = "max-values", value_name = "N", default_value_t = 1000)]
    pub max_values: usize,
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
