//! CLI argument definitions for the ALR synthesizer.

use std::path::PathBuf;

use alr_model::SchemaVersion;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "alr-cli",
    version,
    about = "ALR FHIR synthesizer - Convert Assignment List Report records to FHIR",
    long_about = "Convert flat Assignment List Report beneficiary records to FHIR resources.\n\n\
                  Writes one resource per line (NDJSON) in the v1 (STU3) or v2 (R4) schema,\n\
                  coding HCC risk flags through the HCC crosswalk."
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

    /// Allow beneficiary identifiers and field values in log output.
    ///
    /// Records carry PHI; by default such values are replaced with a
    /// redaction marker.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Synthesize FHIR resources from a file of JSON-lines records.
    Synthesize(SynthesizeArgs),

    /// Show the HCC crosswalk that would be used.
    Crosswalk(CrosswalkArgs),
}

#[derive(Parser)]
pub struct SynthesizeArgs {
    /// JSON-lines file with one flat ALR record per line.
    #[arg(value_name = "RECORDS")]
    pub records: PathBuf,

    /// Output schema version (v1/stu3 or v2/r4).
    #[arg(long = "schema", default_value = "v2")]
    pub schema: SchemaVersion,

    /// HCC crosswalk file, tried before every default location.
    #[arg(long = "crosswalk", value_name = "PATH")]
    pub crosswalk: Option<PathBuf>,

    /// Write resources to this file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Batch identifier, used as the id of the v2 batch Group
    /// (default: derived from the records file name).
    #[arg(long = "batch-id", value_name = "ID")]
    pub batch_id: Option<String>,

    /// Process records on a single thread.
    #[arg(long = "sequential")]
    pub sequential: bool,
}

#[derive(Parser)]
pub struct CrosswalkArgs {
    /// HCC crosswalk file, tried before every default location.
    #[arg(long = "crosswalk", value_name = "PATH")]
    pub crosswalk: Option<PathBuf>,
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
