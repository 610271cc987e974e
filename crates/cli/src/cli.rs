//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Stream Demux - split a framed recording stream into its output files
#[derive(Parser, Debug)]
#[command(
    name = "stream-demux",
    author,
    version,
    about = "Recording stream demultiplexer with corruption detection and recovery",
    long_about = "Reads a framed recording stream, routes every record to its output file \n\
                  by entry kind, checks sequence continuity, and replays the stream up to \n\
                  the last checkpoint when it ends without a terminal marker."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        global = true,
        env = "STREAM_DEMUX_VERBOSE"
    )]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "STREAM_DEMUX_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Demultiplex a stream into an output directory (recovering if needed)
    Run(RunArgs),

    /// Decode and check a stream without writing any output
    Scan(ScanArgs),

    /// Validate a layout file without running
    Validate(ValidateArgs),

    /// Display the route table of a layout
    Info(InfoArgs),
}

/// Where the route layout comes from
#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Layout file (TOML or JSON); overrides --preset
    #[arg(long, env = "STREAM_DEMUX_LAYOUT")]
    pub layout: Option<PathBuf>,

    /// Built-in layout used when no layout file is given
    #[arg(long, value_enum, default_value = "pipeline", env = "STREAM_DEMUX_PRESET")]
    pub preset: Preset,

    /// Override the initial staging buffer size in bytes
    #[arg(long, env = "STREAM_DEMUX_STAGING_CAPACITY")]
    pub staging_capacity: Option<usize>,
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Recording stream to demultiplex
    #[arg(short, long, env = "STREAM_DEMUX_INPUT")]
    pub input: PathBuf,

    /// Output directory (created if missing)
    #[arg(short, long, default_value = ".", env = "STREAM_DEMUX_OUTPUT")]
    pub output: PathBuf,

    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "STREAM_DEMUX_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `scan` command
#[derive(Parser, Debug, Clone)]
pub struct ScanArgs {
    /// Recording stream to scan
    #[arg(short, long, env = "STREAM_DEMUX_INPUT")]
    pub input: PathBuf,

    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Print the scan report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to layout file to validate
    #[arg(short, long, default_value = "layout.toml")]
    pub layout: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the layout as TOML (usable as a starting layout file)
    #[arg(long, conflicts_with = "json")]
    pub toml: bool,
}

/// Built-in layouts
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preset {
    /// 15 routes, terminal kind 13, actions log on kind 14
    #[default]
    Pipeline,
    /// 13 routes, terminal kind 12
    Legacy,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}
