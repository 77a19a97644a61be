//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "formgrid",
    version,
    about = "Fill, validate and submit structured business forms",
    long_about = "Fill, validate and submit structured business forms.\n\n\
                  Documents are exchanged as JSON payloads: flat fields as strings,\n\
                  tables as arrays of row objects (fixed columns, then user-added columns)."
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

    /// Include field and cell values in logs (they may contain personal data).
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the available forms.
    Forms,

    /// Print a blank payload for a form.
    New(FormArgs),

    /// Validate a payload and list every issue.
    Validate(DocumentArgs),

    /// Validate a payload and emit the recomputed submission payload.
    Submit(SubmitArgs),

    /// Render a payload read-only.
    Show(DocumentArgs),

    /// Export one table of a payload as CSV.
    Export(ExportArgs),
}

#[derive(Parser)]
pub struct FormArgs {
    /// Form id (see `formgrid forms`).
    #[arg(value_name = "FORM")]
    pub form: String,
}

#[derive(Parser)]
pub struct DocumentArgs {
    /// Form id (see `formgrid forms`).
    #[arg(value_name = "FORM")]
    pub form: String,

    /// JSON payload file.
    #[arg(value_name = "PAYLOAD")]
    pub payload: PathBuf,
}

#[derive(Parser)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub document: DocumentArgs,

    /// Write the payload to a file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ExportArgs {
    #[command(flatten)]
    pub document: DocumentArgs,

    /// Table to export.
    #[arg(long = "table", value_name = "NAME")]
    pub table: String,

    /// Write CSV to a file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
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
