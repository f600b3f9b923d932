//! CLI argument definitions for the patient registry.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use patient_cli::commands::NewPatient;

#[derive(Parser)]
#[command(
    name = "patients",
    version,
    about = "Patient registry - validate and store patient records",
    long_about = "Validate patient records and store them in a flat CSV file.\n\n\
                  Every change is written to an info audit log, every rejected\n\
                  value to an error audit log."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML config file with data_file, info_log and error_log paths.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Backing CSV file (overrides the config file).
    #[arg(long = "file", value_name = "PATH", global = true)]
    pub data_file: Option<PathBuf>,

    /// Audit log for successful operations (overrides the config file).
    #[arg(long = "info-log", value_name = "PATH", global = true)]
    pub info_log: Option<PathBuf>,

    /// Audit log for rejected operations (overrides the config file).
    #[arg(long = "error-log", value_name = "PATH", global = true)]
    pub error_log: Option<PathBuf>,

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

    /// Include patient names in diagnostic logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a patient and append it to the data file.
    Add(AddArgs),

    /// List stored patients.
    List(ListArgs),

    /// Print the effective configuration as TOML.
    ShowConfig,
}

#[derive(Args)]
pub struct AddArgs {
    /// First name (letters only).
    #[arg(value_name = "FIRST_NAME")]
    pub first_name: String,

    /// Last name (letters only).
    #[arg(value_name = "LAST_NAME")]
    pub last_name: String,

    /// Birth date, e.g. 1990-01-31 or 31.01.1990.
    #[arg(value_name = "BIRTH_DATE")]
    pub birth_date: String,

    /// Phone number with or without the country code.
    #[arg(value_name = "PHONE")]
    pub phone: String,

    /// Document type label, e.g. "паспорт".
    #[arg(value_name = "DOCUMENT_TYPE")]
    pub document_type: String,

    /// Document number.
    #[arg(value_name = "DOCUMENT_ID")]
    pub document_id: String,
}

impl AddArgs {
    pub fn into_new_patient(self) -> NewPatient {
        NewPatient {
            first_name: self.first_name,
            last_name: self.last_name,
            birth_date: self.birth_date,
            phone: self.phone,
            document_type: self.document_type,
            document_id: self.document_id,
        }
    }
}

#[derive(Args)]
pub struct ListArgs {
    /// Show at most this many patients.
    #[arg(long = "limit", short = 'n', value_name = "N")]
    pub limit: Option<usize>,

    /// Print records as JSON lines instead of a table.
    #[arg(long = "json")]
    pub json: bool,
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
