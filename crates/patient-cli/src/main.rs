//! Patient registry CLI.

use clap::{ColorChoice, Parser};
use patient_cli::commands::{add_patient, list_patients};
use patient_cli::config::PatientsConfig;
use patient_cli::logging::{LogConfig, LogFormat, init_logging};
use patient_cli::summary::{error_chain, print_listing};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = PatientsConfig::resolve(cli.config.as_deref())?.with_overrides(
        cli.data_file,
        cli.info_log,
        cli.error_log,
    );
    let audit = config.audit_trail().shared();

    match cli.command {
        Command::Add(args) => {
            let record = add_patient(&config, audit, &args.into_new_patient())?;
            println!("Saved to {}:", config.data_file.display());
            print!("{record}");
            Ok(0)
        }
        Command::List(args) => {
            let outcome = list_patients(&config, audit, args.limit)?;
            if args.json {
                for record in &outcome.records {
                    println!("{}", serde_json::to_string(record)?);
                }
                for error in &outcome.invalid {
                    eprintln!("invalid row: {}", error_chain(error));
                }
            } else {
                print_listing(&outcome);
            }
            Ok(if outcome.has_errors() { 1 } else { 0 })
        }
        Command::ShowConfig => {
            print!("{}", config.to_toml()?);
            Ok(0)
        }
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
