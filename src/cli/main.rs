//! Command-line interface entry point for `carbonatlas`

mod args;
mod commands;

use args::{Cli, Command};
use carbon_atlas::config::Config;
use carbon_atlas::logger::{
    close_file_logging, enable_debug, enable_verbose, init_file_logging, set_level, Level,
};
use carbon_atlas::{error, info, verbose};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| config.logging.level.parse().ok())
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // CLI flag wins, otherwise config logging.file if set
    let config_log_path = (!config.logging.file.is_empty())
        .then(|| PathBuf::from(&config.logging.file));

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            info!("File logging initialized at: {display_path}");
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }
    verbose!("Config file: {}", Config::get_config_file_path().display());

    let result = match args.command {
        Command::Config { subcommand } => commands::config::run(subcommand, &mut config, &defaults),
        Command::Dashboard {
            selection,
            format,
            output,
            projection,
            percent,
        } => commands::dashboard::run(
            &selection,
            &commands::dashboard::DashboardOptions {
                format: &format,
                output: output.as_deref(),
                projection: &projection,
                percent,
            },
            &config,
        ),
        Command::Series { selection, output } => {
            commands::series::run(&selection, output.as_deref(), &config)
        }
        Command::Shares { country, year } => commands::shares::run(&country, year, &config),
        Command::List { target, filter } => {
            commands::list::run(target, filter.as_deref(), &config)
        }
    };

    let code = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    };
    close_file_logging();
    code
}
