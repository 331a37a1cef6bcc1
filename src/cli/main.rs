//! Command-line interface entry point for `gradpath`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use gradpath::config::Config;
use logger::{enable_debug, enable_verbose, info, init_file_logging, set_level, Level};
use std::path::PathBuf;

fn main() {
    let args = Cli::parse();

    // The stored config stays untouched by CLI overrides so `config set` never persists them
    let stored = Config::load();
    let defaults = Config::from_defaults();
    let mut config = stored.clone();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config; otherwise config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Into::into)
        .or_else(|| config.logging.level.parse::<Level>().ok())
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

    let config_log_path = (!config.logging.file.is_empty()).then(|| PathBuf::from(&config.logging.file));
    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            info!("File logging initialized at: {display_path}");
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    match args.command {
        Command::Config { subcommand } => {
            let mut stored = stored;
            commands::config::run(subcommand, &config, &mut stored, &defaults);
        }
        Command::Check { student, record, json } => {
            commands::check::run(&student, record, json, &config);
        }
        Command::Progress { student } => {
            commands::progress::run(&student, &config);
        }
        Command::Blocked { student, unlocks } => {
            commands::blocked::run(&student, unlocks.as_deref(), &config);
        }
        Command::Report {
            student,
            output,
            format,
        } => {
            commands::report::run(&student, output.as_deref(), &format, &config);
        }
    }
}
