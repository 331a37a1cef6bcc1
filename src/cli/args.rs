//! CLI argument definitions for `gradpath`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use gradpath::config::ConfigOverrides;
use logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `logger::Level`
/// for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `catalog`, `store_dir`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Check graduation eligibility for every program.
    Check {
        /// Student record (TOML)
        #[arg(value_name = "STUDENT")]
        student: PathBuf,

        /// Store the refreshed progress and eligibility caches
        #[arg(long)]
        record: bool,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show earned credits per category and the GPA.
    Progress {
        /// Student record (TOML)
        #[arg(value_name = "STUDENT")]
        student: PathBuf,
    },
    /// List courses blocked by unmet prerequisites.
    Blocked {
        /// Student record (TOML)
        #[arg(value_name = "STUDENT")]
        student: PathBuf,

        /// Instead, list the courses that completing CODE would unblock
        #[arg(long, value_name = "CODE")]
        unlocks: Option<String>,
    },
    /// Generate a progress report for a student.
    Report {
        /// Student record (TOML)
        #[arg(value_name = "STUDENT")]
        student: PathBuf,

        /// Output file path (optional; defaults to `reports_dir/<uid>.<ext>`)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Report format: markdown (md) or html
        #[arg(short, long, value_name = "FORMAT", default_value = "markdown")]
        format: String,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "gradpath",
    about = "Academic progress and graduation eligibility tracker",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config catalog path
    #[arg(long = "config-catalog", value_name = "PATH")]
    pub config_catalog: Option<PathBuf>,

    /// Override config catalog path (short form)
    #[arg(long = "catalog", value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Override config progress store directory
    #[arg(long = "config-store-dir", value_name = "DIR")]
    pub config_store_dir: Option<PathBuf>,

    /// Override config progress store directory (short form)
    #[arg(long = "store-dir", value_name = "DIR")]
    pub store_dir: Option<PathBuf>,

    /// Override config reports directory
    #[arg(long = "config-reports-dir", value_name = "DIR")]
    pub config_reports_dir: Option<PathBuf>,

    /// Override config reports directory (short form)
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Override whether D+ and D grades count as passes (true/false)
    #[arg(long = "config-d-grades-pass", value_parser = BoolishValueParser::new())]
    pub config_d_grades_pass: Option<bool>,

    /// Only count C- and above as passes (short form of `--config-d-grades-pass false`)
    #[arg(long = "strict")]
    pub strict: bool,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

fn path_string(path: Option<&PathBuf>) -> Option<String> {
    path.map(|p| p.to_string_lossy().to_string())
}

impl Cli {
    /// Convert CLI flags into config overrides.
    ///
    /// Short-form flags (e.g., `--catalog`) take precedence over long-form
    /// flags (e.g., `--config-catalog`) when both are provided.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: path_string(self.config_log_file.as_ref()),
            verbose: self.config_verbose,
            catalog: path_string(self.catalog.as_ref().or(self.config_catalog.as_ref())),
            store_dir: path_string(self.store_dir.as_ref().or(self.config_store_dir.as_ref())),
            reports_dir: path_string(self.reports_dir.as_ref().or(self.config_reports_dir.as_ref())),
            d_grades_pass: if self.strict {
                Some(false)
            } else {
                self.config_d_grades_pass
            },
        }
    }
}
