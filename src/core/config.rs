//! Configuration module for `gradpath`

use crate::core::models::GradePolicy;
use logger::error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Compiled-in defaults; release builds and debug builds ship different ones
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Placeholder expanded to the gradpath config directory
const DIR_VARIABLE: &str = "$GRADPATH";

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Input and output locations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Catalog TOML used when no `--catalog` is given
    #[serde(default)]
    pub catalog: String,
    /// Directory of stored progress records
    #[serde(default)]
    pub store_dir: String,
    /// Directory for report output files
    #[serde(default)]
    pub reports_dir: String,
}

/// Grading rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Whether D+ and D count as credit-bearing passes
    #[serde(default = "default_d_grades_pass")]
    pub d_grades_pass: bool,
}

const fn default_d_grades_pass() -> bool {
    true
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            d_grades_pass: default_d_grades_pass(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Grading policy
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override catalog path
    pub catalog: Option<String>,
    /// Override progress store directory
    pub store_dir: Option<String>,
    /// Override reports output directory
    pub reports_dir: Option<String>,
    /// Override the D-grade rule
    pub d_grades_pass: Option<bool>,
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    value
        .parse::<bool>()
        .map_err(|_| format!("Invalid boolean value for '{key}': '{value}'"))
}

impl Config {
    /// Get the `$GRADPATH` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/gradpath`
    /// - macOS: `~/Library/Application Support/gradpath`
    /// - Windows: `%APPDATA%\gradpath`
    #[must_use]
    pub fn get_gradpath_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gradpath")
    }

    /// Get the user config file path (`dconfig.toml` in debug builds)
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_gradpath_dir().join(CONFIG_FILE_NAME)
    }

    /// Grade policy described by the `[policy]` section
    #[must_use]
    pub const fn grade_policy(&self) -> GradePolicy {
        GradePolicy {
            d_grades_pass: self.policy.d_grades_pass,
        }
    }

    /// Fill empty string fields from the defaults.
    ///
    /// Upgrades add new keys this way without touching user settings.
    ///
    /// # Returns
    ///
    /// `true` if any field was filled
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let pairs = [
            (&mut self.logging.level, &defaults.logging.level),
            (&mut self.logging.file, &defaults.logging.file),
            (&mut self.paths.catalog, &defaults.paths.catalog),
            (&mut self.paths.store_dir, &defaults.paths.store_dir),
            (&mut self.paths.reports_dir, &defaults.paths.reports_dir),
        ];

        let mut changed = false;
        for (value, default) in pairs {
            if value.is_empty() && !default.is_empty() {
                value.clone_from(default);
                changed = true;
            }
        }
        changed
    }

    /// Apply CLI-provided overrides for this run only
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file = Self::expand_variables(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(catalog) = &overrides.catalog {
            self.paths.catalog = Self::expand_variables(catalog);
        }
        if let Some(store_dir) = &overrides.store_dir {
            self.paths.store_dir = Self::expand_variables(store_dir);
        }
        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir = Self::expand_variables(reports_dir);
        }
        if let Some(d_grades_pass) = overrides.d_grades_pass {
            self.policy.d_grades_pass = d_grades_pass;
        }
    }

    /// Replace `$GRADPATH` with the config directory
    ///
    /// ```ignore
    /// let expanded = Config::expand_variables("$GRADPATH/logs/gradpath.log");
    /// // "/home/user/.config/gradpath/logs/gradpath.log"
    /// ```
    #[must_use]
    pub fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_gradpath_dir();
            value.replace(DIR_VARIABLE, &dir.to_string_lossy())
        } else {
            value.to_string()
        }
    }

    /// Parse a TOML string and expand `$GRADPATH` in path values.
    /// Missing sections and keys fall back to serde defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.catalog = Self::expand_variables(&config.paths.catalog);
        config.paths.store_dir = Self::expand_variables(&config.paths.store_dir);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);

        Ok(config)
    }

    /// Compiled-in defaults for the current build profile
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).unwrap_or_else(|e| {
            error!("Compiled-in configuration is invalid: {e}");
            Self::default()
        })
    }

    /// Load the user configuration, creating it from defaults on first run.
    ///
    /// Falls back to the defaults if the file is unreadable or malformed.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_file_path())
    }

    /// [`load`](Self::load) with an explicit file location
    #[must_use]
    pub fn load_from(config_file: &Path) -> Self {
        let defaults = Self::from_defaults();

        if !config_file.exists() {
            // First run
            let _ = defaults.save_to(config_file);
            return defaults;
        }

        match fs::read_to_string(config_file).map(|content| Self::from_toml(&content)) {
            Ok(Ok(mut config)) => {
                if config.merge_defaults(&defaults) {
                    let _ = config.save_to(config_file);
                }
                config
            }
            Ok(Err(e)) => {
                error!("Ignoring malformed config {}: {e}", config_file.display());
                defaults
            }
            Err(e) => {
                error!("Cannot read config {}: {e}", config_file.display());
                defaults
            }
        }
    }

    /// Save to the user config file
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file written
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::get_config_file_path())
    }

    /// Save to an explicit file, creating its directory
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file written
    pub fn save_to(&self, config_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key.
    ///
    /// Keys: `level`, `file`, `verbose`, `catalog`, `store_dir`,
    /// `reports_dir`, `d_grades_pass` (dashes are accepted for underscores).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "catalog" => Some(self.paths.catalog.clone()),
            "store_dir" | "store-dir" => Some(self.paths.store_dir.clone()),
            "reports_dir" | "reports-dir" => Some(self.paths.reports_dir.clone()),
            "d_grades_pass" | "d-grades-pass" => Some(self.policy.d_grades_pass.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key. Call [`save`](Self::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or a boolean value does not parse
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => self.logging.verbose = parse_bool(key, value)?,
            "catalog" => self.paths.catalog = value.to_string(),
            "store_dir" | "store-dir" => self.paths.store_dir = value.to_string(),
            "reports_dir" | "reports-dir" => self.paths.reports_dir = value.to_string(),
            "d_grades_pass" | "d-grades-pass" => self.policy.d_grades_pass = parse_bool(key, value)?,
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset one key to its default value
    ///
    /// # Errors
    /// Returns an error if the key is not recognized
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "catalog" => self.paths.catalog.clone_from(&defaults.paths.catalog),
            "store_dir" | "store-dir" => self.paths.store_dir.clone_from(&defaults.paths.store_dir),
            "reports_dir" | "reports-dir" => {
                self.paths.reports_dir.clone_from(&defaults.paths.reports_dir);
            }
            "d_grades_pass" | "d-grades-pass" => {
                self.policy.d_grades_pass = defaults.policy.d_grades_pass;
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Delete the user config file; the next [`load`](Self::load) recreates it.
    /// Succeeds if there is no file.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be deleted
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  catalog = \"{}\"", self.paths.catalog)?;
        writeln!(f, "  store_dir = \"{}\"", self.paths.store_dir)?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        writeln!(f, "\n[policy]")?;
        writeln!(f, "  d_grades_pass = {}", self.policy.d_grades_pass)?;

        Ok(())
    }
}
