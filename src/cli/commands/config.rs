//! Config command handler
//!
//! Reads and edits the persisted user configuration. Edits are applied to
//! the file contents, never to the run's CLI overrides.

use crate::args::ConfigSubcommand;
use gradpath::config::Config;
use logger::error;
use std::io::{self, Write};

/// Dispatch config subcommands
///
/// `effective` is the configuration of this run (file plus CLI overrides);
/// `stored` is the file contents that `set`/`unset` modify and save.
pub fn run(subcommand: Option<ConfigSubcommand>, effective: &Config, stored: &mut Config, defaults: &Config) {
    let outcome = match subcommand {
        None => return show(effective, None),
        Some(ConfigSubcommand::Get { key }) => return show(effective, key.as_deref()),
        Some(ConfigSubcommand::Set { key, value }) => update(stored, &key, |c| c.set(&key, &value))
            .map(|()| format!("✓ Set {key} = {value}")),
        Some(ConfigSubcommand::Unset { key }) => update(stored, &key, |c| c.unset(&key, defaults))
            .map(|()| format!("✓ Reset {key} to default")),
        Some(ConfigSubcommand::Reset) => reset().map(str::to_string),
    };

    match outcome {
        Ok(msg) => println!("{msg}"),
        Err(e) => {
            error!("config: {e}");
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    }
}

fn show(config: &Config, key: Option<&str>) {
    match key {
        Some(k) => match config.get(k) {
            Some(value) => println!("{value}"),
            None => eprintln!("Unknown config key: '{k}'"),
        },
        None => {
            println!("\n=== Configuration ({}) ===\n", Config::get_config_file_path().display());
            print!("{config}");
        }
    }
}

fn update(
    config: &mut Config,
    key: &str,
    apply: impl FnOnce(&mut Config) -> Result<(), String>,
) -> Result<(), String> {
    apply(config)?;
    config
        .save()
        .map_err(|e| format!("Failed to save config after changing '{key}': {e}"))
}

fn reset() -> Result<&'static str, String> {
    if !Config::get_config_file_path().exists() {
        return Ok("✓ Config is already at defaults");
    }

    print!("Are you sure you want to reset config to defaults? (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();
    let response = response.trim();

    if response.eq_ignore_ascii_case("y") || response.eq_ignore_ascii_case("yes") {
        Config::reset().map_err(|e| format!("Failed to remove config file: {e}"))?;
        Ok("✓ Config reset to defaults")
    } else {
        Ok("✗ Reset cancelled")
    }
}
