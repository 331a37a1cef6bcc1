//! Integration tests for configuration management

use gradpath::config::{Config, ConfigOverrides};
use gradpath::core::models::GradePolicy;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn setup_temp_config() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file = temp_dir.path().join("config.toml");
    (temp_dir, config_file)
}

#[test]
fn test_config_from_defaults() {
    let config = Config::from_defaults();

    assert!(!config.logging.level.is_empty(), "Default log level should not be empty");
    assert!(!config.paths.catalog.is_empty(), "Default catalog should not be empty");
    assert!(!config.paths.store_dir.is_empty(), "Default store_dir should not be empty");
    assert!(!config.paths.reports_dir.is_empty(), "Default reports_dir should not be empty");
    assert!(config.policy.d_grades_pass);
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/test.log"
verbose = true

[paths]
catalog = "./catalog.toml"
store_dir = "./progress"
reports_dir = "./reports"

[policy]
d_grades_pass = false
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/test.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.catalog, "./catalog.toml");
    assert_eq!(config.paths.store_dir, "./progress");
    assert_eq!(config.paths.reports_dir, "./reports");
    assert_eq!(config.grade_policy(), GradePolicy::strict());
}

#[test]
fn test_config_from_toml_partial() {
    let toml_str = r#"
[logging]
level = "error"

[paths]
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "");
    assert!(!config.logging.verbose);
    assert_eq!(config.paths.store_dir, "");
    assert!(config.policy.d_grades_pass);
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$GRADPATH/test.log"

[paths]
store_dir = "$GRADPATH/progress"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");

    assert!(config.logging.file.contains("gradpath"));
    assert!(!config.logging.file.contains("$GRADPATH"));
    assert!(config.paths.store_dir.ends_with("progress"));
    assert!(!config.paths.store_dir.contains("$GRADPATH"));
}

#[test]
fn test_config_get_set() {
    let mut config = Config::from_defaults();

    assert!(config.get("level").is_some());

    config.set("level", "debug").expect("Failed to set level");
    assert_eq!(config.get("level").unwrap(), "debug");

    config.set("verbose", "true").expect("Failed to set verbose");
    assert!(config.logging.verbose);

    config.set("d-grades-pass", "false").expect("Failed to set policy");
    assert_eq!(config.get("d_grades_pass").unwrap(), "false");

    config.set("store_dir", "/data/progress").expect("Failed to set store_dir");
    assert_eq!(config.get("store-dir").unwrap(), "/data/progress");

    assert!(config.set("verbose", "maybe").is_err());
    assert!(config.get("unknown_key").is_none());
    assert!(config.set("unknown_key", "value").is_err());
}

#[test]
fn test_config_unset() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    config.set("level", "debug").expect("Failed to set level");
    config.set("d_grades_pass", "false").expect("Failed to set policy");

    config.unset("level", &defaults).expect("Failed to unset level");
    config.unset("d_grades_pass", &defaults).expect("Failed to unset policy");
    assert_eq!(config.logging.level, defaults.logging.level);
    assert_eq!(config.policy, defaults.policy);
    assert!(config.unset("nope", &defaults).is_err());
}

#[test]
fn test_config_save_and_load() {
    let (_temp_dir, config_file) = setup_temp_config();

    let mut config = Config::from_defaults();
    config.set("level", "info").expect("Failed to set level");
    config.set("catalog", "/srv/catalog.toml").expect("Failed to set catalog");
    config.save_to(&config_file).expect("Failed to save config");

    let loaded = Config::load_from(&config_file);

    assert_eq!(loaded.logging.level, "info");
    assert_eq!(loaded.paths.catalog, "/srv/catalog.toml");
}

#[test]
fn test_config_overrides_apply() {
    let mut config = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("error".to_string()),
        file: Some("/custom/path.log".to_string()),
        verbose: Some(true),
        catalog: Some("./catalog.toml".to_string()),
        store_dir: Some("./custom_progress".to_string()),
        reports_dir: Some("./custom_reports".to_string()),
        d_grades_pass: Some(false),
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/custom/path.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.catalog, "./catalog.toml");
    assert_eq!(config.paths.store_dir, "./custom_progress");
    assert_eq!(config.paths.reports_dir, "./custom_reports");
    assert!(!config.policy.d_grades_pass);
}

#[test]
fn test_config_overrides_partial() {
    let mut config = Config::from_defaults();
    let before = config.clone();

    let overrides = ConfigOverrides {
        level: Some("debug".to_string()),
        ..Default::default()
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.paths, before.paths);
    assert_eq!(config.policy, before.policy);
}

#[test]
fn test_config_display_format() {
    let config = Config::from_defaults();
    let display_str = format!("{config}");

    assert!(display_str.contains("[logging]"));
    assert!(display_str.contains("[paths]"));
    assert!(display_str.contains("[policy]"));
    assert!(display_str.contains("store_dir"));
    assert!(display_str.contains("d_grades_pass"));
}

#[test]
fn test_merge_defaults_adds_missing_fields() {
    let toml_str = r#"
[logging]
level = "error"
file = ""
verbose = false

[paths]
catalog = ""
store_dir = ""
reports_dir = ""
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse minimal config");
    let defaults = Config::from_defaults();

    assert!(config.merge_defaults(&defaults), "merge_defaults should report added fields");
    assert_eq!(config.paths.store_dir, defaults.paths.store_dir);
    assert!(!config.merge_defaults(&defaults));
}

#[test]
fn test_merge_defaults_preserves_existing() {
    let toml_str = r#"
[logging]
level = "error"
file = "/my/custom/path.log"

[paths]
store_dir = "/my/progress"
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse config");
    let defaults = Config::from_defaults();

    config.merge_defaults(&defaults);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/my/custom/path.log");
    assert_eq!(config.paths.store_dir, "/my/progress");
}

#[test]
fn test_get_gradpath_dir() {
    let dir = Config::get_gradpath_dir();

    assert!(dir.to_string_lossy().contains("gradpath"));
    assert_ne!(dir, PathBuf::from("."));
}

#[test]
fn test_get_config_file_path() {
    let path = Config::get_config_file_path();

    let path_str = path.to_string_lossy();
    assert!(path_str.ends_with("config.toml") || path_str.ends_with("dconfig.toml"));
}

#[test]
fn test_load_from_ignores_unreadable_content() {
    let (_temp_dir, config_file) = setup_temp_config();
    fs::write(&config_file, "not = [valid").expect("Failed to write config");

    assert_eq!(Config::load_from(&config_file), Config::from_defaults());
}
