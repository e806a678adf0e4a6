//! Configuration resolution tests
//!
//! Covers:
//! - Priority order: CLI/env → TOML → compiled default
//! - Missing config files fall back to defaults
//! - Malformed config files
//!
//! Tests that change XDG_CONFIG_HOME are marked #[serial].

use gatrack_common::config::{
    get_default_root_folder, load_config_or_default, load_toml_config, CliOverrides,
    ServiceConfig, TomlConfig, DEFAULT_BIND_ADDRESS, DEFAULT_PORT,
};
use serial_test::serial;
use std::path::PathBuf;

fn write_config(dir: &tempfile::TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).expect("Should write config file");
    path
}

#[test]
fn test_defaults_when_nothing_configured() {
    let config = ServiceConfig::resolve(CliOverrides::default(), TomlConfig::default());

    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
    assert_eq!(config.root_folder, get_default_root_folder());
    assert!(config.database_path().ends_with("gatrack.db"));
}

#[test]
fn test_toml_overrides_defaults() {
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/srv/gatrack")),
        port: Some(8080),
        bind_address: Some("0.0.0.0".to_string()),
    };

    let config = ServiceConfig::resolve(CliOverrides::default(), toml);

    assert_eq!(config.root_folder, PathBuf::from("/srv/gatrack"));
    assert_eq!(config.database_path(), PathBuf::from("/srv/gatrack/gatrack.db"));
    assert_eq!(config.listen_address(), "0.0.0.0:8080");
}

#[test]
fn test_cli_overrides_toml() {
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/srv/gatrack")),
        port: Some(8080),
        bind_address: None,
    };
    let cli = CliOverrides {
        root_folder: Some(PathBuf::from("/tmp/override")),
        port: Some(9090),
        bind_address: None,
    };

    let config = ServiceConfig::resolve(cli, toml);

    assert_eq!(config.root_folder, PathBuf::from("/tmp/override"));
    assert_eq!(config.port, 9090);
    assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
}

#[test]
fn test_load_toml_config_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "port = 6000\n");

    let toml = load_toml_config(&path).expect("Partial config should parse");
    assert_eq!(toml.port, Some(6000));
    assert!(toml.root_folder.is_none());
    assert!(toml.bind_address.is_none());
}

#[test]
fn test_load_toml_config_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "port = \"not a number\"\n");

    let err = load_toml_config(&path).unwrap_err();
    assert!(matches!(err, gatrack_common::Error::Config(_)));
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.toml");

    assert!(load_config_or_default(Some(&missing)).is_err());
}

#[test]
fn test_explicit_config_malformed_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "this is not toml");

    assert!(load_config_or_default(Some(&path)).is_err());
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_default_location_config_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("gatrack")).unwrap();
    std::fs::write(
        dir.path().join("gatrack").join("config.toml"),
        "root_folder = \"/srv/from-xdg\"\n",
    )
    .unwrap();

    std::env::set_var("XDG_CONFIG_HOME", dir.path());
    let result = load_config_or_default(None);
    std::env::remove_var("XDG_CONFIG_HOME");

    let toml = result.expect("Default-location config should load");
    assert_eq!(toml.root_folder, Some(PathBuf::from("/srv/from-xdg")));
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_default_location_malformed_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("gatrack")).unwrap();
    std::fs::write(dir.path().join("gatrack").join("config.toml"), "port = [").unwrap();

    std::env::set_var("XDG_CONFIG_HOME", dir.path());
    let result = load_config_or_default(None);
    std::env::remove_var("XDG_CONFIG_HOME");

    assert_eq!(result.expect("Should degrade to defaults"), TomlConfig::default());
}
