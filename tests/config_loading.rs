#![cfg(feature = "server")]
//! Server config loading: defaults, config file, environment precedence.

use pawlog_ui::config::{load_config, ThemePersistence};
use serial_test::serial;
use std::env;

fn clear_env() {
    for key in ["PAWLOG_PORT", "PORT", "PAWLOG_CONFIG_DIR", "PAWLOG_PAGE__IDS__YEAR"] {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_defaults_without_file_or_env() {
    clear_env();
    env::set_var("PAWLOG_CONFIG_DIR", "/tmp/pawlog-test-nonexistent");

    let config = load_config().expect("config should load");
    clear_env();

    assert_eq!(config.port, 5000);
    assert_eq!(config.pkg_dir, std::path::PathBuf::from("pkg"));
    assert_eq!(config.page.ids.year, "current_year");
    assert_eq!(config.page.alerts.flash_delay_ms, 5_000);
}

#[test]
#[serial]
fn test_config_file_overrides_defaults() {
    clear_env();
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("pawlog.toml"),
        r#"
port = 8123

[page.theme]
persistence = "local_storage"

[page.alerts]
alert_delay_ms = 2500
"#,
    )
    .expect("write config");
    env::set_var("PAWLOG_CONFIG_DIR", dir.path());

    let config = load_config().expect("config should load");
    clear_env();

    assert_eq!(config.port, 8123);
    assert_eq!(config.page.theme.persistence, ThemePersistence::LocalStorage);
    assert_eq!(config.page.alerts.alert_delay_ms, 2_500);
    // Untouched sections keep their defaults
    assert_eq!(config.page.alerts.flash_delay_ms, 5_000);
    assert_eq!(config.page.theme.storage_key, "theme");
}

#[test]
#[serial]
fn test_port_env_fallback() {
    clear_env();
    env::set_var("PAWLOG_CONFIG_DIR", "/tmp/pawlog-test-nonexistent");
    env::set_var("PORT", "3000");

    let config = load_config().expect("config should load");
    clear_env();

    assert_eq!(config.port, 3000, "PORT env var should set config.port");
}

#[test]
#[serial]
fn test_pawlog_port_takes_precedence_over_port() {
    clear_env();
    env::set_var("PAWLOG_CONFIG_DIR", "/tmp/pawlog-test-nonexistent");
    env::set_var("PAWLOG_PORT", "5050");
    env::set_var("PORT", "3000");

    let config = load_config().expect("config should load");
    clear_env();

    assert_eq!(config.port, 5050);
}

#[test]
#[serial]
fn test_nested_env_override() {
    clear_env();
    env::set_var("PAWLOG_CONFIG_DIR", "/tmp/pawlog-test-nonexistent");
    env::set_var("PAWLOG_PAGE__IDS__YEAR", "footer-year");

    let config = load_config().expect("config should load");
    clear_env();

    assert_eq!(config.page.ids.year, "footer-year");
}
