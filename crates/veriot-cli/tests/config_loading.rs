//! Config file loading and environment overrides

#![allow(clippy::unwrap_used, missing_docs)]

use assert_matches::assert_matches;
use serial_test::serial;
use std::path::PathBuf;
use veriot_cli::commands::{self, ledger::parse_invocation};
use veriot_cli::config::{ENV_BACKEND, ENV_DATA_DIR, ENV_LOG_LEVEL};
use veriot_cli::{Config, ConfigError, LedgerBackend};
use veriot_registry::Outcome;

fn clear_env() {
    for name in [ENV_BACKEND, ENV_DATA_DIR, ENV_LOG_LEVEL] {
        std::env::remove_var(name);
    }
}

#[tokio::test]
#[serial]
async fn missing_file_yields_defaults() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("absent.toml")).await.unwrap();
    assert_eq!(config, Config::default());
}

#[tokio::test]
#[serial]
async fn file_values_are_loaded() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "log_level = \"debug\"\n\n[ledger]\nbackend = \"memory\"\n",
    )
    .unwrap();

    let config = Config::load(&path).await.unwrap();
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.ledger.backend, LedgerBackend::Memory);
}

#[tokio::test]
#[serial]
async fn environment_overrides_file() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[ledger]\nbackend = \"memory\"\n").unwrap();

    std::env::set_var(ENV_BACKEND, "filesystem");
    std::env::set_var(ENV_DATA_DIR, dir.path().join("ledger"));
    let result = Config::load(&path).await;
    clear_env();

    let config = result.unwrap();
    assert_eq!(config.ledger.backend, LedgerBackend::Filesystem);
    assert_eq!(config.ledger.data_dir, dir.path().join("ledger"));
}

#[tokio::test]
#[serial]
async fn invalid_log_level_is_rejected() {
    clear_env();
    std::env::set_var(ENV_LOG_LEVEL, "chatty");
    let result = Config::load(&PathBuf::from("/nonexistent/veriot.toml")).await;
    clear_env();

    assert_matches!(result, Err(ConfigError::Invalid { ref field, .. }) if field == "log_level");
}

#[tokio::test]
#[serial]
async fn malformed_file_is_a_parse_error() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "log_level = [").unwrap();

    assert_matches!(Config::load(&path).await, Err(ConfigError::Parse(_)));
}

#[tokio::test]
async fn filesystem_ledger_persists_between_commands() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.ledger.data_dir = dir.path().join("ledger");

    let ledger = commands::open_ledger(&config).unwrap();
    let register = parse_invocation(
        r#"{"function":"RegisterDevice","deviceID":"dev-1","owner":"alice","location":"lab"}"#,
    )
    .unwrap();
    commands::execute(&ledger, register).await.unwrap();
    drop(ledger);

    let reopened = commands::open_ledger(&config).unwrap();
    let exists = parse_invocation(r#"{"function":"DeviceExists","deviceID":"dev-1"}"#).unwrap();
    assert_eq!(
        commands::execute(&reopened, exists).await.unwrap(),
        Outcome::Exists(true)
    );

    let duplicate = parse_invocation(
        r#"{"function":"RegisterDevice","deviceID":"dev-1","owner":"bob","location":"roof"}"#,
    )
    .unwrap();
    let err = commands::execute(&reopened, duplicate).await.unwrap_err();
    assert!(err.to_string().contains("RegisterDevice failed"));
}
