// ABOUTME: Tests for environment-based client configuration
// ABOUTME: Runs serially because it mutates process environment variables
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serial_test::serial;
use sparkrepo_client::config::ClientConfig;
use sparkrepo_client::models::User;
use sparkrepo_client::{ClientError, DataStore};
use tempfile::TempDir;

const VARS: [&str; 7] = [
    "SPARKREPO_API_BASE_URL",
    "SPARKREPO_CATEGORIES_TTL_MS",
    "SPARKREPO_WEEKS_TTL_MS",
    "SPARKREPO_CACHE_MAX_ENTRIES",
    "SPARKREPO_CACHE_CLEANUP_SECS",
    "SPARKREPO_SESSION_FILE",
    "SPARKREPO_REQUEST_TIMEOUT_SECS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() -> Result<()> {
    clear_env();
    let config = ClientConfig::from_env()?;
    assert_eq!(config.api_base_url, "http://localhost:5000/api");
    assert_eq!(config.cache.ttl.categories_ms, 60_000);
    assert_eq!(config.cache.ttl.weeks_ms, 30_000);
    assert_eq!(config.cache.max_entries, 1_000);
    assert_eq!(config.cache.cleanup_interval, Duration::from_secs(300));
    assert!(config.request_timeout.is_none());
    Ok(())
}

#[test]
#[serial]
fn test_environment_overrides() -> Result<()> {
    clear_env();
    env::set_var("SPARKREPO_API_BASE_URL", "https://sparkrepo.example.org/api");
    env::set_var("SPARKREPO_CATEGORIES_TTL_MS", "1000");
    env::set_var("SPARKREPO_CACHE_MAX_ENTRIES", "50");
    env::set_var("SPARKREPO_SESSION_FILE", "/tmp/sparkrepo-test/session.json");
    env::set_var("SPARKREPO_REQUEST_TIMEOUT_SECS", "20");

    let config = ClientConfig::from_env()?;
    clear_env();

    assert_eq!(config.api_base_url, "https://sparkrepo.example.org/api");
    assert_eq!(config.cache.ttl.categories_ms, 1_000);
    assert_eq!(config.cache.max_entries, 50);
    assert_eq!(
        config.session_file,
        Some(PathBuf::from("/tmp/sparkrepo-test/session.json"))
    );
    assert_eq!(config.request_timeout, Some(Duration::from_secs(20)));
    Ok(())
}

#[test]
#[serial]
fn test_invalid_environment_is_rejected() {
    clear_env();
    env::set_var("SPARKREPO_WEEKS_TTL_MS", "-5");
    let result = ClientConfig::from_env();
    clear_env();

    assert!(matches!(
        result,
        Err(ClientError::Config {
            key: "SPARKREPO_WEEKS_TTL_MS",
            ..
        })
    ));
}

/// Points the platform data directory at a temporary one, restoring it on drop
#[cfg(target_os = "linux")]
struct DataHome {
    previous: Option<std::ffi::OsString>,
    dir: TempDir,
}

#[cfg(target_os = "linux")]
impl DataHome {
    fn redirect() -> Result<Self> {
        let dir = TempDir::new()?;
        let previous = env::var_os("XDG_DATA_HOME");
        env::set_var("XDG_DATA_HOME", dir.path());
        Ok(Self { previous, dir })
    }
}

#[cfg(target_os = "linux")]
impl Drop for DataHome {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(previous) => env::set_var("XDG_DATA_HOME", previous),
            None => env::remove_var("XDG_DATA_HOME"),
        }
    }
}

fn student() -> User {
    User {
        id: "7".into(),
        username: "ada".to_owned(),
        email: None,
        is_admin: false,
    }
}

#[tokio::test]
#[serial]
async fn test_store_builds_from_environment() -> Result<()> {
    clear_env();
    let session_dir = TempDir::new()?;
    env::set_var("SPARKREPO_CACHE_CLEANUP_SECS", "0");
    env::set_var(
        "SPARKREPO_SESSION_FILE",
        session_dir.path().join("session.json"),
    );
    let config = ClientConfig::from_env()?;
    clear_env();

    assert!(!config.cache.enable_background_cleanup);
    let store = DataStore::from_config(&config)?;
    assert_eq!(store.api().http().base_url(), "http://localhost:5000/api");
    assert!(!store.auth().is_authenticated());
    Ok(())
}

#[cfg(target_os = "linux")]
#[tokio::test]
#[serial]
async fn test_default_config_persists_session_across_stores() -> Result<()> {
    clear_env();
    let data_home = DataHome::redirect()?;
    env::set_var("SPARKREPO_CACHE_CLEANUP_SECS", "0");
    let config = ClientConfig::from_env()?;
    clear_env();

    let expected = data_home.dir.path().join("sparkrepo").join("session.json");
    assert!(config.session_file.is_none());
    assert_eq!(config.session_path(), Some(expected.clone()));

    let first = DataStore::from_config(&config)?;
    first.auth().login("persisted", &student())?;
    assert!(expected.exists());

    // A later run with the same configuration picks the session up
    let second = DataStore::from_config(&config)?;
    assert!(second.auth().is_authenticated());
    assert_eq!(second.auth().token().as_deref(), Some("persisted"));
    assert_eq!(second.auth().user(), Some(student()));

    second.auth().logout()?;
    assert!(!first.auth().is_authenticated());
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_configured_session_file_is_shared_between_stores() -> Result<()> {
    clear_env();
    let session_dir = TempDir::new()?;
    let path = session_dir.path().join("nested").join("session.json");
    env::set_var("SPARKREPO_CACHE_CLEANUP_SECS", "0");
    env::set_var("SPARKREPO_SESSION_FILE", &path);
    let config = ClientConfig::from_env()?;
    clear_env();

    DataStore::from_config(&config)?
        .auth()
        .login("tok", &student())?;
    let reopened = DataStore::from_config(&config)?;
    assert_eq!(reopened.auth().token().as_deref(), Some("tok"));
    assert!(path.exists());
    Ok(())
}
