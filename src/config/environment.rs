// ABOUTME: Environment configuration for the SparkRepo client
// ABOUTME: Parses base URL, cache TTLs, cache bounds, session file and timeout settings
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Environment-based configuration, resolved once at application startup

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::info;
use url::Url;

use crate::auth::FileStorage;
use crate::cache::{CacheConfig, CacheTtlConfig};
use crate::constants::{cache, env_config, http};
use crate::errors::{ClientError, ClientResult};

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, e.g. `http://localhost:5000/api`
    pub api_base_url: String,
    /// Response cache settings
    pub cache: CacheConfig,
    /// Session file; `None` falls back to the platform data directory
    pub session_file: Option<PathBuf>,
    /// Request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: http::DEFAULT_API_BASE_URL.to_owned(),
            cache: CacheConfig::default(),
            session_file: None,
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is set to an invalid value
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is set to an invalid value
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url =
            get(env_config::API_BASE_URL).unwrap_or_else(|| http::DEFAULT_API_BASE_URL.to_owned());

        let ttl = CacheTtlConfig {
            categories_ms: parse_var(&get, env_config::CATEGORIES_TTL_MS)?
                .unwrap_or(cache::TTL_CATEGORIES_MS),
            weeks_ms: parse_var(&get, env_config::WEEKS_TTL_MS)?.unwrap_or(cache::TTL_WEEKS_MS),
        };

        let cleanup_secs = parse_var(&get, env_config::CACHE_CLEANUP_SECS)?
            .unwrap_or(cache::DEFAULT_CLEANUP_INTERVAL_SECS);

        let config = Self {
            api_base_url,
            cache: CacheConfig {
                max_entries: parse_var(&get, env_config::CACHE_MAX_ENTRIES)?
                    .unwrap_or(cache::DEFAULT_CACHE_MAX_ENTRIES),
                cleanup_interval: Duration::from_secs(cleanup_secs.max(1)),
                enable_background_cleanup: cleanup_secs > 0,
                ttl,
            },
            session_file: get(env_config::SESSION_FILE).map(PathBuf::from),
            request_timeout: parse_var::<u64, _>(&get, env_config::REQUEST_TIMEOUT_SECS)?
                .map(Duration::from_secs),
        };

        config.validate()?;
        info!(
            api_base_url = %config.api_base_url,
            categories_ttl_ms = config.cache.ttl.categories_ms,
            weeks_ttl_ms = config.cache.ttl.weeks_ms,
            "Client configuration loaded"
        );
        Ok(config)
    }

    /// Where the session is persisted
    ///
    /// The configured file wins, then the platform data directory. `None`
    /// only when the platform has no data directory, in which case the
    /// session lives in memory.
    #[must_use]
    pub fn session_path(&self) -> Option<PathBuf> {
        self.session_file.clone().or_else(FileStorage::default_path)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute http(s) URL or a
    /// bound is zero
    pub fn validate(&self) -> ClientResult<()> {
        validate_base_url(&self.api_base_url)?;
        if self.cache.max_entries == 0 {
            return Err(ClientError::config(
                env_config::CACHE_MAX_ENTRIES,
                "must be greater than 0",
            ));
        }
        if self.request_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ClientError::config(
                env_config::REQUEST_TIMEOUT_SECS,
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Check that a base URL is absolute http(s)
///
/// # Errors
///
/// Returns an error describing why the URL was rejected
pub fn validate_base_url(base_url: &str) -> ClientResult<()> {
    let parsed = Url::parse(base_url)
        .map_err(|e| ClientError::config(env_config::API_BASE_URL, format!("{base_url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ClientError::config(
            env_config::API_BASE_URL,
            format!("unsupported scheme '{other}'"),
        )),
    }
}

fn parse_var<T, G>(get: &G, key: &'static str) -> ClientResult<Option<T>>
where
    T: FromStr,
    T::Err: Display,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| ClientError::config(key, format!("'{raw}': {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() -> ClientResult<()> {
        let config = ClientConfig::from_lookup(lookup_from(&[]))?;
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.cache.ttl.categories_ms, 60_000);
        assert_eq!(config.cache.ttl.weeks_ms, 30_000);
        assert!(config.cache.enable_background_cleanup);
        assert!(config.request_timeout.is_none());
        assert!(config.session_file.is_none());
        Ok(())
    }

    #[test]
    fn test_session_path_prefers_configured_file() -> ClientResult<()> {
        let configured = ClientConfig::from_lookup(lookup_from(&[(
            "SPARKREPO_SESSION_FILE",
            "/tmp/sparkrepo/session.json",
        )]))?;
        assert_eq!(
            configured.session_path(),
            Some(PathBuf::from("/tmp/sparkrepo/session.json"))
        );

        let default = ClientConfig::from_lookup(lookup_from(&[]))?;
        assert_eq!(default.session_path(), FileStorage::default_path());
        Ok(())
    }

    #[test]
    fn test_overrides() -> ClientResult<()> {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("SPARKREPO_API_BASE_URL", "https://spark.example.org/api/"),
            ("SPARKREPO_WEEKS_TTL_MS", "500"),
            ("SPARKREPO_CACHE_CLEANUP_SECS", "0"),
            ("SPARKREPO_REQUEST_TIMEOUT_SECS", "15"),
        ]))?;
        assert_eq!(config.api_base_url, "https://spark.example.org/api/");
        assert_eq!(config.cache.ttl.weeks_ms, 500);
        assert!(!config.cache.enable_background_cleanup);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
        Ok(())
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let bad_number =
            ClientConfig::from_lookup(lookup_from(&[("SPARKREPO_CATEGORIES_TTL_MS", "soon")]));
        assert!(matches!(
            bad_number,
            Err(ClientError::Config {
                key: "SPARKREPO_CATEGORIES_TTL_MS",
                ..
            })
        ));

        let bad_url = ClientConfig::from_lookup(lookup_from(&[("SPARKREPO_API_BASE_URL", "ftp://x")]));
        assert!(bad_url.is_err());

        let zero_entries =
            ClientConfig::from_lookup(lookup_from(&[("SPARKREPO_CACHE_MAX_ENTRIES", "0")]));
        assert!(zero_entries.is_err());
    }
}
