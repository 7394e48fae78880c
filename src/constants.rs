// ABOUTME: Client-wide constants for cache TTLs, environment variable names and storage keys
// ABOUTME: Defaults here are overridable through ClientConfig::from_env
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Constants Module
//!
//! Hardcoded defaults and the names of the environment variables that
//! override them.

/// Cache-related defaults
pub mod cache {
    /// Categories rarely change; kept warm for one minute
    pub const TTL_CATEGORIES_MS: u64 = 60_000;

    /// Week detail and week list entries
    pub const TTL_WEEKS_MS: u64 = 30_000;

    /// Default maximum entries per in-memory cache
    pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1_000;

    /// Default cleanup interval in seconds for expired entries
    pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300; // 5 minutes
}

/// Network defaults
pub mod http {
    /// Development backend used when no base URL is configured
    pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

    /// Prefix of the generic error message for failed requests
    pub const REQUEST_FAILED_PREFIX: &str = "Request failed";

    /// User agent sent with every request
    pub const USER_AGENT: &str = concat!("sparkrepo-client/", env!("CARGO_PKG_VERSION"));
}

/// Environment variable names
pub mod env_config {
    /// Backend base URL
    pub const API_BASE_URL: &str = "SPARKREPO_API_BASE_URL";
    /// Categories cache TTL in milliseconds
    pub const CATEGORIES_TTL_MS: &str = "SPARKREPO_CATEGORIES_TTL_MS";
    /// Week cache TTL in milliseconds
    pub const WEEKS_TTL_MS: &str = "SPARKREPO_WEEKS_TTL_MS";
    /// Maximum entries per cache
    pub const CACHE_MAX_ENTRIES: &str = "SPARKREPO_CACHE_MAX_ENTRIES";
    /// Background cleanup interval; `0` disables the task
    pub const CACHE_CLEANUP_SECS: &str = "SPARKREPO_CACHE_CLEANUP_SECS";
    /// Session file path
    pub const SESSION_FILE: &str = "SPARKREPO_SESSION_FILE";
    /// Optional request timeout
    pub const REQUEST_TIMEOUT_SECS: &str = "SPARKREPO_REQUEST_TIMEOUT_SECS";
}

/// Session storage keys
pub mod storage_keys {
    /// Bearer token key
    pub const TOKEN: &str = "access_token";
    /// Serialized user record key
    pub const USER: &str = "user";
    /// Directory under the platform data dir holding the session file
    pub const APP_DIR: &str = "sparkrepo";
    /// Session file name
    pub const SESSION_FILE_NAME: &str = "session.json";
}

/// Service identification for structured logs
pub mod service_names {
    /// Service name
    pub const SPARKREPO_CLIENT: &str = "sparkrepo-client";
}
