// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides mock backend wiring, quiet logging and sample payloads
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `sparkrepo_client`

use std::sync::{Arc, Once};
use std::time::Duration;

use anyhow::Result;
use serde_json::{json, Value};
use sparkrepo_client::cache::{CacheConfig, CacheTtlConfig};
use sparkrepo_client::{AuthStore, DataStore, HttpClient, SparkApi};
use wiremock::MockServer;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                std::env::var("TEST_LOG").unwrap_or_else(|_| "warn".to_owned()),
            )
            .with_test_writer()
            .try_init();
    });
}

/// HTTP client against the mock server with an in-memory session
pub fn http_client(server: &MockServer) -> Result<HttpClient> {
    init_test_logging();
    Ok(HttpClient::new(&server.uri(), AuthStore::in_memory())?)
}

/// API facade against the mock server
pub fn api(server: &MockServer) -> Result<SparkApi> {
    Ok(SparkApi::new(http_client(server)?))
}

/// Cache settings without background cleanup
pub fn cache_config(ttl: CacheTtlConfig) -> CacheConfig {
    CacheConfig {
        max_entries: 100,
        cleanup_interval: Duration::from_secs(300),
        enable_background_cleanup: false,
        ttl,
    }
}

/// Store with default TTLs against the mock server
pub fn data_store(server: &MockServer) -> Result<Arc<DataStore>> {
    data_store_with_ttl(server, CacheTtlConfig::default())
}

/// Store with custom TTLs against the mock server
pub fn data_store_with_ttl(server: &MockServer, ttl: CacheTtlConfig) -> Result<Arc<DataStore>> {
    Ok(Arc::new(DataStore::new(api(server)?, &cache_config(ttl))))
}

/// Week payload as returned by the backend
pub fn week_json(id: i64, category_id: &str, week_number: u32) -> Value {
    json!({
        "id": id,
        "category_id": category_id,
        "week_number": week_number,
        "title": format!("Week {week_number}"),
        "is_active": true
    })
}

/// Submission payload as returned by the backend
pub fn submission_json(id: i64, week_id: i64, student_name: &str) -> Value {
    json!({
        "id": id,
        "week_id": week_id,
        "student_name": student_name,
        "project_url": format!("https://scratch.mit.edu/projects/{id}"),
        "status": "pending"
    })
}
