// ABOUTME: Main library entry point for the SparkRepo client core
// ABOUTME: HTTP layer, domain API, session state, response caches and observable loaders
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![deny(unsafe_code)]

//! # SparkRepo Client
//!
//! Data-access core for the SparkRepo course-submission tracker. Students
//! browse categories and weekly assignments and submit project links;
//! administrators manage weeks and review submissions. The backend is an
//! external REST service.
//!
//! ## Architecture
//!
//! Leaf first:
//! - **HTTP**: JSON requests with bearer auth, error normalization and
//!   coalescing of concurrent identical calls
//! - **Auth**: token and user record over pluggable session storage
//! - **API**: typed operations per backend resource
//! - **Store and loaders**: TTL caches plus watch-channel loaders that views
//!   subscribe to
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use sparkrepo_client::config::ClientConfig;
//! use sparkrepo_client::errors::ClientResult;
//! use sparkrepo_client::loaders::{CategoriesLoader, LoadState};
//! use sparkrepo_client::store::DataStore;
//!
//! #[tokio::main]
//! async fn main() -> ClientResult<()> {
//!     let config = ClientConfig::from_env()?;
//!     let store = DataStore::from_config(&config)?;
//!
//!     let categories = CategoriesLoader::new(Arc::clone(&store));
//!     categories.load_categories(false).await?;
//!     if let LoadState::Ready(list) = categories.state() {
//!         println!("{} categories", list.len());
//!     }
//!     Ok(())
//! }
//! ```

/// Typed facade over the backend REST API
pub mod api;

/// Session state over pluggable storage
pub mod auth;

/// Response caching with TTL and LRU bounds
pub mod cache;

/// Environment configuration
pub mod config;

/// Application constants and defaults
pub mod constants;

/// Unified error handling
pub mod errors;

/// HTTP request layer with in-flight deduplication
pub mod http;

/// Observable loaders
pub mod loaders;

/// Structured logging setup
pub mod logging;

/// Domain models and request payloads
pub mod models;

/// Cached data store shared by loaders
pub mod store;

/// Utility functions
pub mod utils;

pub use api::SparkApi;
pub use auth::AuthStore;
pub use errors::{ClientError, ClientResult};
pub use http::{HttpClient, RequestOptions};
pub use loaders::LoadState;
pub use store::{DataStore, WeekData};
