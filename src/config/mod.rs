// ABOUTME: Configuration management module for the SparkRepo client
// ABOUTME: Exposes the environment-driven ClientConfig used at startup
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Environment-based client configuration
pub mod environment;

pub use environment::ClientConfig;
