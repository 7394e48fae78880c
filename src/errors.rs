// ABOUTME: Unified error type for the SparkRepo client with HTTP, transport and storage variants
// ABOUTME: Errors are Clone so one in-flight result can be handed to every waiting caller
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Client Error Handling
//!
//! Every fallible operation in the crate returns [`ClientResult`]. The
//! variants follow the failure taxonomy of the data-access layer:
//!
//! - transport failures are propagated as [`ClientError::Network`]
//! - non-2xx responses become [`ClientError::Http`] carrying the best-effort
//!   message extracted from the response body
//! - shape mismatches become [`ClientError::Serialization`]
//!
//! The type is `Clone` because concurrent identical requests share a single
//! settled result.

use std::fmt::Display;

use reqwest::StatusCode;

use crate::constants::http::REQUEST_FAILED_PREFIX;

/// Result alias used across the crate
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors produced by the SparkRepo client
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response (DNS, connect, TLS, reset)
    #[error("{message}")]
    Network {
        /// Transport error text
        message: String,
    },

    /// The backend answered with a non-success status
    #[error("{message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Message from the body's `error` field, or `Request failed: <status>`
        message: String,
    },

    /// A payload could not be encoded or did not match the expected shape
    #[error("Serialization failed for {context}: {message}")]
    Serialization {
        /// What was being encoded or decoded
        context: &'static str,
        /// Underlying serde error text
        message: String,
    },

    /// The session storage backend failed
    #[error("Session storage error: {message}")]
    Storage {
        /// Error details
        message: String,
    },

    /// A configuration value is missing or invalid
    #[error("Invalid configuration for {key}: {reason}")]
    Config {
        /// Configuration key
        key: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Unexpected internal failure
    #[error("Internal error: {message}")]
    Internal {
        /// Error details
        message: String,
    },
}

impl ClientError {
    /// Transport failure
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Non-2xx response
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Generic message used when the error body carries nothing usable
    #[must_use]
    pub fn request_failed(status: StatusCode) -> Self {
        let code = status.as_u16();
        Self::http(code, format!("{REQUEST_FAILED_PREFIX}: {code}"))
    }

    /// Encode/decode failure
    pub fn serialization(context: &'static str, source: impl Display) -> Self {
        Self::Serialization {
            context,
            message: source.to_string(),
        }
    }

    /// Session storage failure
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Configuration failure
    pub fn config(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Config {
            key,
            reason: reason.into(),
        }
    }

    /// Internal failure
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status for `Http` errors
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend reported the resource as missing
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        Self::network(error.to_string())
    }
}
