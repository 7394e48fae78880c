// ABOUTME: Typed facade over the SparkRepo REST API
// ABOUTME: Maps resource operations to HTTP calls and unwraps list and envelope responses
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Domain API
//!
//! [`SparkApi`] is a thin mapping from resource operations onto
//! [`HttpClient`]. It performs no caching and no retries; the loaders in
//! [`crate::loaders`] sit on top of it.
//!
//! Operations are grouped per resource:
//!
//! - [`categories`]: course categories
//! - [`weeks`]: weekly assignments
//! - [`submissions`]: student project submissions
//! - [`auth`]: login and account management
//! - [`admin`]: week and submission administration

/// Admin endpoints
pub mod admin;
/// Login and account endpoints
pub mod auth;
/// Category endpoints
pub mod categories;
/// Submission endpoints
pub mod submissions;
/// Week endpoints
pub mod weeks;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::errors::{ClientError, ClientResult};
use crate::http::HttpClient;

/// Resource-level client for the SparkRepo backend
#[derive(Clone)]
pub struct SparkApi {
    http: HttpClient,
}

impl SparkApi {
    /// Wrap an HTTP client
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Underlying HTTP client
    #[must_use]
    pub const fn http(&self) -> &HttpClient {
        &self.http
    }
}

/// Decode a whole response body
fn decode<T: DeserializeOwned>(context: &'static str, body: Option<Value>) -> ClientResult<T> {
    let body = body.ok_or_else(|| ClientError::serialization(context, "empty response body"))?;
    serde_json::from_value(body).map_err(|e| ClientError::serialization(context, e))
}

/// Decode a list that arrives either bare or under `field`; absent means empty
fn decode_list<T: DeserializeOwned>(
    context: &'static str,
    field: &str,
    body: Option<Value>,
) -> ClientResult<Vec<T>> {
    let list = match body {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(mut object)) => match object.remove(field) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(list) => list,
        },
        Some(list) => list,
    };
    serde_json::from_value(list).map_err(|e| ClientError::serialization(context, e))
}

/// Decode an entity wrapped as `{message, <field>: {...}}`, or sent bare
fn decode_envelope<T: DeserializeOwned>(
    context: &'static str,
    field: &str,
    body: Option<Value>,
) -> ClientResult<T> {
    match body {
        Some(Value::Object(mut object)) if object.get(field).is_some_and(Value::is_object) => {
            decode(context, object.remove(field))
        }
        other => decode(context, other),
    }
}

fn to_body<T: Serialize>(context: &'static str, payload: &T) -> ClientResult<Value> {
    serde_json::to_value(payload).map_err(|e| ClientError::serialization(context, e))
}
