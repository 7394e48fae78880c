// ABOUTME: HTTP request layer for the SparkRepo backend
// ABOUTME: Builds URLs and headers, attaches the bearer token, decodes errors and coalesces identical calls
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # HTTP Request Layer
//!
//! Every backend call goes through [`HttpClient::request`]. Calls are keyed by
//! method and full URL; while one is pending, identical calls attach to it
//! instead of hitting the network again.

/// Coalescing of concurrent identical requests
pub mod inflight;

pub use inflight::InFlightRegistry;

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

use crate::auth::AuthStore;
use crate::config::environment::validate_base_url;
use crate::config::ClientConfig;
use crate::constants::http::USER_AGENT;
use crate::errors::{ClientError, ClientResult};
use crate::logging::AppLogger;

/// Method, extra headers and optional JSON body of one call
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method, GET unless set
    pub method: Method,
    /// Headers applied after the default `Content-Type`
    pub headers: HeaderMap,
    /// JSON request body
    pub body: Option<Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    /// Options for the given method
    #[must_use]
    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Attach a JSON body
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add or replace a header
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    fn dedup_key(&self, url: &str) -> String {
        format!("{}:{url}", self.method)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Backend client; clones share the connection pool, auth store and in-flight registry
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Arc<str>,
    auth: AuthStore,
    in_flight: InFlightRegistry,
}

impl HttpClient {
    /// Create a client for `base_url` without a request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built
    pub fn new(base_url: &str, auth: AuthStore) -> ClientResult<Self> {
        Self::build(base_url, auth, None)
    }

    /// Create a client from loaded configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built
    pub fn from_config(config: &ClientConfig, auth: AuthStore) -> ClientResult<Self> {
        Self::build(&config.api_base_url, auth, config.request_timeout)
    }

    fn build(
        base_url: &str,
        auth: AuthStore,
        timeout: Option<Duration>,
    ) -> ClientResult<Self> {
        validate_base_url(base_url)?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, base_url, auth))
    }

    /// Wrap an existing `reqwest` client
    #[must_use]
    pub fn with_client(client: Client, base_url: &str, auth: AuthStore) -> Self {
        let base_url = base_url.strip_suffix('/').unwrap_or(base_url);
        Self {
            client,
            base_url: Arc::from(base_url),
            auth,
            in_flight: InFlightRegistry::new(),
        }
    }

    /// Base URL without trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Auth store consulted for the bearer token
    #[must_use]
    pub const fn auth(&self) -> &AuthStore {
        &self.auth
    }

    /// Full URL for an API path
    #[must_use]
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Number of calls currently on the wire
    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Issue a request, or join an identical one already pending
    ///
    /// Returns `None` for `204 No Content`, otherwise the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` for non-2xx responses, `ClientError::Network`
    /// when no response arrives, and `ClientError::Serialization` when a
    /// success body is not JSON
    pub async fn request(&self, path: &str, options: RequestOptions) -> ClientResult<Option<Value>> {
        let url = self.build_url(path);
        let key = options.dedup_key(&url);
        let client = self.clone();
        self.in_flight
            .join_or_start(key, move || client.execute(url, options))
            .await
    }

    /// `GET` a path
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`]
    pub async fn get(&self, path: &str) -> ClientResult<Option<Value>> {
        self.request(path, RequestOptions::default()).await
    }

    /// `POST` a JSON body
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`]
    pub async fn post(&self, path: &str, body: Value) -> ClientResult<Option<Value>> {
        self.request(path, RequestOptions::method(Method::POST).with_body(body))
            .await
    }

    /// `PUT` a JSON body
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`]
    pub async fn put(&self, path: &str, body: Value) -> ClientResult<Option<Value>> {
        self.request(path, RequestOptions::method(Method::PUT).with_body(body))
            .await
    }

    /// `DELETE` a path
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`]
    pub async fn delete(&self, path: &str) -> ClientResult<Option<Value>> {
        self.request(path, RequestOptions::method(Method::DELETE))
            .await
    }

    fn headers_for(&self, options: &RequestOptions) -> ClientResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &options.headers {
            headers.insert(name.clone(), value.clone());
        }
        if let Some(token) = self.auth.token() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ClientError::internal(format!("Invalid bearer token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    async fn execute(self, url: String, options: RequestOptions) -> ClientResult<Option<Value>> {
        let span = info_span!(
            "http_request",
            http.method = %options.method,
            http.url = %url,
            request.id = %Uuid::new_v4(),
        );
        self.send(&url, options).instrument(span).await
    }

    async fn send(&self, url: &str, options: RequestOptions) -> ClientResult<Option<Value>> {
        let headers = self.headers_for(&options)?;
        let mut builder = self
            .client
            .request(options.method.clone(), url)
            .headers(headers);
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let started = Instant::now();
        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "Request failed before a response arrived");
            ClientError::from(e)
        })?;
        let status = response.status();
        AppLogger::log_api_request(
            options.method.as_str(),
            url,
            status.as_u16(),
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );

        if !status.is_success() {
            let error = Self::error_from_body(status, response).await;
            warn!(http.status = status.as_u16(), error = %error, "Backend returned an error");
            return Err(error);
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| ClientError::serialization("response body", e))
    }

    /// Best-effort message from an error body; anything unusable falls back to the status
    async fn error_from_body(status: StatusCode, response: reqwest::Response) -> ClientError {
        let message = response
            .bytes()
            .await
            .ok()
            .and_then(|bytes| serde_json::from_slice::<ErrorBody>(&bytes).ok())
            .and_then(|body| body.error);

        match message {
            Some(message) => ClientError::http(status.as_u16(), message),
            None => ClientError::request_failed(status),
        }
    }
}
