// ABOUTME: Auth session accessor over persistent session storage
// ABOUTME: Reads the bearer token and user record, exposes authentication and admin predicates
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Auth State
//!
//! The session is two independent string entries: the bearer token and the
//! JSON-serialized user. Nothing here validates the token; the backend
//! decides on the next request whether it is still good.

/// Session storage backends
pub mod storage;

pub use storage::{FileStorage, MemoryStorage, SessionStorage};

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::constants::storage_keys;
use crate::errors::{ClientError, ClientResult};
use crate::logging::AppLogger;
use crate::models::{AuthSession, User};

/// Cheaply clonable handle over the session storage
#[derive(Clone)]
pub struct AuthStore {
    storage: Arc<dyn SessionStorage>,
}

impl AuthStore {
    /// Wrap a storage backend
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Store backed by process memory
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to read session storage");
                None
            }
        }
    }

    /// Current bearer token, if any
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.read(storage_keys::TOKEN).filter(|t| !t.is_empty())
    }

    fn raw_user(&self) -> Option<Value> {
        let raw = self.read(storage_keys::USER)?;
        serde_json::from_str(&raw).ok()
    }

    /// Current user; an unparsable record reads as absent
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.raw_user()
            .and_then(|value| serde_json::from_value(value).ok())
    }

    /// Token and user together, when both are present
    #[must_use]
    pub fn session(&self) -> Option<AuthSession> {
        Some(AuthSession {
            token: self.token()?,
            user: self.user()?,
        })
    }

    /// A token is present
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// The stored user carries a truthy `is_admin` flag
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.raw_user()
            .and_then(|user| user.get("is_admin").map(is_truthy))
            .unwrap_or(false)
    }

    /// Persist a session
    ///
    /// # Errors
    ///
    /// Returns an error if the user cannot be serialized or storage fails
    pub fn login(&self, token: &str, user: &User) -> ClientResult<()> {
        let serialized =
            serde_json::to_string(user).map_err(|e| ClientError::serialization("user", e))?;
        self.storage.set(storage_keys::TOKEN, token)?;
        self.storage.set(storage_keys::USER, &serialized)?;
        AppLogger::log_auth_event(user.id.as_str(), "login", true);
        Ok(())
    }

    /// Persist a session returned by the login endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails
    pub fn store_session(&self, session: &AuthSession) -> ClientResult<()> {
        self.login(&session.token, &session.user)
    }

    /// Forget the session
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails
    pub fn logout(&self) -> ClientResult<()> {
        let user_id = self.user().map(|u| u.id.to_string());
        self.storage.remove(storage_keys::TOKEN)?;
        self.storage.remove(storage_keys::USER)?;
        AppLogger::log_auth_event(user_id.as_deref().unwrap_or("anonymous"), "logout", true);
        Ok(())
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n.abs() > f64::EPSILON),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
