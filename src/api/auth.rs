// ABOUTME: Authentication endpoints of the SparkRepo API
// ABOUTME: Login, current user lookup, admin user creation and password change
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use serde_json::json;

use super::{decode, decode_envelope, to_body, SparkApi};
use crate::errors::ClientResult;
use crate::models::{AuthSession, LoginResponse, NewUser, User};

impl SparkApi {
    /// `POST /auth/login`
    ///
    /// The returned session is not persisted; pass it to
    /// [`crate::auth::AuthStore::store_session`] to sign in.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<AuthSession> {
        let body = self
            .http
            .post(
                "/auth/login",
                json!({ "username": username, "password": password }),
            )
            .await?;
        decode::<LoginResponse>("login response", body).map(AuthSession::from)
    }

    /// `GET /auth/me`
    ///
    /// # Errors
    ///
    /// Returns an error if the token is missing, expired or the user is gone
    pub async fn me(&self) -> ClientResult<User> {
        let body = self.http.get("/auth/me").await?;
        decode_envelope("user", "user", body)
    }

    /// `POST /auth/users` (admin only)
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the username is taken
    pub async fn create_user(&self, user: &NewUser) -> ClientResult<User> {
        let body = self.http.post("/auth/users", to_body("user", user)?).await?;
        decode_envelope("user", "user", body)
    }

    /// `POST /auth/change-password` for the signed-in user
    ///
    /// # Errors
    ///
    /// Returns an error if the current password is wrong
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> ClientResult<()> {
        self.http
            .post(
                "/auth/change-password",
                json!({
                    "current_password": current_password,
                    "new_password": new_password,
                }),
            )
            .await?;
        Ok(())
    }
}
