// ABOUTME: Week endpoints of the SparkRepo API
// ABOUTME: Lists a category's weeks and fetches one week by number or id
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::{decode, decode_list, SparkApi};
use crate::errors::ClientResult;
use crate::models::{ResourceId, Week};

impl SparkApi {
    /// `GET /categories/{id}/weeks`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a week list
    pub async fn get_weeks(&self, category_id: &ResourceId) -> ClientResult<Vec<Week>> {
        let body = self
            .http
            .get(&format!("/categories/{}/weeks", category_id.path_segment()))
            .await?;
        decode_list("weeks", "weeks", body)
    }

    /// `GET /categories/{id}/weeks/{n}`, optionally with submissions embedded
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the week does not exist
    pub async fn get_week(
        &self,
        category_id: &ResourceId,
        week_number: u32,
        include_submissions: bool,
    ) -> ClientResult<Week> {
        let mut path = format!(
            "/categories/{}/weeks/{week_number}",
            category_id.path_segment()
        );
        if include_submissions {
            path.push_str("?include_submissions=true");
        }
        let body = self.http.get(&path).await?;
        decode("week", body)
    }

    /// `GET /weeks/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the week does not exist
    pub async fn get_week_by_id(&self, week_id: &ResourceId) -> ClientResult<Week> {
        let body = self
            .http
            .get(&format!("/weeks/{}", week_id.path_segment()))
            .await?;
        decode("week", body)
    }
}
