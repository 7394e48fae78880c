// ABOUTME: Category endpoints of the SparkRepo API
// ABOUTME: Lists categories and fetches a single category by id
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::{decode, decode_list, SparkApi};
use crate::errors::ClientResult;
use crate::models::{Category, ResourceId};

impl SparkApi {
    /// `GET /categories`, unsorted as returned by the backend
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a category list
    pub async fn get_categories(&self) -> ClientResult<Vec<Category>> {
        let body = self.http.get("/categories").await?;
        decode_list("categories", "categories", body)
    }

    /// `GET /categories/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the category does not exist
    pub async fn get_category(&self, category_id: &ResourceId) -> ClientResult<Category> {
        let body = self
            .http
            .get(&format!("/categories/{}", category_id.path_segment()))
            .await?;
        decode("category", body)
    }
}
