// ABOUTME: Shared data store combining the API facade with the category and week caches
// ABOUTME: Applies category ordering, week ordering and best-effort submission loading
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Data Store
//!
//! One [`DataStore`] is built at startup and shared through an `Arc` by every
//! loader, so switching between views reuses warm entries. Only successful
//! results are cached.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::SparkApi;
use crate::auth::{AuthStore, FileStorage};
use crate::cache::{CacheConfig, CacheKey, CacheTtlConfig, InMemoryCache};
use crate::config::ClientConfig;
use crate::errors::ClientResult;
use crate::http::HttpClient;
use crate::models::{Category, ResourceId, Submission, Week};

/// A week together with its submissions and the caller's own submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekData {
    /// The assignment
    pub week: Week,
    /// All submissions for the week; empty when they could not be loaded
    pub submissions: Vec<Submission>,
    /// The caller's submission, if the backend knows one
    pub submission: Option<Submission>,
}

/// API facade plus the response caches shared across loaders
pub struct DataStore {
    api: SparkApi,
    categories: InMemoryCache,
    weeks: InMemoryCache,
    ttl: CacheTtlConfig,
}

impl DataStore {
    /// Create a store over an existing API facade
    #[must_use]
    pub fn new(api: SparkApi, config: &CacheConfig) -> Self {
        Self {
            api,
            categories: InMemoryCache::new("categories", config),
            weeks: InMemoryCache::new("weeks", config),
            ttl: config.ttl,
        }
    }

    /// Wire session storage, HTTP client, facade and caches from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn from_config(config: &ClientConfig) -> ClientResult<Arc<Self>> {
        let auth = match config.session_path() {
            Some(path) => {
                debug!(path = %path.display(), "Persisting session to file");
                AuthStore::new(Arc::new(FileStorage::new(path)))
            }
            None => {
                warn!("No data directory available, session will not outlive the process");
                AuthStore::in_memory()
            }
        };
        let http = HttpClient::from_config(config, auth)?;
        Ok(Arc::new(Self::new(SparkApi::new(http), &config.cache)))
    }

    /// The API facade, for uncached calls
    #[must_use]
    pub const fn api(&self) -> &SparkApi {
        &self.api
    }

    /// Session accessor used by the HTTP layer
    #[must_use]
    pub const fn auth(&self) -> &AuthStore {
        self.api.http().auth()
    }

    /// Categories ordered Scratch first, Canva second, then alphabetically
    ///
    /// # Errors
    ///
    /// Returns an error if the categories cannot be fetched
    pub async fn categories(&self, force_refresh: bool) -> ClientResult<Vec<Category>> {
        let key = CacheKey::Categories;
        if !force_refresh {
            if let Some(cached) = self.cached(&self.categories, &key).await {
                return Ok(cached);
            }
        }

        let mut categories = self.api.get_categories().await?;
        sort_categories(&mut categories);
        self.store(&self.categories, &key, &categories).await;
        Ok(categories)
    }

    /// A week with its submissions
    ///
    /// The week and the caller's own submission are fetched together; the
    /// week's submission list follows and falls back to empty on failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the week itself cannot be fetched
    pub async fn week_data(
        &self,
        category_id: &ResourceId,
        week_number: u32,
    ) -> ClientResult<WeekData> {
        let key = CacheKey::week(category_id.clone(), week_number);
        if let Some(cached) = self.cached(&self.weeks, &key).await {
            return Ok(cached);
        }

        let (week, submission) = tokio::join!(
            self.api.get_week(category_id, week_number, false),
            self.api.get_submission(category_id, week_number),
        );
        let week = week?;

        let submissions = match self.api.get_week_submissions(&week.id).await {
            Ok(submissions) => submissions,
            Err(e) => {
                debug!(week.id = %week.id, error = %e, "Week submissions unavailable");
                Vec::new()
            }
        };

        let data = WeekData {
            week,
            submissions,
            submission,
        };
        self.store(&self.weeks, &key, &data).await;
        Ok(data)
    }

    /// All weeks of a category in ascending week number order
    ///
    /// # Errors
    ///
    /// Returns an error if the weeks cannot be fetched
    pub async fn weeks(&self, category_id: &ResourceId) -> ClientResult<Vec<Week>> {
        let key = CacheKey::weeks(category_id.clone());
        if let Some(cached) = self.cached(&self.weeks, &key).await {
            return Ok(cached);
        }

        let mut weeks = self.api.get_weeks(category_id).await?;
        weeks.sort_by_key(|week| week.week_number);
        self.store(&self.weeks, &key, &weeks).await;
        Ok(weeks)
    }

    /// Drop one cached week so the next load fetches it
    pub async fn evict_week(&self, category_id: &ResourceId, week_number: u32) {
        self.weeks
            .invalidate(&CacheKey::week(category_id.clone(), week_number))
            .await;
    }

    /// Drop every cached week and the week list of a category
    ///
    /// # Errors
    ///
    /// Returns an error if the category id cannot form a valid key pattern
    pub async fn invalidate_category(&self, category_id: &ResourceId) -> ClientResult<u64> {
        let mut removed = 0;
        for pattern in CacheKey::category_patterns(category_id) {
            removed += self
                .weeks
                .invalidate_pattern_where(&pattern, |key| CacheKey::belongs_to(key, category_id))
                .await?;
        }
        debug!(category.id = %category_id, removed, "Invalidated cached weeks");
        Ok(removed)
    }

    /// Empty both caches
    pub async fn clear(&self) {
        self.categories.clear_all().await;
        self.weeks.clear_all().await;
    }

    async fn cached<T>(&self, cache: &InMemoryCache, key: &CacheKey) -> Option<T>
    where
        T: serde::de::DeserializeOwned,
    {
        match cache.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(cache = cache.name(), key = %key, error = %e, "Discarding unreadable cache entry");
                cache.invalidate(key).await;
                None
            }
        }
    }

    async fn store<T: Serialize + Sync>(&self, cache: &InMemoryCache, key: &CacheKey, value: &T) {
        if let Err(e) = cache.set(key, value, self.ttl.ttl_for(key)).await {
            warn!(cache = cache.name(), key = %key, error = %e, "Failed to cache response");
        }
    }
}

/// Scratch first, Canva second, everything else after; ties broken by name
pub fn sort_categories(categories: &mut [Category]) {
    categories.sort_by(|a, b| {
        a.sort_priority()
            .cmp(&b.sort_priority())
            .then_with(|| compare_names(&a.name, &b.name))
    });
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str) -> Category {
        Category {
            id: ResourceId::from(name),
            name: name.to_owned(),
            description: None,
        }
    }

    #[test]
    fn test_category_order() {
        let mut categories: Vec<Category> = ["Beta", "Scratch Jr", "Canva Basics", "Alpha"]
            .into_iter()
            .map(category)
            .collect();
        sort_categories(&mut categories);
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Scratch Jr", "Canva Basics", "Alpha", "Beta"]);
    }

    #[test]
    fn test_alphabetical_tiebreak_ignores_case() {
        let mut categories: Vec<Category> = ["beta", "Alpha", "scratch 2", "Scratch 1"]
            .into_iter()
            .map(category)
            .collect();
        sort_categories(&mut categories);
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Scratch 1", "scratch 2", "Alpha", "beta"]);
    }
}
