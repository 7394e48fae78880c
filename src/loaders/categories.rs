// ABOUTME: Loader for the ordered categories list
// ABOUTME: Serves the shared cache unless a refresh is forced
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use super::{publish, KeyedLoader, LoadState};
use crate::errors::ClientResult;
use crate::models::Category;
use crate::store::DataStore;

/// Observable categories list
pub struct CategoriesLoader {
    store: Arc<DataStore>,
    state: watch::Sender<LoadState<Vec<Category>>>,
}

impl CategoriesLoader {
    /// Create an idle loader
    #[must_use]
    pub fn new(store: Arc<DataStore>) -> Self {
        let (state, _) = watch::channel(LoadState::Idle);
        Self { store, state }
    }

    /// Receive state updates
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadState<Vec<Category>>> {
        self.state.subscribe()
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> LoadState<Vec<Category>> {
        self.state.borrow().clone()
    }

    /// Load categories, bypassing the cache when `force_refresh` is set
    ///
    /// # Errors
    ///
    /// Returns the fetch error, which is also published as `Failed`
    pub async fn load_categories(&self, force_refresh: bool) -> ClientResult<Vec<Category>> {
        publish(&self.state, self.store.categories(force_refresh)).await
    }
}

#[async_trait]
impl KeyedLoader for CategoriesLoader {
    /// Whether to force a refresh
    type Key = bool;

    async fn load_key(&self, force_refresh: bool) {
        // Outcome is published on the state channel
        let _ = self.load_categories(force_refresh).await;
    }
}
