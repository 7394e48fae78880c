// ABOUTME: Loader for the ordered week list of one category
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use super::{publish, KeyedLoader, LoadState};
use crate::errors::ClientResult;
use crate::models::{ResourceId, Week};
use crate::store::DataStore;

/// Observable week list
pub struct WeeksLoader {
    store: Arc<DataStore>,
    state: watch::Sender<LoadState<Vec<Week>>>,
}

impl WeeksLoader {
    /// Create an idle loader
    #[must_use]
    pub fn new(store: Arc<DataStore>) -> Self {
        let (state, _) = watch::channel(LoadState::Idle);
        Self { store, state }
    }

    /// Receive state updates
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadState<Vec<Week>>> {
        self.state.subscribe()
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> LoadState<Vec<Week>> {
        self.state.borrow().clone()
    }

    /// Load weeks of a category; `None` leaves the state untouched
    ///
    /// # Errors
    ///
    /// Returns the fetch error, which is also published as `Failed`
    pub async fn load_weeks(
        &self,
        category_id: Option<&ResourceId>,
    ) -> ClientResult<Option<Vec<Week>>> {
        let Some(category_id) = category_id else {
            return Ok(None);
        };
        publish(&self.state, self.store.weeks(category_id))
            .await
            .map(Some)
    }
}

#[async_trait]
impl KeyedLoader for WeeksLoader {
    type Key = ResourceId;

    async fn load_key(&self, category_id: ResourceId) {
        let _ = self.load_weeks(Some(&category_id)).await;
    }
}
