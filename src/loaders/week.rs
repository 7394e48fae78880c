// ABOUTME: Loader for a single week with its submissions
// ABOUTME: Remembers the last key so a refresh can evict and reload it
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{watch, Mutex};

use super::{publish, KeyedLoader, LoadState};
use crate::errors::ClientResult;
use crate::models::ResourceId;
use crate::store::{DataStore, WeekData};

/// Identifies one week within a category
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeekKey {
    /// Category id
    pub category_id: ResourceId,
    /// Week number within the category
    pub week_number: u32,
}

impl WeekKey {
    /// Build a key
    pub fn new(category_id: impl Into<ResourceId>, week_number: u32) -> Self {
        Self {
            category_id: category_id.into(),
            week_number,
        }
    }
}

/// Observable week detail
pub struct WeekLoader {
    store: Arc<DataStore>,
    state: watch::Sender<LoadState<WeekData>>,
    current: Mutex<Option<WeekKey>>,
}

impl WeekLoader {
    /// Create an idle loader
    #[must_use]
    pub fn new(store: Arc<DataStore>) -> Self {
        let (state, _) = watch::channel(LoadState::Idle);
        Self {
            store,
            state,
            current: Mutex::new(None),
        }
    }

    /// Receive state updates
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadState<WeekData>> {
        self.state.subscribe()
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> LoadState<WeekData> {
        self.state.borrow().clone()
    }

    /// Load a week; `None` leaves the state untouched
    ///
    /// # Errors
    ///
    /// Returns the fetch error, which is also published as `Failed`
    pub async fn load(&self, key: Option<WeekKey>) -> ClientResult<Option<WeekData>> {
        let Some(key) = key else {
            return Ok(None);
        };
        *self.current.lock().await = Some(key.clone());
        publish(
            &self.state,
            self.store.week_data(&key.category_id, key.week_number),
        )
        .await
        .map(Some)
    }

    /// Evict the last loaded week and fetch it again
    ///
    /// Does nothing when no week has been loaded yet.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, which is also published as `Failed`
    pub async fn refresh(&self) -> ClientResult<Option<WeekData>> {
        let current = self.current.lock().await.clone();
        if let Some(key) = &current {
            self.store
                .evict_week(&key.category_id, key.week_number)
                .await;
        }
        self.load(current).await
    }
}

#[async_trait]
impl KeyedLoader for WeekLoader {
    type Key = WeekKey;

    async fn load_key(&self, key: WeekKey) {
        let _ = self.load(Some(key)).await;
    }
}
