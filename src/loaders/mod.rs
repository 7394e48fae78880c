// ABOUTME: Observable loaders that drive the data store from changing inputs
// ABOUTME: Publishes idle, loading, ready and failed states over tokio watch channels
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Loaders
//!
//! A loader owns a `watch` channel of [`LoadState`] that views subscribe to.
//! Loads are triggered explicitly, or by [`bind`], which reloads every time
//! an input channel changes. A loader called without its inputs does
//! nothing.

/// Categories loader
pub mod categories;
/// Single week loader
pub mod week;
/// Week list loader
pub mod weeks;

pub use categories::CategoriesLoader;
pub use week::{WeekKey, WeekLoader};
pub use weeks::WeeksLoader;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::errors::ClientResult;

/// Lifecycle of one loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    /// Nothing requested yet
    Idle,
    /// A load is running
    Loading,
    /// Latest load succeeded
    Ready(T),
    /// Latest load failed with this message
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> LoadState<T> {
    /// Whether a load is running
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Loaded data, if the latest load succeeded
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }

    /// Error message, if the latest load failed
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// A loader driven by a key such as a category id
#[async_trait]
pub trait KeyedLoader: Send + Sync + 'static {
    /// Inputs identifying what to load
    type Key: Clone + Send + Sync + 'static;

    /// Load for the given key and publish the outcome
    async fn load_key(&self, key: Self::Key);
}

/// Load now with the current inputs, then again on every change
///
/// `None` inputs are skipped. The task ends when the input sender is dropped.
pub fn bind<L: KeyedLoader>(
    loader: Arc<L>,
    mut inputs: watch::Receiver<Option<L::Key>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let key = inputs.borrow_and_update().clone();
            if let Some(key) = key {
                loader.load_key(key).await;
            }
            if inputs.changed().await.is_err() {
                debug!("Loader inputs closed, stopping subscription");
                break;
            }
        }
    })
}

/// Publish `Loading`, run the load, then publish `Ready` or `Failed`
async fn publish<T, F>(state: &watch::Sender<LoadState<T>>, load: F) -> ClientResult<T>
where
    T: Clone,
    F: std::future::Future<Output = ClientResult<T>>,
{
    state.send_replace(LoadState::Loading);
    let result = load.await;
    state.send_replace(match &result {
        Ok(data) => LoadState::Ready(data.clone()),
        Err(e) => LoadState::Failed(e.to_string()),
    });
    result
}
