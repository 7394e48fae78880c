// ABOUTME: Registry of in-flight requests that coalesces concurrent identical calls
// ABOUTME: One spawned task per key, shared by every caller until it settles
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::future::Future;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use tracing::debug;

use crate::errors::{ClientError, ClientResult};

/// Settled output of one backend call
pub type RequestOutcome = ClientResult<Option<Value>>;

/// Handle that every caller of the same pending request awaits
pub type SharedRequest = Shared<BoxFuture<'static, RequestOutcome>>;

/// Pending requests keyed by `METHOD:url`
///
/// The work for a key runs in its own task, so it completes even when all
/// callers stop waiting. The key is removed from inside that task before its
/// output becomes visible, which means a failed call never poisons the next
/// identical request.
#[derive(Clone, Default)]
pub struct InFlightRegistry {
    pending: Arc<DashMap<String, SharedRequest>>,
}

/// Removes the key when the owning task finishes, panics and cancellation included
struct PendingGuard {
    pending: Arc<DashMap<String, SharedRequest>>,
    key: String,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.pending.remove(&self.key);
    }
}

impl InFlightRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach to the pending request for `key`, or start `make()` when there is none
    ///
    /// `make` is only invoked for the first caller. Must be called from within
    /// a tokio runtime.
    pub fn join_or_start<F, Fut>(&self, key: String, make: F) -> SharedRequest
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RequestOutcome> + Send + 'static,
    {
        match self.pending.entry(key) {
            Entry::Occupied(entry) => {
                debug!(request.key = %entry.key(), "Joining in-flight request");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                let guard = PendingGuard {
                    pending: Arc::clone(&self.pending),
                    key: entry.key().clone(),
                };
                let work = make();
                // The shard stays locked until the insert below, so the task
                // cannot remove its key before the key exists.
                let task = tokio::spawn(async move {
                    let _guard = guard;
                    work.await
                });
                let shared = async move {
                    task.await.unwrap_or_else(|e| {
                        Err(ClientError::internal(format!(
                            "In-flight request task failed: {e}"
                        )))
                    })
                }
                .boxed()
                .shared();
                entry.insert(shared.clone());
                shared
            }
        }
    }

    /// Number of requests currently pending
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no request is pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
