use std::fmt;
use std::marker::PhantomData;

use crate::api::{ApiError, Endpoint};
use crate::cache::{CacheEntry, CacheKey, QueryStatus};
use crate::client::EvChargingApi;

/// Snapshot of one query as seen by a subscriber.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<T> {
    pub status: QueryStatus,
    /// Present only when `status` is `Success`.
    pub data: Option<T>,
    /// Present only when `status` is `Error`.
    pub error: Option<ApiError>,
    /// A request is in flight (first load or background refetch).
    pub is_fetching: bool,
}

impl<T> QueryResult<T> {
    fn uninitialized() -> Self {
        Self {
            status: QueryStatus::Uninitialized,
            data: None,
            error: None,
            is_fetching: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }
}

/// Live subscription to one cache entry. Dropping it unsubscribes.
pub struct QueryHandle<E: Endpoint> {
    pub(super) api: EvChargingApi,
    pub(super) key: CacheKey,
    pub(super) _endpoint: PhantomData<fn() -> E>,
}

impl<E: Endpoint> QueryHandle<E> {
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Current result for this key.
    pub fn current(&self) -> QueryResult<E::Output> {
        let state = self.api.state();
        match state.api.entry(&self.key) {
            Some(entry) => project::<E>(entry),
            None => QueryResult::uninitialized(),
        }
    }

    /// Wait until the entry holds a result and no request is in flight.
    ///
    /// Returns immediately with `Uninitialized` if the entry was removed
    /// (e.g. by `reset_api_state`).
    pub async fn resolved(&self) -> QueryResult<E::Output> {
        let mut changes = self.api.store().changes();
        loop {
            {
                let state = self.api.state();
                match state.api.entry(&self.key) {
                    None => return QueryResult::uninitialized(),
                    Some(entry) if entry.is_settled() => return project::<E>(entry),
                    Some(_) => {}
                }
            }
            if changes.changed().await.is_err() {
                return self.current();
            }
        }
    }

    /// Force a new request for this key, superseding any in flight.
    ///
    /// Returns `false` when nothing was sent because the entry is gone
    /// (after `reset_api_state`).
    pub fn refetch(&self) -> bool {
        self.api.start_fetch(&self.key, true)
    }
}

impl<E: Endpoint> Drop for QueryHandle<E> {
    fn drop(&mut self) {
        self.api.release(&self.key);
    }
}

impl<E: Endpoint> fmt::Debug for QueryHandle<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryHandle").field("key", &self.key).finish()
    }
}

fn project<E: Endpoint>(entry: &CacheEntry) -> QueryResult<E::Output> {
    let data = entry.data().and_then(|raw| {
        serde_json::from_value::<E::Output>(raw.clone())
            .map_err(|e| {
                tracing::warn!(endpoint = E::NAME, error = %e, "Cached payload no longer decodes");
            })
            .ok()
    });

    QueryResult {
        status: entry.status(),
        data,
        error: entry.error().cloned(),
        is_fetching: entry.is_fetching(),
    }
}
