use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

use crate::api::{ApiError, Tag};
use crate::cache::entry::RequestId;
use crate::cache::key::CacheKey;
use crate::mvi::Intent;

#[derive(Debug, Clone, PartialEq)]
pub enum CacheIntent {
    /// A consumer attached to `key`. Creates the entry on first use.
    Subscribe { key: CacheKey, now: Instant },
    Unsubscribe { key: CacheKey, now: Instant },
    /// Ask to start request `request_id` for `key`.
    ///
    /// The reducer starts it only if the entry exists and either `force`
    /// is set or the entry needs a fetch; the caller checks
    /// [`CacheEntry::latest_request`](crate::cache::CacheEntry::latest_request)
    /// afterwards to learn whether it owns the request.
    FetchRequested {
        key: CacheKey,
        request_id: RequestId,
        now: Instant,
        refetch_after: Duration,
        force: bool,
    },
    FetchSucceeded {
        key: CacheKey,
        request_id: RequestId,
        data: Value,
        tags: Vec<Tag>,
        now: Instant,
    },
    FetchFailed {
        key: CacheKey,
        request_id: RequestId,
        error: ApiError,
    },
    /// Mark entries providing any of `tags` as stale.
    InvalidateTags { tags: Vec<Tag> },
    /// Drop zero-subscriber entries unused for at least `keep_unused_for`.
    Sweep { now: Instant, keep_unused_for: Duration },
    Reset,
}

impl Intent for CacheIntent {}

impl CacheIntent {
    pub fn name(&self) -> &'static str {
        match self {
            CacheIntent::Subscribe { .. } => "api/subscribe",
            CacheIntent::Unsubscribe { .. } => "api/unsubscribe",
            CacheIntent::FetchRequested { .. } => "api/fetchRequested",
            CacheIntent::FetchSucceeded { .. } => "api/fetchSucceeded",
            CacheIntent::FetchFailed { .. } => "api/fetchFailed",
            CacheIntent::InvalidateTags { .. } => "api/invalidateTags",
            CacheIntent::Sweep { .. } => "api/sweep",
            CacheIntent::Reset => "api/reset",
        }
    }
}
