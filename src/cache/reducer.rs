use std::sync::Arc;

use crate::cache::intent::CacheIntent;
use crate::cache::state::CacheState;
use crate::mvi::Reducer;

/// Pure reducer for the query cache.
///
/// Entries are shared between snapshots; only the ones an intent touches are
/// copied.
pub struct CacheReducer;

impl Reducer for CacheReducer {
    type State = CacheState;
    type Intent = CacheIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            CacheIntent::Subscribe { key, .. } => {
                Arc::make_mut(state.entries.entry(key).or_default()).subscribe();
            }
            CacheIntent::Unsubscribe { key, now } => {
                if let Some(entry) = state.entries.get_mut(&key).map(Arc::make_mut) {
                    entry.unsubscribe(now);
                }
            }
            CacheIntent::FetchRequested {
                key,
                request_id,
                now,
                refetch_after,
                force,
            } => {
                if let Some(entry) = state.entries.get_mut(&key) {
                    if force || entry.needs_fetch(now, refetch_after) {
                        if let Some(previous) = entry.latest_request().filter(|_| entry.is_fetching()) {
                            tracing::debug!(key = %key, previous, request_id, "Superseding in-flight request");
                        }
                        Arc::make_mut(entry).start_fetch(request_id);
                    }
                }
            }
            CacheIntent::FetchSucceeded {
                key,
                request_id,
                data,
                tags,
                now,
            } => match state.entries.get_mut(&key) {
                Some(entry) if entry.latest_request() == Some(request_id) => {
                    Arc::make_mut(entry).succeed(data, tags, now);
                }
                Some(entry) => {
                    tracing::debug!(
                        key = %key,
                        request_id,
                        latest = ?entry.latest_request(),
                        "Discarding superseded response"
                    );
                }
                None => {
                    tracing::debug!(key = %key, request_id, "Discarding response for evicted entry");
                }
            },
            CacheIntent::FetchFailed {
                key,
                request_id,
                error,
            } => match state.entries.get_mut(&key) {
                Some(entry) if entry.latest_request() == Some(request_id) => {
                    Arc::make_mut(entry).fail(error);
                }
                _ => {
                    tracing::debug!(key = %key, request_id, "Discarding stale failure");
                }
            },
            CacheIntent::InvalidateTags { tags } => {
                for entry in state.entries.values_mut() {
                    if entry.is_fetching() || entry.provides_any(&tags) {
                        Arc::make_mut(entry).invalidate(&tags);
                    }
                }
            }
            CacheIntent::Sweep {
                now,
                keep_unused_for,
            } => {
                state.entries.retain(|key, entry| {
                    let expired = entry.is_expired(now, keep_unused_for);
                    if expired {
                        tracing::trace!(key = %key, "Evicting unused cache entry");
                    }
                    !expired
                });
            }
            CacheIntent::Reset => {
                state.entries.clear();
            }
        }
        state
    }
}
