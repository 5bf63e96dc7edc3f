use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::time::Instant;

use crate::api::{ApiError, Tag};

/// Monotonically increasing id assigned when a fetch is initiated.
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Uninitialized,
    Loading,
    Success,
    Error,
}

/// Status together with the payload it allows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Outcome {
    Uninitialized,
    Loading,
    Success { data: Value },
    Error { error: ApiError },
}

/// One normalized cache entry.
///
/// `data` exists only in the success state and `error` only in the error
/// state. A refetch of a successful entry keeps the success state and sets
/// `is_fetching`, so stale data keeps being served until it resolves.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    #[serde(flatten)]
    outcome: Outcome,
    subscriber_count: usize,
    is_fetching: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<RequestId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    provided_tags: Vec<Tag>,
    invalidated: bool,
    /// Tags invalidated while the current request was in flight.
    #[serde(skip)]
    invalidated_in_flight: Vec<Tag>,
    #[serde(skip)]
    fetched_at: Option<Instant>,
    #[serde(skip)]
    unsubscribed_at: Option<Instant>,
}

impl Default for CacheEntry {
    fn default() -> Self {
        Self {
            outcome: Outcome::Uninitialized,
            subscriber_count: 0,
            is_fetching: false,
            request_id: None,
            provided_tags: Vec::new(),
            invalidated: false,
            invalidated_in_flight: Vec::new(),
            fetched_at: None,
            unsubscribed_at: None,
        }
    }
}

impl CacheEntry {
    pub fn status(&self) -> QueryStatus {
        match self.outcome {
            Outcome::Uninitialized => QueryStatus::Uninitialized,
            Outcome::Loading => QueryStatus::Loading,
            Outcome::Success { .. } => QueryStatus::Success,
            Outcome::Error { .. } => QueryStatus::Error,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Success { data } => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match &self.outcome {
            Outcome::Error { error } => Some(error),
            _ => None,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriber_count
    }

    /// A request for this entry is in flight.
    pub fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    /// Id of the most recently initiated request.
    pub fn latest_request(&self) -> Option<RequestId> {
        self.request_id
    }

    pub fn provided_tags(&self) -> &[Tag] {
        &self.provided_tags
    }

    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    pub fn fetched_at(&self) -> Option<Instant> {
        self.fetched_at
    }

    pub fn unsubscribed_at(&self) -> Option<Instant> {
        self.unsubscribed_at
    }

    /// Holds a result that is not about to be replaced: nothing in flight,
    /// and not invalidated data that live subscribers will refetch.
    pub fn is_settled(&self) -> bool {
        match self.outcome {
            Outcome::Success { .. } => {
                !self.is_fetching && !(self.invalidated && self.subscriber_count > 0)
            }
            Outcome::Error { .. } => !self.is_fetching,
            _ => false,
        }
    }

    /// Whether a successful payload is older than `refetch_after`.
    pub fn is_stale(&self, now: Instant, refetch_after: Duration) -> bool {
        match self.fetched_at {
            Some(at) => now.saturating_duration_since(at) >= refetch_after,
            None => true,
        }
    }

    /// Whether a non-forced fetch should start now.
    ///
    /// While a request is in flight only an invalidation that arrived after
    /// it started warrants another one. Otherwise when there is nothing
    /// usable cached (uninitialized, errored, invalidated or stale).
    pub fn needs_fetch(&self, now: Instant, refetch_after: Duration) -> bool {
        if self.is_fetching {
            return self.invalidated;
        }
        match self.outcome {
            Outcome::Success { .. } => self.invalidated || self.is_stale(now, refetch_after),
            _ => true,
        }
    }

    pub(crate) fn subscribe(&mut self) {
        self.subscriber_count += 1;
        self.unsubscribed_at = None;
    }

    pub(crate) fn unsubscribe(&mut self, now: Instant) {
        self.subscriber_count = self.subscriber_count.saturating_sub(1);
        if self.subscriber_count == 0 {
            self.unsubscribed_at = Some(now);
        }
    }

    pub(crate) fn start_fetch(&mut self, request_id: RequestId) {
        self.request_id = Some(request_id);
        self.is_fetching = true;
        self.invalidated = false;
        self.invalidated_in_flight.clear();
        if !matches!(self.outcome, Outcome::Success { .. }) {
            self.outcome = Outcome::Loading;
        }
    }

    /// Store a response. If a matching invalidation arrived while the
    /// request was in flight the data is kept but marked invalidated.
    pub(crate) fn succeed(&mut self, data: Value, tags: Vec<Tag>, now: Instant) {
        let predates_invalidation = self
            .invalidated_in_flight
            .iter()
            .any(|tag| tags.iter().any(|provided| tag.invalidates(provided)));
        self.outcome = Outcome::Success { data };
        self.is_fetching = false;
        self.provided_tags = tags;
        self.invalidated = self.invalidated || predates_invalidation;
        self.invalidated_in_flight.clear();
        self.fetched_at = Some(now);
    }

    pub(crate) fn fail(&mut self, error: ApiError) {
        self.outcome = Outcome::Error { error };
        self.is_fetching = false;
        self.invalidated = false;
        self.invalidated_in_flight.clear();
        self.fetched_at = None;
    }

    /// Whether any of `tags` matches a tag this entry provides.
    pub(crate) fn provides_any(&self, tags: &[Tag]) -> bool {
        self.provided_tags
            .iter()
            .any(|provided| tags.iter().any(|tag| tag.invalidates(provided)))
    }

    /// Mark stale when `tags` match. A request in flight started before the
    /// invalidation, so its response is checked against `tags` on arrival.
    pub(crate) fn invalidate(&mut self, tags: &[Tag]) {
        if self.provides_any(tags) {
            self.invalidated = true;
        }
        if self.is_fetching {
            self.invalidated_in_flight.extend_from_slice(tags);
        }
    }

    /// Whether a zero-subscriber entry has outlived its grace period.
    pub(crate) fn is_expired(&self, now: Instant, keep_unused_for: Duration) -> bool {
        match self.unsubscribed_at {
            Some(at) if self.subscriber_count == 0 => {
                now.saturating_duration_since(at) >= keep_unused_for
            }
            _ => false,
        }
    }
}
