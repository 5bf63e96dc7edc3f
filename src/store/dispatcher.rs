use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, ReentrantMutex, RwLock};
use tokio::sync::watch;
use tokio::time::Instant;

use crate::cache::{CacheIntent, CacheReducer, CacheState};
use crate::mvi::Reducer;
use crate::store::action::Action;
use crate::store::observer::{Observer, SubscriptionId};
use crate::store::root::{RootReducer, RootState};

/// Exclusive owner of the state tree.
///
/// All writes go through [`Store::dispatch`], which is serialized: the
/// reducer runs, the new tree is published, then observers are notified in
/// order before the next dispatch starts. Observers may read the state and
/// may dispatch re-entrantly from the same thread.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    /// Serializes dispatch including notification.
    queue: ReentrantMutex<()>,
    state: Mutex<Arc<RootState>>,
    observers: RwLock<Vec<(SubscriptionId, Arc<dyn Observer>)>>,
    next_observer: AtomicU64,
    version: watch::Sender<u64>,
    keep_unused_for: Duration,
}

impl Store {
    /// Create a store whose cache evicts unused entries after `keep_unused_for`.
    pub fn new(keep_unused_for: Duration) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            inner: Arc::new(StoreInner {
                queue: ReentrantMutex::new(()),
                state: Mutex::new(Arc::new(RootState::default())),
                observers: RwLock::new(Vec::new()),
                next_observer: AtomicU64::new(1),
                version,
                keep_unused_for,
            }),
        }
    }

    /// Apply `action` and return the state right after it.
    ///
    /// Expired cache entries are swept before the action is applied, except
    /// for a subscription, which is applied first so that a new subscriber
    /// keeps the entry it arrives for.
    pub fn dispatch(&self, action: impl Into<Action>) -> Arc<RootState> {
        let action = action.into();
        let _queue = self.inner.queue.lock();
        let subscribing = matches!(action, Action::Cache(CacheIntent::Subscribe { .. }));

        let next = {
            let mut guard = self.inner.state.lock();
            let mut state = (**guard).clone();
            if !subscribing {
                state.api = self.sweep(state.api);
            }
            state = RootReducer::reduce(state, action.clone());
            if subscribing {
                state.api = self.sweep(state.api);
            }
            let next = Arc::new(state);
            *guard = Arc::clone(&next);
            next
        };

        tracing::trace!(action = action.name(), "Action applied");
        self.inner.version.send_modify(|v| *v += 1);

        let observers: Vec<Arc<dyn Observer>> = self
            .inner
            .observers
            .read()
            .iter()
            .map(|(_, o)| Arc::clone(o))
            .collect();
        for observer in observers {
            observer.on_action(&action, &next);
        }

        next
    }

    fn sweep(&self, cache: CacheState) -> CacheState {
        CacheReducer::reduce(
            cache,
            CacheIntent::Sweep {
                now: Instant::now(),
                keep_unused_for: self.inner.keep_unused_for,
            },
        )
    }

    /// Read-only snapshot of the current state tree.
    pub fn state(&self) -> Arc<RootState> {
        Arc::clone(&self.inner.state.lock())
    }

    /// Project the current state.
    pub fn select<T>(&self, selector: impl FnOnce(&RootState) -> T) -> T {
        selector(&self.state())
    }

    pub fn subscribe(&self, observer: Arc<dyn Observer>) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_observer.fetch_add(1, Ordering::Relaxed));
        self.inner.observers.write().push((id, observer));
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.inner.observers.write();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    /// Receiver that is notified after every applied action.
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.inner.version.subscribe()
    }

    /// Number of actions applied so far.
    pub fn version(&self) -> u64 {
        *self.inner.version.borrow()
    }

    pub fn keep_unused_for(&self) -> Duration {
        self.inner.keep_unused_for
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}
