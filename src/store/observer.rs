use std::sync::Arc;

use parking_lot::RwLock;

use crate::store::action::Action;
use crate::store::root::RootState;

/// Handle returned by [`Store::subscribe`](crate::store::Store::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Receives every applied action together with the resulting state.
///
/// Called synchronously on the dispatching thread, in dispatch order.
pub trait Observer: Send + Sync {
    fn on_action(&self, action: &Action, state: &Arc<RootState>);
}

impl<F> Observer for F
where
    F: Fn(&Action, &Arc<RootState>) + Send + Sync,
{
    fn on_action(&self, action: &Action, state: &Arc<RootState>) {
        self(action, state)
    }
}

/// Keeps the latest state tree around for inspection.
///
/// Installed by the client only when `store.debug_mirror` is enabled.
#[derive(Clone, Default)]
pub struct DebugMirror {
    latest: Arc<RwLock<Option<Arc<RootState>>>>,
}

impl DebugMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<Arc<RootState>> {
        self.latest.read().clone()
    }

    /// The mirrored state tree as JSON (`null` before the first action).
    pub fn to_json(&self) -> serde_json::Value {
        self.snapshot()
            .and_then(|state| serde_json::to_value(&*state).ok())
            .unwrap_or(serde_json::Value::Null)
    }
}

impl Observer for DebugMirror {
    fn on_action(&self, action: &Action, state: &Arc<RootState>) {
        *self.latest.write() = Some(Arc::clone(state));
        if tracing::enabled!(tracing::Level::TRACE) {
            let tree = serde_json::to_string(&**state).unwrap_or_default();
            tracing::trace!(action = action.name(), state = %tree, "State mirrored");
        }
    }
}
