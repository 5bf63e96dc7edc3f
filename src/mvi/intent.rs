//! Base trait for intents (caller commands and fetch results).

/// Marker trait for intent objects.
///
/// Intents represent:
/// - Caller commands (login, logout, subscribe)
/// - Fetch lifecycle events (request started, resolved, failed)
/// - Housekeeping (eviction sweeps, cache reset)
///
/// Intents are processed by reducers to produce new states.
pub trait Intent: Send + 'static {}
