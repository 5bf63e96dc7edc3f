//! Normalized query cache.
//!
//! One entry per `(endpoint, serialized args)` key, holding fetch status,
//! the last good payload or the last error, and the number of live
//! subscribers. All transitions go through [`CacheReducer`]; fetch tasks
//! report back through [`CacheIntent`]s stamped with the request id they
//! were started with, which is how superseded responses are recognised.

mod entry;
mod intent;
mod key;
mod reducer;
mod state;

pub use entry::{CacheEntry, QueryStatus, RequestId};
pub use intent::CacheIntent;
pub use key::CacheKey;
pub use reducer::CacheReducer;
pub use state::CacheState;
