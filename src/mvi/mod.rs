//! Model-View-Intent (MVI) primitives shared by every state slice.
//!
//! # Architecture
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ Observers
//!    ↑                               │
//!    └───────────────────────────────┘
//! ```
//!
//! - **State**: Immutable snapshot of one slice of the state tree
//! - **Intent**: Typed command submitted by a caller or a fetch task
//! - **Reducer**: Pure function that transforms state based on intents

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::State;
