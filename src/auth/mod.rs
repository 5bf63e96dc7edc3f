//! Auth slice: the signed-in principal and its bearer token.
//!
//! The slice has two phases, anonymous and authenticated, and only two
//! intents move between them.

mod intent;
mod reducer;
mod state;

pub use intent::AuthIntent;
pub use reducer::AuthReducer;
pub use state::{AuthPhase, AuthState, AuthUser};
