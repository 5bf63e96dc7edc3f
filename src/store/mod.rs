//! Store composition root.
//!
//! Combines the auth slice and the query cache into one state tree, applies
//! [`Action`]s through [`RootReducer`], and notifies registered
//! [`Observer`]s synchronously after every applied action.

mod action;
mod dispatcher;
mod observer;
mod root;

pub use action::Action;
pub use observer::{DebugMirror, Observer, SubscriptionId};
pub use root::{RootReducer, RootState};
pub use dispatcher::Store;
