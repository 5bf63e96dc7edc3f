use serde::Serialize;

use crate::auth::{AuthReducer, AuthState};
use crate::cache::{CacheReducer, CacheState};
use crate::mvi::{Reducer, State};
use crate::store::action::Action;

/// The whole client state tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RootState {
    pub auth: AuthState,
    pub api: CacheState,
}

impl State for RootState {}

/// Routes each action to the slice that owns it.
pub struct RootReducer;

impl Reducer for RootReducer {
    type State = RootState;
    type Intent = Action;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        let RootState { auth, api } = state;
        match intent {
            Action::Auth(intent) => RootState {
                auth: AuthReducer::reduce(auth, intent),
                api,
            },
            Action::Cache(intent) => RootState {
                auth,
                api: CacheReducer::reduce(api, intent),
            },
        }
    }
}
