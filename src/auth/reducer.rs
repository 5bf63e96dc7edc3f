use crate::auth::intent::AuthIntent;
use crate::auth::state::AuthState;
use crate::mvi::Reducer;

pub struct AuthReducer;

impl Reducer for AuthReducer {
    type State = AuthState;
    type Intent = AuthIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            AuthIntent::LoginSuccess { user, token } => {
                if let Some(previous) = state.user() {
                    tracing::debug!(previous = %previous.id, next = %user.id, "Replacing session");
                }
                AuthState::authenticated(user, token)
            }
            AuthIntent::Logout => AuthState::default(),
        }
    }
}
