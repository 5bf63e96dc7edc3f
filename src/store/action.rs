use crate::auth::AuthIntent;
use crate::cache::CacheIntent;
use crate::mvi::Intent;

/// Typed command accepted by [`Store::dispatch`](crate::store::Store::dispatch).
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Auth(AuthIntent),
    Cache(CacheIntent),
}

impl Intent for Action {}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Auth(AuthIntent::LoginSuccess { .. }) => "auth/loginSuccess",
            Action::Auth(AuthIntent::Logout) => "auth/logout",
            Action::Cache(intent) => intent.name(),
        }
    }
}

impl From<AuthIntent> for Action {
    fn from(intent: AuthIntent) -> Self {
        Action::Auth(intent)
    }
}

impl From<CacheIntent> for Action {
    fn from(intent: CacheIntent) -> Self {
        Action::Cache(intent)
    }
}
