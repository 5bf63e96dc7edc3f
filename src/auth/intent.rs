use crate::auth::state::AuthUser;
use crate::mvi::Intent;

#[derive(Debug, Clone, PartialEq)]
pub enum AuthIntent {
    /// Login response accepted. Replaces any existing session wholesale.
    LoginSuccess { user: AuthUser, token: String },
    Logout,
}

impl Intent for AuthIntent {}
