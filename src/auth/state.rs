use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::mvi::State;

/// Snapshot of the signed-in principal as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Anonymous,
    Authenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Session {
    user: AuthUser,
    token: String,
}

/// Auth slice state.
///
/// User and token live together in a single optional session, so a state
/// with only one of them set cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthState {
    session: Option<Session>,
}

impl State for AuthState {}

impl AuthState {
    pub fn authenticated(user: AuthUser, token: String) -> Self {
        Self {
            session: Some(Session { user, token }),
        }
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some() && self.token().is_some()
    }

    pub fn phase(&self) -> AuthPhase {
        if self.is_authenticated() {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Anonymous
        }
    }
}

impl Serialize for AuthState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("AuthState", 3)?;
        s.serialize_field("user", &self.user())?;
        s.serialize_field("token", &self.token())?;
        s.serialize_field("isAuthenticated", &self.is_authenticated())?;
        s.end()
    }
}
