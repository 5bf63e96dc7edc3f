use thiserror::Error;

use crate::api::{ApiError, EndpointKind, RegistryError};

/// Errors surfaced by [`EvChargingApi`](crate::client::EvChargingApi) calls.
///
/// Fetch failures of cached queries never show up here; they are stored
/// in the cache entry and read through the query handle.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Endpoint '{endpoint}' is a {actual:?}, expected a {expected:?}")]
    WrongKind {
        endpoint: &'static str,
        expected: EndpointKind,
        actual: EndpointKind,
    },

    #[error("Arguments for '{endpoint}' cannot be serialized: {message}")]
    InvalidArgs {
        endpoint: &'static str,
        message: String,
    },

    #[error("Queries must be started from within a tokio runtime")]
    NoRuntime,

    #[error("Failed to build HTTP transport: {0}")]
    Transport(String),
}

impl ClientError {
    /// The backend error behind this failure, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(e) => Some(e),
            _ => None,
        }
    }
}
