//! Fetch-layer error taxonomy.
//!
//! These errors are stored inside cache entries, so they are plain data:
//! cloneable, comparable and serializable.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiError {
    /// Transport failure: connection refused, DNS, timeout, broken body.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Backend answered with a non-2xx status or a `success: false` envelope.
    #[error("Server error: {status} - {payload}")]
    Server { status: u16, payload: Value },

    /// Response did not match the expected shape.
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Network {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
        }
    }

    /// Short error code used in logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Network { .. } => "network_error",
            ApiError::Server { .. } => "server_error",
            ApiError::Validation { .. } => "validation_error",
        }
    }

    /// HTTP status for server errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message from a server payload, if it carries one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { payload, .. } => payload
                .get("message")
                .or_else(|| payload.get("error"))
                .and_then(|m| m.as_str()),
            _ => None,
        }
    }
}
