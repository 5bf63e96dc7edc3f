//! Transport seam between the query cache and the backend HTTP API.

mod envelope;
mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::api::{ApiError, ApiRequest};

pub use envelope::unwrap_envelope;
pub use http::HttpTransport;

/// Executes API requests against the backend.
///
/// Implementations return the `data` member of a successful
/// `{success: true, data}` envelope and classify every failure into an
/// [`ApiError`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request`, authenticated with `token` when one is present.
    async fn execute(&self, request: ApiRequest, token: Option<String>) -> Result<Value, ApiError>;
}
