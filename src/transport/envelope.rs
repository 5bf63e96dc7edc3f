use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::Value;

use crate::api::{ApiError, ApiResponse, ErrorEnvelope};

/// Classify a raw backend response.
///
/// - non-2xx: [`ApiError::Server`] with the JSON body (or the raw text as a
///   JSON string) as payload
/// - 2xx with `success: false`: [`ApiError::Server`] carrying the envelope
/// - 2xx that is not an [`ApiResponse`]: [`ApiError::Validation`]
/// - otherwise the `data` member (`null` when absent)
pub fn unwrap_envelope(status: u16, body: &[u8]) -> Result<Value, ApiError> {
    if !(200..300).contains(&status) {
        let payload = serde_json::from_slice::<Value>(body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()));
        return Err(ApiError::Server { status, payload });
    }

    let payload = serde_json::from_slice::<Value>(body)
        .map_err(|e| ApiError::validation(format!("Response body is not JSON: {}", e)))?;
    if !payload.is_object() {
        return Err(ApiError::validation("Response is not an API envelope"));
    }

    let success = ApiResponse::<IgnoredAny>::deserialize(&payload)
        .map_err(|e| ApiError::validation(format!("Response is not an API envelope: {}", e)))?
        .success;
    if !success {
        if let Ok(rejection) = ErrorEnvelope::deserialize(&payload) {
            tracing::debug!(
                status,
                message = rejection.message.as_deref().unwrap_or("-"),
                "Backend reported failure"
            );
        }
        return Err(ApiError::Server { status, payload });
    }

    let envelope: ApiResponse<Value> = serde_json::from_value(payload)
        .map_err(|e| ApiError::validation(format!("Response is not an API envelope: {}", e)))?;
    Ok(envelope.data.unwrap_or(Value::Null))
}
