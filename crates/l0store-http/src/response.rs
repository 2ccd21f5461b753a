//! JSON response formatting.

use serde::Serialize;

use crate::body::L0StoreResponseBody;
use crate::error::ApiError;

/// Content type of every JSON response.
pub const CONTENT_TYPE: &str = "application/json";

/// Serialize an [`ApiError`] into its JSON body.
///
/// ```json
/// {"code": 404, "message": "apiId not found. Try GET /api/latest/api-id/"}
/// ```
#[must_use]
pub fn error_to_json(error: &ApiError) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "code": error.status.as_u16(),
        "message": error.message,
    }))
    .expect("JSON serialization of error cannot fail")
}

/// Convert an [`ApiError`] into a complete HTTP error response.
#[must_use]
pub fn error_to_response(
    error: &ApiError,
    request_id: &str,
) -> http::Response<L0StoreResponseBody> {
    http::Response::builder()
        .status(error.status)
        .header("content-type", CONTENT_TYPE)
        .header("x-request-id", request_id)
        .body(L0StoreResponseBody::from_bytes(error_to_json(error)))
        .expect("valid error response")
}

/// Serialize `value` into a JSON response with `status`.
///
/// # Errors
///
/// Returns a `500` [`ApiError`] if `value` fails to serialize.
pub fn json_response<T: Serialize>(
    status: http::StatusCode,
    value: &T,
) -> Result<http::Response<L0StoreResponseBody>, ApiError> {
    let json = serde_json::to_vec(value)
        .map_err(|e| ApiError::internal(format!("failed to encode response: {e}")))?;
    Ok(http::Response::builder()
        .status(status)
        .header("content-type", CONTENT_TYPE)
        .body(L0StoreResponseBody::from_bytes(json))
        .expect("valid JSON response"))
}
