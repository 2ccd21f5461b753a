//! JSON request bodies.

use bytes::Bytes;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Body of `POST /api/latest/api-id`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterApiIdRequest {
    /// Owner of the new identifier.
    pub customer_id: String,
}

/// Body of `POST /api/latest/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Identifier the upload is made for.
    pub api_id: String,
}

/// Decode a JSON request body.
///
/// # Errors
///
/// Returns a `400` [`ApiError`] if the body is empty or is not valid JSON for `T`.
pub fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    if body.is_empty() {
        return Err(ApiError::bad_request("request body is required"));
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("malformed request body: {e}")))
}
