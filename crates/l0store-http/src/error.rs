//! API error type and the mapping of domain errors onto HTTP statuses.

use http::StatusCode;
use l0store_auth::SigningError;
use l0store_registry::RegistryError;
use l0store_wasabi::WasabiError;

/// An error returned to API clients as `{"code": <status>, "message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Human-readable message.
    pub message: String,
}

impl ApiError {
    /// An error with an arbitrary status.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// `400 Bad Request`.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// `403 Forbidden`.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// `404 Not Found`.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// `405 Method Not Allowed`.
    #[must_use]
    pub fn method_not_allowed(method: &http::Method) -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            format!("method {method} is not allowed on this path"),
        )
    }

    /// `500 Internal Server Error`.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// `502 Bad Gateway`.
    #[must_use]
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::InvalidArgument(_) | RegistryError::InvalidApiId(_) => {
                Self::bad_request(err.to_string())
            }
            RegistryError::NotFound(_) => {
                Self::not_found("apiId not found. Try GET /api/latest/api-id/")
            }
        }
    }
}

impl From<SigningError> for ApiError {
    fn from(err: SigningError) -> Self {
        match err {
            SigningError::InvalidArgument(_) => Self::bad_request(err.to_string()),
            SigningError::CryptoUnavailable | SigningError::Serialization(_) => {
                Self::internal("failed to sign upload policy")
            }
        }
    }
}

impl From<WasabiError> for ApiError {
    fn from(err: WasabiError) -> Self {
        match err {
            WasabiError::Signing(inner) => inner.into(),
            WasabiError::Status { status, .. } => {
                Self::bad_gateway(format!("object store returned status {status}"))
            }
            WasabiError::Http(_) | WasabiError::Xml(_) => Self::bad_gateway(err.to_string()),
        }
    }
}
