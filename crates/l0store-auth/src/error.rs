//! Error types for upload policy signing.
//!
//! All signing failures are represented by [`SigningError`]. None of the
//! variants ever carries secret material: messages name the offending input,
//! never its value when that value is secret-bearing.

/// Errors that can occur while building or signing an upload authorization.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    /// A required input was empty or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The HMAC-SHA256 primitive rejected its key. Fatal, never retried.
    #[error("HMAC-SHA256 is unavailable")]
    CryptoUnavailable,

    /// The policy document could not be encoded as JSON.
    #[error("failed to encode policy document: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SigningError {
    /// Shorthand for [`SigningError::InvalidArgument`].
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Convenience result type for signing operations.
pub type SigningResult<T> = Result<T, SigningError>;

/// Fail with [`SigningError::InvalidArgument`] when `value` is empty.
pub(crate) fn require_non_empty(name: &str, value: &str) -> SigningResult<()> {
    if value.is_empty() {
        return Err(SigningError::invalid(format!("{name} must not be empty")));
    }
    Ok(())
}
