//! Registry error types.

/// Errors returned by the API identifier registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A request argument was missing or out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The supplied API identifier is not a UUID.
    #[error("invalid apiId: {0}")]
    InvalidApiId(String),

    /// No record exists for the supplied API identifier.
    #[error("apiId not found: {0}")]
    NotFound(String),
}

/// Convenience result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
