//! Error types for the L0 Store core.

/// Core error type for L0 Store infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum L0StoreError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience result type for L0 Store operations.
pub type L0StoreResult<T> = Result<T, L0StoreError>;
