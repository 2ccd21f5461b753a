//! Error types for the version lister.

use l0store_auth::SigningError;

/// Errors that can occur while listing object versions.
#[derive(Debug, thiserror::Error)]
pub enum WasabiError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The object store answered with a non-success status.
    #[error("object store returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The response body was not a valid version listing.
    #[error("invalid version listing: {0}")]
    Xml(#[from] XmlError),

    /// The request could not be signed.
    #[error("failed to sign request: {0}")]
    Signing(#[from] SigningError),
}

/// Errors from parsing a version listing.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// A required XML element was missing.
    #[error("missing required XML element: {0}")]
    MissingElement(String),

    /// An unexpected XML element was encountered.
    #[error("unexpected XML element: {0}")]
    UnexpectedElement(String),

    /// An error parsing a value from XML text content.
    #[error("failed to parse value: {0}")]
    ParseError(String),
}

/// Convenience result type for version listing.
pub type WasabiResult<T> = Result<T, WasabiError>;
