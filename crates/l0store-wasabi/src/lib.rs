//! Object version listing against Wasabi for L0 Store.
//!
//! Lists every stored version below an API identifier's key prefix with a
//! SigV4-signed `GET /?versions` call and parses the XML answer into typed
//! results that serialize as JSON.

pub mod client;
pub mod error;
pub mod listing;
pub mod xml;

pub use client::{VersionLister, WasabiClient};
pub use error::{WasabiError, WasabiResult, XmlError};
pub use listing::{ListVersionsRequest, endpoint_host};
pub use xml::{DeleteMarker, ListVersionsResult, ObjectVersion, parse_list_versions};
