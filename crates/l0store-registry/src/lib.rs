//! API identifier registry for L0 Store.
//!
//! An API identifier is a UUID issued to a customer. Upload authorizations are
//! only handed out for valid identifiers, and every upload is confined to the
//! key prefix named after its identifier.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use l0store_registry::{ApiIdService, InMemoryApiIdStore};
//!
//! let service = ApiIdService::new(Arc::new(InMemoryApiIdStore::new()), 100);
//! let issued = service.register("customer-1").unwrap();
//! assert!(service.find(&issued.api_id).unwrap().valid);
//!
//! service.revoke(&issued.api_id).unwrap();
//! assert!(!service.find(&issued.api_id).unwrap().valid);
//! ```

pub mod error;
pub mod model;
pub mod page;
pub mod service;
pub mod store;

pub use error::{RegistryError, RegistryResult};
pub use model::{ApiIdRecord, ApiIdResponse, parse_api_id};
pub use page::{Page, PageInfo, PageRequest};
pub use service::ApiIdService;
pub use store::{ApiIdStore, InMemoryApiIdStore};
