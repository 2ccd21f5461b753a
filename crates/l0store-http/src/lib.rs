//! JSON HTTP service layer for L0 Store.
//!
//! - **Router**: maps method and path onto an [`Operation`]
//! - **Handler trait**: the boundary between HTTP and the registry, signer and lister
//! - **Service**: hyper `Service` implementation
//! - **Response helpers**: JSON success and error formatting

pub mod body;
pub mod dispatch;
pub mod error;
pub mod request;
pub mod response;
pub mod router;
pub mod service;

pub use body::L0StoreResponseBody;
pub use dispatch::{HandlerFuture, L0StoreHandler};
pub use error::ApiError;
pub use router::Operation;
pub use service::{L0StoreHttpConfig, L0StoreHttpService};
