//! Configuration and shared error types for L0 Store.
//!
//! This crate holds the pieces every other L0 Store crate and the server binary
//! agree on: the environment-driven [`L0StoreConfig`] and the top-level
//! [`L0StoreError`].

mod config;
mod error;

pub use config::{L0StoreConfig, MAX_OBJECT_LOCK_DAYS, MAX_UPLOAD_EXPIRY_SECS};
pub use error::{L0StoreError, L0StoreResult};
