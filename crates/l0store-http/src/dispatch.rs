//! Handler trait and operation dispatch.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use crate::body::L0StoreResponseBody;
use crate::error::ApiError;
use crate::router::Operation;

/// Future returned by [`L0StoreHandler::handle_operation`].
pub type HandlerFuture =
    Pin<Box<dyn Future<Output = Result<http::Response<L0StoreResponseBody>, ApiError>> + Send>>;

/// The boundary between the HTTP layer and the registry, signer and lister.
///
/// The handler receives a routed operation and the raw request body, and
/// returns a complete HTTP response.
pub trait L0StoreHandler: Send + Sync + 'static {
    /// Handle an operation and produce an HTTP response.
    fn handle_operation(&self, op: Operation, body: Bytes) -> HandlerFuture;
}

/// Dispatch an operation to the handler.
pub async fn dispatch_operation<H: L0StoreHandler>(
    handler: &H,
    op: Operation,
    body: Bytes,
) -> Result<http::Response<L0StoreResponseBody>, ApiError> {
    tracing::debug!(operation = %op, "dispatching operation");
    handler.handle_operation(op, body).await
}
