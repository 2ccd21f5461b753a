//! The L0 Store HTTP service implementing hyper's `Service` trait.
//!
//! [`L0StoreHttpService`] handles, in order:
//!
//! 1. Routing via [`resolve_operation`]
//! 2. Health checks and CORS preflight, answered without the handler
//! 3. Request body collection
//! 4. Operation dispatch to the [`L0StoreHandler`]
//! 5. Error response formatting
//! 6. Common response headers (`x-request-id`, `server`, CORS)

use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::BodyExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::body::L0StoreResponseBody;
use crate::dispatch::{L0StoreHandler, dispatch_operation};
use crate::error::ApiError;
use crate::response::{CONTENT_TYPE, error_to_response};
use crate::router::{Operation, resolve_operation};

/// Configuration for the HTTP service.
#[derive(Debug, Clone)]
pub struct L0StoreHttpConfig {
    /// Value of the `server` response header.
    pub server_name: String,
    /// Version reported by the health check.
    pub version: String,
}

impl Default for L0StoreHttpConfig {
    fn default() -> Self {
        Self {
            server_name: "L0Store".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

/// Hyper `Service` for the L0 Store JSON API.
#[derive(Debug)]
pub struct L0StoreHttpService<H: L0StoreHandler> {
    handler: Arc<H>,
    config: Arc<L0StoreHttpConfig>,
}

impl<H: L0StoreHandler> L0StoreHttpService<H> {
    /// Create a new service around `handler`.
    pub fn new(handler: Arc<H>, config: L0StoreHttpConfig) -> Self {
        Self {
            handler,
            config: Arc::new(config),
        }
    }
}

impl<H: L0StoreHandler> Clone for L0StoreHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            config: Arc::clone(&self.config),
        }
    }
}

impl<H, B> hyper::service::Service<http::Request<B>> for L0StoreHttpService<H>
where
    H: L0StoreHandler,
    B: http_body::Body<Data = Bytes> + Send + 'static,
    B::Error: Display,
{
    type Response = http::Response<L0StoreResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let config = Arc::clone(&self.config);
        let request_id = Uuid::new_v4().to_string();

        Box::pin(async move {
            let response = process_request(req, handler.as_ref(), &config, &request_id).await;
            Ok(add_common_headers(response, &config, &request_id))
        })
    }
}

/// Process a single request through the pipeline.
async fn process_request<H, B>(
    req: http::Request<B>,
    handler: &H,
    config: &L0StoreHttpConfig,
    request_id: &str,
) -> http::Response<L0StoreResponseBody>
where
    H: L0StoreHandler,
    B: http_body::Body<Data = Bytes>,
    B::Error: Display,
{
    let (parts, incoming) = req.into_parts();
    debug!(method = %parts.method, uri = %parts.uri, request_id, "processing request");

    let op = match resolve_operation(&parts.method, &parts.uri) {
        Ok(op) => op,
        Err(err) => {
            warn!(method = %parts.method, uri = %parts.uri, error = %err, request_id, "failed to route request");
            return error_to_response(&err, request_id);
        }
    };

    match op {
        Operation::Health => return health_check_response(config),
        Operation::Preflight => return cors_preflight_response(),
        _ => {}
    }

    let body = match collect_body(incoming).await {
        Ok(body) => body,
        Err(err) => return error_to_response(&err, request_id),
    };

    info!(operation = %op, request_id, "routed request");
    match dispatch_operation(handler, op, body).await {
        Ok(response) => response,
        Err(err) => {
            if err.status.is_server_error() {
                warn!(status = err.status.as_u16(), error = %err.message, request_id, "operation failed");
            } else {
                debug!(status = err.status.as_u16(), error = %err.message, request_id, "operation rejected");
            }
            error_to_response(&err, request_id)
        }
    }
}

/// Collect the incoming body into a single `Bytes` buffer.
async fn collect_body<B>(incoming: B) -> Result<Bytes, ApiError>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: Display,
{
    incoming
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| ApiError::bad_request(format!("failed to read request body: {e}")))
}

fn health_check_response(config: &L0StoreHttpConfig) -> http::Response<L0StoreResponseBody> {
    let json = serde_json::json!({"status": "running", "version": config.version});
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("content-type", CONTENT_TYPE)
        .body(L0StoreResponseBody::from_bytes(json.to_string()))
        .expect("static health response should be valid")
}

fn cors_preflight_response() -> http::Response<L0StoreResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::NO_CONTENT)
        .header("access-control-allow-methods", "GET, POST, DELETE, OPTIONS")
        .header("access-control-allow-headers", "*, Authorization, Content-Type")
        .header("access-control-max-age", "86400")
        .body(L0StoreResponseBody::empty())
        .expect("static CORS response should be valid")
}

/// Add common response headers to every response.
fn add_common_headers(
    mut response: http::Response<L0StoreResponseBody>,
    config: &L0StoreHttpConfig,
    request_id: &str,
) -> http::Response<L0StoreResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        headers.entry("x-request-id").or_insert(hv);
    }

    if let Ok(hv) = http::HeaderValue::from_str(&config.server_name) {
        headers.insert("server", hv);
    }

    headers.insert(
        "access-control-allow-origin",
        http::HeaderValue::from_static("*"),
    );
    headers.insert(
        "access-control-expose-headers",
        http::HeaderValue::from_static("x-request-id"),
    );

    response
}
