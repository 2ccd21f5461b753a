//! Integration tests for the L0 Store server.
//!
//! These tests require a running server at `localhost:8080` configured with
//! real Wasabi credentials. They are marked `#[ignore]` so they don't run
//! during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! L0STORE_ENDPOINT_URL=http://localhost:8080 cargo test -p l0store-integration -- --ignored
//! ```

use std::sync::Once;

use serde_json::Value;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the server.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("L0STORE_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:8080".to_owned())
}

/// URL of an API route below `/api/latest`.
#[must_use]
pub fn api_url(route: &str) -> String {
    format!("{}/api/latest{route}", endpoint_url())
}

/// Create an HTTP client for the local server.
#[must_use]
pub fn http_client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// Generate a unique customer id for a test.
#[must_use]
pub fn test_customer_id(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Register a new API identifier for `customer_id` and return it.
pub async fn register_api_id(client: &reqwest::Client, customer_id: &str) -> String {
    let response = client
        .post(api_url("/api-id"))
        .json(&serde_json::json!({"customerId": customer_id}))
        .send()
        .await
        .unwrap_or_else(|e| panic!("failed to register api id for {customer_id}: {e}"));
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let body: Value = response.json().await.expect("register response body");
    body["apiId"]
        .as_str()
        .expect("apiId in register response")
        .to_owned()
}

mod test_api_id;
mod test_health;
mod test_upload;
