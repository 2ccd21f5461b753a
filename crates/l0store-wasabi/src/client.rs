//! The signed version listing client.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use l0store_auth::{RequestToSign, SigningCredentials, sign_request};
use tracing::{debug, warn};

use crate::error::{WasabiError, WasabiResult};
use crate::listing::{ListVersionsRequest, endpoint_host};
use crate::xml::{ListVersionsResult, parse_list_versions};

/// Lists the stored versions below a key prefix.
#[async_trait]
pub trait VersionLister: std::fmt::Debug + Send + Sync {
    /// Fetch one page of versions.
    async fn list_versions(&self, request: &ListVersionsRequest)
    -> WasabiResult<ListVersionsResult>;
}

/// [`VersionLister`] backed by the Wasabi S3 API.
#[derive(Debug, Clone)]
pub struct WasabiClient {
    http: reqwest::Client,
    credentials: Arc<SigningCredentials>,
    host: String,
    endpoint: String,
}

impl WasabiClient {
    /// Create a client for the bucket named in `credentials`, served below
    /// `domain` (e.g. `wasabisys.com`).
    #[must_use]
    pub fn new(credentials: Arc<SigningCredentials>, domain: &str) -> Self {
        Self::with_http_client(reqwest::Client::new(), credentials, domain)
    }

    /// Like [`WasabiClient::new`] with a preconfigured HTTP client.
    #[must_use]
    pub fn with_http_client(
        http: reqwest::Client,
        credentials: Arc<SigningCredentials>,
        domain: &str,
    ) -> Self {
        let host = endpoint_host(credentials.bucket(), credentials.region(), domain);
        let endpoint = format!("https://{host}");
        Self {
            http,
            credentials,
            host,
            endpoint,
        }
    }

    /// Send requests to `endpoint` (scheme and authority, e.g.
    /// `http://127.0.0.1:9000`) instead of the bucket host. Requests are still
    /// signed for, and carry a `Host` header of, the bucket host.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_owned();
        self
    }

    /// The virtual-hosted bucket endpoint.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }
}

#[async_trait]
impl VersionLister for WasabiClient {
    async fn list_versions(
        &self,
        request: &ListVersionsRequest,
    ) -> WasabiResult<ListVersionsResult> {
        let params = request.query_params();
        let signed = sign_request(
            &self.credentials,
            &RequestToSign {
                method: "GET",
                host: &self.host,
                path: "/",
                query: &params,
                payload: b"",
            },
            Utc::now(),
        )?;

        // The query string on the wire must be byte-identical to the signed one.
        let url = format!("{}/?{}", self.endpoint, signed.query_string);
        let mut builder = self.http.get(&url).header(reqwest::header::HOST, &self.host);
        for (name, value) in signed.headers() {
            builder = builder.header(name, value);
        }

        debug!(host = %self.host, prefix = request.prefix(), "listing object versions");
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).into_owned();
            warn!(status = status.as_u16(), "version listing rejected by object store");
            return Err(WasabiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let result = parse_list_versions(&body)?;
        debug!(
            versions = result.versions.len(),
            delete_markers = result.delete_markers.len(),
            truncated = result.is_truncated,
            "listed object versions"
        );
        Ok(result)
    }
}
