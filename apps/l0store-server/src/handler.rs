//! Operation handler for the L0 Store API.
//!
//! Bridges the HTTP layer (`l0store-http`) with the registry, the upload
//! signer and the version lister by implementing [`L0StoreHandler`].

use std::sync::Arc;

use bytes::Bytes;
use chrono::{Duration, Utc};
use http::StatusCode;
use serde::Serialize;
use tracing::{info, warn};

use l0store_auth::{PolicyConditions, SignedUploadAuthorization, SigningCredentials, sign_upload};
use l0store_http::request::{RegisterApiIdRequest, UploadRequest, parse_json};
use l0store_http::response::json_response;
use l0store_http::{ApiError, HandlerFuture, L0StoreHandler, L0StoreResponseBody, Operation};
use l0store_registry::ApiIdService;
use l0store_wasabi::{ListVersionsRequest, VersionLister};

/// Lifetime of signed upload policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadWindow {
    /// How long a signed policy stays usable.
    pub expires_in: Duration,
    /// How long uploaded objects stay locked.
    pub retain_for: Duration,
}

/// Everything the API operations need.
#[derive(Debug, Clone)]
pub struct ApiHandler {
    registry: ApiIdService,
    credentials: Arc<SigningCredentials>,
    lister: Arc<dyn VersionLister>,
    upload_url: String,
    window: UploadWindow,
}

impl ApiHandler {
    /// Create a handler. `upload_url` is the form action browsers post to.
    pub fn new(
        registry: ApiIdService,
        credentials: Arc<SigningCredentials>,
        lister: Arc<dyn VersionLister>,
        upload_url: String,
        window: UploadWindow,
    ) -> Self {
        Self {
            registry,
            credentials,
            lister,
            upload_url,
            window,
        }
    }

    async fn handle(
        &self,
        op: Operation,
        body: Bytes,
    ) -> Result<http::Response<L0StoreResponseBody>, ApiError> {
        match op {
            Operation::RegisterApiId => {
                let request: RegisterApiIdRequest = parse_json(&body)?;
                let registered = self.registry.register(&request.customer_id)?;
                json_response(StatusCode::CREATED, &registered)
            }
            Operation::ListApiIds {
                customer_id,
                page,
                size,
            } => json_response(StatusCode::OK, &self.registry.all(&customer_id, page, size)?),
            Operation::GetApiId { api_id } => {
                json_response(StatusCode::OK, &self.registry.find(&api_id)?)
            }
            Operation::RevokeApiId { api_id } => {
                json_response(StatusCode::OK, &self.registry.revoke(&api_id)?)
            }
            Operation::AuthorizeUpload => {
                let request: UploadRequest = parse_json(&body)?;
                json_response(StatusCode::OK, &self.authorize_upload(&request.api_id)?)
            }
            Operation::ListVersions {
                api_id,
                key_marker,
                version_marker,
            } => {
                let record = self.registry.find_record(&api_id)?;
                let request = ListVersionsRequest::new(&record.api_id.to_string())
                    .with_key_marker(key_marker)
                    .with_version_id_marker(version_marker);
                let listing = self.lister.list_versions(&request).await?;
                json_response(StatusCode::OK, &listing)
            }
            Operation::Health | Operation::Preflight => Err(ApiError::internal(
                "health checks and preflight are answered by the service layer",
            )),
        }
    }

    fn authorize_upload(&self, api_id: &str) -> Result<UploadResponse, ApiError> {
        let record = self.registry.find_record(api_id)?;
        if !record.valid {
            warn!(api_id = %record.api_id, "upload requested for revoked api id");
            return Err(ApiError::forbidden("apiId has been revoked"));
        }

        let conditions = PolicyConditions::for_window(
            record.api_id.to_string(),
            Utc::now(),
            self.window.expires_in,
            self.window.retain_for,
        )
        .map_err(|e| ApiError::internal(format!("upload window is misconfigured: {e}")))?;
        let authorization = sign_upload(&self.credentials, &conditions)?;
        info!(api_id = %record.api_id, expiration = %authorization.expiration, "issued upload authorization");

        let fields = authorization
            .form_fields()
            .into_iter()
            .map(|(name, value)| FormField { name, value })
            .collect();
        Ok(UploadResponse {
            url: self.upload_url.clone(),
            fields,
            authorization,
        })
    }
}

impl L0StoreHandler for ApiHandler {
    fn handle_operation(&self, op: Operation, body: Bytes) -> HandlerFuture {
        let handler = self.clone();
        Box::pin(async move { handler.handle(op, body).await })
    }
}

/// Body of a successful `POST /api/latest/upload`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    url: String,
    fields: Vec<FormField>,
    #[serde(flatten)]
    authorization: SignedUploadAuthorization,
}

/// A hidden form field, in form order.
#[derive(Debug, Serialize)]
struct FormField {
    name: &'static str,
    value: String,
}
