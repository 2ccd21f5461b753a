//! Header-based SigV4 signing of outbound requests.
//!
//! Used for calls the service itself makes to the object store, such as
//! listing object versions. The payload hash is sent in
//! `x-amz-content-sha256` and covered by the signature.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::canonical::{build_canonical_request, canonical_query_string};
use crate::credentials::SigningCredentials;
use crate::error::{SigningResult, require_non_empty};
use crate::scope::{CredentialScope, IssueDate};
use crate::sigv4::{ALGORITHM, build_string_to_sign, derive_signing_key, hash_payload, sign};

/// An outbound request to be signed.
#[derive(Debug, Clone)]
pub struct RequestToSign<'a> {
    /// HTTP method, e.g. `GET`.
    pub method: &'a str,
    /// Host the request is sent to, e.g. `bucket.s3.us-east-1.wasabisys.com`.
    pub host: &'a str,
    /// Unencoded request path.
    pub path: &'a str,
    /// Unencoded query parameters.
    pub query: &'a [(&'a str, &'a str)],
    /// Request body.
    pub payload: &'a [u8],
}

/// Headers to attach to a signed request, plus the query string to send.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// The `Authorization` header value.
    pub authorization: String,
    /// The `x-amz-date` header value.
    pub amz_date: String,
    /// The `x-amz-content-sha256` header value.
    pub content_sha256: String,
    /// The encoded query string the signature covers.
    pub query_string: String,
}

impl SignedRequest {
    /// The headers to set on the request, `Host` excluded.
    #[must_use]
    pub fn headers(&self) -> [(&'static str, &str); 3] {
        [
            ("authorization", self.authorization.as_str()),
            ("x-amz-content-sha256", self.content_sha256.as_str()),
            ("x-amz-date", self.amz_date.as_str()),
        ]
    }
}

impl std::fmt::Debug for SignedRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedRequest")
            .field("amz_date", &self.amz_date)
            .field("content_sha256", &self.content_sha256)
            .field("query_string", &self.query_string)
            .finish_non_exhaustive()
    }
}

/// Sign `request` with `credentials` at instant `now`.
///
/// The signed headers are `host`, `x-amz-content-sha256` and `x-amz-date`.
///
/// # Errors
///
/// Returns [`SigningError::InvalidArgument`](crate::SigningError::InvalidArgument)
/// if the method or host is empty, or any error from key derivation.
pub fn sign_request(
    credentials: &SigningCredentials,
    request: &RequestToSign<'_>,
    now: DateTime<Utc>,
) -> SigningResult<SignedRequest> {
    require_non_empty("method", request.method)?;
    require_non_empty("host", request.host)?;

    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let issue_date = IssueDate::from_datetime(&now);
    let scope = CredentialScope::format(credentials.access_key(), &issue_date, credentials.region())?;
    let content_sha256 = hash_payload(request.payload);

    let headers = [
        ("host", request.host),
        ("x-amz-content-sha256", content_sha256.as_str()),
        ("x-amz-date", amz_date.as_str()),
    ];
    let (canonical_request, signed_headers) = build_canonical_request(
        request.method,
        request.path,
        request.query,
        &headers,
        &content_sha256,
    );

    let signing_scope = scope.signing_scope();
    let string_to_sign = build_string_to_sign(
        &amz_date,
        &signing_scope,
        &hash_payload(canonical_request.as_bytes()),
    );

    let signing_key = derive_signing_key(
        credentials.secret_key(),
        &issue_date,
        credentials.region(),
        scope.service(),
    )?;
    let signature = sign(&signing_key, &string_to_sign)?;

    debug!(
        method = request.method,
        host = request.host,
        path = request.path,
        signing_scope = %signing_scope,
        "signed outbound request"
    );

    Ok(SignedRequest {
        authorization: format!(
            "{ALGORITHM} Credential={scope}, SignedHeaders={signed_headers}, Signature={signature}"
        ),
        amz_date,
        content_sha256,
        query_string: canonical_query_string(request.query),
    })
}
