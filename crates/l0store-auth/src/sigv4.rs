//! AWS Signature Version 4 key derivation and signing.
//!
//! The signing key is narrowed from the long-lived secret through four chained
//! HMAC-SHA256 operations, each step keyed by the previous step's output:
//!
//! ```text
//! DateKey              = HMAC-SHA256("AWS4" + secret_key, date)
//! DateRegionKey        = HMAC-SHA256(DateKey, region)
//! DateRegionServiceKey = HMAC-SHA256(DateRegionKey, service)
//! SigningKey           = HMAC-SHA256(DateRegionServiceKey, "aws4_request")
//! ```
//!
//! The signature is `hex(HMAC-SHA256(SigningKey, payload))`. For a browser
//! upload form the payload is the base64 policy document; for a request it is
//! the string to sign built by [`build_string_to_sign`].
//!
//! Derived keys live only for one signing call and are never cached.

use std::fmt;

use hmac::{Hmac, KeyInit, Mac};
use sha2::{Digest, Sha256};

use crate::credentials::SecretKey;
use crate::error::{SigningError, SigningResult, require_non_empty};
use crate::scope::{IssueDate, TERMINATOR};

/// The only algorithm this signer emits.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Length of every key in the chain (the SHA-256 digest size).
pub const KEY_LEN: usize = 32;

type HmacSha256 = Hmac<Sha256>;

/// A derived SigV4 signing key.
///
/// Opaque: `Debug` is redacted and there is no `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey([u8; KEY_LEN]);

impl SigningKey {
    /// The raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Every intermediate key of one derivation.
///
/// Exposed so the per-step invariants can be inspected; production code only
/// needs [`derive_signing_key`].
#[derive(Clone)]
pub struct SigningKeyChain {
    date_key: [u8; KEY_LEN],
    region_key: [u8; KEY_LEN],
    service_key: [u8; KEY_LEN],
    signing_key: SigningKey,
}

impl SigningKeyChain {
    /// Run the four-step derivation.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::InvalidArgument`] if the region or service is
    /// empty, or [`SigningError::CryptoUnavailable`] if HMAC-SHA256 cannot be
    /// instantiated.
    pub fn derive(
        secret_key: &SecretKey,
        issue_date: &IssueDate,
        region: &str,
        service: &str,
    ) -> SigningResult<Self> {
        require_non_empty("region", region)?;
        require_non_empty("service", service)?;

        let seed = format!("AWS4{}", secret_key.expose_secret());
        let date_key = hmac_sha256(seed.as_bytes(), issue_date.as_str().as_bytes())?;
        let region_key = hmac_sha256(&date_key, region.as_bytes())?;
        let service_key = hmac_sha256(&region_key, service.as_bytes())?;
        let signing_key = hmac_sha256(&service_key, TERMINATOR.as_bytes())?;

        Ok(Self {
            date_key,
            region_key,
            service_key,
            signing_key: SigningKey(signing_key),
        })
    }

    /// `HMAC-SHA256("AWS4" + secret, date)`.
    #[must_use]
    pub fn date_key(&self) -> &[u8; KEY_LEN] {
        &self.date_key
    }

    /// `HMAC-SHA256(date_key, region)`.
    #[must_use]
    pub fn region_key(&self) -> &[u8; KEY_LEN] {
        &self.region_key
    }

    /// `HMAC-SHA256(region_key, service)`.
    #[must_use]
    pub fn service_key(&self) -> &[u8; KEY_LEN] {
        &self.service_key
    }

    /// `HMAC-SHA256(service_key, "aws4_request")`.
    #[must_use]
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// Drop the intermediate keys and keep the final one.
    #[must_use]
    pub fn into_signing_key(self) -> SigningKey {
        self.signing_key
    }
}

impl fmt::Debug for SigningKeyChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKeyChain(<redacted>)")
    }
}

/// Derive the SigV4 signing key for `issue_date`, `region` and `service`.
///
/// # Errors
///
/// See [`SigningKeyChain::derive`].
///
/// # Examples
///
/// ```
/// use l0store_auth::credentials::SecretKey;
/// use l0store_auth::scope::IssueDate;
/// use l0store_auth::sigv4::derive_signing_key;
///
/// let key = derive_signing_key(
///     &SecretKey::new("wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY"),
///     &IssueDate::parse("20151229").unwrap(),
///     "us-east-1",
///     "s3",
/// )
/// .unwrap();
/// assert_eq!(key.as_bytes().len(), 32);
/// ```
pub fn derive_signing_key(
    secret_key: &SecretKey,
    issue_date: &IssueDate,
    region: &str,
    service: &str,
) -> SigningResult<SigningKey> {
    SigningKeyChain::derive(secret_key, issue_date, region, service)
        .map(SigningKeyChain::into_signing_key)
}

/// Sign `payload` with `signing_key`.
///
/// Returns the signature as 64 lowercase hex characters.
///
/// # Errors
///
/// Returns [`SigningError::CryptoUnavailable`] if HMAC-SHA256 cannot be instantiated.
pub fn sign(signing_key: &SigningKey, payload: &str) -> SigningResult<String> {
    let signature = hmac_sha256(signing_key.as_bytes(), payload.as_bytes())?;
    Ok(hex::encode(signature))
}

/// Build the SigV4 string to sign for a request.
///
/// Format:
/// ```text
/// AWS4-HMAC-SHA256\n
/// <ISO8601 timestamp>\n
/// <date/region/service/aws4_request>\n
/// <hex(SHA256(canonical_request))>
/// ```
///
/// # Examples
///
/// ```
/// use l0store_auth::sigv4::build_string_to_sign;
///
/// let sts = build_string_to_sign(
///     "20130524T000000Z",
///     "20130524/us-east-1/s3/aws4_request",
///     "7344ae5b7ee6c3e7e6b0fe0640412a37625d1fbfff95c48bbb2dc43964946972",
/// );
/// assert!(sts.starts_with("AWS4-HMAC-SHA256\n20130524T000000Z\n"));
/// ```
#[must_use]
pub fn build_string_to_sign(
    timestamp: &str,
    signing_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!("{ALGORITHM}\n{timestamp}\n{signing_scope}\n{canonical_request_hash}")
}

/// Compute the SHA-256 hash of `payload` as lowercase hex.
///
/// This is the `x-amz-content-sha256` header value.
///
/// ```
/// use l0store_auth::sigv4::hash_payload;
///
/// assert_eq!(
///     hash_payload(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// Compute HMAC-SHA256 and return the raw digest.
fn hmac_sha256(key: &[u8], data: &[u8]) -> SigningResult<[u8; KEY_LEN]> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SigningError::CryptoUnavailable)?;
    mac.update(data);

    let mut digest = [0u8; KEY_LEN];
    digest.copy_from_slice(&mac.finalize().into_bytes());
    Ok(digest)
}
