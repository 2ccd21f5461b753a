//! Canonical request construction for outbound SigV4 requests.
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! Unlike a verifier, the signer owns the request it describes, so query
//! parameters are taken unencoded and encoded here exactly once. The same
//! encoded query string must then be placed on the wire.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything except RFC 3986 unreserved characters (`A-Z a-z 0-9 - _ . ~`).
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode `input` with the SigV4 rules.
///
/// # Examples
///
/// ```
/// use l0store_auth::canonical::uri_encode;
///
/// assert_eq!(uri_encode("a b/c~"), "a%20b%2Fc~");
/// ```
#[must_use]
pub fn uri_encode(input: &str) -> String {
    utf8_percent_encode(input, URI_ENCODE_SET).to_string()
}

/// Encode a path, keeping `/` separators. Empty paths become `/`.
#[must_use]
pub fn canonical_uri(path: &str) -> String {
    if path.is_empty() {
        return "/".to_owned();
    }
    path.split('/').map(uri_encode).collect::<Vec<_>>().join("/")
}

/// Encode and sort query parameters into `k1=v1&k2=v2` form.
///
/// Parameters are sorted by encoded name, then by encoded value. A parameter
/// without a value renders as `name=`.
///
/// # Examples
///
/// ```
/// use l0store_auth::canonical::canonical_query_string;
///
/// assert_eq!(
///     canonical_query_string(&[("prefix", "J"), ("max-keys", "2")]),
///     "max-keys=2&prefix=J"
/// );
/// ```
#[must_use]
pub fn canonical_query_string(params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (uri_encode(k), uri_encode(v)))
        .collect();
    encoded.sort_unstable();

    encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Lowercased, trimmed headers sorted by name.
///
/// Returns `(canonical_headers, signed_headers)`, where `canonical_headers` has
/// one `name:value` line per header without a trailing newline and
/// `signed_headers` is the `;`-joined name list.
#[must_use]
pub fn canonical_headers(headers: &[(&str, &str)]) -> (String, String) {
    let mut header_map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let trimmed = collapse_whitespace(value.trim());
        header_map
            .entry(name.to_lowercase())
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&trimmed);
            })
            .or_insert(trimmed);
    }

    let canonical = header_map
        .iter()
        .map(|(name, value)| format!("{name}:{value}"))
        .collect::<Vec<_>>()
        .join("\n");
    let signed = header_map.keys().cloned().collect::<Vec<_>>().join(";");

    (canonical, signed)
}

/// Build the canonical request.
///
/// Returns `(canonical_request, signed_headers)`.
#[must_use]
pub fn build_canonical_request(
    method: &str,
    path: &str,
    query: &[(&str, &str)],
    headers: &[(&str, &str)],
    payload_hash: &str,
) -> (String, String) {
    let canonical_uri = canonical_uri(path);
    let canonical_query = canonical_query_string(query);
    let (canonical_headers, signed_headers) = canonical_headers(headers);

    let request = format!(
        "{method}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n\n{signed_headers}\n{payload_hash}"
    );
    (request, signed_headers)
}

/// Collapse runs of whitespace to a single space.
fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }
    result
}
