//! Request router.
//!
//! All API routes live below `/api/latest`:
//!
//! ```text
//! GET    /health
//! POST   /api/latest/api-id
//! GET    /api/latest/api-id?customerId=..&page=..&size=..
//! GET    /api/latest/api-id/{apiId}
//! DELETE /api/latest/api-id/{apiId}
//! POST   /api/latest/upload
//! GET    /api/latest/versions?apiId=..&keyMarker=..&versionMarker=..
//! ```

use std::collections::HashMap;
use std::fmt;

use http::Method;

use crate::error::ApiError;

/// Prefix of every versioned API route.
pub const API_PREFIX: &str = "/api/latest";

/// Page requested when `page` is absent.
pub const DEFAULT_PAGE: usize = 0;

/// Page size requested when `size` is absent.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// A routed API operation with its path and query arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Liveness probe.
    Health,
    /// CORS preflight for any path.
    Preflight,
    /// Issue a new API identifier. Body: `{"customerId": ..}`.
    RegisterApiId,
    /// Page through a customer's identifiers.
    ListApiIds {
        /// Owner whose identifiers are listed.
        customer_id: String,
        /// Zero-based page.
        page: usize,
        /// Requested page size.
        size: usize,
    },
    /// Look up one identifier.
    GetApiId {
        /// Identifier from the path.
        api_id: String,
    },
    /// Revoke one identifier.
    RevokeApiId {
        /// Identifier from the path.
        api_id: String,
    },
    /// Sign an upload policy. Body: `{"apiId": ..}`.
    AuthorizeUpload,
    /// List stored object versions for an identifier.
    ListVersions {
        /// Identifier whose prefix is listed.
        api_id: String,
        /// Continue after this key.
        key_marker: Option<String>,
        /// Continue after this version.
        version_marker: Option<String>,
    },
}

impl Operation {
    /// Stable name for logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Health => "Health",
            Self::Preflight => "Preflight",
            Self::RegisterApiId => "RegisterApiId",
            Self::ListApiIds { .. } => "ListApiIds",
            Self::GetApiId { .. } => "GetApiId",
            Self::RevokeApiId { .. } => "RevokeApiId",
            Self::AuthorizeUpload => "AuthorizeUpload",
            Self::ListVersions { .. } => "ListVersions",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the operation for `method` on `uri`.
///
/// # Errors
///
/// `404` for unknown paths, `405` for a known path with the wrong method, and
/// `400` for missing or malformed query parameters.
pub fn resolve_operation(method: &Method, uri: &http::Uri) -> Result<Operation, ApiError> {
    if *method == Method::OPTIONS {
        return Ok(Operation::Preflight);
    }

    let path = uri.path().trim_end_matches('/');
    let query = parse_query(uri.query());

    if path == "/health" {
        return match *method {
            Method::GET => Ok(Operation::Health),
            _ => Err(ApiError::method_not_allowed(method)),
        };
    }

    let Some(route) = path.strip_prefix(API_PREFIX) else {
        return Err(not_found(uri));
    };

    match route {
        "/api-id" => match *method {
            Method::POST => Ok(Operation::RegisterApiId),
            Method::GET => Ok(Operation::ListApiIds {
                customer_id: required(&query, "customerId")?,
                page: number(&query, "page", DEFAULT_PAGE)?,
                size: number(&query, "size", DEFAULT_PAGE_SIZE)?,
            }),
            _ => Err(ApiError::method_not_allowed(method)),
        },
        "/upload" => match *method {
            Method::POST => Ok(Operation::AuthorizeUpload),
            _ => Err(ApiError::method_not_allowed(method)),
        },
        "/versions" => match *method {
            Method::GET => Ok(Operation::ListVersions {
                api_id: required(&query, "apiId")?,
                key_marker: optional(&query, "keyMarker"),
                version_marker: optional(&query, "versionMarker"),
            }),
            _ => Err(ApiError::method_not_allowed(method)),
        },
        _ => match route.strip_prefix("/api-id/") {
            Some(api_id) if !api_id.is_empty() && !api_id.contains('/') => {
                let api_id = percent_decode(api_id);
                match *method {
                    Method::GET => Ok(Operation::GetApiId { api_id }),
                    Method::DELETE => Ok(Operation::RevokeApiId { api_id }),
                    _ => Err(ApiError::method_not_allowed(method)),
                }
            }
            _ => Err(not_found(uri)),
        },
    }
}

fn not_found(uri: &http::Uri) -> ApiError {
    ApiError::not_found(format!("no route for {}", uri.path()))
}

fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    query
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

fn percent_decode(segment: &str) -> String {
    percent_encoding::percent_decode_str(segment)
        .decode_utf8_lossy()
        .into_owned()
}

fn required(query: &HashMap<String, String>, name: &str) -> Result<String, ApiError> {
    optional(query, name)
        .ok_or_else(|| ApiError::bad_request(format!("missing query parameter '{name}'")))
}

fn optional(query: &HashMap<String, String>, name: &str) -> Option<String> {
    query.get(name).filter(|v| !v.is_empty()).cloned()
}

fn number(query: &HashMap<String, String>, name: &str, default: usize) -> Result<usize, ApiError> {
    match optional(query, name) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| {
            ApiError::bad_request(format!(
                "query parameter '{name}' must be a non-negative integer"
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::*;

    fn resolve(method: Method, uri: &str) -> Result<Operation, ApiError> {
        resolve_operation(&method, &uri.parse().unwrap())
    }

    #[test]
    fn test_should_resolve_all_routes() {
        let cases = [
            (Method::GET, "/health", Operation::Health),
            (Method::POST, "/api/latest/api-id", Operation::RegisterApiId),
            (Method::POST, "/api/latest/upload", Operation::AuthorizeUpload),
            (
                Method::GET,
                "/api/latest/api-id/a%2Bc",
                Operation::GetApiId {
                    api_id: "a+c".to_owned(),
                },
            ),
            (
                Method::GET,
                "/api/latest/api-id/abc",
                Operation::GetApiId {
                    api_id: "abc".to_owned(),
                },
            ),
            (
                Method::DELETE,
                "/api/latest/api-id/abc/",
                Operation::RevokeApiId {
                    api_id: "abc".to_owned(),
                },
            ),
            (Method::OPTIONS, "/anything", Operation::Preflight),
        ];
        for (method, uri, expected) in cases {
            assert_eq!(resolve(method, uri).unwrap(), expected, "failed for {uri}");
        }
    }

    #[test]
    fn test_should_parse_list_query_with_defaults() {
        assert_eq!(
            resolve(Method::GET, "/api/latest/api-id?customerId=c%201").unwrap(),
            Operation::ListApiIds {
                customer_id: "c 1".to_owned(),
                page: 0,
                size: 100,
            }
        );
        assert_eq!(
            resolve(Method::GET, "/api/latest/api-id?customerId=c&page=1&size=2").unwrap(),
            Operation::ListApiIds {
                customer_id: "c".to_owned(),
                page: 1,
                size: 2,
            }
        );
    }

    #[test]
    fn test_should_parse_version_markers() {
        assert_eq!(
            resolve(
                Method::GET,
                "/api/latest/versions?apiId=abc&keyMarker=abc%2Fb.json&versionMarker="
            )
            .unwrap(),
            Operation::ListVersions {
                api_id: "abc".to_owned(),
                key_marker: Some("abc/b.json".to_owned()),
                version_marker: None,
            }
        );
    }

    #[test]
    fn test_should_reject_missing_or_malformed_query() {
        let err = resolve(Method::GET, "/api/latest/api-id").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        let err = resolve(Method::GET, "/api/latest/api-id?customerId=c&page=-1").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        let err = resolve(Method::GET, "/api/latest/versions").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_should_return_not_found_for_unknown_paths() {
        for uri in ["/", "/api/v2/api-id", "/api/latest/other", "/api/latest/api-id/a/b"] {
            assert_eq!(
                resolve(Method::GET, uri).unwrap_err().status,
                StatusCode::NOT_FOUND,
                "failed for {uri}"
            );
        }
    }

    #[test]
    fn test_should_return_method_not_allowed() {
        let cases = [
            (Method::DELETE, "/api/latest/api-id"),
            (Method::GET, "/api/latest/upload"),
            (Method::POST, "/api/latest/api-id/abc"),
            (Method::POST, "/api/latest/versions"),
            (Method::POST, "/health"),
        ];
        for (method, uri) in cases {
            assert_eq!(
                resolve(method, uri).unwrap_err().status,
                StatusCode::METHOD_NOT_ALLOWED,
                "failed for {uri}"
            );
        }
    }
}
