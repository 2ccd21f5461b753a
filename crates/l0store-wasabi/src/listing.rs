//! Version listing requests.

/// Versions returned per listing call.
pub const MAX_KEYS: &str = "1000";

/// A request to list the object versions below one key prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListVersionsRequest {
    prefix: String,
    key_marker: Option<String>,
    version_id_marker: Option<String>,
}

impl ListVersionsRequest {
    /// List versions below `<prefix>/`.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: format!("{prefix}/"),
            key_marker: None,
            version_id_marker: None,
        }
    }

    /// Continue after `key_marker`. Empty markers are ignored.
    #[must_use]
    pub fn with_key_marker(mut self, key_marker: Option<String>) -> Self {
        self.key_marker = key_marker.filter(|m| !m.is_empty());
        self
    }

    /// Continue after `version_id_marker`. Empty markers are ignored.
    #[must_use]
    pub fn with_version_id_marker(mut self, version_id_marker: Option<String>) -> Self {
        self.version_id_marker = version_id_marker.filter(|m| !m.is_empty());
        self
    }

    /// The listed prefix, trailing `/` included.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Unencoded query parameters of the listing call.
    #[must_use]
    pub fn query_params(&self) -> Vec<(&str, &str)> {
        let mut params = vec![
            ("versions", ""),
            ("max-keys", MAX_KEYS),
            ("prefix", self.prefix.as_str()),
        ];
        if let Some(marker) = &self.key_marker {
            params.push(("key-marker", marker.as_str()));
        }
        if let Some(marker) = &self.version_id_marker {
            params.push(("version-id-marker", marker.as_str()));
        }
        params
    }
}

/// Virtual-hosted endpoint of `bucket`: `{bucket}.s3.{region}.{domain}`.
#[must_use]
pub fn endpoint_host(bucket: &str, region: &str, domain: &str) -> String {
    format!("{bucket}.s3.{region}.{domain}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_build_base_query() {
        let request = ListVersionsRequest::new("3f2a");
        assert_eq!(request.prefix(), "3f2a/");
        assert_eq!(
            request.query_params(),
            [("versions", ""), ("max-keys", "1000"), ("prefix", "3f2a/")]
        );
    }

    #[test]
    fn test_should_append_markers() {
        let request = ListVersionsRequest::new("3f2a")
            .with_key_marker(Some("3f2a/b.json".to_owned()))
            .with_version_id_marker(Some("v-2".to_owned()));
        let params = request.query_params();
        assert!(params.contains(&("key-marker", "3f2a/b.json")));
        assert!(params.contains(&("version-id-marker", "v-2")));
    }

    #[test]
    fn test_should_drop_empty_markers() {
        let request = ListVersionsRequest::new("3f2a")
            .with_key_marker(Some(String::new()))
            .with_version_id_marker(None);
        assert_eq!(request.query_params().len(), 3);
    }

    #[test]
    fn test_should_format_endpoint_host() {
        assert_eq!(
            endpoint_host("l0-bucket", "us-east-1", "wasabisys.com"),
            "l0-bucket.s3.us-east-1.wasabisys.com"
        );
    }
}
