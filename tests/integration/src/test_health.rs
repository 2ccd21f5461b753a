//! Health and routing integration tests.

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::{api_url, endpoint_url, http_client};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_running() {
        let response = http_client()
            .get(format!("{}/health", endpoint_url()))
            .send()
            .await
            .expect("health request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert!(response.headers().get("x-request-id").is_some());

        let body: Value = response.json().await.expect("health body");
        assert_eq!(body["status"], "running");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_answer_unknown_route_with_json_error() {
        let response = http_client()
            .get(api_url("/nothing-here"))
            .send()
            .await
            .expect("request");
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

        let body: Value = response.json().await.expect("error body");
        assert_eq!(body["code"], 404);
    }
}
