//! Upload authorization and version listing integration tests.

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use serde_json::Value;

    use crate::{api_url, http_client, register_api_id, test_customer_id};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_sign_upload_policy_for_api_id() {
        let client = http_client();
        let api_id = register_api_id(&client, &test_customer_id("upload")).await;

        let response = client
            .post(api_url("/upload"))
            .json(&serde_json::json!({"apiId": api_id}))
            .send()
            .await
            .expect("upload");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("upload body");
        assert_eq!(body["keyPrefix"], format!("{api_id}/"));
        let policy = BASE64
            .decode(body["policyBase64"].as_str().expect("policy"))
            .expect("base64 policy");
        let policy: Value = serde_json::from_slice(&policy).expect("policy json");
        assert_eq!(policy["conditions"].as_array().map(Vec::len), Some(10));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_refuse_upload_after_revoke() {
        let client = http_client();
        let api_id = register_api_id(&client, &test_customer_id("revoked")).await;
        client
            .delete(api_url(&format!("/api-id/{api_id}")))
            .send()
            .await
            .expect("revoke");

        let response = client
            .post(api_url("/upload"))
            .json(&serde_json::json!({"apiId": api_id}))
            .send()
            .await
            .expect("upload");
        assert_eq!(response.status(), reqwest::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_versions_below_prefix() {
        let client = http_client();
        let api_id = register_api_id(&client, &test_customer_id("versions")).await;

        let response = client
            .get(api_url(&format!("/versions?apiId={api_id}")))
            .send()
            .await
            .expect("versions");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("versions body");
        assert_eq!(body["prefix"], format!("{api_id}/"));
        assert_eq!(body["versions"].as_array().map(Vec::len), Some(0));
    }
}
