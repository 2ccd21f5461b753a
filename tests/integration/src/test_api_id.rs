//! API identifier lifecycle integration tests.

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::{api_url, http_client, register_api_id, test_customer_id};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_register_find_and_revoke() {
        let client = http_client();
        let api_id = register_api_id(&client, &test_customer_id("lifecycle")).await;

        let found: Value = client
            .get(api_url(&format!("/api-id/{api_id}")))
            .send()
            .await
            .expect("find")
            .json()
            .await
            .expect("find body");
        assert_eq!(found["apiId"], api_id.as_str());
        assert_eq!(found["valid"], true);

        let revoked: Value = client
            .delete(api_url(&format!("/api-id/{api_id}")))
            .send()
            .await
            .expect("revoke")
            .json()
            .await
            .expect("revoke body");
        assert_eq!(revoked["valid"], false);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_page_through_customer_ids() {
        let client = http_client();
        let customer = test_customer_id("paging");
        for _ in 0..3 {
            register_api_id(&client, &customer).await;
        }

        let page: Value = client
            .get(api_url(&format!("/api-id?customerId={customer}&page=1&size=2")))
            .send()
            .await
            .expect("list")
            .json()
            .await
            .expect("list body");
        assert_eq!(page["page"]["totalElements"], 3);
        assert_eq!(page["page"]["totalPages"], 2);
        assert_eq!(page["data"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_not_found_for_unknown_id() {
        let response = http_client()
            .get(api_url(&format!("/api-id/{}", uuid::Uuid::new_v4())))
            .send()
            .await
            .expect("find");
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
