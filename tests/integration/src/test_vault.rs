//! Vault lifecycle integration tests.

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::Method;

    use crate::{glacier, header, json_body, send_empty};

    #[tokio::test]
    async fn test_should_list_no_vaults_initially() {
        let handler = glacier();

        let resp = send_empty(&handler, Method::GET, "/-/vaults").await;
        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(
            json_body(&resp),
            serde_json::json!({"Marker": null, "VaultList": []}),
        );
    }

    #[tokio::test]
    async fn test_should_create_describe_and_delete_vault() {
        let handler = glacier();

        let resp = send_empty(&handler, Method::PUT, "/-/vaults/backups").await;
        assert_eq!(resp.status(), http::StatusCode::CREATED);
        assert_eq!(header(&resp, "location"), "/-/vaults/backups");

        let resp = send_empty(&handler, Method::GET, "/-/vaults/backups").await;
        assert_eq!(resp.status(), http::StatusCode::OK);
        let body = json_body(&resp);
        assert_eq!(body["VaultName"], "backups");
        assert_eq!(body["VaultARN"], "arn:aws:glacier::-:vaults/backups");
        assert_eq!(body["NumberOfArchives"], 0);
        assert_eq!(body["SizeInBytes"], -1);
        assert!(body["CreationDate"].is_string());

        let resp = send_empty(&handler, Method::DELETE, "/-/vaults/backups").await;
        assert_eq!(resp.status(), http::StatusCode::NO_CONTENT);
        assert!(resp.body().is_empty());

        let resp = send_empty(&handler, Method::GET, "/-/vaults/backups").await;
        assert_eq!(resp.status(), http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_should_create_vault_idempotently() {
        let handler = glacier();

        for _ in 0..2 {
            let resp = send_empty(&handler, Method::PUT, "/123456789012/vaults/v").await;
            assert_eq!(resp.status(), http::StatusCode::CREATED);
            assert_eq!(header(&resp, "location"), "/123456789012/vaults/v");
        }

        let resp = send_empty(&handler, Method::GET, "/123456789012/vaults").await;
        let body = json_body(&resp);
        assert_eq!(body["VaultList"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_should_refuse_deleting_vault_with_archives() {
        let handler = glacier();
        send_empty(&handler, Method::PUT, "/-/vaults/v").await;

        let resp = crate::send(
            &handler,
            Method::POST,
            "/-/vaults/v/archives",
            &[
                ("x-amz-content-sha256", "hash"),
                ("x-amz-sha256-tree-hash", "hash"),
            ],
            Bytes::from("payload"),
        )
        .await;
        assert_eq!(resp.status(), http::StatusCode::CREATED);

        let resp = send_empty(&handler, Method::DELETE, "/-/vaults/v").await;
        assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);
        let body = json_body(&resp);
        assert_eq!(body["message"], "Vault not empty");
        assert_eq!(body["type"], "client");
    }

    #[tokio::test]
    async fn test_should_reject_vault_collection_delete() {
        let handler = glacier();
        let resp = send_empty(&handler, Method::DELETE, "/-/vaults").await;
        assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_should_reject_unsupported_vault_method() {
        let handler = glacier();
        let resp = send_empty(&handler, Method::POST, "/-/vaults/v").await;
        assert_eq!(resp.status(), http::StatusCode::METHOD_NOT_ALLOWED);
    }
}
