//! Archive upload and delete integration tests.

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::Method;

    use crate::{glacier, header, json_body, send, send_empty};

    const HASH_HEADERS: &[(&str, &str)] = &[
        ("x-amz-content-sha256", "contenthash"),
        ("x-amz-sha256-tree-hash", "treehash"),
    ];

    #[tokio::test]
    async fn test_should_upload_and_retrieve_archive() {
        let handler = glacier();
        send_empty(&handler, Method::PUT, "/-/vaults/v").await;

        let resp = send(
            &handler,
            Method::POST,
            "/-/vaults/v/archives",
            HASH_HEADERS,
            Bytes::from("the archive payload"),
        )
        .await;
        assert_eq!(resp.status(), http::StatusCode::CREATED);
        assert_eq!(header(&resp, "x-amz-sha256-tree-hash"), "treehash");
        let archive_id = header(&resp, "x-amz-archive-id").to_owned();
        assert_eq!(
            header(&resp, "location"),
            format!("/-/vaults/v/archives/{archive_id}"),
        );

        // Retrieve the bytes back through a job.
        let submit = serde_json::json!({
            "Type": "archive-retrieval",
            "ArchiveId": archive_id,
        });
        let resp = send(
            &handler,
            Method::POST,
            "/-/vaults/v/jobs",
            &[],
            Bytes::from(submit.to_string()),
        )
        .await;
        assert_eq!(resp.status(), http::StatusCode::ACCEPTED);
        let job_id = header(&resp, "x-amz-job-id").to_owned();

        let resp = send_empty(
            &handler,
            Method::GET,
            &format!("/-/vaults/v/jobs/{job_id}/output"),
        )
        .await;
        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(resp.body().as_ref(), b"the archive payload");
    }

    #[tokio::test]
    async fn test_should_reject_upload_without_hash_headers() {
        let handler = glacier();
        send_empty(&handler, Method::PUT, "/-/vaults/v").await;

        let resp = send(
            &handler,
            Method::POST,
            "/-/vaults/v/archives",
            &[("x-amz-content-sha256", "contenthash")],
            Bytes::from("payload"),
        )
        .await;
        assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);
        let body = json_body(&resp);
        assert_eq!(body["type"], "client");
    }

    #[tokio::test]
    async fn test_should_reject_upload_to_missing_vault() {
        let handler = glacier();

        let resp = send(
            &handler,
            Method::POST,
            "/-/vaults/nope/archives",
            HASH_HEADERS,
            Bytes::from("payload"),
        )
        .await;
        assert_eq!(resp.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(json_body(&resp)["message"], "The vault was not found: nope");
    }

    #[tokio::test]
    async fn test_should_delete_archive_then_vault() {
        let handler = glacier();
        send_empty(&handler, Method::PUT, "/-/vaults/v").await;

        let resp = send(
            &handler,
            Method::POST,
            "/-/vaults/v/archives",
            HASH_HEADERS,
            Bytes::from("payload"),
        )
        .await;
        let archive_id = header(&resp, "x-amz-archive-id").to_owned();

        let resp = send_empty(
            &handler,
            Method::DELETE,
            &format!("/-/vaults/v/archives/{archive_id}"),
        )
        .await;
        assert_eq!(resp.status(), http::StatusCode::NO_CONTENT);

        // Vault is empty again once the archive and its metadata are gone.
        let resp = send_empty(&handler, Method::DELETE, "/-/vaults/v").await;
        assert_eq!(resp.status(), http::StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_should_reject_archive_get() {
        let handler = glacier();
        send_empty(&handler, Method::PUT, "/-/vaults/v").await;

        let resp = send_empty(&handler, Method::GET, "/-/vaults/v/archives").await;
        assert_eq!(resp.status(), http::StatusCode::METHOD_NOT_ALLOWED);
    }
}
