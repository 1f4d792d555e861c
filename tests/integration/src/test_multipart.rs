//! Multipart upload integration tests.

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::Method;

    use crate::{glacier, header, json_body, send, send_empty};

    const PART_SIZE: u64 = 1_048_576;

    async fn initiate(
        handler: &rustglacier_http::GlacierHandler<rustglacier_blobstore::InMemoryBlobStore>,
        vault: &str,
    ) -> String {
        send_empty(handler, Method::PUT, &format!("/-/vaults/{vault}")).await;
        let resp = send(
            handler,
            Method::POST,
            &format!("/-/vaults/{vault}/multipart-uploads"),
            &[
                ("x-amz-part-size", "1048576"),
                ("x-amz-archive-description", "big backup"),
            ],
            Bytes::new(),
        )
        .await;
        assert_eq!(resp.status(), http::StatusCode::CREATED);
        let upload_id = header(&resp, "x-amz-multipart-upload-id").to_owned();
        assert_eq!(
            header(&resp, "location"),
            format!("/-/vaults/{vault}/multipart-uploads/{upload_id}"),
        );
        upload_id
    }

    async fn put_part(
        handler: &rustglacier_http::GlacierHandler<rustglacier_blobstore::InMemoryBlobStore>,
        upload_id: &str,
        start: u64,
        data: Vec<u8>,
    ) -> http::Response<Bytes> {
        let end = start + data.len() as u64 - 1;
        send(
            handler,
            Method::PUT,
            &format!("/-/vaults/v/multipart-uploads/{upload_id}"),
            &[
                ("x-amz-content-sha256", "contenthash"),
                ("x-amz-sha256-tree-hash", "parthash"),
                ("Content-Range", &format!("bytes {start}-{end}/*")),
            ],
            Bytes::from(data),
        )
        .await
    }

    #[tokio::test]
    async fn test_should_assemble_archive_from_parts() {
        let handler = glacier();
        let upload_id = initiate(&handler, "v").await;

        let resp = put_part(&handler, &upload_id, 0, vec![0xAA; PART_SIZE as usize]).await;
        assert_eq!(resp.status(), http::StatusCode::NO_CONTENT);
        assert_eq!(header(&resp, "x-amz-sha256-tree-hash"), "parthash");

        let resp = put_part(&handler, &upload_id, PART_SIZE, vec![0xBB; 424]).await;
        assert_eq!(resp.status(), http::StatusCode::NO_CONTENT);

        let resp = send(
            &handler,
            Method::POST,
            &format!("/-/vaults/v/multipart-uploads/{upload_id}"),
            &[
                ("x-amz-archive-size", "1049000"),
                ("x-amz-sha256-tree-hash", "archivehash"),
            ],
            Bytes::new(),
        )
        .await;
        assert_eq!(resp.status(), http::StatusCode::CREATED);
        let archive_id = header(&resp, "x-amz-archive-id").to_owned();
        assert_eq!(
            header(&resp, "location"),
            format!("/-/vaults/v/archives/{archive_id}"),
        );

        // Retrieve the assembled archive and check its size and seams.
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
        let job_id = header(&resp, "x-amz-job-id").to_owned();

        let resp = send_empty(
            &handler,
            Method::GET,
            &format!("/-/vaults/v/jobs/{job_id}/output"),
        )
        .await;
        let body = resp.body();
        assert_eq!(body.len(), 1_049_000);
        assert_eq!(body[0], 0xAA);
        assert_eq!(body[PART_SIZE as usize - 1], 0xAA);
        assert_eq!(body[PART_SIZE as usize], 0xBB);
        assert_eq!(body[body.len() - 1], 0xBB);

        // The upload id no longer resolves.
        let resp = send_empty(
            &handler,
            Method::GET,
            &format!("/-/vaults/v/multipart-uploads/{upload_id}"),
        )
        .await;
        assert_eq!(resp.status(), http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_should_list_parts_and_uploads() {
        let handler = glacier();
        let upload_id = initiate(&handler, "v").await;

        put_part(&handler, &upload_id, 0, vec![1; PART_SIZE as usize]).await;
        put_part(&handler, &upload_id, PART_SIZE, vec![2; 100]).await;

        let resp = send_empty(
            &handler,
            Method::GET,
            &format!("/-/vaults/v/multipart-uploads/{upload_id}"),
        )
        .await;
        assert_eq!(resp.status(), http::StatusCode::OK);
        let body = json_body(&resp);
        assert_eq!(body["MultipartUploadId"], upload_id);
        assert_eq!(body["PartSizeInBytes"], PART_SIZE);
        assert_eq!(body["ArchiveDescription"], "big backup");
        assert_eq!(body["Marker"], serde_json::Value::Null);
        let parts = body["Parts"].as_array().expect("parts");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["RangeInBytes"], "0-1048575");
        assert_eq!(parts[1]["RangeInBytes"], "1048576-1048675");
        assert_eq!(parts[0]["SHA256TreeHash"], "parthash");

        let resp = send_empty(&handler, Method::GET, "/-/vaults/v/multipart-uploads").await;
        assert_eq!(resp.status(), http::StatusCode::OK);
        let body = json_body(&resp);
        let uploads = body["UploadsList"].as_array().expect("uploads");
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0]["MultipartUploadId"], upload_id);
        assert_eq!(uploads[0]["VaultARN"], "arn:aws:glacier::-:vaults/v");
    }

    #[tokio::test]
    async fn test_should_reject_bad_content_range() {
        let handler = glacier();
        let upload_id = initiate(&handler, "v").await;

        let resp = send(
            &handler,
            Method::PUT,
            &format!("/-/vaults/v/multipart-uploads/{upload_id}"),
            &[
                ("x-amz-content-sha256", "contenthash"),
                ("x-amz-sha256-tree-hash", "parthash"),
                ("Content-Range", "bytes 0-99/100"),
            ],
            Bytes::from(vec![0; 100]),
        )
        .await;
        assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);
        let body = json_body(&resp);
        assert_eq!(body["message"], "Invalid Content-Range header: bytes 0-99/100");
    }

    #[tokio::test]
    async fn test_should_reject_completion_with_wrong_declared_size() {
        let handler = glacier();
        let upload_id = initiate(&handler, "v").await;
        put_part(&handler, &upload_id, 0, vec![0; 512]).await;

        let resp = send(
            &handler,
            Method::POST,
            &format!("/-/vaults/v/multipart-uploads/{upload_id}"),
            &[
                ("x-amz-archive-size", "1024"),
                ("x-amz-sha256-tree-hash", "archivehash"),
            ],
            Bytes::new(),
        )
        .await;
        assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);

        // A failed completion leaves the upload open.
        let resp = send_empty(
            &handler,
            Method::GET,
            &format!("/-/vaults/v/multipart-uploads/{upload_id}"),
        )
        .await;
        assert_eq!(resp.status(), http::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_should_abort_upload() {
        let handler = glacier();
        let upload_id = initiate(&handler, "v").await;
        put_part(&handler, &upload_id, 0, vec![0; 16]).await;

        let resp = send_empty(
            &handler,
            Method::DELETE,
            &format!("/-/vaults/v/multipart-uploads/{upload_id}"),
        )
        .await;
        assert_eq!(resp.status(), http::StatusCode::NO_CONTENT);

        let resp = send_empty(&handler, Method::GET, "/-/vaults/v/multipart-uploads").await;
        assert_eq!(
            json_body(&resp)["UploadsList"].as_array().map(Vec::len),
            Some(0),
        );

        let resp = send_empty(
            &handler,
            Method::DELETE,
            &format!("/-/vaults/v/multipart-uploads/{upload_id}"),
        )
        .await;
        assert_eq!(resp.status(), http::StatusCode::NOT_FOUND);
    }
}
