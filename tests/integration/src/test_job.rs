//! Job submission, listing, describe, and output integration tests.

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::Method;

    use crate::{glacier, header, json_body, send, send_empty};

    async fn upload_archive(
        handler: &rustglacier_http::GlacierHandler<rustglacier_blobstore::InMemoryBlobStore>,
        vault: &str,
        payload: &'static str,
    ) -> String {
        let resp = send(
            handler,
            Method::POST,
            &format!("/-/vaults/{vault}/archives"),
            &[
                ("x-amz-content-sha256", "contenthash"),
                ("x-amz-sha256-tree-hash", "treehash"),
            ],
            Bytes::from(payload),
        )
        .await;
        assert_eq!(resp.status(), http::StatusCode::CREATED);
        header(&resp, "x-amz-archive-id").to_owned()
    }

    #[tokio::test]
    async fn test_should_submit_and_describe_archive_retrieval_job() {
        let handler = glacier();
        send_empty(&handler, Method::PUT, "/-/vaults/v").await;
        let archive_id = upload_archive(&handler, "v", "0123456789").await;

        let submit = serde_json::json!({
            "Type": "archive-retrieval",
            "ArchiveId": archive_id,
            "Description": "restore",
            "SNSTopic": "arn:aws:sns:topic",
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
        assert_eq!(header(&resp, "location"), format!("/-/vaults/v/jobs/{job_id}"));

        let resp = send_empty(&handler, Method::GET, &format!("/-/vaults/v/jobs/{job_id}")).await;
        assert_eq!(resp.status(), http::StatusCode::OK);
        let body = json_body(&resp);
        assert_eq!(body["Action"], "ArchiveRetrieval");
        assert_eq!(body["ArchiveId"], archive_id);
        assert_eq!(body["ArchiveSizeInBytes"], 10);
        assert_eq!(body["RetrievalByteRange"], "0-9");
        assert_eq!(body["Completed"], true);
        assert_eq!(body["StatusCode"], "Succeeded");
        assert_eq!(body["JobDescription"], "restore");
        assert_eq!(body["SNSTopic"], "arn:aws:sns:topic");
        assert_eq!(body["CompletionDate"], body["CreationDate"]);
        assert_eq!(body["InventorySizeInBytes"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_should_produce_live_inventory_output() {
        let handler = glacier();
        send_empty(&handler, Method::PUT, "/-/vaults/v").await;
        let a1 = upload_archive(&handler, "v", "first").await;

        let submit = serde_json::json!({"Type": "inventory-retrieval"});
        let resp = send(
            &handler,
            Method::POST,
            "/-/vaults/v/jobs",
            &[],
            Bytes::from(submit.to_string()),
        )
        .await;
        let job_id = header(&resp, "x-amz-job-id").to_owned();

        // An archive uploaded after submission still shows up: the
        // inventory reflects the vault at read time.
        let a2 = upload_archive(&handler, "v", "second!").await;

        let resp = send_empty(
            &handler,
            Method::GET,
            &format!("/-/vaults/v/jobs/{job_id}/output"),
        )
        .await;
        assert_eq!(resp.status(), http::StatusCode::OK);
        let body = json_body(&resp);
        assert_eq!(body["VaultARN"], "arn:aws:glacier::-:vaults/v");
        let archives = body["ArchiveList"].as_array().expect("archive list");
        assert_eq!(archives.len(), 2);
        let ids: Vec<&str> = archives
            .iter()
            .filter_map(|a| a["ArchiveId"].as_str())
            .collect();
        assert!(ids.contains(&a1.as_str()));
        assert!(ids.contains(&a2.as_str()));

        let mut sizes: Vec<u64> = archives.iter().filter_map(|a| a["Size"].as_u64()).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![5, 7]);
    }

    #[tokio::test]
    async fn test_should_list_jobs_with_type_specific_fields() {
        let handler = glacier();
        send_empty(&handler, Method::PUT, "/-/vaults/v").await;
        let archive_id = upload_archive(&handler, "v", "data").await;

        let submit = serde_json::json!({
            "Type": "archive-retrieval",
            "ArchiveId": archive_id,
        });
        send(
            &handler,
            Method::POST,
            "/-/vaults/v/jobs",
            &[],
            Bytes::from(submit.to_string()),
        )
        .await;
        let submit = serde_json::json!({
            "Type": "inventory-retrieval",
            "InventoryRetrievalParameters": {"Limit": "10"},
        });
        send(
            &handler,
            Method::POST,
            "/-/vaults/v/jobs",
            &[],
            Bytes::from(submit.to_string()),
        )
        .await;

        let resp = send_empty(&handler, Method::GET, "/-/vaults/v/jobs").await;
        assert_eq!(resp.status(), http::StatusCode::OK);
        let body = json_body(&resp);
        assert_eq!(body["Marker"], serde_json::Value::Null);
        let jobs = body["JobList"].as_array().expect("job list");
        assert_eq!(jobs.len(), 2);

        for job in jobs {
            match job["Action"].as_str() {
                Some("ArchiveRetrieval") => {
                    assert_eq!(job["ArchiveId"], archive_id);
                    assert_eq!(job["ArchiveSizeInBytes"], 4);
                    assert_eq!(job["RetrievalByteRange"], "0-3");
                    assert!(job.get("InventorySizeInBytes").is_none());
                }
                Some("InventoryRetrieval") => {
                    assert_eq!(job["InventorySizeInBytes"], -1);
                    assert_eq!(job["InventoryRetrievalParameters"]["Format"], "JSON");
                    assert_eq!(job["InventoryRetrievalParameters"]["Limit"], "10");
                    assert!(job.get("ArchiveId").is_none());
                }
                other => panic!("unexpected job action: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_should_filter_jobs_that_cannot_match() {
        let handler = glacier();
        send_empty(&handler, Method::PUT, "/-/vaults/v").await;
        let submit = serde_json::json!({"Type": "inventory-retrieval"});
        send(
            &handler,
            Method::POST,
            "/-/vaults/v/jobs",
            &[],
            Bytes::from(submit.to_string()),
        )
        .await;

        let resp = send_empty(&handler, Method::GET, "/-/vaults/v/jobs?completed=false").await;
        assert_eq!(json_body(&resp)["JobList"].as_array().map(Vec::len), Some(0));

        let resp =
            send_empty(&handler, Method::GET, "/-/vaults/v/jobs?statuscode=InProgress").await;
        assert_eq!(json_body(&resp)["JobList"].as_array().map(Vec::len), Some(0));

        let resp = send_empty(&handler, Method::GET, "/-/vaults/v/jobs?statuscode=Succeeded").await;
        assert_eq!(json_body(&resp)["JobList"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_should_reject_invalid_job_query_parameters() {
        let handler = glacier();
        send_empty(&handler, Method::PUT, "/-/vaults/v").await;

        for query in ["completed=maybe", "statuscode=Done", "limit=0", "limit=1001"] {
            let resp =
                send_empty(&handler, Method::GET, &format!("/-/vaults/v/jobs?{query}")).await;
            assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST, "query {query}");
        }
    }

    #[tokio::test]
    async fn test_should_report_missing_job_as_not_found() {
        let handler = glacier();
        send_empty(&handler, Method::PUT, "/-/vaults/v").await;

        let resp = send_empty(&handler, Method::GET, "/-/vaults/v/jobs/nope").await;
        assert_eq!(resp.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(json_body(&resp)["message"], "The job was not found: nope");
    }
}
