use std::sync::Arc;

use axum::extract::State;
use culprit::ResultExt;

use crate::{
    api::{
        error::ApiErr,
        extractors::{RecordId, ValidRecord},
    },
    storage::Storage,
};

use super::RecordApiState;

#[tracing::instrument(name = "records/update", skip(state, record))]
pub async fn handler<S: Storage>(
    State(state): State<Arc<RecordApiState<S>>>,
    RecordId(id): RecordId,
    ValidRecord { id: _, record }: ValidRecord,
) -> Result<&'static str, ApiErr> {
    state.cache.update(id, record).await.or_into_ctx()?;
    Ok("Record updated\n")
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use tracing_test::traced_test;

    use crate::api::records::testutil::test_server;

    #[tokio::test]
    #[traced_test]
    async fn test_update_replaces_record() {
        let server = test_server();
        server
            .post("/records")
            .json(&json!({"id": 1, "Name": "Alice", "Age": 30}))
            .await;

        let resp = server
            .put("/records/1")
            .json(&json!({"id": 1, "Name": "Bob"}))
            .await;
        assert_eq!(resp.status_code(), StatusCode::OK);
        assert_eq!(resp.text(), "Record updated\n");

        // full replacement: Age is gone
        let resp = server.get("/records/1").await;
        assert_eq!(
            resp.json::<serde_json::Value>(),
            json!({"id": 1, "Name": "Bob"})
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn test_update_missing_record() {
        let server = test_server();
        let resp = server
            .put("/records/42")
            .json(&json!({"id": 42}))
            .expect_failure()
            .await;
        assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_update_cannot_change_id() {
        let server = test_server();
        server
            .post("/records")
            .json(&json!({"id": 1, "Name": "Alice"}))
            .await;

        let resp = server
            .put("/records/1")
            .json(&json!({"id": 2, "Name": "Bob"}))
            .expect_failure()
            .await;
        assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);

        // the stored record is unchanged
        let resp = server.get("/records/1").await;
        assert_eq!(
            resp.json::<serde_json::Value>(),
            json!({"id": 1, "Name": "Alice"})
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn test_update_rejects_invalid_body() {
        let server = test_server();
        server.post("/records").json(&json!({"id": 1})).await;

        let resp = server
            .put("/records/1")
            .json(&json!({"Name": "no id"}))
            .expect_failure()
            .await;
        assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    }
}
