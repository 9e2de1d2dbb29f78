use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use culprit::ResultExt;

use crate::{
    api::{error::ApiErr, extractors::RecordId},
    storage::Storage,
};

use super::RecordApiState;

#[tracing::instrument(name = "records/delete", skip(state))]
pub async fn handler<S: Storage>(
    State(state): State<Arc<RecordApiState<S>>>,
    RecordId(id): RecordId,
) -> Result<StatusCode, ApiErr> {
    state.cache.delete(id).await.or_into_ctx()?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use tracing_test::traced_test;

    use crate::api::records::testutil::test_server;

    #[tokio::test]
    #[traced_test]
    async fn test_delete_sanity() {
        let server = test_server();
        server.post("/records").json(&json!({"id": 1})).await;

        let resp = server.delete("/records/1").await;
        assert_eq!(resp.status_code(), StatusCode::NO_CONTENT);
        assert_eq!(resp.text(), "");

        let resp = server.get("/records/1").expect_failure().await;
        assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_delete_missing_record() {
        let server = test_server();
        let resp = server.delete("/records/42").expect_failure().await;
        assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);

        let resp = server.delete("/records/xyz").expect_failure().await;
        assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    }
}
