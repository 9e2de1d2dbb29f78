use std::sync::Arc;

use axum::{extract::State, http::StatusCode};

use crate::storage::Storage;

use super::RecordApiState;

pub async fn handler<S: Storage>(
    State(_state): State<Arc<RecordApiState<S>>>,
) -> Result<&'static str, StatusCode> {
    Ok("OK\n")
}
