use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use culprit::ResultExt;

use crate::{
    api::{error::ApiErr, extractors::ValidRecord},
    storage::Storage,
};

use super::RecordApiState;

#[tracing::instrument(name = "records/create", skip(state, record))]
pub async fn handler<S: Storage>(
    State(state): State<Arc<RecordApiState<S>>>,
    ValidRecord { id, record }: ValidRecord,
) -> Result<(StatusCode, &'static str), ApiErr> {
    state.cache.create(id, record).await.or_into_ctx()?;
    Ok((StatusCode::CREATED, "Record created\n"))
}
