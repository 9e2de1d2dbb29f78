use std::sync::Arc;

use axum::{Json, extract::State};
use culprit::ResultExt;

use crate::{
    api::{error::ApiErr, extractors::RecordId},
    record::Record,
    storage::Storage,
};

use super::RecordApiState;

#[tracing::instrument(name = "records/read", skip(state))]
pub async fn handler<S: Storage>(
    State(state): State<Arc<RecordApiState<S>>>,
    RecordId(id): RecordId,
) -> Result<Json<Record>, ApiErr> {
    let record = state.cache.read(id).await.or_into_ctx()?;
    Ok(Json(record))
}
