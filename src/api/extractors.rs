use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use culprit::Culprit;

use crate::record::Record;

use super::error::{ApiErr, ApiErrCtx};

/// A JSON request body that decoded as a record and passed validation.
/// `id` is the record's canonical id.
pub struct ValidRecord {
    pub id: u64,
    pub record: Record,
}

impl<S: Send + Sync> FromRequest<S> for ValidRecord {
    type Rejection = ApiErr;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut record) = Json::<Record>::from_request(req, state)
            .await
            .map_err(|err| {
                Culprit::new_with_note(ApiErrCtx::InvalidRequestBody, err.to_string())
            })?;
        let id = record.validate()?;
        Ok(ValidRecord { id, record })
    }
}

/// The `{id}` path segment, which must parse as a non-negative base-10
/// integer before the cache is ever consulted.
pub struct RecordId(pub u64);

impl<S: Send + Sync> FromRequestParts<S> for RecordId {
    type Rejection = ApiErr;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|err| Culprit::new_with_note(ApiErrCtx::InvalidPathId, err.to_string()))?;
        let id = raw
            .parse()
            .map_err(|_| Culprit::new_with_note(ApiErrCtx::InvalidPathId, raw))?;
        Ok(RecordId(id))
    }
}
