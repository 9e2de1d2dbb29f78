use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use culprit::Culprit;
use thiserror::Error;

use crate::{cache::CacheErr, record::RecordValidateErr, storage::StorageErr};

pub struct ApiErr(Culprit<ApiErrCtx>);

impl From<Culprit<ApiErrCtx>> for ApiErr {
    #[inline]
    fn from(value: Culprit<ApiErrCtx>) -> Self {
        Self(value)
    }
}

impl<T: Into<ApiErrCtx>> From<T> for ApiErr {
    #[inline]
    #[track_caller]
    fn from(value: T) -> Self {
        Self(Culprit::new(value.into()))
    }
}

#[derive(Error, Debug)]
pub enum ApiErrCtx {
    #[error("invalid request body")]
    InvalidRequestBody,

    #[error("invalid record id in path")]
    InvalidPathId,

    #[error(transparent)]
    InvalidRecord(#[from] RecordValidateErr),

    #[error("record already exists")]
    DuplicateRecord,

    #[error("record not found")]
    RecordNotFound,

    #[error("cannot change record id")]
    IdMismatch,

    #[error("storage error")]
    StorageErr(StorageErr),
}

impl From<CacheErr> for ApiErrCtx {
    fn from(value: CacheErr) -> Self {
        match value {
            CacheErr::RecordExists(_) => Self::DuplicateRecord,
            CacheErr::RecordNotFound(_) => Self::RecordNotFound,
            CacheErr::IdMismatch { .. } => Self::IdMismatch,
            CacheErr::StorageErr(err) => Self::StorageErr(err),
        }
    }
}

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        use ApiErrCtx::*;

        let status = match self.0.ctx() {
            InvalidRequestBody | InvalidPathId | InvalidRecord(_) => StatusCode::BAD_REQUEST,
            DuplicateRecord => StatusCode::CONFLICT,
            RecordNotFound | IdMismatch => StatusCode::NOT_FOUND,
            StorageErr(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = self.0.ctx().to_string();

        if status.is_client_error() {
            tracing::debug!(culprit = ?self.0, "client error");
        } else {
            tracing::error!(culprit = ?self.0, "api error");
        }

        (status, message).into_response()
    }
}
