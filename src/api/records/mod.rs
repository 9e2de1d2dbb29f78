use std::sync::Arc;

use axum::routing::{get, post};

use crate::{cache::RecordCache, storage::Storage};

use super::routes::Routes;

mod create;
mod delete;
mod health;
mod read;
mod update;

pub struct RecordApiState<S> {
    cache: RecordCache<S>,
}

impl<S: Storage> RecordApiState<S> {
    pub fn new(cache: RecordCache<S>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &RecordCache<S> {
        &self.cache
    }
}

pub fn record_routes<S: Storage + 'static>() -> Routes<Arc<RecordApiState<S>>> {
    vec![
        ("/records", post(create::handler)),
        (
            "/records/{id}",
            get(read::handler)
                .put(update::handler)
                .delete(delete::handler),
        ),
        ("/health", get(health::handler)),
    ]
}
