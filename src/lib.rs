pub mod api {
    pub mod error;
    pub mod extractors;
    pub mod records;
    pub mod routes;
}

pub mod cache;
pub mod record;
pub mod storage;
