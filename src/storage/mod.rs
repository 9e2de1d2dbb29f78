use std::{future::Future, io};

use culprit::Culprit;
use hashbrown::HashMap;

use crate::record::Record;

pub mod file;
pub mod mem;

/// The full in-memory record set, keyed by canonical record id.
///
/// Iteration order is undefined, so two saves of the same logical content may
/// reorder lines in the backing store. That is an accepted property of the
/// format, not a bug.
pub type RecordSet = HashMap<u64, Record>;

#[derive(Debug, thiserror::Error)]
pub enum StorageErr {
    #[error("io error")]
    Io(io::ErrorKind),
}

impl From<io::Error> for StorageErr {
    fn from(err: io::Error) -> Self {
        Self::Io(err.kind())
    }
}

/// Narrow persistence capability consumed by the record cache.
///
/// Exactly two operations so the cache can be tested against an in-memory or
/// fault-injecting stand-in.
pub trait Storage: Send + Sync {
    /// Reads the backing store and returns every valid record found, keyed
    /// by its own canonical id. Malformed entries are skipped individually
    /// and logged; one bad entry never aborts the whole load.
    fn load(&self) -> impl Future<Output = Result<RecordSet, Culprit<StorageErr>>> + Send;

    /// Replaces the entire backing store contents with a snapshot of the
    /// given record set.
    fn save(
        &self,
        records: &RecordSet,
    ) -> impl Future<Output = Result<(), Culprit<StorageErr>>> + Send;
}
