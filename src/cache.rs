use culprit::{Culprit, ResultExt};
use tokio::sync::RwLock;

use crate::{
    record::Record,
    storage::{RecordSet, Storage, StorageErr},
};

/// Number of writes accepted between eager flushes to the backing store.
pub const DEFAULT_FLUSH_THRESHOLD: u64 = 49;

#[derive(Debug, thiserror::Error)]
pub enum CacheErr {
    #[error("record with id {0} already exists")]
    RecordExists(u64),

    #[error("record with id {0} not found")]
    RecordNotFound(u64),

    #[error("cannot change id of record {key}")]
    IdMismatch { key: u64 },

    #[error("storage error")]
    StorageErr(#[from] StorageErr),
}

struct CacheState {
    records: RecordSet,
    writes: u64,
}

/// The authoritative in-memory store of records for the process lifetime.
///
/// A single reader/writer lock guards the record set and the write counter;
/// every mutation takes the exclusive mode, so operations on the same id are
/// linearized and a flush snapshot never races a concurrent write. Durability
/// depends entirely on the last successful flush.
pub struct RecordCache<S> {
    state: RwLock<CacheState>,
    store: S,
    flush_threshold: u64,
}

impl<S: Storage> RecordCache<S> {
    /// Creates an empty cache backed by `store`.
    pub fn new(store: S, flush_threshold: u64) -> Self {
        Self {
            state: RwLock::new(CacheState { records: RecordSet::default(), writes: 0 }),
            store,
            flush_threshold,
        }
    }

    /// Creates a cache bootstrapped from the persisted record set.
    ///
    /// A load failure is returned to the caller; startup decides whether to
    /// continue with an empty cache or abort.
    pub async fn open(store: S, flush_threshold: u64) -> Result<Self, Culprit<CacheErr>> {
        let records = store.load().await.or_into_ctx()?;
        Ok(Self {
            state: RwLock::new(CacheState { records, writes: 0 }),
            store,
            flush_threshold,
        })
    }

    /// Inserts a new record at `id`, failing if the id is already present.
    ///
    /// If this write would bring the write counter to the flush threshold,
    /// the current record set is flushed first and the counter resets; the
    /// triggering record is then inserted and retained in memory, leaving
    /// persisted state one record behind until the next flush. If the flush
    /// fails, the create fails and neither the record set nor the counter is
    /// mutated.
    pub async fn create(&self, id: u64, record: Record) -> Result<(), Culprit<CacheErr>> {
        let mut state = self.state.write().await;

        if state.records.contains_key(&id) {
            return Err(Culprit::new(CacheErr::RecordExists(id)));
        }

        let writes = state.writes + 1;
        if writes >= self.flush_threshold {
            tracing::info!(threshold = self.flush_threshold, "flush threshold reached");
            self.store.save(&state.records).await.or_into_ctx()?;
            state.writes = 0;
        } else {
            state.writes = writes;
        }

        state.records.insert(id, record);
        Ok(())
    }

    pub async fn read(&self, id: u64) -> Result<Record, Culprit<CacheErr>> {
        let state = self.state.read().await;
        state
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| Culprit::new(CacheErr::RecordNotFound(id)))
    }

    /// Fully replaces the record stored at `id`.
    ///
    /// The replacement's own canonical id must equal `id`; a record whose id
    /// differs (or was never validated) is rejected without mutating.
    pub async fn update(&self, id: u64, record: Record) -> Result<(), Culprit<CacheErr>> {
        let mut state = self.state.write().await;

        if !state.records.contains_key(&id) {
            return Err(Culprit::new(CacheErr::RecordNotFound(id)));
        }

        if record.id() != Some(id) {
            return Err(Culprit::new_with_note(
                CacheErr::IdMismatch { key: id },
                format!("record id {:?}", record.id()),
            ));
        }

        state.records.insert(id, record);
        Ok(())
    }

    /// Removes the record at `id`. Deletes do not count towards the flush
    /// threshold.
    pub async fn delete(&self, id: u64) -> Result<(), Culprit<CacheErr>> {
        let mut state = self.state.write().await;
        state
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Culprit::new(CacheErr::RecordNotFound(id)))
    }

    /// Writes a full snapshot of every cached record to the backing store,
    /// independent of the write counter. Takes the exclusive lock so two
    /// flushes can never write the backing store concurrently.
    pub async fn flush(&self) -> Result<(), Culprit<CacheErr>> {
        let state = self.state.write().await;
        self.store.save(&state.records).await.or_into_ctx()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }
}
