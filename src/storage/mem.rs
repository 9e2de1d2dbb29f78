use std::sync::Arc;

use culprit::Culprit;
use tokio::sync::Mutex;

use super::{RecordSet, Storage, StorageErr};

/// In-memory backend. Clones share the same underlying record set, so tests
/// can keep a handle and observe what the cache flushed.
#[derive(Default, Clone)]
pub struct MemStorage {
    records: Arc<Mutex<RecordSet>>,
}

impl MemStorage {
    pub async fn records(&self) -> RecordSet {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }
}

impl Storage for MemStorage {
    async fn load(&self) -> Result<RecordSet, Culprit<StorageErr>> {
        Ok(self.records.lock().await.clone())
    }

    async fn save(&self, records: &RecordSet) -> Result<(), Culprit<StorageErr>> {
        *self.records.lock().await = records.clone();
        Ok(())
    }
}
