use std::path::{Path, PathBuf};

use culprit::Culprit;
use tokio::{
    fs::{self, File},
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter},
};

use crate::record::Record;

use super::{RecordSet, Storage, StorageErr};

/// Flat-file backend: UTF-8 text, one self-contained JSON object per line,
/// no enclosing array. The line-delimited format allows a streaming load
/// with per-line fault isolation: one corrupt line doesn't lose the rest of
/// the data.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for FileStorage {
    async fn load(&self) -> Result<RecordSet, Culprit<StorageErr>> {
        let file = File::open(&self.path).await?;
        let mut lines = BufReader::new(file).lines();

        let mut records = RecordSet::default();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let mut record: Record = match serde_json::from_str(&line) {
                Ok(record) => record,
                Err(err) => {
                    tracing::warn!(%err, path = %self.path.display(), "skipping unparsable line");
                    continue;
                }
            };
            let id = match record.validate() {
                Ok(id) => id,
                Err(err) => {
                    tracing::warn!(%err, path = %self.path.display(), "skipping invalid record");
                    continue;
                }
            };
            records.insert(id, record);
        }
        Ok(records)
    }

    async fn save(&self, records: &RecordSet) -> Result<(), Culprit<StorageErr>> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let file = File::create(&self.path).await?;
        let mut writer = BufWriter::new(file);
        for record in records.values() {
            let line = match serde_json::to_vec(record) {
                Ok(line) => line,
                Err(err) => {
                    tracing::warn!(%err, "skipping unserializable record");
                    continue;
                }
            };
            writer.write_all(&line).await?;
            writer.write_all(b"\n").await?;
        }
        writer.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use assert_matches::assert_matches;
    use serde_json::json;
    use tracing_test::traced_test;

    use super::*;

    fn record(value: serde_json::Value) -> Record {
        let mut record: Record = serde_json::from_value(value).unwrap();
        record.validate().unwrap();
        record
    }

    #[tokio::test]
    #[traced_test]
    async fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("records.jsonl"));

        let mut records = RecordSet::default();
        records.insert(1, record(json!({"id": 1, "Name": "Alice", "Age": 30})));
        records.insert(2, record(json!({"id": 2, "tags": ["x", "y"]})));
        records.insert(7, record(json!({"id": 7, "nested": {"ok": true}})));

        storage.save(&records).await.unwrap();
        let loaded = storage.load().await.unwrap();
        assert_eq!(loaded, records);

        // a second save may reorder lines but must round-trip identically
        storage.save(&loaded).await.unwrap();
        assert_eq!(storage.load().await.unwrap(), records);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_load_skips_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.jsonl");
        fs::write(
            &path,
            concat!(
                "{\"id\":1,\"Name\":\"Alice\"}\n",
                "{not json at all\n",
                "{\"Name\":\"no id\"}\n",
                "{\"id\":-4}\n",
                "{\"id\":\"seven\"}\n",
                "\n",
                "{\"id\":2,\"Name\":\"Bob\"}\n",
            ),
        )
        .await
        .unwrap();

        let storage = FileStorage::new(path);
        let records = storage.load().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[&1].get("Name"), Some(&json!("Alice")));
        assert_eq!(records[&2].get("Name"), Some(&json!("Bob")));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("missing.jsonl"));
        let err = storage.load().await.unwrap_err();
        assert_matches!(err.ctx(), StorageErr::Io(ErrorKind::NotFound));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_save_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("data").join("records.jsonl"));

        let mut records = RecordSet::default();
        records.insert(1, record(json!({"id": 1})));
        storage.save(&records).await.unwrap();
        assert_eq!(storage.load().await.unwrap(), records);
    }
}
