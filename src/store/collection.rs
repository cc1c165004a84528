//! Whole-document JSON collection
//!
//! Each collection is a flat JSON array persisted as a single file and cached
//! in memory behind an async `RwLock`. Every mutation runs inside one write
//! lock and rewrites the full document, so read-modify-write sequences on the
//! same collection cannot interleave.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::logger;

/// Collection persistence error
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Serialize(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "store I/O error: {e}"),
            Self::Serialize(e) => write!(f, "store serialization error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e)
    }
}

/// A file-backed collection of records
///
/// Constructed with [`Collection::open`] for persistent storage or
/// [`Collection::in_memory`] for tests, which skip the disk entirely.
pub struct Collection<T> {
    /// Backing file; `None` means in-memory only
    path: Option<PathBuf>,
    items: RwLock<Vec<T>>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Open a collection backed by a JSON array file
    ///
    /// A missing file yields an empty collection. A corrupt file is logged
    /// and also yields an empty collection; the file itself is left in place
    /// until the next successful mutation overwrites it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = Self::load_items(&path);
        Self {
            path: Some(path),
            items: RwLock::new(items),
        }
    }

    /// Create a collection with no backing file
    pub fn in_memory() -> Self {
        Self {
            path: None,
            items: RwLock::new(Vec::new()),
        }
    }

    fn load_items(path: &Path) -> Vec<T> {
        if !path.exists() {
            return Vec::new();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(items) => items,
                Err(e) => {
                    logger::log_error(&format!(
                        "Failed to parse collection file {}: {e}",
                        path.display()
                    ));
                    Vec::new()
                }
            },
            Err(e) => {
                logger::log_error(&format!(
                    "Failed to read collection file {}: {e}",
                    path.display()
                ));
                Vec::new()
            }
        }
    }

    /// Snapshot of all records
    pub async fn all(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    /// Number of records
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Append one record and rewrite the document
    pub async fn append(&self, item: T) -> Result<(), StoreError> {
        self.update(|items| items.push(item)).await
    }

    /// Mutate the collection under the write lock and rewrite the document
    ///
    /// The closure's return value is passed through, so callers can report
    /// what the mutation actually did (e.g. whether a delete matched).
    pub async fn update<F, R>(&self, mutate: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Vec<T>) -> R,
    {
        let mut items = self.items.write().await;
        let result = mutate(&mut items);
        self.flush(&items)?;
        Ok(result)
    }

    /// Rewrite the full document; caller must hold the write lock
    fn flush(&self, items: &[T]) -> Result<(), StoreError> {
        let Some(ref path) = self.path else {
            return Ok(());
        };

        let content = serde_json::to_string_pretty(items)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Entry {
        id: i64,
        label: String,
    }

    fn entry(id: i64, label: &str) -> Entry {
        Entry {
            id,
            label: label.to_string(),
        }
    }

    #[tokio::test]
    async fn test_append_and_read_in_memory() {
        let collection = Collection::in_memory();
        collection.append(entry(1, "a")).await.unwrap();
        collection.append(entry(2, "b")).await.unwrap();

        let items = collection.all().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], entry(1, "a"));
        assert_eq!(items[1], entry(2, "b"));
    }

    #[tokio::test]
    async fn test_update_passes_result_through() {
        let collection = Collection::in_memory();
        collection.append(entry(1, "a")).await.unwrap();

        let removed = collection
            .update(|items| {
                let before = items.len();
                items.retain(|e| e.id != 1);
                before - items.len()
            })
            .await
            .unwrap();

        assert_eq!(removed, 1);
        assert!(collection.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_by_index_shifts_rest() {
        let collection = Collection::in_memory();
        for (id, label) in [(1, "a"), (2, "b"), (3, "c")] {
            collection.append(entry(id, label)).await.unwrap();
        }

        let removed = collection
            .update(|items| {
                if 1 < items.len() {
                    items.remove(1);
                    true
                } else {
                    false
                }
            })
            .await
            .unwrap();

        assert!(removed);
        assert_eq!(collection.all().await, vec![entry(1, "a"), entry(3, "c")]);
    }

    #[tokio::test]
    async fn test_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.json");

        {
            let collection = Collection::open(&path);
            collection.append(entry(7, "persisted")).await.unwrap();
        }

        let reloaded: Collection<Entry> = Collection::open(&path);
        let items = reloaded.all().await;
        assert_eq!(items, vec![entry(7, "persisted")]);
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let collection: Collection<Entry> = Collection::open(dir.path().join("absent.json"));
        assert!(collection.is_empty().await);
    }

    #[tokio::test]
    async fn test_corrupt_file_yields_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        let collection: Collection<Entry> = Collection::open(&path);
        assert!(collection.is_empty().await);
        // The broken file survives until the next successful mutation.
        assert_eq!(fs::read_to_string(&path).unwrap(), "{not json");

        collection.append(entry(1, "fresh")).await.unwrap();
        let reloaded: Collection<Entry> = Collection::open(&path);
        assert_eq!(reloaded.len().await, 1);
    }

    #[tokio::test]
    async fn test_document_is_a_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.json");

        let collection = Collection::open(&path);
        collection.append(entry(1, "a")).await.unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert!(parsed.is_array());
    }
}
