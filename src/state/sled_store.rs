use crate::error::{AppError, Result};
use crate::search::{RecentQueries, SavedSearch};
use crate::state::SearchStateStore;
use async_trait::async_trait;
use sled::Db;
use std::path::Path;
use std::sync::Arc;
use validator::Validate;

const RECENT_KEY: &[u8] = b"recent";

/// Persistent search state store using the Sled embedded database.
///
/// Values are stored as JSON in the same shape as [`SavedSearch`] and a
/// plain `Vec<String>` for the history, without a version tag.
#[derive(Clone)]
pub struct SledStore {
    db: Arc<Db>,
    searches_tree: sled::Tree,
    recent_tree: sled::Tree,
}

impl SledStore {
    /// Create a new Sled store at the specified path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let db = sled::open(path).map_err(|e| {
            AppError::Storage(format!("Failed to open Sled database: {}", e))
        })?;

        let searches_tree = db.open_tree("saved_searches").map_err(|e| {
            AppError::Storage(format!("Failed to open saved_searches tree: {}", e))
        })?;

        let recent_tree = db.open_tree("recent_queries").map_err(|e| {
            AppError::Storage(format!("Failed to open recent_queries tree: {}", e))
        })?;

        tracing::info!("Initialized Sled store at {:?}", path);

        Ok(Self {
            db: Arc::new(db),
            searches_tree,
            recent_tree,
        })
    }

    fn serialize_search(search: &SavedSearch) -> Result<Vec<u8>> {
        serde_json::to_vec(search).map_err(|e| {
            AppError::Serialization(format!("Failed to serialize saved search: {}", e))
        })
    }

    fn deserialize_search(bytes: &[u8]) -> Result<SavedSearch> {
        serde_json::from_slice(bytes).map_err(|e| {
            AppError::Serialization(format!("Failed to deserialize saved search: {}", e))
        })
    }

    fn read_recent(&self) -> Result<Vec<String>> {
        match self.recent_tree.get(RECENT_KEY)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    /// Flush pending writes to disk
    pub async fn flush(&self) -> Result<()> {
        self.db.flush_async().await.map_err(|e| {
            AppError::Storage(format!("Failed to flush database: {}", e))
        })?;
        Ok(())
    }

    /// Get database size in bytes
    pub fn size_on_disk(&self) -> Result<u64> {
        self.db.size_on_disk().map_err(|e| {
            AppError::Storage(format!("Failed to get database size: {}", e))
        })
    }
}

#[async_trait]
impl SearchStateStore for SledStore {
    async fn save_search(&self, search: &SavedSearch) -> Result<()> {
        search.validate()?;
        let value = Self::serialize_search(search)?;

        self.searches_tree
            .insert(search.name.as_bytes(), value)
            .map_err(|e| AppError::Storage(format!("Failed to save search: {}", e)))?;

        self.searches_tree.flush().map_err(|e| {
            AppError::Storage(format!("Failed to flush saved_searches tree: {}", e))
        })?;

        tracing::debug!(name = %search.name, "Saved search stored in Sled");
        Ok(())
    }

    async fn load_search(&self, name: &str) -> Result<Option<SavedSearch>> {
        match self.searches_tree.get(name.as_bytes()) {
            Ok(Some(bytes)) => Ok(Some(Self::deserialize_search(&bytes)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to load saved search: {}",
                e
            ))),
        }
    }

    async fn list_searches(&self) -> Result<Vec<SavedSearch>> {
        // Sled iterates keys in byte order, which is name order
        self.searches_tree
            .iter()
            .map(|entry| {
                let (_, value) = entry.map_err(|e| {
                    AppError::Storage(format!("Failed to iterate saved searches: {}", e))
                })?;
                Self::deserialize_search(&value)
            })
            .collect()
    }

    async fn delete_search(&self, name: &str) -> Result<()> {
        let removed = self
            .searches_tree
            .remove(name.as_bytes())
            .map_err(|e| AppError::Storage(format!("Failed to delete saved search: {}", e)))?;

        if removed.is_none() {
            return Err(AppError::NotFound(format!(
                "Saved search '{}' not found",
                name
            )));
        }

        self.searches_tree.flush()?;
        tracing::debug!(name = %name, "Saved search deleted from Sled");
        Ok(())
    }

    async fn push_recent(&self, query: &str, cap: usize) -> Result<Vec<String>> {
        // Compare-and-swap loop; the closure may run more than once
        let updated = self.recent_tree.update_and_fetch(RECENT_KEY, |current| {
            let entries: Vec<String> = current
                .and_then(|bytes| serde_json::from_slice(bytes).ok())
                .unwrap_or_default();
            let mut queue = RecentQueries::from_entries(entries, cap);
            queue.push(query);
            serde_json::to_vec(&queue.to_vec()).ok()
        })?;
        self.recent_tree.flush()?;

        match updated {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    async fn recent_queries(&self) -> Result<Vec<String>> {
        self.read_recent()
    }

    async fn clear_recent(&self) -> Result<()> {
        self.recent_tree.remove(RECENT_KEY)?;
        self.recent_tree.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::QueryState;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sled_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = SledStore::new(temp_dir.path()).unwrap();

        let state = QueryState::new("seed").with_sectors(vec!["AI"]);
        store
            .save_search(&SavedSearch::new("ai-seed", state.clone()))
            .await
            .unwrap();

        let loaded = store.load_search("ai-seed").await.unwrap().unwrap();
        assert_eq!(loaded.state, state);
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let temp_dir = TempDir::new().unwrap();
        let store = SledStore::new(temp_dir.path()).unwrap();

        for name in ["zeta", "alpha", "mid"] {
            store
                .save_search(&SavedSearch::new(name, QueryState::default()))
                .await
                .unwrap();
        }

        let names: Vec<String> = store
            .list_searches()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }
}
