use crate::error::{AppError, Result};
use crate::search::{RecentQueries, SavedSearch};
use crate::state::SearchStateStore;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use validator::Validate;

/// In-memory search state store (session-scoped and for testing)
#[derive(Clone)]
pub struct InMemoryStore {
    searches: Arc<DashMap<String, SavedSearch>>,
    recent: Arc<Mutex<Vec<String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            searches: Arc::new(DashMap::new()),
            recent: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchStateStore for InMemoryStore {
    async fn save_search(&self, search: &SavedSearch) -> Result<()> {
        search.validate()?;
        self.searches.insert(search.name.clone(), search.clone());

        tracing::debug!(name = %search.name, "Saved search stored");
        Ok(())
    }

    async fn load_search(&self, name: &str) -> Result<Option<SavedSearch>> {
        Ok(self.searches.get(name).map(|entry| entry.clone()))
    }

    async fn list_searches(&self) -> Result<Vec<SavedSearch>> {
        let mut searches: Vec<SavedSearch> =
            self.searches.iter().map(|entry| entry.value().clone()).collect();
        searches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(searches)
    }

    async fn delete_search(&self, name: &str) -> Result<()> {
        if self.searches.remove(name).is_some() {
            tracing::debug!(name = %name, "Saved search deleted");
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Saved search '{}' not found", name)))
        }
    }

    async fn push_recent(&self, query: &str, cap: usize) -> Result<Vec<String>> {
        let mut recent = self.recent.lock();
        let mut queue = RecentQueries::from_entries(recent.drain(..), cap);
        queue.push(query);
        *recent = queue.to_vec();
        Ok(recent.clone())
    }

    async fn recent_queries(&self) -> Result<Vec<String>> {
        Ok(self.recent.lock().clone())
    }

    async fn clear_recent(&self) -> Result<()> {
        self.recent.lock().clear();
        Ok(())
    }
}
