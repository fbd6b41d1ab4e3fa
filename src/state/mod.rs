pub mod factory;
pub mod sled_store;
pub mod store;

pub use factory::{create_in_memory_store, create_store};
pub use sled_store::SledStore;
pub use store::*;

use crate::error::Result;
use crate::search::SavedSearch;
use async_trait::async_trait;

/// Persistence for saved searches and recent-query history
#[async_trait]
pub trait SearchStateStore: Send + Sync {
    /// Save (or replace) a named search
    async fn save_search(&self, search: &SavedSearch) -> Result<()>;

    /// Load a saved search by name
    async fn load_search(&self, name: &str) -> Result<Option<SavedSearch>>;

    /// All saved searches, sorted by name
    async fn list_searches(&self) -> Result<Vec<SavedSearch>>;

    /// Delete a saved search
    async fn delete_search(&self, name: &str) -> Result<()>;

    /// Record an executed query; returns the updated history
    async fn push_recent(&self, query: &str, cap: usize) -> Result<Vec<String>>;

    /// Recent queries, most recent first
    async fn recent_queries(&self) -> Result<Vec<String>>;

    /// Forget the query history
    async fn clear_recent(&self) -> Result<()>;
}
