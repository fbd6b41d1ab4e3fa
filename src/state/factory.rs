use crate::config::{StateBackend, StateConfig};
use crate::error::{AppError, Result};
use crate::state::{InMemoryStore, SearchStateStore, SledStore};
use std::sync::Arc;

/// Create a search state store based on configuration
pub async fn create_store(config: &StateConfig) -> Result<Arc<dyn SearchStateStore>> {
    match config.backend {
        StateBackend::Sled => {
            let path = config.path.as_ref().ok_or_else(|| {
                AppError::Configuration("Sled backend requires 'path' configuration".to_string())
            })?;

            tracing::info!(path = ?path, "Initializing Sled storage backend");

            let store = SledStore::new(path)?;
            Ok(Arc::new(store))
        }

        StateBackend::Memory => {
            tracing::info!("Initializing in-memory storage backend");
            Ok(create_in_memory_store())
        }
    }
}

/// Create an in-memory store
pub fn create_in_memory_store() -> Arc<dyn SearchStateStore> {
    Arc::new(InMemoryStore::new())
}
