//! Error types for search operations

use crate::error::AppError;

/// Result type for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while configuring or persisting searches.
/// Ranking itself is infallible.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Saved search or query state rejected
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Query state could not be (de)serialized
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Serialization(err.to_string())
    }
}

impl From<validator::ValidationErrors> for SearchError {
    fn from(err: validator::ValidationErrors) -> Self {
        SearchError::InvalidQuery(err.to_string())
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidConfiguration(msg) => AppError::Configuration(msg),
            SearchError::InvalidQuery(msg) => AppError::Validation(msg),
            SearchError::Serialization(msg) => AppError::Serialization(msg),
        }
    }
}
