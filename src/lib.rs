//! Relevance search and portfolio health for venture portfolio data.
//!
//! The host application fetches companies, notes, meetings and deals from
//! its backend; this crate ranks them against a query, derives facet counts,
//! produces typeahead suggestions, persists saved searches and recent
//! queries, and flags companies whose founders owe a metrics update.

pub mod config;
pub mod error;
pub mod health;
pub mod models;
pub mod search;
pub mod state;

pub use config::Config;
pub use error::{AppError, Result};
pub use health::{HealthChecker, HealthStatus, PortfolioHealth};
pub use models::{Collections, EntityType, SearchableRecord};
pub use search::{MatchResult, QueryState, SavedSearch, SearchResponse, SearchService};
pub use state::{create_store, SearchStateStore};
