//! Relevance search over already-loaded portfolio records
//!
//! Companies, notes, meetings and deals are fetched in full by the host
//! application; this module ranks them against a typed query, derives facet
//! counts for filter chips and produces typeahead suggestions.
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌───────────┐   ┌─────────────────┐   ┌──────────┐
//! │   matcher    │──▶│  scoring  │──▶│     ranking     │──▶│ response │
//! │ (substring,  │   │ (weighted │   │ (filters, dedup │   │ + facets │
//! │  per field)  │   │   sum)    │   │  by type+id,    │   │          │
//! └──────────────┘   └───────────┘   │  stable sort)   │   └──────────┘
//!                                    └─────────────────┘
//! ```
//!
//! Every step is a pure function of `(records, QueryState)`. The
//! [`SearchService`] memoises whole responses keyed by a fingerprint of
//! those inputs.
//!
//! # Example
//!
//! ```no_run
//! use vc_portfolio_search::models::{Collections, Company};
//! use vc_portfolio_search::search::{QueryState, SearchService};
//!
//! let collections = Collections {
//!     companies: vec![Company::new("c1", "TechCorp").with_sector("FinTech")],
//!     ..Default::default()
//! };
//! let records = collections.records();
//!
//! let service = SearchService::with_defaults();
//! let response = service.search(&records, &QueryState::new("tech"));
//! println!("Found {} results", response.total_hits);
//! ```

mod config;
mod error;
pub mod facets;
pub mod highlight;
pub mod matcher;
mod query;
pub mod ranking;
pub mod scoring;
mod service;
pub mod suggest;

pub use config::{SearchConfig, SearchConfigBuilder};
pub use error::{SearchError, SearchResult};
pub use facets::{extract_facets, extract_facets_ordered, Facet, FacetOrder};
pub use highlight::{highlight, match_ranges};
pub use matcher::match_fields;
pub use query::{DateRange, NumericRange, QueryState, SavedSearch};
pub use ranking::{rank, Candidate, MatchResult};
pub use scoring::{score, FieldWeights};
pub use service::{fingerprint, CacheStats, SearchResponse, SearchService};
pub use suggest::{suggest, RecentQueries};
