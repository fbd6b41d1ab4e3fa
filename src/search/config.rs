//! Search configuration

use crate::search::error::{SearchError, SearchResult};
use crate::search::facets::FacetOrder;
use crate::search::scoring::FieldWeights;
use serde::{Deserialize, Serialize};

/// Search service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Weights used to score matched fields
    #[serde(default)]
    pub field_weights: FieldWeights,

    /// Maximum number of typeahead suggestions
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,

    /// Number of memoised search responses
    #[serde(default = "default_cache_size")]
    pub cache_size: u64,

    /// Record fields for which facets are computed
    #[serde(default = "default_facet_fields")]
    pub facet_fields: Vec<String>,

    /// Facet value ordering
    #[serde(default)]
    pub facet_order: FacetOrder,

    /// Populate highlighted titles in results
    #[serde(default = "default_true")]
    pub enable_highlighting: bool,

    /// Marker inserted before a highlighted match
    #[serde(default = "default_highlight_open")]
    pub highlight_open: String,

    /// Marker inserted after a highlighted match
    #[serde(default = "default_highlight_close")]
    pub highlight_close: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            field_weights: FieldWeights::default(),
            suggestion_limit: default_suggestion_limit(),
            cache_size: default_cache_size(),
            facet_fields: default_facet_fields(),
            facet_order: FacetOrder::default(),
            enable_highlighting: true,
            highlight_open: default_highlight_open(),
            highlight_close: default_highlight_close(),
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> SearchResult<()> {
        if !self.field_weights.is_valid() {
            return Err(SearchError::InvalidConfiguration(
                "field weights must be finite and non-negative".to_string(),
            ));
        }
        if self.suggestion_limit == 0 {
            return Err(SearchError::InvalidConfiguration(
                "suggestion_limit must be at least 1".to_string(),
            ));
        }
        if self.facet_fields.iter().any(|f| f.trim().is_empty()) {
            return Err(SearchError::InvalidConfiguration(
                "facet field names must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_suggestion_limit() -> usize {
    8
}

fn default_cache_size() -> u64 {
    128
}

fn default_facet_fields() -> Vec<String> {
    vec![
        "sector".to_string(),
        "stage".to_string(),
        "risk_level".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

fn default_highlight_open() -> String {
    "<mark>".to_string()
}

fn default_highlight_close() -> String {
    "</mark>".to_string()
}

/// Builder for SearchConfig
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    pub fn field_weights(mut self, weights: FieldWeights) -> Self {
        self.config.field_weights = weights;
        self
    }

    pub fn suggestion_limit(mut self, limit: usize) -> Self {
        self.config.suggestion_limit = limit;
        self
    }

    pub fn cache_size(mut self, size: u64) -> Self {
        self.config.cache_size = size;
        self
    }

    pub fn facet_fields(mut self, fields: Vec<impl Into<String>>) -> Self {
        self.config.facet_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn facet_order(mut self, order: FacetOrder) -> Self {
        self.config.facet_order = order;
        self
    }

    pub fn enable_highlighting(mut self, enabled: bool) -> Self {
        self.config.enable_highlighting = enabled;
        self
    }

    pub fn highlight_markers(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.config.highlight_open = open.into();
        self.config.highlight_close = close.into();
        self
    }

    pub fn build(self) -> SearchConfig {
        self.config
    }
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
