//! Main search service implementation

use crate::models::{EntityType, SearchableRecord};
use crate::search::config::SearchConfig;
use crate::search::error::SearchResult;
use crate::search::facets::{extract_facets_ordered, Facet};
use crate::search::highlight::highlight;
use crate::search::matcher::match_normalized;
use crate::search::query::QueryState;
use crate::search::ranking::{passes_filters, rank, Candidate, MatchResult};
use crate::search::scoring::score;
use crate::search::suggest::{suggest, RecentQueries};
use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Search response with ranked results and facet counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Query text as typed
    pub query: String,

    /// Ranked, deduplicated results
    pub results: Vec<MatchResult>,

    /// Facet counts per configured facet field
    pub facets: BTreeMap<String, Vec<Facet>>,

    /// Number of results
    pub total_hits: usize,

    /// Fingerprint of the inputs that produced this response
    pub fingerprint: String,
}

impl SearchResponse {
    /// Results of one entity type, in rank order
    pub fn results_of(&self, entity_type: EntityType) -> impl Iterator<Item = &MatchResult> {
        self.results
            .iter()
            .filter(move |r| r.record_type == entity_type)
    }
}

/// Memoisation cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
    pub capacity: u64,
}

/// Main search service
pub struct SearchService {
    /// Configuration
    config: SearchConfig,

    /// Responses keyed by input fingerprint
    cache: Cache<String, Arc<SearchResponse>>,
}

impl SearchService {
    /// Create a new search service
    pub fn new(config: SearchConfig) -> SearchResult<Self> {
        config.validate()?;

        let cache = Cache::builder().max_capacity(config.cache_size).build();

        Ok(Self { config, cache })
    }

    /// Create a service with the default configuration
    pub fn with_defaults() -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(SearchConfig::default().cache_size)
                .build(),
            config: SearchConfig::default(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search the records. Identical inputs return the memoised response.
    pub fn search(&self, records: &[SearchableRecord], state: &QueryState) -> Arc<SearchResponse> {
        let fingerprint = match fingerprint(records, state) {
            Some(fingerprint) => fingerprint,
            None => {
                tracing::warn!("Could not fingerprint search inputs, skipping cache");
                return Arc::new(self.execute(records, state, String::new()));
            }
        };

        if let Some(cached) = self.cache.get(&fingerprint) {
            tracing::debug!(query = %state.query, hits = cached.total_hits, "Search served from cache");
            return cached;
        }

        let response = Arc::new(self.execute(records, state, fingerprint.clone()));
        self.cache.insert(fingerprint, response.clone());
        response
    }

    /// Run the pipeline without touching the cache
    pub fn execute(
        &self,
        records: &[SearchableRecord],
        state: &QueryState,
        fingerprint: String,
    ) -> SearchResponse {
        let start_time = std::time::Instant::now();
        let state = state.normalized();

        let candidates = self.candidates(records, &state);
        let mut results = rank(candidates, &state);

        if self.config.enable_highlighting && !state.is_empty_query() {
            for result in &mut results {
                result.highlighted_title = Some(highlight(
                    &result.title,
                    &state.query,
                    &self.config.highlight_open,
                    &self.config.highlight_close,
                ));
            }
        }

        let facets = self.facets(records, &state);

        tracing::debug!(
            query = %state.query,
            records = records.len(),
            hits = results.len(),
            elapsed_us = start_time.elapsed().as_micros() as u64,
            "Search executed"
        );

        SearchResponse {
            query: state.query.clone(),
            total_hits: results.len(),
            results,
            facets,
            fingerprint,
        }
    }

    /// Match and score every record; records without a matching field are
    /// not candidates. An empty query yields no candidates.
    pub fn candidates<'a>(
        &self,
        records: &'a [SearchableRecord],
        state: &QueryState,
    ) -> Vec<Candidate<'a>> {
        let needle = state.normalized_query();
        if needle.is_empty() {
            return Vec::new();
        }

        records
            .iter()
            .filter_map(|record| {
                let matched = match_normalized(record, &needle);
                if matched.is_empty() {
                    return None;
                }
                let relevance = score(&matched, &self.config.field_weights);
                Some(Candidate::new(record, matched, relevance))
            })
            .collect()
    }

    /// Records that pass every filter and, for a non-empty query, match it.
    /// Each `(type, id)` appears once.
    pub fn filtered_records<'a>(
        &self,
        records: &'a [SearchableRecord],
        state: &QueryState,
    ) -> Vec<&'a SearchableRecord> {
        let state = state.normalized();
        let needle = state.normalized_query();
        let mut seen: HashSet<(EntityType, &str)> = HashSet::new();

        records
            .iter()
            .filter(|record| passes_filters(record, &state))
            .filter(|record| needle.is_empty() || !match_normalized(record, &needle).is_empty())
            .filter(|record| seen.insert(record.key()))
            .collect()
    }

    /// Facets for every configured field over the filtered records
    pub fn facets(
        &self,
        records: &[SearchableRecord],
        state: &QueryState,
    ) -> BTreeMap<String, Vec<Facet>> {
        let filtered = self.filtered_records(records, state);

        self.config
            .facet_fields
            .iter()
            .map(|field| {
                let facets = extract_facets_ordered(
                    filtered.iter().copied(),
                    field,
                    self.config.facet_order,
                );
                (field.clone(), facets)
            })
            .collect()
    }

    /// Typeahead suggestions from recent queries and record titles
    pub fn suggest(
        &self,
        prefix: &str,
        recent: &RecentQueries,
        records: &[SearchableRecord],
    ) -> Vec<String> {
        suggest(
            prefix,
            recent.iter(),
            records.iter().map(SearchableRecord::title),
            self.config.suggestion_limit,
        )
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.run_pending_tasks();
        CacheStats {
            entries: self.cache.entry_count(),
            capacity: self.config.cache_size,
        }
    }

    pub fn clear_cache(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
    }
}

/// Sha256 over the JSON encoding of the inputs
pub fn fingerprint(records: &[SearchableRecord], state: &QueryState) -> Option<String> {
    let mut hasher = Sha256::new();
    serde_json::to_writer(&mut hasher, records).ok()?;
    hasher.update([0u8]);
    serde_json::to_writer(&mut hasher, state).ok()?;
    Some(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Company, RecordData};
    use crate::search::config::SearchConfigBuilder;

    fn portfolio() -> Vec<SearchableRecord> {
        vec![
            SearchableRecord::from(&Company::new("c1", "TechCorp").with_sector("FinTech")),
            SearchableRecord::from(&Company::new("c2", "Acme").with_sector("HealthTech")),
        ]
    }

    #[test]
    fn test_title_match_outranks_field_match() {
        let service = SearchService::with_defaults();
        let response = service.search(&portfolio(), &QueryState::new("Tech"));

        assert_eq!(response.total_hits, 2);
        assert_eq!(response.results[0].title, "TechCorp");
        assert_eq!(response.results[0].matched_fields, vec!["title", "sector"]);
        assert_eq!(response.results[0].relevance_score, 11.0);
        assert_eq!(response.results[1].title, "Acme");
        assert_eq!(response.results[1].relevance_score, 1.0);
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let service = SearchService::with_defaults();
        let response = service.search(&portfolio(), &QueryState::new(""));
        assert!(response.results.is_empty());
        assert_eq!(response.total_hits, 0);
    }

    #[test]
    fn test_identical_inputs_hit_cache() {
        let service = SearchService::with_defaults();
        let records = portfolio();
        let state = QueryState::new("acme");

        let first = service.search(&records, &state);
        let second = service.search(&records, &state);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(service.cache_stats().entries, 1);

        service.clear_cache();
        assert_eq!(service.cache_stats().entries, 0);
    }

    #[test]
    fn test_fingerprint_changes_with_state() {
        let records = portfolio();
        let a = fingerprint(&records, &QueryState::new("acme")).unwrap();
        let b = fingerprint(&records, &QueryState::new("acme")).unwrap();
        let c = fingerprint(&records, &QueryState::new("acme").with_sectors(vec!["AI"])).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_highlighted_titles() {
        let service = SearchService::with_defaults();
        let response = service.search(&portfolio(), &QueryState::new("corp"));
        assert_eq!(
            response.results[0].highlighted_title.as_deref(),
            Some("Tech<mark>Corp</mark>")
        );

        let plain = SearchService::new(SearchConfigBuilder::new().enable_highlighting(false).build())
            .unwrap();
        let response = plain.search(&portfolio(), &QueryState::new("corp"));
        assert!(response.results[0].highlighted_title.is_none());
    }

    #[test]
    fn test_facets_follow_filters() {
        let service = SearchService::with_defaults();
        let records = portfolio();

        let all = service.facets(&records, &QueryState::default());
        assert_eq!(all["sector"].len(), 2);

        let narrowed = service.facets(&records, &QueryState::new("techcorp"));
        assert_eq!(
            narrowed["sector"],
            vec![Facet { name: "FinTech".to_string(), count: 1 }]
        );
    }

    #[test]
    fn test_empty_entity_set_treated_as_all() {
        let service = SearchService::with_defaults();
        let mut state = QueryState::new("acme").with_entity_types([EntityType::Company]);
        state.toggle_entity_type(EntityType::Company);

        let response = service.search(&portfolio(), &state);
        assert_eq!(response.total_hits, 1);
    }

    #[test]
    fn test_suggest_uses_recent_then_titles() {
        let service = SearchService::with_defaults();
        let mut recent = RecentQueries::default();
        recent.push("tech due diligence");

        let suggestions = service.suggest("tech", &recent, &portfolio());
        assert_eq!(suggestions, vec!["tech due diligence", "TechCorp"]);
    }

    #[test]
    fn test_results_of_type() {
        let service = SearchService::with_defaults();
        let mut records = portfolio();
        records.push(SearchableRecord::new(
            EntityType::Note,
            RecordData::new("n1", "Acme board notes"),
        ));

        let response = service.search(&records, &QueryState::new("acme"));
        assert_eq!(response.results_of(EntityType::Note).count(), 1);
        assert_eq!(response.results_of(EntityType::Company).count(), 1);
    }
}
