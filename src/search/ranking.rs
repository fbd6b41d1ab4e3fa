//! Filtering, deduplication and ordering of scored candidates

use crate::models::{EntityType, SearchableRecord};
use crate::search::query::QueryState;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// A record that matched the query, with its score
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub record: &'a SearchableRecord,
    pub matched_fields: Vec<String>,
    pub score: f64,
}

impl<'a> Candidate<'a> {
    pub fn new(record: &'a SearchableRecord, matched_fields: Vec<String>, score: f64) -> Self {
        Self {
            record,
            matched_fields,
            score,
        }
    }
}

/// A ranked search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub record_id: String,
    pub record_type: EntityType,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub matched_fields: Vec<String>,
    pub relevance_score: f64,

    /// Title with query occurrences wrapped in highlight markers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted_title: Option<String>,
}

impl From<Candidate<'_>> for MatchResult {
    fn from(candidate: Candidate<'_>) -> Self {
        let data = candidate.record.data();
        Self {
            record_id: data.id.clone(),
            record_type: candidate.record.entity_type(),
            title: data.title.clone(),
            subtitle: data.subtitle.clone(),
            description: data.description.clone(),
            matched_fields: candidate.matched_fields,
            relevance_score: candidate.score,
            highlighted_title: None,
        }
    }
}

/// True when the record passes every active filter of the state.
///
/// A record lacking the field, metric or date an active filter inspects
/// fails that filter.
pub fn passes_filters(record: &SearchableRecord, state: &QueryState) -> bool {
    if !state.entity_types.contains(&record.entity_type()) {
        return false;
    }

    for (field, allowed) in state.categorical_filters() {
        if allowed.is_empty() {
            continue;
        }
        match record.field(field) {
            Some(value) if allowed.contains(value) => {}
            _ => return false,
        }
    }

    for (metric, range) in &state.numeric_ranges {
        match record.metric(metric) {
            Some(value) if range.contains(value) => {}
            _ => return false,
        }
    }

    if let Some(range) = state.date_range {
        match record.date() {
            Some(at) if range.contains(at) => {}
            _ => return false,
        }
    }

    true
}

/// Result ordering: score descending, then entity priority, then title,
/// then id so the order is total.
pub fn compare_results(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.relevance_score
        .total_cmp(&a.relevance_score)
        .then_with(|| a.record_type.priority().cmp(&b.record_type.priority()))
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.record_id.cmp(&b.record_id))
}

/// Drop filtered-out candidates, keep the best instance of each
/// `(type, id)` and sort.
pub fn rank(candidates: Vec<Candidate<'_>>, state: &QueryState) -> Vec<MatchResult> {
    let mut best: HashMap<(EntityType, String), usize> = HashMap::new();
    let mut kept: Vec<Candidate<'_>> = Vec::new();

    for candidate in candidates {
        if candidate.matched_fields.is_empty() || !passes_filters(candidate.record, state) {
            continue;
        }

        let key = (candidate.record.entity_type(), candidate.record.id().to_string());
        match best.get(&key) {
            Some(&slot) => {
                if candidate.score > kept[slot].score {
                    kept[slot] = candidate;
                }
            }
            None => {
                best.insert(key, kept.len());
                kept.push(candidate);
            }
        }
    }

    let mut results: Vec<MatchResult> = kept.into_iter().map(MatchResult::from).collect();
    results.sort_by(compare_results);

    tracing::trace!(results = results.len(), "Ranked candidates");

    results
}
