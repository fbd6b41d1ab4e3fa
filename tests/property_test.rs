//! Property tests for the ranking pipeline.
//!
//! Records are drawn from a small vocabulary so that queries hit often and
//! `(type, id)` keys collide across candidates.

use proptest::prelude::*;
use std::collections::HashSet;
use vc_portfolio_search::models::{EntityType, RecordData, SearchableRecord};
use vc_portfolio_search::search::{
    extract_facets, match_fields, score, FieldWeights, QueryState, SearchService,
};

const WORDS: &[&str] = &["tech", "Acme", "fin", "Health", "robo", "C++ (lang)", "seed"];
const SECTORS: &[&str] = &["FinTech", "HealthTech", "Robotics", ""];

fn entity_type() -> impl Strategy<Value = EntityType> {
    prop_oneof![
        Just(EntityType::Company),
        Just(EntityType::Deal),
        Just(EntityType::Meeting),
        Just(EntityType::Note),
    ]
}

fn phrase() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 0..4).prop_map(|words| words.join(" "))
}

fn record() -> impl Strategy<Value = SearchableRecord> {
    (
        entity_type(),
        0u8..6,
        phrase(),
        phrase(),
        prop::sample::select(SECTORS),
    )
        .prop_map(|(entity_type, id, title, subtitle, sector)| {
            let data = RecordData::new(id.to_string(), title)
                .with_subtitle(subtitle)
                .with_field("sector", sector);
            SearchableRecord::new(entity_type, data)
        })
}

fn records() -> impl Strategy<Value = Vec<SearchableRecord>> {
    prop::collection::vec(record(), 0..24)
}

fn query() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(WORDS).prop_map(str::to_string),
        Just("TECH".to_string()),
        Just("e".to_string()),
        Just("  fin ".to_string()),
    ]
}

proptest! {
    #[test]
    fn prop_every_result_contains_query(records in records(), query in query()) {
        let service = SearchService::with_defaults();
        let response = service.search(&records, &QueryState::new(query.clone()));
        let needle = query.trim().to_lowercase();

        for result in &response.results {
            // Colliding keys: the kept instance is one of the records sharing it
            let hit = records
                .iter()
                .filter(|r| r.entity_type() == result.record_type && r.id() == result.record_id)
                .any(|record| {
                    result.matched_fields.iter().any(|field| {
                        record
                            .field(field)
                            .map(|value| value.to_lowercase().contains(&needle))
                            .unwrap_or(false)
                    })
                });
            prop_assert!(hit, "{:?} has no field containing {:?}", result, needle);
        }
    }

    #[test]
    fn prop_pipeline_is_deterministic(records in records(), query in query()) {
        let state = QueryState::new(query);

        let first = SearchService::with_defaults().search(&records, &state);
        let second = SearchService::with_defaults().search(&records, &state);

        prop_assert_eq!(&*first, &*second);
    }

    #[test]
    fn prop_results_are_sorted(records in records(), query in query()) {
        let response = SearchService::with_defaults().search(&records, &QueryState::new(query));

        for pair in response.results.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.relevance_score >= b.relevance_score);
            if a.relevance_score == b.relevance_score {
                let (pa, pb) = (a.record_type.priority(), b.record_type.priority());
                prop_assert!(pa <= pb);
                if pa == pb {
                    prop_assert!(a.title <= b.title);
                }
            }
        }
    }

    #[test]
    fn prop_each_key_once_with_best_score(records in records(), query in query()) {
        let response = SearchService::with_defaults().search(&records, &QueryState::new(query.clone()));

        let weights = FieldWeights::default();
        let mut seen = HashSet::new();
        for result in &response.results {
            prop_assert!(seen.insert((result.record_type, result.record_id.clone())));

            let best = records
                .iter()
                .filter(|r| r.entity_type() == result.record_type && r.id() == result.record_id)
                .map(|r| score(&match_fields(r, &query), &weights))
                .fold(0.0, f64::max);
            prop_assert_eq!(result.relevance_score, best);
        }
    }

    #[test]
    fn prop_facet_counts_are_exact(records in records(), query in query()) {
        let service = SearchService::with_defaults();
        let state = QueryState::new(query);
        let filtered = service.filtered_records(&records, &state);

        for facet in extract_facets(filtered.iter().copied(), "sector") {
            let expected = filtered
                .iter()
                .filter(|r| r.field("sector") == Some(facet.name.as_str()))
                .count() as u64;
            prop_assert_eq!(facet.count, expected);
            prop_assert!(!facet.name.trim().is_empty());
        }
    }

    #[test]
    fn prop_scores_are_non_negative(records in records(), query in query()) {
        let response = SearchService::with_defaults().search(&records, &QueryState::new(query));
        prop_assert!(response.results.iter().all(|r| r.relevance_score >= 1.0));
    }
}
