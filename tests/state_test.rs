//! Integration tests for saved-search and history persistence

use std::collections::BTreeSet;
use tempfile::TempDir;
use vc_portfolio_search::config::{StateBackend, StateConfig};
use vc_portfolio_search::models::EntityType;
use vc_portfolio_search::search::{DateRange, NumericRange, QueryState, SavedSearch};
use vc_portfolio_search::state::{create_in_memory_store, create_store, SearchStateStore, SledStore};
use vc_portfolio_search::AppError;

fn sled_config(dir: &TempDir) -> StateConfig {
    StateConfig {
        backend: StateBackend::Sled,
        path: Some(dir.path().join("state")),
    }
}

fn filter_state() -> QueryState {
    QueryState::new("fintech seed")
        .with_entity_types([EntityType::Company, EntityType::Deal])
        .with_sectors(vec!["FinTech"])
        .with_range("arr", NumericRange::new(Some(1_000_000.0), None))
}

#[tokio::test]
async fn test_saved_search_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let state = filter_state();

    {
        let store = create_store(&sled_config(&temp_dir)).await.unwrap();
        store
            .save_search(&SavedSearch::new("my-filter", state.clone()))
            .await
            .unwrap();
    }

    let store = create_store(&sled_config(&temp_dir)).await.unwrap();
    let loaded = store.load_search("my-filter").await.unwrap().unwrap();

    assert_eq!(loaded.name, "my-filter");
    assert_eq!(loaded.state, state);
    assert!(loaded.state.stages.is_empty());
    assert!(loaded.state.risk_levels.is_empty());
    assert!(loaded.state.date_range.is_none());
}

#[tokio::test]
async fn test_empty_collections_round_trip_as_empty() {
    let temp_dir = TempDir::new().unwrap();
    let mut state = QueryState::new("");
    state.entity_types = BTreeSet::new();

    {
        let store = SledStore::new(temp_dir.path()).unwrap();
        store
            .save_search(&SavedSearch::new("nothing-selected", state.clone()))
            .await
            .unwrap();
        store.flush().await.unwrap();
    }

    let store = SledStore::new(temp_dir.path()).unwrap();
    let loaded = store.load_search("nothing-selected").await.unwrap().unwrap();

    assert_eq!(loaded.state, state);
    assert!(loaded.state.entity_types.is_empty());
    assert!(loaded.state.numeric_ranges.is_empty());
}

#[tokio::test]
async fn test_date_range_round_trip() {
    let store = create_in_memory_store();
    let start = chrono::Utc::now();
    let state = QueryState::new("board")
        .with_date_range(DateRange::new(start, start + chrono::Duration::days(7)));

    store
        .save_search(&SavedSearch::new("this-week", state.clone()))
        .await
        .unwrap();

    let loaded = store.load_search("this-week").await.unwrap().unwrap();
    assert_eq!(loaded.state, state);
}

#[tokio::test]
async fn test_saved_search_lifecycle() {
    let store = create_in_memory_store();

    store
        .save_search(&SavedSearch::new("b-deals", QueryState::new("deal")))
        .await
        .unwrap();
    store
        .save_search(&SavedSearch::new("a-health", QueryState::new("health")))
        .await
        .unwrap();

    // Saving under an existing name replaces it
    store
        .save_search(&SavedSearch::new("b-deals", QueryState::new("term sheet")))
        .await
        .unwrap();

    let all = store.list_searches().await.unwrap();
    let names: Vec<&str> = all.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["a-health", "b-deals"]);
    assert_eq!(all[1].state.query, "term sheet");

    store.delete_search("a-health").await.unwrap();
    assert!(store.load_search("a-health").await.unwrap().is_none());

    let err = store.delete_search("a-health").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_invalid_name_rejected() {
    let store = create_in_memory_store();
    let result = store
        .save_search(&SavedSearch::new("", QueryState::default()))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_recent_history_is_bounded_and_deduplicated() {
    let temp_dir = TempDir::new().unwrap();

    {
        let store = create_store(&sled_config(&temp_dir)).await.unwrap();
        for i in 0..12 {
            store.push_recent(&format!("query {}", i), 10).await.unwrap();
        }
        store.push_recent("QUERY 5", 10).await.unwrap();
        store.push_recent("   ", 10).await.unwrap();
    }

    let store = create_store(&sled_config(&temp_dir)).await.unwrap();
    let recent = store.recent_queries().await.unwrap();

    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0], "QUERY 5");
    assert_eq!(recent[1], "query 11");
    assert!(!recent.iter().any(|q| q == "query 5"));
    assert!(!recent.iter().any(|q| q == "query 0" || q == "query 1"));

    store.clear_recent().await.unwrap();
    assert!(store.recent_queries().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_stores_are_interchangeable() {
    let temp_dir = TempDir::new().unwrap();
    let stores: Vec<std::sync::Arc<dyn SearchStateStore>> = vec![
        create_in_memory_store(),
        create_store(&sled_config(&temp_dir)).await.unwrap(),
    ];

    for store in stores {
        let history = store.push_recent("acme", 3).await.unwrap();
        assert_eq!(history, vec!["acme"]);

        let history = store.push_recent("beta", 3).await.unwrap();
        assert_eq!(history, vec!["beta", "acme"]);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_pushes_are_all_kept() {
    let temp_dir = TempDir::new().unwrap();
    let stores: Vec<std::sync::Arc<dyn SearchStateStore>> = vec![
        create_in_memory_store(),
        create_store(&sled_config(&temp_dir)).await.unwrap(),
    ];

    for store in stores {
        let handles: Vec<_> = (0..64)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.push_recent(&format!("q{}", i), 100).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let recent = store.recent_queries().await.unwrap();
        assert_eq!(recent.len(), 64);
        for i in 0..64 {
            assert!(recent.contains(&format!("q{}", i)));
        }
    }
}
