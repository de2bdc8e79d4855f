//! Graceful-degradation integration tests.
//!
//! These exercise realistic outage modes at the engine level:
//! - text index down: results identical to a similarity-only engine
//! - index healthy: hits survive even below the similarity threshold
//! - candidate store down: the request fails with a clear error
//! - cancelled request: partial results, never a panic

use mangarank_core::{Candidate, ErrorCode, SearchRequest};
use mangarank_search::{MatchType, MemoryIndex, MemoryStore, SearchConfig, SearchEngine};

fn corpus() -> Vec<Candidate> {
    vec![
        Candidate {
            native_title: Some("ナルト".into()),
            romanized_title: Some("Naruto".into()),
            year: Some(1999),
            rating: Some(8.2),
            ..Candidate::new(1, "Naruto")
        },
        Candidate {
            year: Some(1997),
            rating: Some(9.0),
            ..Candidate::new(2, "One Piece")
        },
        Candidate {
            year: Some(1989),
            rating: Some(8.6),
            ..Candidate::new(3, "Berserk")
        },
        Candidate {
            native_title: Some("進撃の巨人".into()),
            romanized_title: Some("Shingeki no Kyojin".into()),
            year: Some(2009),
            rating: Some(8.9),
            ..Candidate::new(4, "Attack on Titan")
        },
        Candidate {
            year: Some(2001),
            rating: Some(9.1),
            ..Candidate::new(5, "Fullmetal Alchemist")
        },
    ]
}

fn hybrid_engine() -> SearchEngine<MemoryIndex, MemoryStore> {
    let store = MemoryStore::new(corpus());
    let index = MemoryIndex::from_store(&store);
    SearchEngine::new(index, store, SearchConfig::default())
}

/// Route degradation warnings to the test writer so failures show them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn poisoned_index_matches_similarity_only_results() {
    init_tracing();
    let store = MemoryStore::new(corpus());
    let degraded = SearchEngine::new(
        MemoryIndex::from_store(&store).poisoned(),
        store.clone(),
        SearchConfig::default(),
    );
    let fallback_only = SearchEngine::similarity_only(store, SearchConfig::default());

    let request = SearchRequest::new("narto");
    let a = degraded.search(&request).expect("degraded search succeeds");
    let b = fallback_only.search(&request).expect("fallback search");

    assert_eq!(a, b, "a dead index must be invisible in the results");
    assert!(!a.is_empty());
    assert!(
        a.iter()
            .all(|r| r.match_type == MatchType::SimilarityFallback)
    );
}

#[test]
fn index_retains_candidates_the_fallback_would_drop() {
    let engine = hybrid_engine();

    // At a 0.9 threshold no title passes on similarity alone, but the index
    // still finds the exact term.
    let request = SearchRequest {
        min_similarity: 0.9,
        ..SearchRequest::new("titan")
    };

    let rows = engine.search(&request).expect("search");
    assert!(
        rows.iter().any(|r| r.id.0 == 4),
        "index hit must survive a similarity threshold it cannot meet"
    );

    let store = MemoryStore::new(corpus());
    let without_index = SearchEngine::similarity_only(store, SearchConfig::default());
    let rows = without_index.search(&request).expect("search");
    assert!(rows.is_empty(), "without the index nothing clears 0.9");
}

#[test]
fn store_outage_surfaces_a_coded_error() {
    let store = MemoryStore::new(corpus()).poisoned();
    let engine = SearchEngine::new(
        MemoryIndex::default(),
        store,
        SearchConfig::default(),
    );

    let err = engine
        .search(&SearchRequest::new("naruto"))
        .expect_err("store outage is fatal");
    assert_eq!(err.code(), ErrorCode::StoreUnavailable);
}

#[test]
fn cancelled_request_returns_partial_results_cleanly() {
    let engine = hybrid_engine();
    let cancel = mangarank_search::CancellationToken::new();
    cancel.cancel();

    let rows = engine
        .search_with_cancel(&SearchRequest::new("naruto"), &cancel)
        .expect("cancellation is not an error");
    // The scan never ran; only index hydration can contribute.
    let ids: Vec<i64> = rows.iter().map(|r| r.id.0).collect();
    assert_eq!(ids, vec![1]);
}

#[test]
fn excessive_fuzziness_degrades_instead_of_failing() {
    init_tracing();
    // The in-memory index rejects budgets above 4. With a config that allows
    // more, such a request must fall back rather than surface the rejection.
    let store = MemoryStore::new(corpus());
    let index = MemoryIndex::from_store(&store);
    let config = SearchConfig {
        max_fuzzy_distance: 6,
        ..SearchConfig::default()
    };
    let engine = SearchEngine::new(index, store, config);

    let request = SearchRequest {
        fuzzy_distance: 5,
        ..SearchRequest::new("narto")
    };
    let rows = engine.search(&request).expect("search");
    assert!(rows.iter().any(|r| r.id.0 == 1));
    assert!(
        rows.iter()
            .all(|r| r.match_type == MatchType::SimilarityFallback)
    );
}
