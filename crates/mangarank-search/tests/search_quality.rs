//! Ranking-quality integration tests over a small realistic corpus.
//!
//! Scenarios:
//! - misspelled queries still surface the intended record first
//! - exact titles beat near-misses
//! - alternate title fields participate when requested
//! - hard filters drop otherwise-strong matches
//! - a query matching nothing is an empty success, not an error

use mangarank_core::{Candidate, CandidateFilter, FieldId, SearchRequest};
use mangarank_search::{MemoryIndex, MemoryStore, SearchConfig, SearchEngine};

fn corpus() -> Vec<Candidate> {
    vec![
        Candidate {
            native_title: Some("ナルト".into()),
            romanized_title: Some("Naruto".into()),
            description: Some("A young ninja seeks recognition from his village".into()),
            year: Some(1999),
            rating: Some(8.2),
            status: Some("completed".into()),
            genres: vec!["action".into(), "adventure".into()],
            ..Candidate::new(1, "Naruto")
        },
        Candidate {
            year: Some(1997),
            rating: Some(9.0),
            status: Some("ongoing".into()),
            genres: vec!["action".into(), "adventure".into()],
            ..Candidate::new(2, "One Piece")
        },
        Candidate {
            year: Some(1989),
            rating: Some(8.6),
            genres: vec!["action".into(), "horror".into()],
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

fn engine() -> SearchEngine<MemoryIndex, MemoryStore> {
    let store = MemoryStore::new(corpus());
    let index = MemoryIndex::from_store(&store);
    SearchEngine::new(index, store, SearchConfig::default())
}

#[test]
fn misspelled_query_finds_the_intended_title() {
    let rows = engine()
        .search(&SearchRequest::new("narto"))
        .expect("search");
    assert!(!rows.is_empty());
    assert_eq!(rows[0].id.0, 1, "typo'd query must still surface Naruto");
}

#[test]
fn transposed_letters_still_match() {
    let rows = engine()
        .search(&SearchRequest::new("one peice"))
        .expect("search");
    assert!(!rows.is_empty());
    assert_eq!(rows[0].id.0, 2);
    assert!(rows[0].fused_score > 0.0);
}

#[test]
fn exact_title_ranks_first() {
    let rows = engine()
        .search(&SearchRequest::new("Berserk"))
        .expect("search");
    assert_eq!(rows[0].id.0, 3);
    assert_eq!(rows[0].matched_field, Some(FieldId::Title));
}

#[test]
fn romanized_title_participates_when_requested() {
    let request = SearchRequest {
        search_fields: vec![FieldId::Title, FieldId::RomanizedTitle],
        ..SearchRequest::new("shingeki")
    };
    let rows = engine().search(&request).expect("search");
    assert!(!rows.is_empty());
    assert_eq!(rows[0].id.0, 4);
    assert_eq!(rows[0].matched_field, Some(FieldId::RomanizedTitle));
}

#[test]
fn native_title_matches_cjk_queries() {
    let request = SearchRequest {
        search_fields: vec![FieldId::Title, FieldId::NativeTitle],
        ..SearchRequest::new("ナルト")
    };
    let rows = engine().search(&request).expect("search");
    assert!(!rows.is_empty());
    assert_eq!(rows[0].id.0, 1);
    assert_eq!(rows[0].matched_field, Some(FieldId::NativeTitle));
}

#[test]
fn filters_drop_strong_matches() {
    let request = SearchRequest {
        filters: CandidateFilter {
            min_rating: Some(9.5),
            ..CandidateFilter::default()
        },
        ..SearchRequest::new("one piece")
    };
    let rows = engine().search(&request).expect("search");
    assert!(
        rows.is_empty(),
        "no record rates 9.5+, even a perfect title match must be dropped"
    );
}

#[test]
fn genre_filter_is_case_insensitive_and_conjunctive() {
    let request = SearchRequest {
        filters: CandidateFilter {
            genres: vec!["Action".into(), "HORROR".into()],
            ..CandidateFilter::default()
        },
        ..SearchRequest::new("berserk")
    };
    let rows = engine().search(&request).expect("search");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id.0, 3);
}

#[test]
fn unmatched_query_is_an_empty_success() {
    let rows = engine()
        .search(&SearchRequest::new("zzz qqq xxx"))
        .expect("no match is not an error");
    assert!(rows.is_empty());
}

#[test]
fn recency_boost_reorders_equal_matches() {
    let store = MemoryStore::new(vec![
        Candidate {
            year: Some(2025),
            rating: Some(7.0),
            ..Candidate::new(10, "Mirror")
        },
        Candidate {
            year: Some(2010),
            rating: Some(7.0),
            ..Candidate::new(11, "Mirror")
        },
    ]);
    let mut config = SearchConfig::default();
    config.fusion.boost_recent = true;
    let engine = SearchEngine::similarity_only(store, config);

    let rows = engine.search(&SearchRequest::new("mirror")).expect("search");
    assert_eq!(rows[0].id.0, 10, "recent record wins under boost_recent");
    assert!(rows[0].fused_score > rows[1].fused_score);
}
