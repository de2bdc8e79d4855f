//! Fusion of index relevance and string similarity into one comparable score.
//!
//! The fusion is an asymmetric max, not a weighted sum: either signal may win
//! outright, so a strong exact index match is never diluted by a weak
//! similarity signal and vice versa. Similarity (bounded by 1.0) is scaled by
//! a multiplier so it can compete with index scores, which are unbounded but
//! commonly single-digit.

use serde::{Deserialize, Serialize};

pub use mangarank_core::config::FusionWeights;

/// Which signal produced the winning score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchType {
    /// The external index supplied the winning relevance score.
    IndexMatch,
    /// The similarity fallback supplied (or tied for) the winning score.
    SimilarityFallback,
}

/// A fused score plus its provenance tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusedScore {
    pub score: f64,
    pub match_type: MatchType,
}

/// Combine an optional index relevance score with a field similarity.
///
/// `score = max(index_score ?? 0, similarity * multiplier)`. The tag is
/// [`MatchType::IndexMatch`] only when an index score is present and at least
/// as large as the scaled similarity.
///
/// The exact-containment bonus is not applied here: it is already part of
/// the similarity value (see `metrics::combined_similarity_with`).
#[must_use]
pub fn fuse(index_score: Option<f64>, similarity: f64, weights: &FusionWeights) -> FusedScore {
    let scaled = similarity * weights.similarity_multiplier;
    match index_score {
        Some(idx) if idx >= scaled => FusedScore {
            score: idx,
            match_type: MatchType::IndexMatch,
        },
        Some(idx) => FusedScore {
            score: scaled.max(idx),
            match_type: MatchType::SimilarityFallback,
        },
        None => FusedScore {
            score: scaled,
            match_type: MatchType::SimilarityFallback,
        },
    }
}

/// Year distance treated as "recent".
const RECENT_YEARS: i32 = 2;

/// Year distance treated as "moderately recent".
const MODERATE_YEARS: i32 = 5;

/// Recency multiplier for a record year, gated by `weights.boost_recent`.
///
/// Records without a year, or outside the moderately-recent window, are left
/// untouched. The windows are disjoint by construction so the boost is
/// order-independent with the containment bonus.
#[must_use]
pub fn recency_multiplier(year: Option<i32>, now_year: i32, weights: &FusionWeights) -> f64 {
    if !weights.boost_recent {
        return 1.0;
    }
    match year {
        Some(y) if (now_year - y).abs() <= RECENT_YEARS => weights.recent_boost,
        Some(y) if (now_year - y).abs() <= MODERATE_YEARS => weights.moderate_boost,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]

    use super::*;

    #[test]
    fn index_score_wins_when_larger() {
        let fused = fuse(Some(12.0), 0.9, &FusionWeights::default());
        assert!((fused.score - 12.0).abs() < 1e-9);
        assert_eq!(fused.match_type, MatchType::IndexMatch);
    }

    #[test]
    fn scaled_similarity_wins_when_larger() {
        // 0.9 * 8.0 = 7.2 > 3.0
        let fused = fuse(Some(3.0), 0.9, &FusionWeights::default());
        assert!((fused.score - 7.2).abs() < 1e-9);
        assert_eq!(fused.match_type, MatchType::SimilarityFallback);
    }

    #[test]
    fn absent_index_score_tags_fallback() {
        let fused = fuse(None, 0.5, &FusionWeights::default());
        assert!((fused.score - 4.0).abs() < 1e-9);
        assert_eq!(fused.match_type, MatchType::SimilarityFallback);
    }

    #[test]
    fn equal_signals_tag_index_match() {
        // idx == scaled similarity: the index claims the tie.
        let fused = fuse(Some(8.0), 1.0, &FusionWeights::default());
        assert_eq!(fused.match_type, MatchType::IndexMatch);
    }

    #[test]
    fn zero_similarity_without_index_scores_zero() {
        let fused = fuse(None, 0.0, &FusionWeights::default());
        assert_eq!(fused.score, 0.0);
    }

    #[test]
    fn recency_disabled_by_default() {
        let w = FusionWeights::default();
        assert!((recency_multiplier(Some(2026), 2026, &w) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn recency_windows() {
        let w = FusionWeights {
            boost_recent: true,
            ..FusionWeights::default()
        };
        assert!((recency_multiplier(Some(2025), 2026, &w) - 1.5).abs() < 1e-9);
        assert!((recency_multiplier(Some(2022), 2026, &w) - 1.2).abs() < 1e-9);
        assert!((recency_multiplier(Some(2010), 2026, &w) - 1.0).abs() < 1e-9);
        assert!((recency_multiplier(None, 2026, &w) - 1.0).abs() < 1e-9);
    }
}
