//! Deterministic ordering of merged candidates.
//!
//! Sort key: fused score descending, then rating descending, then id
//! ascending. The id tail makes the order a total one: two runs over the
//! same input can never reorder ties.

#![allow(clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};

use mangarank_core::{CandidateId, FieldId, SearchConfig};

use crate::fusion::{MatchType, fuse, recency_multiplier};
use crate::planner::MergedCandidate;

/// One row of the final ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub id: CandidateId,
    pub title: String,
    pub native_title: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    /// Field that produced the winning similarity; `None` when the candidate
    /// matched through the index alone with no scoreable field.
    pub matched_field: Option<FieldId>,
    pub fused_score: f64,
    pub match_type: MatchType,
}

/// Fuse, sort, dedup, paginate.
///
/// `now_year` feeds the recency boost; passing it in keeps ranking a pure
/// function of its inputs.
#[must_use]
pub fn rank(
    merged: Vec<MergedCandidate>,
    config: &SearchConfig,
    now_year: i32,
    offset: usize,
    limit: usize,
) -> Vec<RankedResult> {
    let mut rows: Vec<RankedResult> = merged
        .into_iter()
        .map(|m| {
            let similarity = m.field_score.map_or(0.0, |s| s.similarity);
            let fused = fuse(m.index_score, similarity, &config.fusion);
            let boosted = fused.score
                * recency_multiplier(m.candidate.year, now_year, &config.fusion);

            let matched_field = m.field_score.map(|s| s.field).or(m.index_field);

            RankedResult {
                id: m.candidate.id,
                title: m.candidate.title,
                native_title: m.candidate.native_title,
                year: m.candidate.year,
                rating: m.candidate.rating,
                matched_field,
                fused_score: boosted,
                match_type: fused.match_type,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.fused_score
            .partial_cmp(&a.fused_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                let ra = a.rating.unwrap_or(f64::NEG_INFINITY);
                let rb = b.rating.unwrap_or(f64::NEG_INFINITY);
                rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.id.cmp(&b.id))
    });

    // Keep the first (highest-scoring) occurrence of each id.
    let mut seen = std::collections::HashSet::new();
    rows.retain(|row| seen.insert(row.id));

    rows.into_iter().skip(offset).take(limit).collect()
}
