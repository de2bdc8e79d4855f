//! Per-field similarity reduction.
//!
//! A query is compared against each requested text attribute of a candidate
//! and reduced to the single best score, annotated with the field that
//! produced it. Absent fields do not participate; they are skipped rather
//! than scored as zero against the max.

#![allow(clippy::module_name_repetitions)]

use mangarank_core::{Candidate, FieldId};

use crate::metrics::combined_similarity_with;

/// The winning field and its similarity for one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldScore {
    pub field: FieldId,
    pub similarity: f64,
}

/// Coefficients threaded into [`combined_similarity_with`].
#[derive(Debug, Clone, Copy)]
pub struct SimilarityOpts {
    /// Additive containment bonus; zero disables it.
    pub exact_bonus: f64,
    pub length_penalty: f64,
}

impl Default for SimilarityOpts {
    fn default() -> Self {
        Self {
            exact_bonus: crate::metrics::DEFAULT_EXACT_BONUS,
            length_penalty: crate::metrics::DEFAULT_LENGTH_PENALTY,
        }
    }
}

/// Best similarity between `query` and the included, present fields of
/// `candidate`.
///
/// `fields` must be in priority order (see [`FieldId::ALL`]); ties on score
/// go to the earlier field. Returns `None` when every included field is
/// absent.
#[must_use]
pub fn best_field_similarity(
    query: &str,
    candidate: &Candidate,
    fields: &[FieldId],
    opts: SimilarityOpts,
) -> Option<FieldScore> {
    let mut best: Option<FieldScore> = None;

    for &field in fields {
        let Some(value) = candidate.field(field) else {
            continue;
        };
        let similarity =
            combined_similarity_with(query, value, opts.exact_bonus, opts.length_penalty);

        // Strict greater-than keeps the earlier (higher-priority) field on ties.
        let better = best.is_none_or(|b| similarity > b.similarity);
        if better {
            best = Some(FieldScore { field, similarity });
        }
    }

    best
}
