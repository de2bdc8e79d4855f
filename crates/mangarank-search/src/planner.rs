//! Query planning: indexed lookup, similarity fallback, and merge.
//!
//! # Overview
//!
//! A request moves through four states:
//!
//! ```text
//! INDEXED_LOOKUP -> SIMILARITY_FALLBACK -> MERGE -> DONE
//! ```
//!
//! The index is consulted first because it is fast and precise; the fallback
//! scan exists because edit-distance fuzziness misses genuine near-matches
//! (transliteration variants, reordered words) and because the index may be
//! down entirely. Index unavailability, timeouts, and fuzziness rejections
//! all degrade to the fallback with a `warn!`; only the candidate store
//! failing is fatal, because no further degradation path exists below it.
//!
//! Caller-supplied hard filters are a pre-filter: they apply on both paths
//! before any fusion work.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::{debug, warn};

use mangarank_core::{
    Candidate, CandidateFilter, CandidateId, ErrorCode, FieldId, SearchConfig, SearchRequest,
    ValidationError,
};

use crate::fields::{FieldScore, SimilarityOpts, best_field_similarity};

// ---------------------------------------------------------------------------
// External contracts
// ---------------------------------------------------------------------------

/// One match from the external text index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexHit {
    pub id: CandidateId,
    pub score: f64,
}

/// Failures of the external text index. All variants are recovered by the
/// planner: the request degrades to the similarity fallback instead of
/// failing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("index unavailable: {0}")]
    Unavailable(String),

    #[error("index lookup timed out")]
    Timeout,

    #[error("fuzziness {requested} outside index-supported range 0..={max}")]
    InvalidFuzziness { requested: u8, max: u8 },
}

impl IndexError {
    /// Machine-readable code associated with this index failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Unavailable(_) | Self::InvalidFuzziness { .. } => ErrorCode::IndexUnavailable,
            Self::Timeout => ErrorCode::IndexTimeout,
        }
    }
}

/// Failures of the candidate store. Fatal for the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("candidate store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Machine-readable code associated with this store failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Unavailable(_) => ErrorCode::StoreUnavailable,
        }
    }
}

/// Fatal request errors surfaced to callers.
///
/// Index trouble never appears here; it is absorbed by the planner and only
/// visible through the `match_type` tag on results.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SearchError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(e) => e.code(),
            Self::Store(e) => e.code(),
        }
    }
}

/// Abstract inverted full-text index (BM25 or equivalent).
///
/// `lookup` dispatch is by [`FieldId`] only; caller text never reaches a
/// command string.
pub trait TextIndex: Sync {
    /// Matches for `query` against one field, within an edit-distance budget.
    ///
    /// # Errors
    ///
    /// [`IndexError`] on outage, timeout, or an unsupported fuzziness budget.
    fn lookup(&self, field: FieldId, query: &str, fuzziness: u8)
    -> Result<Vec<IndexHit>, IndexError>;
}

/// Abstract relational store holding the candidate records.
pub trait CandidateStore: Sync {
    /// Filtered scan, bounded by `max` to protect the fusion stage.
    ///
    /// # Errors
    ///
    /// [`StoreError`] when the store cannot be reached.
    fn fetch_candidates(
        &self,
        filter: &CandidateFilter,
        max: usize,
    ) -> Result<Vec<Candidate>, StoreError>;

    /// Full record for one id, used to hydrate index hits the scan missed.
    ///
    /// # Errors
    ///
    /// [`StoreError`] when the store cannot be reached.
    fn fetch_by_id(&self, id: CandidateId) -> Result<Option<Candidate>, StoreError>;
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Cooperative cancellation flag, checked between fallback-scan batches.
///
/// Cancelling one request never affects another; each request carries its own
/// token.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Merge output
// ---------------------------------------------------------------------------

/// One candidate after MERGE: whichever signals each path produced.
///
/// A candidate seen only by the index carries `field_score` from the
/// hydration pass; a candidate seen only by the scan has no `index_score`.
#[derive(Debug, Clone)]
pub struct MergedCandidate {
    pub candidate: Candidate,
    pub index_score: Option<f64>,
    pub index_field: Option<FieldId>,
    pub field_score: Option<FieldScore>,
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// Run both retrieval paths for a validated request and merge by id.
///
/// `index` may be `None` (no index configured); the request then runs as a
/// pure similarity scan. The caller is responsible for having validated
/// `request` first.
///
/// # Errors
///
/// Only [`StoreError`] propagates; every index failure degrades.
pub fn plan<I: TextIndex, S: CandidateStore>(
    request: &SearchRequest,
    index: Option<&I>,
    store: &S,
    config: &SearchConfig,
    cancel: &CancellationToken,
) -> Result<Vec<MergedCandidate>, StoreError> {
    let query = request.trimmed_query();
    let fields = request.normalized_fields();
    let opts = SimilarityOpts {
        exact_bonus: if request.boost_exact_matches {
            config.fusion.exact_bonus
        } else {
            0.0
        },
        length_penalty: config.fusion.length_penalty,
    };

    // INDEXED_LOOKUP
    let index_hits = match index {
        Some(index) => indexed_lookup(index, query, &fields, request.fuzzy_distance),
        None => HashMap::new(),
    };
    debug!(hits = index_hits.len(), "indexed lookup complete");

    // SIMILARITY_FALLBACK
    let scanned = store.fetch_candidates(&request.filters, config.scan_limit)?;
    // Requests may tighten the scan threshold but never relax it below the
    // configured floor.
    let threshold = request.min_similarity.max(config.similarity_threshold);
    let mut merged: HashMap<CandidateId, MergedCandidate> = HashMap::new();

    for batch in scanned.chunks(config.scan_batch_size.max(1)) {
        if cancel.is_cancelled() {
            debug!("fallback scan cancelled; returning partial results");
            break;
        }
        let scored: Vec<(Candidate, Option<FieldScore>)> = batch
            .par_iter()
            .filter_map(|candidate| {
                let score = best_field_similarity(query, candidate, &fields, opts);
                let keep = score.is_some_and(|s| s.similarity >= threshold)
                    || index_hits.contains_key(&candidate.id);
                keep.then(|| (candidate.clone(), score))
            })
            .collect();

        for (candidate, field_score) in scored {
            let (index_score, index_field) = index_hits
                .get(&candidate.id)
                .map_or((None, None), |&(score, field)| (Some(score), Some(field)));
            merged.insert(
                candidate.id,
                MergedCandidate {
                    candidate,
                    index_score,
                    index_field,
                    field_score,
                },
            );
        }
    }

    // MERGE: hydrate index hits the bounded scan never saw. Filters still
    // apply; the index knows nothing about them.
    for (&id, &(score, field)) in &index_hits {
        if merged.contains_key(&id) {
            continue;
        }
        let Some(candidate) = store.fetch_by_id(id)? else {
            // Index is stale relative to the store; skip silently.
            continue;
        };
        if !request.filters.matches(&candidate) {
            continue;
        }
        let field_score = best_field_similarity(query, &candidate, &fields, opts);
        merged.insert(
            id,
            MergedCandidate {
                candidate,
                index_score: Some(score),
                index_field: Some(field),
                field_score,
            },
        );
    }

    Ok(merged.into_values().collect())
}

/// Fan out one lookup per field across scoped threads and join the hits.
///
/// Per-field failures degrade that field only; a field set where every lookup
/// fails leaves the map empty, which downstream treats as "index found
/// nothing".
fn indexed_lookup<I: TextIndex>(
    index: &I,
    query: &str,
    fields: &[FieldId],
    fuzziness: u8,
) -> HashMap<CandidateId, (f64, FieldId)> {
    let results: Vec<(FieldId, Result<Vec<IndexHit>, IndexError>)> = std::thread::scope(|scope| {
        let handles: Vec<_> = fields
            .iter()
            .map(|&field| {
                scope.spawn(move || (field, index.lookup(field, query, fuzziness)))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(result) => result,
                Err(payload) => std::panic::resume_unwind(payload),
            })
            .collect()
    });

    let mut hits: HashMap<CandidateId, (f64, FieldId)> = HashMap::new();
    // `fields` is in priority order, so on equal scores the earlier field
    // keeps the slot.
    for (field, result) in results {
        match result {
            Ok(field_hits) => {
                for hit in field_hits {
                    hits.entry(hit.id)
                        .and_modify(|slot| {
                            if hit.score > slot.0 {
                                *slot = (hit.score, field);
                            }
                        })
                        .or_insert((hit.score, field));
                }
            }
            Err(err) => {
                warn!(
                    field = %field,
                    code = %err.code(),
                    "index lookup degraded to similarity fallback: {err}"
                );
            }
        }
    }
    hits
}
