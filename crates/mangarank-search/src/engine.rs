//! Top-level search orchestration.
//!
//! Validates the request, runs the planner over whatever backends are
//! configured, and hands the merged candidates to the ranker. Stateless
//! between requests: the only shared resources are the read-only index and
//! store handles.

#![allow(clippy::module_name_repetitions)]

use chrono::{Datelike, Utc};
use tracing::instrument;

use mangarank_core::{FieldId, SearchConfig, SearchRequest};

use crate::planner::{
    CancellationToken, CandidateStore, IndexError, IndexHit, SearchError, TextIndex, plan,
};
use crate::ranker::{RankedResult, rank};

/// Placeholder index type for similarity-only engines.
///
/// Never consulted (the engine holds no index at all) but gives the type
/// parameter something to name.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIndex;

impl TextIndex for NoIndex {
    fn lookup(
        &self,
        _field: FieldId,
        _query: &str,
        _fuzziness: u8,
    ) -> Result<Vec<IndexHit>, IndexError> {
        Err(IndexError::Unavailable("no index configured".into()))
    }
}

/// The hybrid ranking engine.
///
/// Holds read handles to the external backends plus the engine
/// configuration. Construct once, share across requests.
#[derive(Debug)]
pub struct SearchEngine<I, S> {
    index: Option<I>,
    store: S,
    config: SearchConfig,
}

impl<S: CandidateStore> SearchEngine<NoIndex, S> {
    /// Engine with no text index: every request runs the similarity scan.
    #[must_use]
    pub fn similarity_only(store: S, config: SearchConfig) -> Self {
        Self {
            index: None,
            store,
            config,
        }
    }
}

impl<I: TextIndex, S: CandidateStore> SearchEngine<I, S> {
    /// Engine with both retrieval paths available.
    #[must_use]
    pub fn new(index: I, store: S, config: SearchConfig) -> Self {
        Self {
            index: Some(index),
            store,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run one ranking request.
    ///
    /// # Errors
    ///
    /// [`SearchError::Validation`] for malformed requests (checked before any
    /// backend access) and [`SearchError::Store`] when the candidate store is
    /// unreachable. Index trouble never surfaces here; affected requests
    /// degrade to the similarity fallback and carry on.
    pub fn search(&self, request: &SearchRequest) -> Result<Vec<RankedResult>, SearchError> {
        self.search_with_cancel(request, &CancellationToken::new())
    }

    /// [`Self::search`] with a caller-held cancellation token.
    ///
    /// Cancellation stops remaining fallback-scan batches promptly; already
    /// scored candidates are still ranked and returned.
    ///
    /// # Errors
    ///
    /// See [`Self::search`].
    #[instrument(skip_all, fields(query = %request.trimmed_query()))]
    pub fn search_with_cancel(
        &self,
        request: &SearchRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<RankedResult>, SearchError> {
        request.validate(&self.config)?;

        let merged = plan(
            request,
            self.index.as_ref(),
            &self.store,
            &self.config,
            cancel,
        )?;

        let now_year = Utc::now().year();
        Ok(rank(
            merged,
            &self.config,
            now_year,
            request.offset,
            request.limit,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use mangarank_core::Candidate;

    #[test]
    fn validation_runs_before_any_backend_access() {
        // A poisoned store would fail any scan; an invalid request must be
        // rejected without touching it.
        let store = MemoryStore::new(vec![Candidate::new(1, "Naruto")]).poisoned();
        let engine = SearchEngine::similarity_only(store, SearchConfig::default());

        let err = engine
            .search(&SearchRequest::new("  "))
            .expect_err("empty query");
        assert!(matches!(err, SearchError::Validation(_)));
    }

    #[test]
    fn no_match_is_empty_success_not_error() {
        let store = MemoryStore::new(vec![Candidate::new(1, "Naruto")]);
        let engine = SearchEngine::similarity_only(store, SearchConfig::default());

        let rows = engine
            .search(&SearchRequest::new("zzzzqqqq"))
            .expect("no-match is success");
        assert!(rows.is_empty());
    }
}
