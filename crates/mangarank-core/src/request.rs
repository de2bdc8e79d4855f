//! Caller-facing search request and its validation.
//!
//! Validation runs before any index or store access: a request that fails
//! here never costs a lookup.

#![allow(clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::error::ErrorCode;
use crate::model::{CandidateFilter, FieldId};

/// Malformed-request errors, rejected before the planner runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The query is empty (or whitespace-only) after trimming.
    #[error("query must not be empty")]
    EmptyQuery,

    /// Requested fuzzy distance exceeds the configured maximum.
    #[error("fuzzy distance {requested} outside supported range 0..={max}")]
    FuzzinessOutOfRange { requested: u8, max: u8 },

    /// Limit is zero or exceeds the configured cap.
    #[error("limit {requested} outside supported range 1..={max}")]
    InvalidLimit { requested: usize, max: usize },

    /// The request named no fields to search.
    #[error("search_fields must not be empty")]
    EmptyFieldSet,
}

impl ValidationError {
    /// Machine-readable code associated with this validation failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyQuery => ErrorCode::EmptyQuery,
            Self::FuzzinessOutOfRange { .. } => ErrorCode::FuzzinessOutOfRange,
            Self::InvalidLimit { .. } => ErrorCode::InvalidLimit,
            Self::EmptyFieldSet => ErrorCode::InvalidFieldSet,
        }
    }
}

/// One ranking request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Query text. Must be non-empty after trimming.
    pub query: String,

    /// Fields to match against. Defaults to the primary title only.
    #[serde(default = "default_search_fields")]
    pub search_fields: Vec<FieldId>,

    /// Edit-distance budget handed to the text index.
    #[serde(default = "default_fuzzy_distance")]
    pub fuzzy_distance: u8,

    /// Similarity threshold for the fallback scan.
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f64,

    /// Whether exact-substring matches receive the flat score bonus.
    #[serde(default = "default_true")]
    pub boost_exact_matches: bool,

    /// Hard pre-filters, applied on every path.
    #[serde(default)]
    pub filters: CandidateFilter,

    #[serde(default = "default_limit")]
    pub limit: usize,

    #[serde(default)]
    pub offset: usize,
}

impl SearchRequest {
    /// Request with defaults for everything but the query text.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            search_fields: default_search_fields(),
            fuzzy_distance: default_fuzzy_distance(),
            min_similarity: default_min_similarity(),
            boost_exact_matches: true,
            filters: CandidateFilter::default(),
            limit: default_limit(),
            offset: 0,
        }
    }

    /// Query text with surrounding whitespace removed.
    #[must_use]
    pub fn trimmed_query(&self) -> &str {
        self.query.trim()
    }

    /// Requested fields in priority order with duplicates removed.
    #[must_use]
    pub fn normalized_fields(&self) -> Vec<FieldId> {
        FieldId::ALL
            .into_iter()
            .filter(|f| self.search_fields.contains(f))
            .collect()
    }

    /// Check the request against configured limits.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found; empty query is checked
    /// before range violations so the cheapest defect reports first.
    pub fn validate(&self, config: &SearchConfig) -> Result<(), ValidationError> {
        if self.trimmed_query().is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        if self.search_fields.is_empty() {
            return Err(ValidationError::EmptyFieldSet);
        }
        if self.fuzzy_distance > config.max_fuzzy_distance {
            return Err(ValidationError::FuzzinessOutOfRange {
                requested: self.fuzzy_distance,
                max: config.max_fuzzy_distance,
            });
        }
        if self.limit == 0 || self.limit > config.max_limit {
            return Err(ValidationError::InvalidLimit {
                requested: self.limit,
                max: config.max_limit,
            });
        }
        Ok(())
    }
}

fn default_search_fields() -> Vec<FieldId> {
    vec![FieldId::Title]
}

const fn default_fuzzy_distance() -> u8 {
    2
}

const fn default_min_similarity() -> f64 {
    0.3
}

const fn default_true() -> bool {
    true
}

const fn default_limit() -> usize {
    20
}
